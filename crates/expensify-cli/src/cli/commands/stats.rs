//! Stats command handler.

use anyhow::Result;
use expensify_core::api;
use expensify_core::expense::{Period, format_currency};

use super::{report, require_session};
use crate::cli::Manager;

pub async fn show(manager: &Manager, period: Period) -> Result<()> {
    let mut session = require_session(manager)?;
    let stats = api::expenses::stats(manager, &mut session, period)
        .await
        .map_err(report)?;

    println!("{} spending", period.label());
    println!("  Total spent:  {}", format_currency(stats.total_amount));
    println!("  Transactions: {}", stats.total_expenses);

    if stats.is_empty() {
        println!();
        println!("Add some expenses to see your spending analytics.");
        return Ok(());
    }

    let chart = stats.sorted_chart();
    if !chart.is_empty() {
        println!();
        println!("Over time:");
        for point in chart {
            println!(
                "  {:<8} {:>12}",
                point.date.format("%b %-d").to_string(),
                format_currency(point.amount)
            );
        }
    }

    let breakdown = stats.category_breakdown();
    if !breakdown.is_empty() {
        println!();
        println!("By category:");
        for share in breakdown {
            println!(
                "  {:<16} {:>6.1}%  {}",
                share.category,
                share.percentage,
                format_currency(share.amount)
            );
        }
    }
    Ok(())
}
