//! Expense command handlers (dashboard and add form).

use anyhow::Result;
use chrono::{DateTime, Utc};
use expensify_core::api;
use expensify_core::expense::{Category, NewExpense, QUICK_SUGGESTIONS, format_currency, top_categories};

use super::{report, require_session};
use crate::cli::Manager;

const TOP_CATEGORY_COUNT: usize = 3;

pub async fn list(manager: &Manager) -> Result<()> {
    let mut session = require_session(manager)?;
    let list = api::expenses::list(manager, &mut session)
        .await
        .map_err(report)?;

    println!("Hello, {}", session.user.name);
    println!("Total spent: {}", format_currency(list.total));

    if list.expenses.is_empty() {
        println!();
        println!("No expenses yet. Add one with `expensify expenses add`.");
        return Ok(());
    }

    println!();
    println!("Top categories:");
    for share in top_categories(&list.expenses, TOP_CATEGORY_COUNT) {
        println!(
            "  {:<16} {:>4.0}%  {}",
            share.category,
            share.percentage,
            format_currency(share.amount)
        );
    }

    println!();
    println!("Recent expenses:");
    for expense in &list.expenses {
        println!(
            "  {:<14} {:<16} {:>12}  {}",
            expense.date.format("%b %-d, %H:%M").to_string(),
            expense.category,
            format_currency(expense.amount),
            expense.description
        );
    }
    Ok(())
}

pub struct AddArgs<'a> {
    pub amount: &'a str,
    pub description: &'a str,
    pub category: Category,
    pub date: Option<DateTime<Utc>>,
}

pub async fn add(manager: &Manager, args: AddArgs<'_>) -> Result<()> {
    // Validate before touching the session so bad input never reaches the network.
    let expense =
        NewExpense::validate(args.amount, args.description, args.category, args.date)
            .map_err(report)?;
    let mut session = require_session(manager)?;

    let created = api::expenses::create(manager, &mut session, &expense)
        .await
        .map_err(report)?;

    println!("✓ Expense added successfully!");
    println!(
        "  {} {} - {} ({})",
        format_currency(created.amount),
        created.category,
        created.description,
        created.date.format("%b %-d, %Y")
    );
    Ok(())
}

pub fn suggestions() {
    println!("Quick add:");
    for suggestion in QUICK_SUGGESTIONS {
        println!(
            "  expensify expenses add --amount {} --description {:?} --category {}",
            suggestion.amount, suggestion.description, suggestion.category
        );
    }

    println!();
    let names: Vec<&str> = Category::all().iter().map(|c| c.as_str()).collect();
    println!("Categories: {}", names.join(", "));
}
