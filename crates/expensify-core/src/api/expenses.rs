//! Bearer-authenticated expense endpoints.

use reqwest::Method;
use serde::Deserialize;

use super::{EXPENSES_PATH, STATS_PATH, parse_json};
use crate::error::ClientError;
use crate::expense::{Expense, ExpenseList, NewExpense, Period, Stats};
use crate::manager::SessionManager;
use crate::session::Session;
use crate::store::KeyValueStore;

#[derive(Debug, Deserialize)]
struct StatsResponse {
    #[serde(default)]
    stats: Stats,
}

/// The create endpoint answers either with the expense itself or wrapped.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CreatedExpense {
    Wrapped { expense: Expense },
    Bare(Expense),
}

/// `GET /expenses`.
pub async fn list<S: KeyValueStore>(
    manager: &SessionManager<S>,
    session: &mut Session,
) -> Result<ExpenseList, ClientError> {
    let response = manager
        .authorized_request(session, Method::GET, EXPENSES_PATH, None)
        .await?;
    if !response.status().is_success() {
        return Err(ClientError::from_response(response, "Failed to load expenses").await);
    }
    parse_json(response).await
}

/// `POST /expenses`.
pub async fn create<S: KeyValueStore>(
    manager: &SessionManager<S>,
    session: &mut Session,
    expense: &NewExpense,
) -> Result<Expense, ClientError> {
    let body = serde_json::to_value(expense).map_err(|err| ClientError::parse(err.to_string()))?;
    let response = manager
        .authorized_request(session, Method::POST, EXPENSES_PATH, Some(&body))
        .await?;
    if !response.status().is_success() {
        return Err(ClientError::from_response(response, "Failed to add expense").await);
    }

    let created: CreatedExpense = parse_json(response).await?;
    let expense = match created {
        CreatedExpense::Wrapped { expense } | CreatedExpense::Bare(expense) => expense,
    };
    tracing::info!(id = %expense.id, amount = expense.amount, category = %expense.category, "expense added");
    Ok(expense)
}

/// `GET /expenses/stats?period=<period>`.
pub async fn stats<S: KeyValueStore>(
    manager: &SessionManager<S>,
    session: &mut Session,
    period: Period,
) -> Result<Stats, ClientError> {
    let path = format!("{STATS_PATH}?period={period}");
    let response = manager
        .authorized_request(session, Method::GET, &path, None)
        .await?;
    if !response.status().is_success() {
        return Err(ClientError::from_response(response, "Failed to load stats").await);
    }
    let parsed: StatsResponse = parse_json(response).await?;
    Ok(parsed.stats)
}
