//! Expense domain types and the summaries shown on the dashboard and stats views.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed set of expense categories. Names the client does not know decode
/// as [`Category::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    Groceries,
    Entertainment,
    Transportation,
    Food,
    Health,
    Shopping,
    Bills,
    Education,
    #[default]
    #[serde(other)]
    Other,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Category::Groceries,
            Category::Entertainment,
            Category::Transportation,
            Category::Food,
            Category::Health,
            Category::Shopping,
            Category::Bills,
            Category::Education,
            Category::Other,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Groceries => "Groceries",
            Category::Entertainment => "Entertainment",
            Category::Transportation => "Transportation",
            Category::Food => "Food",
            Category::Health => "Health",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Education => "Education",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Case-insensitive match on the category name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::all()
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let names: Vec<&str> = Category::all().iter().map(|c| c.as_str()).collect();
                format!("Unknown category '{wanted}' (expected one of: {})", names.join(", "))
            })
    }
}

/// An expense as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(alias = "_id")]
    pub id: String,
    pub amount: f64,
    pub category: Category,
    pub description: String,
    pub date: DateTime<Utc>,
}

/// Response of `GET /expenses`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExpenseList {
    pub expenses: Vec<Expense>,
    pub total: f64,
}

/// Validated body of `POST /expenses`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewExpense {
    pub amount: f64,
    pub category: Category,
    pub description: String,
    pub date: DateTime<Utc>,
}

/// Aggregation window for `GET /expenses/stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Yearly => "yearly",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Period::Daily => "Daily",
            Period::Weekly => "Weekly",
            Period::Monthly => "Monthly",
            Period::Yearly => "Yearly",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            "yearly" => Ok(Period::Yearly),
            other => Err(format!(
                "Unknown period '{other}' (expected daily, weekly, monthly or yearly)"
            )),
        }
    }
}

/// One point of the spending-over-time series.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChartPoint {
    pub date: DateTime<Utc>,
    pub amount: f64,
}

/// Aggregated spending for a period.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Stats {
    pub total_amount: f64,
    pub total_expenses: u64,
    pub chart_data: Vec<ChartPoint>,
    pub category_stats: BTreeMap<String, f64>,
}

/// A category's share of a total.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub amount: f64,
    pub percentage: f64,
}

impl Stats {
    /// Nothing has been spent in the period.
    pub fn is_empty(&self) -> bool {
        self.total_amount == 0.0 && self.total_expenses == 0
    }

    /// Chart points ordered oldest first.
    pub fn sorted_chart(&self) -> Vec<ChartPoint> {
        let mut points = self.chart_data.clone();
        points.sort_by_key(|p| p.date);
        points
    }

    /// Categories by amount, largest first, with their share of the period
    /// total to one decimal place.
    pub fn category_breakdown(&self) -> Vec<CategoryShare> {
        let mut shares: Vec<CategoryShare> = self
            .category_stats
            .iter()
            .map(|(category, &amount)| CategoryShare {
                category: category.clone(),
                amount,
                percentage: percentage_of(amount, self.total_amount, 1),
            })
            .collect();
        shares.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        shares
    }
}

/// Top categories across `expenses`, largest first, with whole-percent shares
/// of the combined amount.
pub fn top_categories(expenses: &[Expense], limit: usize) -> Vec<CategoryShare> {
    let mut totals: BTreeMap<Category, f64> = BTreeMap::new();
    for expense in expenses {
        *totals.entry(expense.category).or_insert(0.0) += expense.amount;
    }

    let total_spent: f64 = totals.values().sum();
    let mut shares: Vec<CategoryShare> = totals
        .into_iter()
        .map(|(category, amount)| CategoryShare {
            category: category.to_string(),
            amount,
            percentage: percentage_of(amount, total_spent, 0),
        })
        .collect();
    shares.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    shares.truncate(limit);
    shares
}

fn percentage_of(amount: f64, total: f64, decimals: i32) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    let scale = 10f64.powi(decimals);
    (amount / total * 100.0 * scale).round() / scale
}

/// Formats an amount in rupees with two decimals.
pub fn format_currency(amount: f64) -> String {
    format!("₹{amount:.2}")
}

/// A one-tap template for the add-expense form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuickSuggestion {
    pub amount: f64,
    pub description: &'static str,
    pub category: Category,
}

pub const QUICK_SUGGESTIONS: &[QuickSuggestion] = &[
    QuickSuggestion {
        amount: 50.0,
        description: "Coffee",
        category: Category::Food,
    },
    QuickSuggestion {
        amount: 200.0,
        description: "Lunch",
        category: Category::Food,
    },
    QuickSuggestion {
        amount: 100.0,
        description: "Transport",
        category: Category::Transportation,
    },
    QuickSuggestion {
        amount: 500.0,
        description: "Groceries",
        category: Category::Groceries,
    },
];

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn expense(id: &str, amount: f64, category: Category) -> Expense {
        Expense {
            id: id.to_string(),
            amount,
            category,
            description: "x".to_string(),
            date: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!("food".parse::<Category>().unwrap(), Category::Food);
        assert_eq!(" Bills ".parse::<Category>().unwrap(), Category::Bills);
        let err = "Travel".parse::<Category>().unwrap_err();
        assert!(err.contains("Groceries"));
    }

    #[test]
    fn test_period_parse_and_display() {
        assert_eq!("Weekly".parse::<Period>().unwrap(), Period::Weekly);
        assert_eq!(Period::default().to_string(), "monthly");
        assert!("hourly".parse::<Period>().is_err());
    }

    #[test]
    fn test_expense_deserializes_backend_shape() {
        let json = r#"{
            "_id": "65a1",
            "amount": 120.5,
            "category": "Transportation",
            "description": "Cab",
            "date": "2025-03-04T10:00:00.000Z",
            "user": "u1"
        }"#;
        let expense: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(expense.id, "65a1");
        assert_eq!(expense.category, Category::Transportation);
        assert!((expense.amount - 120.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_category_decodes_as_other() {
        let json = r#"{
            "expenses": [
                {"_id": "1", "amount": 10, "category": "Travel", "description": "Bus", "date": "2025-03-04T10:00:00Z"},
                {"_id": "2", "amount": 20, "category": "Food", "description": "Tea", "date": "2025-03-04T11:00:00Z"}
            ],
            "total": 30
        }"#;
        let list: ExpenseList = serde_json::from_str(json).unwrap();
        assert_eq!(list.expenses.len(), 2);
        assert_eq!(list.expenses[0].category, Category::Other);
        assert_eq!(list.expenses[1].category, Category::Food);
    }

    #[test]
    fn test_expense_list_defaults_missing_fields() {
        let list: ExpenseList = serde_json::from_str("{}").unwrap();
        assert!(list.expenses.is_empty());
        assert!(list.total.abs() < f64::EPSILON);
    }

    #[test]
    fn test_top_categories_keeps_three_largest() {
        let expenses = vec![
            expense("1", 100.0, Category::Food),
            expense("2", 300.0, Category::Bills),
            expense("3", 50.0, Category::Food),
            expense("4", 25.0, Category::Health),
            expense("5", 25.0, Category::Other),
            expense("6", 500.0, Category::Shopping),
        ];

        let top = top_categories(&expenses, 3);
        let names: Vec<&str> = top.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(names, vec!["Shopping", "Bills", "Food"]);
        // 500 / 1000
        assert!((top[0].percentage - 50.0).abs() < f64::EPSILON);
        // 150 / 1000 = 15%
        assert!((top[2].percentage - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_top_categories_empty() {
        assert!(top_categories(&[], 3).is_empty());
    }

    #[test]
    fn test_stats_breakdown_and_chart_order() {
        let json = r#"{
            "totalAmount": 300,
            "totalExpenses": 4,
            "chartData": [
                {"date": "2025-03-05T00:00:00Z", "amount": 100},
                {"date": "2025-03-01T00:00:00Z", "amount": 200}
            ],
            "categoryStats": {"Food": 100, "Bills": 200}
        }"#;
        let stats: Stats = serde_json::from_str(json).unwrap();
        assert!(!stats.is_empty());

        let breakdown = stats.category_breakdown();
        assert_eq!(breakdown[0].category, "Bills");
        assert!((breakdown[0].percentage - 66.7).abs() < 1e-9);
        assert!((breakdown[1].percentage - 33.3).abs() < 1e-9);

        let chart = stats.sorted_chart();
        assert!(chart[0].date < chart[1].date);
    }

    #[test]
    fn test_empty_stats() {
        let stats: Stats = serde_json::from_str("{}").unwrap();
        assert!(stats.is_empty());
        assert!(stats.category_breakdown().is_empty());
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234.5), "₹1234.50");
        assert_eq!(format_currency(0.0), "₹0.00");
    }

    #[test]
    fn test_new_expense_serializes_wire_fields() {
        let body = NewExpense {
            amount: 50.0,
            category: Category::Food,
            description: "Coffee".to_string(),
            date: Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap(),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["category"], "Food");
        assert_eq!(value["description"], "Coffee");
        assert_eq!(value["date"], "2025-01-02T03:04:05Z");
    }
}
