//! Analytics types

use serde::{Deserialize, Serialize};

/// Default lookback of the analytics view
pub const DEFAULT_MONTHS: u32 = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyFlow {
    pub month: String,
    pub income: f64,
    pub expenses: f64,
}

impl MonthlyFlow {
    pub fn net(&self) -> f64 {
        self.income - self.expenses
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub month: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTrend {
    pub category: String,
    #[serde(default)]
    pub data: Vec<TrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiggestExpense {
    pub amount: f64,
    pub description: String,
    pub category: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Insights {
    pub avg_monthly_savings: f64,
    /// Percentage of income saved over the period
    pub savings_rate: f64,
    pub biggest_expense: Option<BiggestExpense>,
    pub total_income: f64,
    pub total_expenses: f64,
    pub period_months: u32,
}

/// Response of `GET /transactions/analytics/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    #[serde(default)]
    pub monthly_data: Vec<MonthlyFlow>,
    #[serde(default)]
    pub category_trends: Vec<CategoryTrend>,
    #[serde(default)]
    pub insights: Insights,
}
