//! Budget overview types

use serde::{Deserialize, Serialize};
use std::fmt;

use super::flexible_f64;

/// Spending above this share of the allocation is a warning
pub const WARNING_RATIO: f64 = 0.8;

/// Health of a single budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BudgetStatus {
    #[serde(rename = "on_track", alias = "good")]
    OnTrack,
    #[serde(rename = "warning")]
    Warning,
    #[serde(rename = "exceeded")]
    Exceeded,
}

impl BudgetStatus {
    /// Classify spending against an allocation: above 100% exceeded, above 80% warning
    pub fn from_usage(spent: f64, allocated: f64) -> Self {
        if allocated <= 0.0 {
            return if spent > 0.0 {
                BudgetStatus::Exceeded
            } else {
                BudgetStatus::OnTrack
            };
        }

        let ratio = spent / allocated;
        if ratio > 1.0 {
            BudgetStatus::Exceeded
        } else if ratio > WARNING_RATIO {
            BudgetStatus::Warning
        } else {
            BudgetStatus::OnTrack
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetStatus::OnTrack => "on_track",
            BudgetStatus::Warning => "warning",
            BudgetStatus::Exceeded => "exceeded",
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetSummary {
    pub total_allocated: f64,
    pub total_spent: f64,
    pub total_remaining: f64,
    pub overall_percentage: f64,
    pub over_budget_count: u32,
    pub budget_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: u64,
    pub category: BudgetCategory,
    #[serde(deserialize_with = "flexible_f64")]
    pub allocated: f64,
    #[serde(deserialize_with = "flexible_f64")]
    pub spent: f64,
    #[serde(deserialize_with = "flexible_f64")]
    pub remaining: f64,
    pub percentage: f64,
    pub status: BudgetStatus,
    #[serde(default)]
    pub days_left: i64,
}

/// Slice of the expense pie chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSlice {
    pub name: String,
    pub value: f64,
    #[serde(default)]
    pub color: String,
}

/// Response of `GET /budgets/overview/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetOverview {
    pub summary: BudgetSummary,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub expense_chart_data: Vec<ExpenseSlice>,
}

impl BudgetOverview {
    pub fn over_budget(&self) -> impl Iterator<Item = &Budget> {
        self.budgets
            .iter()
            .filter(|b| b.status == BudgetStatus::Exceeded)
    }
}

/// Free-form alert; the server decides which fields are present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAlert {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AlertsEnvelope {
    #[serde(default)]
    pub alerts: Vec<BudgetAlert>,
}
