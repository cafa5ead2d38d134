//! Dashboard summary types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Time window of the dashboard, sent verbatim as `period`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "YTD")]
    YearToDate,
    #[serde(rename = "MAX")]
    Max,
}

impl Period {
    pub const ALL: [Period; 5] = [
        Period::OneMonth,
        Period::SixMonths,
        Period::OneYear,
        Period::YearToDate,
        Period::Max,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneMonth => "1M",
            Period::SixMonths => "6M",
            Period::OneYear => "1Y",
            Period::YearToDate => "YTD",
            Period::Max => "MAX",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Period::ALL
            .into_iter()
            .find(|p| p.as_str() == upper)
            .ok_or_else(|| format!("unknown period '{}', expected one of 1M, 6M, 1Y, YTD, MAX", s))
    }
}

/// Headline figures for the selected period; `*_change` values are percentages
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodFigures {
    pub total_wealth: f64,
    pub wealth_change: f64,
    pub income: f64,
    pub income_change: f64,
    pub expenses: f64,
    pub expenses_change: f64,
    pub savings: f64,
    pub savings_change: f64,
    pub transactions_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WealthPoint {
    pub month: String,
    pub wealth: f64,
}

/// One slice of the wealth breakdown chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionSlice {
    pub name: String,
    pub size: f64,
    #[serde(default)]
    pub index: u32,
}

/// Response of `GET /transactions/dashboard_stats/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(rename = "current_month")]
    pub current: PeriodFigures,
    #[serde(default)]
    pub wealth_evolution: Vec<WealthPoint>,
    #[serde(default)]
    pub wealth_composition: Vec<CompositionSlice>,
}

impl DashboardStats {
    /// Wealth at the end of the evolution series, if any
    pub fn latest_wealth(&self) -> Option<f64> {
        self.wealth_evolution.last().map(|p| p.wealth)
    }
}
