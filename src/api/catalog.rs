//! Categories, accounts, assets and portfolio types

use serde::{Deserialize, Serialize};

use super::flexible_f64;
use super::transactions::CategoryType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryType,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type", alias = "account_type", default)]
    pub kind: String,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub balance: f64,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type", alias = "asset_type", default)]
    pub kind: String,
    #[serde(alias = "current_value", default, deserialize_with = "flexible_f64")]
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSlice {
    pub name: String,
    pub value: f64,
    #[serde(default)]
    pub count: u32,
    pub percentage: f64,
}

/// Response of `GET /assets/portfolio_summary/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_value: f64,
    pub asset_count: u32,
    #[serde(default)]
    pub composition: Vec<PortfolioSlice>,
}

/// List endpoints answer either with a paginated envelope or a bare array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListResponse<T> {
    Paginated { results: Vec<T> },
    Data { data: Vec<T> },
    Plain(Vec<T>),
}

impl<T> ListResponse<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListResponse::Paginated { results } => results,
            ListResponse::Data { data } => data,
            ListResponse::Plain(items) => items,
        }
    }
}
