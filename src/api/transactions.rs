//! Transaction listing types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::flexible_f64;
use crate::client::{RequestDescriptor, Service};

/// Default page size for transaction listings
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Whether a category records money coming in or going out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CategoryType {
    Income,
    Expense,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Income => "INCOME",
            CategoryType::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INCOME" => Ok(CategoryType::Income),
            "EXPENSE" => Ok(CategoryType::Expense),
            other => Err(format!("unknown category type: {}", other)),
        }
    }
}

/// Category embedded in a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub icon: String,
    #[serde(rename = "type")]
    pub kind: CategoryType,
}

/// Account embedded in a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRef {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: u64,
    /// Raw stored amount; its sign is not meaningful for display
    #[serde(deserialize_with = "flexible_f64")]
    pub amount: f64,
    pub date: NaiveDate,
    pub description: String,
    pub category: CategoryRef,
    pub account: AccountRef,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of items across all pages
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Number of pages for the given page size (at least 1)
    pub fn total_pages(&self, page_size: u32) -> u32 {
        total_pages(self.count, page_size)
    }
}

pub(crate) fn total_pages(count: u64, page_size: u32) -> u32 {
    let size = u64::from(page_size.max(1));
    let pages = count.div_ceil(size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Sort field plus direction, sent as `ordering=<field>` or `ordering=-<field>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }

    pub fn to_param(&self) -> String {
        match self.direction {
            SortDirection::Ascending => self.field.clone(),
            SortDirection::Descending => format!("-{}", self.field),
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_param())
    }
}

impl FromStr for SortSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (field, direction) = match s.strip_prefix('-') {
            Some(rest) => (rest, SortDirection::Descending),
            None => (s, SortDirection::Ascending),
        };
        if field.is_empty() {
            return Err("sort field must not be empty".to_string());
        }
        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }
}

/// Parameters of `GET /transactions/`
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionQuery {
    /// Free text matched by the server against description and category
    pub search: Option<String>,
    /// Inclusive lower date bound
    pub date_gte: Option<NaiveDate>,
    /// Inclusive upper date bound
    pub date_lte: Option<NaiveDate>,
    pub category: Option<u64>,
    /// 1-based page number
    pub page: u32,
    pub limit: u32,
    pub ordering: Option<SortSpec>,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            search: None,
            date_gte: None,
            date_lte: None,
            category: None,
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            ordering: None,
        }
    }
}

impl TransactionQuery {
    pub(crate) fn to_request(&self) -> RequestDescriptor {
        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        RequestDescriptor::get(Service::Data, "/transactions/")
            .query("page", self.page.max(1))
            .query("limit", self.limit.max(1))
            .query_opt("search", search)
            .query_opt("date_gte", self.date_gte.map(format_date_param))
            .query_opt("date_lte", self.date_lte.map(format_date_param))
            .query_opt("category", self.category)
            .query_opt("ordering", self.ordering.as_ref().map(SortSpec::to_param))
    }
}

fn format_date_param(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(query: &TransactionQuery) -> Vec<(String, String)> {
        query.to_request().query_pairs().to_vec()
    }

    #[test]
    fn test_default_query_only_paginates() {
        assert_eq!(
            pairs(&TransactionQuery::default()),
            vec![
                ("page".to_string(), "1".to_string()),
                ("limit".to_string(), "10".to_string())
            ]
        );
    }

    #[test]
    fn test_full_query() {
        let query = TransactionQuery {
            search: Some("  loyer ".into()),
            date_gte: NaiveDate::from_ymd_opt(2025, 6, 1),
            date_lte: NaiveDate::from_ymd_opt(2025, 6, 30),
            category: Some(4),
            page: 3,
            limit: 25,
            ordering: Some(SortSpec::descending("amount")),
        };

        let pairs = pairs(&query);
        let get = |k: &str| {
            pairs
                .iter()
                .find(|(key, _)| key == k)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("search"), Some("loyer"));
        assert_eq!(get("date_gte"), Some("2025-06-01"));
        assert_eq!(get("date_lte"), Some("2025-06-30"));
        assert_eq!(get("category"), Some("4"));
        assert_eq!(get("page"), Some("3"));
        assert_eq!(get("limit"), Some("25"));
        assert_eq!(get("ordering"), Some("-amount"));
    }

    #[test]
    fn test_blank_search_is_omitted() {
        let query = TransactionQuery {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert!(pairs(&query).iter().all(|(k, _)| k != "search"));
    }

    #[test]
    fn test_sort_spec_parse() {
        assert_eq!("-date".parse::<SortSpec>().unwrap(), SortSpec::descending("date"));
        assert_eq!("amount".parse::<SortSpec>().unwrap(), SortSpec::ascending("amount"));
        assert!("-".parse::<SortSpec>().is_err());
        assert_eq!(SortSpec::descending("date").to_string(), "-date");
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn test_transaction_accepts_string_amount() {
        let tx: Transaction = serde_json::from_value(serde_json::json!({
            "id": 2,
            "amount": "85.50",
            "date": "2024-01-14",
            "description": "Courses Carrefour",
            "category": {"id": 3, "name": "Alimentation", "type": "EXPENSE"},
            "account": {"id": 1, "name": "Courant", "type": "CHECKING"}
        }))
        .unwrap();

        assert_eq!(tx.amount, 85.5);
        assert_eq!(tx.category.kind, CategoryType::Expense);
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 1, 14).unwrap());
        assert!(tx.metadata.is_empty());
    }

    #[test]
    fn test_category_type_parse() {
        assert_eq!("income".parse::<CategoryType>().unwrap(), CategoryType::Income);
        assert_eq!("EXPENSE".parse::<CategoryType>().unwrap(), CategoryType::Expense);
        assert!("transfer".parse::<CategoryType>().is_err());
    }
}
