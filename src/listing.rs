//! Transaction list view state
//!
//! Filters, pagination and sort order of the transaction list. Narrowing the
//! result set (search text or date bounds) always returns to the first page.

use chrono::NaiveDate;
use std::cmp::Ordering;

use crate::api::transactions::{total_pages, DEFAULT_PAGE_SIZE};
use crate::api::{SortDirection, SortSpec, Transaction, TransactionQuery};

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFilters {
    search: String,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    page: u32,
    page_size: u32,
    sort: Option<SortSpec>,
}

impl Default for TransactionFilters {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl TransactionFilters {
    pub fn new(page_size: u32) -> Self {
        Self {
            search: String::new(),
            start_date: None,
            end_date: None,
            page: 1,
            page_size: page_size.max(1),
            sort: None,
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// Returns whether the term changed (and the page was reset)
    pub fn set_search(&mut self, term: impl Into<String>) -> bool {
        let term = term.into();
        if term == self.search {
            return false;
        }
        self.search = term;
        self.page = 1;
        true
    }

    pub fn set_start_date(&mut self, date: Option<NaiveDate>) -> bool {
        if date == self.start_date {
            return false;
        }
        self.start_date = date;
        self.page = 1;
        true
    }

    pub fn set_end_date(&mut self, date: Option<NaiveDate>) -> bool {
        if date == self.end_date {
            return false;
        }
        self.end_date = date;
        self.page = 1;
        true
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn next_page(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    pub fn previous_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Sort by `field`; selecting the current field again flips the direction
    pub fn sort_by(&mut self, field: &str) {
        self.sort = Some(match self.sort.take() {
            Some(current) if current.field == field => SortSpec {
                direction: current.direction.flipped(),
                ..current
            },
            _ => SortSpec::ascending(field),
        });
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
    }

    /// Pull the page back inside a result set of `total_count` items
    pub fn clamp_to(&mut self, total_count: u64) {
        let last = total_pages(total_count, self.page_size);
        if self.page > last {
            self.page = last;
        }
    }

    pub fn to_query(&self) -> TransactionQuery {
        let search = self.search.trim();
        TransactionQuery {
            search: (!search.is_empty()).then(|| search.to_string()),
            date_gte: self.start_date,
            date_lte: self.end_date,
            category: None,
            page: self.page,
            limit: self.page_size,
            ordering: self.sort.clone(),
        }
    }
}

/// Case-insensitive match of `term` against description or category name
pub fn matches_search(transaction: &Transaction, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    term.is_empty()
        || transaction.description.to_lowercase().contains(&term)
        || transaction.category.name.to_lowercase().contains(&term)
}

/// Order a loaded page locally. Unknown fields leave the order unchanged.
pub fn sort_transactions(transactions: &mut [Transaction], sort: &SortSpec) {
    let compare: fn(&Transaction, &Transaction) -> Ordering = match sort.field.as_str() {
        "date" => |a, b| a.date.cmp(&b.date),
        "amount" => |a, b| a.amount.abs().total_cmp(&b.amount.abs()),
        "description" => |a, b| a.description.to_lowercase().cmp(&b.description.to_lowercase()),
        "category" => |a, b| a.category.name.to_lowercase().cmp(&b.category.name.to_lowercase()),
        _ => return,
    };

    match sort.direction {
        SortDirection::Ascending => transactions.sort_by(compare),
        SortDirection::Descending => transactions.sort_by(|a, b| compare(b, a)),
    }
}
