//! # FinTrack
//!
//! Client library for the FinTrack personal-finance service: authenticated
//! access to wealth, budget, transaction and analytics data, plus the
//! presentation helpers used by the `fintrack` terminal dashboard.
//!
//! ## Modules
//!
//! - [`session`]: Token pair and cached user storage
//! - [`client`]: HTTP client with bearer injection and one refresh-and-retry on `401`
//! - [`auth`]: Login, logout and session bootstrap
//! - [`api`]: Typed read operations on the data service
//! - [`listing`]: Transaction list filters, pagination and sorting
//! - [`format`]: Currency, date and percentage formatting
//! - [`poll`]: Interval polling and abandonable view requests
//! - [`config`] / [`logging`]: Configuration and `tracing` setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fintrack::{ApiClient, AuthFlow, Config, FileSessionStore, FinanceApi, Period};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let store = Arc::new(FileSessionStore::open(config.session.dir_path())?);
//!     let client = Arc::new(ApiClient::new(config.api.clone(), store)?);
//!
//!     let auth = AuthFlow::new(Arc::clone(&client));
//!     if !auth.login("demo@fintrack.com", "demo123").await {
//!         return Err("login failed".into());
//!     }
//!
//!     let api = FinanceApi::new(client);
//!     let stats = api.dashboard_stats(Some(Period::SixMonths)).await?;
//!     println!("Total wealth: {}", fintrack::format::format_currency(stats.current.total_wealth));
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod format;
pub mod listing;
pub mod logging;
pub mod poll;
pub mod session;

#[cfg(test)]
mod test_support;

pub use api::{
    Analytics, BudgetOverview, BudgetStatus, CategoryType, DashboardStats, FinanceApi, Page,
    Period, SortSpec, Transaction, TransactionQuery,
};
pub use auth::{AuthFlow, Restored, UserStatistics};
pub use client::{ApiClient, ClientError, ClientResult, ErrorKind, RequestDescriptor, SessionEvent, Service};
pub use config::{generate_default_config, Config, ConfigError};
pub use listing::TransactionFilters;
pub use poll::{Poller, ViewScope};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore, TokenPair, User};
