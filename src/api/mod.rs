//! Data Query Layer
//!
//! Typed read operations against the financial data service. Every call goes
//! through [`ApiClient`], so expired access tokens are refreshed transparently.
//!
//! ## Endpoints
//!
//! - `GET /transactions/` - paginated, filtered transaction list
//! - `GET /transactions/dashboard_stats/?period=` - dashboard summary
//! - `GET /transactions/analytics/?months=` - income/expense analytics
//! - `GET /budgets/overview/` - budgets with status
//! - `GET /budgets/alerts/` - budget alerts
//! - `GET /categories/?type=` - categories
//! - `GET /accounts/`, `GET /assets/` - account and asset lists
//! - `GET /assets/portfolio_summary/` - portfolio breakdown
//! - `GET /health/` - service health, outside the `/api` prefix

pub mod analytics;
pub mod budgets;
pub mod catalog;
pub mod dashboard;
pub mod transactions;

pub use analytics::{Analytics, BiggestExpense, CategoryTrend, Insights, MonthlyFlow, TrendPoint};
pub use budgets::{Budget, BudgetAlert, BudgetCategory, BudgetOverview, BudgetStatus, BudgetSummary, ExpenseSlice};
pub use catalog::{Account, Asset, Category, PortfolioSlice, PortfolioSummary};
pub use dashboard::{CompositionSlice, DashboardStats, Period, PeriodFigures, WealthPoint};
pub use transactions::{
    AccountRef, CategoryRef, CategoryType, Page, SortDirection, SortSpec, Transaction,
    TransactionQuery,
};

use crate::client::{ApiClient, ClientError, ClientResult, RequestDescriptor, Service};
use budgets::AlertsEnvelope;
use catalog::ListResponse;
use serde::{Deserialize, Deserializer};
use std::sync::Arc;

/// Read-only access to the financial data service
#[derive(Clone)]
pub struct FinanceApi {
    client: Arc<ApiClient>,
}

impl FinanceApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// One page of transactions matching `query`
    pub async fn transactions(&self, query: &TransactionQuery) -> ClientResult<Page<Transaction>> {
        self.client.send(&query.to_request()).await
    }

    /// Dashboard summary; the server picks its default window when `period` is `None`
    pub async fn dashboard_stats(&self, period: Option<Period>) -> ClientResult<DashboardStats> {
        let request = RequestDescriptor::get(Service::Data, "/transactions/dashboard_stats/")
            .query_opt("period", period.map(|p| p.as_str()));
        self.client.send(&request).await
    }

    pub async fn budget_overview(&self) -> ClientResult<BudgetOverview> {
        self.client
            .send(&RequestDescriptor::get(Service::Data, "/budgets/overview/"))
            .await
    }

    pub async fn budget_alerts(&self) -> ClientResult<Vec<BudgetAlert>> {
        let envelope: AlertsEnvelope = self
            .client
            .send(&RequestDescriptor::get(Service::Data, "/budgets/alerts/"))
            .await?;
        Ok(envelope.alerts)
    }

    /// Analytics over the last `months` months (at least one)
    pub async fn analytics(&self, months: u32) -> ClientResult<Analytics> {
        if months == 0 {
            return Err(ClientError::Validation(
                "analytics period must cover at least one month".to_string(),
            ));
        }

        let request = RequestDescriptor::get(Service::Data, "/transactions/analytics/")
            .query("months", months);
        self.client.send(&request).await
    }

    pub async fn categories(&self, kind: Option<CategoryType>) -> ClientResult<Vec<Category>> {
        let request = RequestDescriptor::get(Service::Data, "/categories/")
            .query_opt("type", kind.map(|k| k.as_str()));
        self.list(&request).await
    }

    pub async fn accounts(&self) -> ClientResult<Vec<Account>> {
        self.list(&RequestDescriptor::get(Service::Data, "/accounts/"))
            .await
    }

    pub async fn assets(&self) -> ClientResult<Vec<Asset>> {
        self.list(&RequestDescriptor::get(Service::Data, "/assets/"))
            .await
    }

    pub async fn portfolio_summary(&self) -> ClientResult<PortfolioSummary> {
        self.client
            .send(&RequestDescriptor::get(Service::Data, "/assets/portfolio_summary/"))
            .await
    }

    /// Unauthenticated liveness probe
    pub async fn health(&self) -> ClientResult<serde_json::Value> {
        self.client
            .send(&RequestDescriptor::get(Service::Root, "/health/").public())
            .await
    }

    async fn list<T: serde::de::DeserializeOwned>(
        &self,
        request: &RequestDescriptor,
    ) -> ClientResult<Vec<T>> {
        let response: ListResponse<T> = self.client.send(request).await?;
        Ok(response.into_vec())
    }
}

/// Money fields arrive as JSON numbers or as decimal strings
pub(crate) fn flexible_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
