//! In-process FinTrack backend for tests
//!
//! Serves the auth and data endpoints on `127.0.0.1:0` with a handful of
//! switches for expiring tokens, failing refreshes and injecting errors.

use axum::{
    extract::{MatchedPath, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::config::ApiConfig;
use crate::session::{TokenPair, User};

pub const DEMO_EMAIL: &str = "demo@fintrack.com";
pub const DEMO_PASSWORD: &str = "demo123";

type Failure = (StatusCode, Json<Value>);
type Reply = Result<Json<Value>, Failure>;
type Shared = Arc<Mutex<MockState>>;

struct MockState {
    issued: u64,
    valid_access: HashSet<String>,
    valid_refresh: HashSet<String>,
    reject_all: bool,
    rotate_refresh: bool,
    refresh_delay: Duration,
    data_failure: Option<u16>,
    profile_failure: bool,
    refresh_calls: usize,
    login_calls: usize,
    profile_calls: usize,
    bearers: Vec<Option<String>>,
    queries: HashMap<String, HashMap<String, String>>,
    user: User,
}

impl MockState {
    fn new() -> Self {
        Self {
            issued: 0,
            valid_access: HashSet::new(),
            valid_refresh: HashSet::new(),
            reject_all: false,
            rotate_refresh: true,
            refresh_delay: Duration::ZERO,
            data_failure: None,
            profile_failure: false,
            refresh_calls: 0,
            login_calls: 0,
            profile_calls: 0,
            bearers: Vec::new(),
            queries: HashMap::new(),
            user: demo_user(),
        }
    }

    fn issue_access(&mut self) -> String {
        self.issued += 1;
        let access = format!("access-{}", self.issued);
        self.valid_access.insert(access.clone());
        access
    }

    fn issue(&mut self) -> TokenPair {
        let access = self.issue_access();
        let refresh = format!("refresh-{}", self.issued);
        self.valid_refresh.insert(refresh.clone());
        TokenPair::new(access, refresh)
    }

    fn authorize(&self, bearer: Option<&str>) -> Result<(), Failure> {
        match bearer {
            Some(token) if !self.reject_all && self.valid_access.contains(token) => Ok(()),
            _ => Err(reject(
                StatusCode::UNAUTHORIZED,
                "Given token not valid for any token type",
            )),
        }
    }
}

fn demo_user() -> User {
    User {
        id: 1,
        email: DEMO_EMAIL.to_string(),
        username: "demo".to_string(),
        first_name: "Demo".to_string(),
        last_name: "User".to_string(),
        full_name: "Demo User".to_string(),
        avatar: None,
        is_premium: true,
        date_joined: "2024-01-01T09:00:00Z".to_string(),
    }
}

fn reject(status: StatusCode, detail: &str) -> Failure {
    (status, Json(json!({ "detail": detail })))
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Running mock server, shut down on drop
pub struct MockBackend {
    addr: SocketAddr,
    state: Shared,
    server: JoinHandle<()>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState::new()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(Arc::clone(&state));

        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            server,
        }
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::for_host(&format!("http://{}", self.addr))
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    /// Mint a valid pair as a login would
    pub fn issue_tokens(&self) -> TokenPair {
        self.with_state(MockState::issue)
    }

    /// Invalidate every access token issued so far
    pub fn expire_access(&self) {
        self.with_state(|s| s.valid_access.clear());
    }

    /// Invalidate every refresh token issued so far
    pub fn revoke_refresh(&self) {
        self.with_state(|s| s.valid_refresh.clear());
    }

    /// Answer 401 to every authenticated request regardless of its token
    pub fn reject_all_bearers(&self, reject: bool) {
        self.with_state(|s| s.reject_all = reject);
    }

    /// When off, refresh responses carry only a new access token
    pub fn set_rotate_refresh(&self, rotate: bool) {
        self.with_state(|s| s.rotate_refresh = rotate);
    }

    pub fn set_refresh_delay_ms(&self, ms: u64) {
        self.with_state(|s| s.refresh_delay = Duration::from_millis(ms));
    }

    /// Make data endpoints fail with the given status after authorization
    pub fn fail_data_with(&self, status: Option<u16>) {
        self.with_state(|s| s.data_failure = status);
    }

    pub fn fail_profile(&self, fail: bool) {
        self.with_state(|s| s.profile_failure = fail);
    }

    pub fn refresh_calls(&self) -> usize {
        self.with_state(|s| s.refresh_calls)
    }

    pub fn login_calls(&self) -> usize {
        self.with_state(|s| s.login_calls)
    }

    pub fn profile_calls(&self) -> usize {
        self.with_state(|s| s.profile_calls)
    }

    /// Bearer tokens seen by data endpoints, in arrival order
    pub fn bearers(&self) -> Vec<Option<String>> {
        self.with_state(|s| s.bearers.clone())
    }

    /// Query parameters of the latest call to a route (e.g. `/api/accounts/`)
    pub fn last_query(&self, route: &str) -> HashMap<String, String> {
        self.with_state(|s| s.queries.get(route).cloned().unwrap_or_default())
    }

    pub fn demo_user(&self) -> User {
        self.with_state(|s| s.user.clone())
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/auth/jwt/create/", post(login))
        .route("/api/auth/jwt/refresh/", post(refresh))
        .route("/api/auth/profile/", get(profile).patch(update_profile))
        .route("/api/auth/profile/statistics/", get(statistics))
        .route("/api/transactions/", get(data_route))
        .route("/api/transactions/dashboard_stats/", get(data_route))
        .route("/api/transactions/analytics/", get(data_route))
        .route("/api/budgets/overview/", get(data_route))
        .route("/api/budgets/alerts/", get(data_route))
        .route("/api/categories/", get(data_route))
        .route("/api/accounts/", get(data_route))
        .route("/api/assets/", get(data_route))
        .route("/api/assets/portfolio_summary/", get(data_route))
        .route("/health/", get(|| async { Json(json!({ "status": "ok" })) }))
        .with_state(state)
}

// ============================================
// Auth routes
// ============================================

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Reply {
    let mut state = state.lock().unwrap();
    state.login_calls += 1;

    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    if email != DEMO_EMAIL || password != DEMO_PASSWORD {
        return Err(reject(
            StatusCode::UNAUTHORIZED,
            "No active account found with the given credentials",
        ));
    }

    let pair = state.issue();
    Ok(Json(json!({ "access": pair.access, "refresh": pair.refresh })))
}

async fn refresh(State(state): State<Shared>, Json(body): Json<Value>) -> Reply {
    let delay = {
        let mut state = state.lock().unwrap();
        state.refresh_calls += 1;
        state.refresh_delay
    };
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    rotate(&mut state.lock().unwrap(), body["refresh"].as_str())
}

fn rotate(state: &mut MockState, refresh: Option<&str>) -> Reply {
    let refresh = match refresh {
        Some(token) if state.valid_refresh.contains(token) => token.to_string(),
        _ => {
            return Err(reject(
                StatusCode::UNAUTHORIZED,
                "Token is invalid or expired",
            ))
        }
    };

    if state.rotate_refresh {
        state.valid_refresh.remove(&refresh);
        let pair = state.issue();
        Ok(Json(json!({ "access": pair.access, "refresh": pair.refresh })))
    } else {
        let access = state.issue_access();
        Ok(Json(json!({ "access": access })))
    }
}

fn profile_guard(state: &mut MockState, headers: &HeaderMap) -> Result<(), Failure> {
    state.authorize(bearer(headers).as_deref())?;
    state.profile_calls += 1;
    if state.profile_failure {
        return Err(reject(StatusCode::INTERNAL_SERVER_ERROR, "profile unavailable"));
    }
    Ok(())
}

async fn profile(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let mut state = state.lock().unwrap();
    profile_guard(&mut state, &headers)?;
    Ok(Json(json!(state.user)))
}

async fn update_profile(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut state = state.lock().unwrap();
    profile_guard(&mut state, &headers)?;

    let user = &mut state.user;
    if let Some(v) = body["first_name"].as_str() {
        user.first_name = v.to_string();
    }
    if let Some(v) = body["last_name"].as_str() {
        user.last_name = v.to_string();
    }
    if let Some(v) = body["username"].as_str() {
        user.username = v.to_string();
    }
    if let Some(v) = body["avatar"].as_str() {
        user.avatar = Some(v.to_string());
    }
    user.full_name = format!("{} {}", user.first_name, user.last_name);

    Ok(Json(json!(state.user)))
}

async fn statistics(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let state = state.lock().unwrap();
    state.authorize(bearer(&headers).as_deref())?;

    Ok(Json(json!({
        "user_info": {"member_since": "2024-01-01", "member_since_days": 400, "is_premium": true},
        "accounts": {"total_accounts": 2, "total_balance": 14950.3},
        "assets": {"total_assets": 2, "total_value": 37000.0},
        "transactions": {
            "total_transactions": 3,
            "this_month_transactions": 3,
            "first_transaction_date": "2024-01-10"
        },
        "activity": {"avg_transactions_per_month": 3.0, "wealth_total": 51950.3}
    })))
}

// ============================================
// Data routes
// ============================================

async fn data_route(
    State(state): State<Shared>,
    route: MatchedPath,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let bearer = bearer(&headers);
    {
        let mut state = state.lock().unwrap();
        state.bearers.push(bearer.clone());
        state
            .queries
            .insert(route.as_str().to_string(), params.clone());
        state.authorize(bearer.as_deref())?;
        if let Some(code) = state.data_failure {
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return Err(reject(status, "mock failure"));
        }
    }

    let body = match route.as_str() {
        "/api/transactions/" => transactions(&params),
        "/api/transactions/dashboard_stats/" => dashboard_stats(&params),
        "/api/transactions/analytics/" => analytics(&params),
        "/api/budgets/overview/" => budget_overview(),
        "/api/budgets/alerts/" => json!({
            "alerts": [{"message": "Loisirs over budget", "category": "Loisirs", "percentage": 120.0}]
        }),
        "/api/categories/" => categories(&params),
        "/api/accounts/" => json!([
            {"id": 1, "name": "Compte courant", "type": "CHECKING", "balance": "2450.30", "currency": "EUR"},
            {"id": 2, "name": "Livret A", "type": "SAVINGS", "balance": 12500.0, "currency": "EUR"}
        ]),
        "/api/assets/" => json!([
            {"id": 1, "name": "ETF World", "type": "STOCK", "value": 22000.0},
            {"id": 2, "name": "Bitcoin", "asset_type": "CRYPTO", "current_value": "15000.00"}
        ]),
        "/api/assets/portfolio_summary/" => json!({
            "total_value": 37000.0,
            "asset_count": 2,
            "composition": [
                {"name": "STOCK", "value": 22000.0, "count": 1, "percentage": 59.46},
                {"name": "CRYPTO", "value": 15000.0, "count": 1, "percentage": 40.54}
            ]
        }),
        _ => return Err(reject(StatusCode::NOT_FOUND, "Not found.")),
    };

    Ok(Json(body))
}

fn transaction_fixtures() -> Vec<Value> {
    let checking = json!({"id": 1, "name": "Compte courant", "type": "CHECKING"});
    vec![
        json!({
            "id": 1, "amount": 4200.0, "date": "2024-01-10", "description": "Salaire janvier",
            "category": {"id": 1, "name": "Salaire", "color": "#10b981", "icon": "briefcase", "type": "INCOME"},
            "account": checking, "is_recurring": true, "metadata": {}
        }),
        json!({
            "id": 2, "amount": "85.50", "date": "2024-01-14", "description": "Courses Carrefour",
            "category": {"id": 3, "name": "Alimentation", "color": "#f59e0b", "icon": "cart", "type": "EXPENSE"},
            "account": checking, "is_recurring": false, "metadata": {}
        }),
        json!({
            "id": 3, "amount": -1200.0, "date": "2024-01-05", "description": "Loyer",
            "category": {"id": 4, "name": "Logement", "color": "#ef4444", "icon": "home", "type": "EXPENSE"},
            "account": checking, "is_recurring": true, "metadata": {}
        }),
    ]
}

fn transactions(params: &HashMap<String, String>) -> Value {
    let search = params.get("search").map(|s| s.to_lowercase());
    let within = |tx: &Value| {
        let date = tx["date"].as_str().unwrap_or_default();
        params.get("date_gte").map_or(true, |gte| date >= gte.as_str())
            && params.get("date_lte").map_or(true, |lte| date <= lte.as_str())
    };
    let matches = |tx: &Value| match &search {
        Some(term) => {
            let description = tx["description"].as_str().unwrap_or_default().to_lowercase();
            let category = tx["category"]["name"].as_str().unwrap_or_default().to_lowercase();
            description.contains(term) || category.contains(term)
        }
        None => true,
    };

    let filtered: Vec<Value> = transaction_fixtures()
        .into_iter()
        .filter(|tx| within(tx) && matches(tx))
        .collect();

    let page: usize = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1).max(1);
    let limit: usize = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(10).max(1);
    let start = (page - 1) * limit;
    let results: Vec<Value> = filtered.iter().skip(start).take(limit).cloned().collect();

    let next = (start + limit < filtered.len()).then(|| format!("/api/transactions/?page={}", page + 1));
    let previous = (page > 1).then(|| format!("/api/transactions/?page={}", page - 1));

    json!({
        "count": filtered.len(),
        "next": next,
        "previous": previous,
        "results": results
    })
}

fn dashboard_stats(params: &HashMap<String, String>) -> Value {
    let months = match params.get("period").map(String::as_str) {
        Some("1M") => 1,
        Some("1Y") => 12,
        Some("YTD") => 10,
        Some("MAX") => 24,
        _ => 6,
    };
    let evolution: Vec<Value> = (0..months)
        .map(|i| json!({"month": format!("M{}", i + 1), "wealth": 50000.0 + 500.0 * i as f64}))
        .collect();

    json!({
        "current_month": {
            "total_wealth": 51950.3,
            "wealth_change": 4.8,
            "income": 4200.0,
            "income_change": 0.0,
            "expenses": 1285.5,
            "expenses_change": -1.2,
            "savings": 2914.5,
            "savings_change": 3.1,
            "transactions_count": 3
        },
        "wealth_evolution": evolution,
        "wealth_composition": [
            {"name": "Liquidités", "size": 14950.3, "index": 0},
            {"name": "Investissements", "size": 37000.0, "index": 1}
        ]
    })
}

fn analytics(params: &HashMap<String, String>) -> Value {
    let months: u32 = params.get("months").and_then(|m| m.parse().ok()).unwrap_or(6);
    let monthly: Vec<Value> = (0..months)
        .map(|i| json!({"month": format!("M{}", i + 1), "income": 4200.0, "expenses": 1285.5}))
        .collect();

    json!({
        "monthly_data": monthly,
        "category_trends": [
            {"category": "Alimentation", "data": [{"month": "M1", "amount": 85.5}]}
        ],
        "insights": {
            "avg_monthly_savings": 2914.5,
            "savings_rate": 69.4,
            "biggest_expense": {
                "amount": 1200.0,
                "description": "Loyer",
                "category": "Logement",
                "date": "2024-01-05"
            },
            "total_income": 4200.0 * months as f64,
            "total_expenses": 1285.5 * months as f64,
            "period_months": months
        }
    })
}

fn budget_overview() -> Value {
    json!({
        "summary": {
            "total_allocated": 750.0,
            "total_spent": 650.0,
            "total_remaining": 100.0,
            "overall_percentage": 86.7,
            "over_budget_count": 1,
            "budget_count": 3
        },
        "budgets": [
            {"id": 1, "category": {"id": 3, "name": "Alimentation", "color": "#f59e0b", "icon": "cart"},
             "allocated": 400.0, "spent": 300.0, "remaining": 100.0, "percentage": 75.0, "status": "good", "days_left": 12},
            {"id": 2, "category": {"id": 5, "name": "Transport", "color": "#3b82f6", "icon": "car"},
             "allocated": "200.00", "spent": "170.00", "remaining": "30.00", "percentage": 85.0, "status": "warning", "days_left": 12},
            {"id": 3, "category": {"id": 6, "name": "Loisirs", "color": "#8b5cf6", "icon": "music"},
             "allocated": 150.0, "spent": 180.0, "remaining": -30.0, "percentage": 120.0, "status": "exceeded", "days_left": 12}
        ],
        "expense_chart_data": [
            {"name": "Alimentation", "value": 300.0, "color": "#f59e0b"},
            {"name": "Transport", "value": 170.0, "color": "#3b82f6"},
            {"name": "Loisirs", "value": 180.0, "color": "#8b5cf6"}
        ]
    })
}

fn categories(params: &HashMap<String, String>) -> Value {
    let all = [
        json!({"id": 1, "name": "Salaire", "type": "INCOME", "color": "#10b981", "icon": "briefcase"}),
        json!({"id": 3, "name": "Alimentation", "type": "EXPENSE", "color": "#f59e0b", "icon": "cart"}),
        json!({"id": 4, "name": "Logement", "type": "EXPENSE", "color": "#ef4444", "icon": "home"}),
    ];
    let results: Vec<Value> = all
        .into_iter()
        .filter(|c| params.get("type").map_or(true, |t| c["type"] == t.as_str()))
        .collect();

    json!({
        "count": results.len(),
        "next": null,
        "previous": null,
        "results": results
    })
}
