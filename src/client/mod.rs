//! HTTP Client Core
//!
//! Wraps every outbound request to the FinTrack services.
//!
//! ## Behavior
//!
//! - Authenticated requests carry `Authorization: Bearer <access>` read from
//!   the session store at send time.
//! - A `401` on the first attempt triggers one refresh (shared with any other
//!   request that hit `401` at the same moment) and one resend with the new
//!   access token.
//! - A `401` on the resend is returned as [`ClientError::Unauthorized`]; no
//!   second refresh happens for the same request.
//! - A failed refresh clears the session and emits a single
//!   [`SessionEvent::Expired`].
//! - Every other failure is returned unchanged, without retry.

mod error;
mod request;

pub use error::{ClientError, ClientResult, ErrorKind};
pub use request::{RequestDescriptor, Service};

use crate::config::ApiConfig;
use crate::session::{SessionStore, TokenPair};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use uuid::Uuid;

/// Number of resends allowed after a refresh
const MAX_AUTH_RETRIES: u8 = 1;

/// Capacity of the session event channel
const EVENT_CAPACITY: usize = 16;

/// Session lifecycle notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn,
    /// Tokens were rotated after a 401
    Refreshed,
    /// Refresh failed and the session was cleared; return to login
    Expired,
    LoggedOut,
}

/// Body of `POST /jwt/refresh/`
#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

/// Servers without rotation answer with only a new access token
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

/// Authenticated HTTP client shared by the auth flow and the query layer
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
    session: Arc<dyn SessionStore>,
    /// Held while a refresh is in flight so concurrent 401s share one refresh
    refresh_gate: Mutex<()>,
    /// Bumped each time a failed refresh expires the session
    expiry_epoch: AtomicU64,
    events: broadcast::Sender<SessionEvent>,
}

impl ApiClient {
    /// Create a client for the given services and session store
    pub fn new(config: ApiConfig, session: Arc<dyn SessionStore>) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("fintrack/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            http,
            config,
            session,
            refresh_gate: Mutex::new(()),
            expiry_epoch: AtomicU64::new(0),
            events,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    /// Receive session lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Send a request and decode its JSON response
    pub async fn send<T: DeserializeOwned>(&self, request: &RequestDescriptor) -> ClientResult<T> {
        let response = self.dispatch(request).await?;
        Self::decode(response).await
    }

    /// Mint a new token pair from the stored refresh token.
    ///
    /// Fails with [`ClientError::NoRefreshToken`] without contacting the server
    /// when no refresh token is stored. On success both tokens are written to
    /// the session; on failure the session is left untouched.
    pub async fn refresh(&self) -> ClientResult<TokenPair> {
        let current = self
            .session
            .read_tokens()?
            .ok_or(ClientError::NoRefreshToken)?;

        let request = RequestDescriptor::post(Service::Auth, "/jwt/refresh/")
            .json(&RefreshRequest {
                refresh: &current.refresh,
            })?
            .public();

        // Straight to the wire: the refresh call never re-enters the retry path
        let response = self.transmit(&request, None, 0).await?;
        let response: RefreshResponse = Self::decode(Self::ensure_success(response).await?).await?;
        let tokens = TokenPair {
            access: response.access,
            refresh: response.refresh.unwrap_or(current.refresh),
        };

        self.session.save_tokens(&tokens)?;
        tracing::info!("Access token refreshed");
        Ok(tokens)
    }

    /// Send with bearer injection and the bounded refresh-and-retry cycle
    async fn dispatch(&self, request: &RequestDescriptor) -> ClientResult<Response> {
        let epoch = self.expiry_epoch.load(Ordering::Acquire);
        let mut bearer = if request.is_authenticated() {
            self.session.read_tokens()?.map(|t| t.access)
        } else {
            None
        };
        let mut retries: u8 = 0;

        loop {
            let response = self.transmit(request, bearer.as_deref(), retries).await?;

            if response.status() != StatusCode::UNAUTHORIZED || !request.is_authenticated() {
                return Self::ensure_success(response).await;
            }

            if retries >= MAX_AUTH_RETRIES {
                tracing::warn!(path = request.path(), "Request rejected after token refresh");
                return Err(ClientError::Unauthorized);
            }

            retries += 1;
            let fresh = self.recover(bearer.as_deref(), epoch).await?;
            bearer = Some(fresh.access);
        }
    }

    /// Obtain usable tokens after a 401 sent with `stale` as bearer.
    ///
    /// Only one caller refreshes at a time. A caller that finds the tokens
    /// already rotated reuses them; one that finds the session already cleared
    /// fails without emitting another `Expired` event. `epoch` is the expiry
    /// epoch observed when the request was sent; `Expired` is only emitted by
    /// the first failure after it.
    async fn recover(&self, stale: Option<&str>, epoch: u64) -> ClientResult<TokenPair> {
        let _gate = self.refresh_gate.lock().await;

        match (self.session.read_tokens()?, stale) {
            (Some(current), _) if Some(current.access.as_str()) != stale => {
                tracing::debug!("Reusing tokens refreshed by a concurrent request");
                return Ok(current);
            }
            (None, Some(_)) => {
                tracing::debug!("Session cleared while waiting for refresh");
                return Err(ClientError::SessionExpired);
            }
            _ => {}
        }

        match self.refresh().await {
            Ok(tokens) => {
                self.emit(SessionEvent::Refreshed);
                Ok(tokens)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed, clearing session");
                self.session.clear()?;
                let first = self
                    .expiry_epoch
                    .compare_exchange(epoch, epoch + 1, Ordering::AcqRel, Ordering::Acquire)
                    .is_ok();
                if first {
                    self.emit(SessionEvent::Expired);
                }
                Err(ClientError::SessionExpired)
            }
        }
    }

    /// One HTTP exchange, no retry logic
    async fn transmit(
        &self,
        request: &RequestDescriptor,
        bearer: Option<&str>,
        retry: u8,
    ) -> ClientResult<Response> {
        let request_id = Uuid::new_v4().to_string();
        let url = self.url_for(request);

        let mut builder = self
            .http
            .request(request.method().clone(), &url)
            .header("X-Request-Id", request_id.as_str());

        if !request.query_pairs().is_empty() {
            builder = builder.query(request.query_pairs());
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }

        tracing::debug!(
            request_id = %request_id,
            method = %request.method(),
            url = %url,
            retry,
            "Sending request"
        );

        let response = builder.send().await.map_err(ClientError::from_transport)?;

        tracing::debug!(
            request_id = %request_id,
            status = response.status().as_u16(),
            "Received response"
        );

        Ok(response)
    }

    fn url_for(&self, request: &RequestDescriptor) -> String {
        let base = match request.service() {
            Service::Auth => self.config.auth_url.trim_end_matches('/'),
            Service::Data => self.config.base_url.trim_end_matches('/'),
            Service::Root => {
                let base = self.config.base_url.trim_end_matches('/');
                base.strip_suffix("/api").unwrap_or(base)
            }
        };
        format!("{}{}", base, request.path())
    }

    /// Checks HTTP response status; returns the response on success or an error with details
    async fn ensure_success(response: Response) -> ClientResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        Err(ClientError::Api {
            status,
            message: error_message(&text),
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let bytes = response.bytes().await.map_err(ClientError::from_transport)?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

/// Pull a human-readable message out of an error body.
///
/// Understands `{"detail": ...}`, `{"error": ...}` and `{"message": ...}`,
/// otherwise returns the (trimmed) raw body.
fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "error", "message"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                return msg.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no details".to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}
