//! Auth Flow
//!
//! Login, logout and session bootstrap on top of [`ApiClient`]. Views read
//! the authenticated user through these accessors rather than touching the
//! session store directly.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::client::{ApiClient, ClientError, ClientResult, RequestDescriptor, SessionEvent, Service};
use crate::session::{ProfileUpdate, TokenPair, User};

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Response of `GET /profile/statistics/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStatistics {
    pub user_info: MembershipStats,
    pub accounts: AccountStats,
    pub assets: AssetStats,
    pub transactions: TransactionStats,
    pub activity: ActivityStats,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MembershipStats {
    pub member_since: String,
    pub member_since_days: u32,
    pub is_premium: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountStats {
    pub total_accounts: u32,
    pub total_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetStats {
    pub total_assets: u32,
    pub total_value: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionStats {
    pub total_transactions: u64,
    pub this_month_transactions: u64,
    pub first_transaction_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityStats {
    pub avg_transactions_per_month: f64,
    pub wealth_total: f64,
}

/// A session restored from the store at startup
#[derive(Debug)]
pub struct Restored {
    /// Cached user, available immediately
    pub user: User,
    /// Background `GET /profile/`; the session is cleared if it fails
    pub revalidation: JoinHandle<ClientResult<User>>,
}

/// Authentication operations shared by every view
#[derive(Clone)]
pub struct AuthFlow {
    client: Arc<ApiClient>,
}

impl AuthFlow {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// Log in and cache the profile. Returns `false` on any failure, leaving
    /// the session unauthenticated.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        match self.try_login(email, password).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Login failed");
                false
            }
        }
    }

    /// Same as [`login`](Self::login) but reports why it failed.
    ///
    /// Any previous session is dropped first, so a failed attempt leaves the
    /// store unauthenticated.
    pub async fn try_login(&self, email: &str, password: &str) -> ClientResult<User> {
        let session = self.client.session();
        session.clear()?;

        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ClientError::Validation(
                "email and password are required".to_string(),
            ));
        }

        let request = RequestDescriptor::post(Service::Auth, "/jwt/create/")
            .json(&Credentials { email, password })?
            .public();

        let tokens: TokenPair = match self.client.send(&request).await {
            Err(ClientError::Api { status: 400 | 401, .. }) => {
                return Err(ClientError::InvalidCredentials)
            }
            other => other?,
        };

        session.save_tokens(&tokens)?;

        match self.fetch_profile().await {
            Ok(user) => {
                session.save_user(&user)?;
                self.client.emit(SessionEvent::LoggedIn);
                tracing::info!(user_id = user.id, "Logged in");
                Ok(user)
            }
            Err(e) => {
                session.clear()?;
                Err(e)
            }
        }
    }

    /// Forget the session locally. The server is not contacted.
    pub fn logout(&self) -> ClientResult<()> {
        self.client.session().clear()?;
        self.client.emit(SessionEvent::LoggedOut);
        tracing::info!("Logged out");
        Ok(())
    }

    /// Restore a persisted session.
    ///
    /// Returns `None` unless both a cached user and tokens are stored.
    /// Must be called from within a tokio runtime.
    pub fn bootstrap(&self) -> ClientResult<Option<Restored>> {
        let session = self.client.session();
        let user = match (session.read_user()?, session.read_tokens()?) {
            (Some(user), Some(_)) => user,
            _ => return Ok(None),
        };

        tracing::debug!(user_id = user.id, "Restored cached session");

        let client = Arc::clone(&self.client);
        let revalidation = tokio::spawn(async move { revalidate(client).await });

        Ok(Some(Restored { user, revalidation }))
    }

    pub fn current_user(&self) -> ClientResult<Option<User>> {
        Ok(self.client.session().read_user()?)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.client.session().read_tokens(), Ok(Some(_)))
    }

    /// Re-fetch the profile; a failure keeps the current session
    pub async fn refresh_user(&self) -> ClientResult<User> {
        let user = self.fetch_profile().await?;
        self.client.session().save_user(&user)?;
        Ok(user)
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<User> {
        if update.is_empty() {
            return Err(ClientError::Validation("nothing to update".to_string()));
        }

        let request = RequestDescriptor::patch(Service::Auth, "/profile/").json(update)?;
        let user: User = self.client.send(&request).await?;
        self.client.session().save_user(&user)?;
        tracing::info!(user_id = user.id, "Profile updated");
        Ok(user)
    }

    pub async fn statistics(&self) -> ClientResult<UserStatistics> {
        self.client
            .send(&RequestDescriptor::get(Service::Auth, "/profile/statistics/"))
            .await
    }

    async fn fetch_profile(&self) -> ClientResult<User> {
        fetch_profile(&self.client).await
    }
}

async fn fetch_profile(client: &ApiClient) -> ClientResult<User> {
    client
        .send(&RequestDescriptor::get(Service::Auth, "/profile/"))
        .await
}

async fn revalidate(client: Arc<ApiClient>) -> ClientResult<User> {
    match fetch_profile(&client).await {
        Ok(user) => {
            client.session().save_user(&user)?;
            Ok(user)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Stored session failed re-validation, clearing");
            client.session().clear()?;
            // A failed refresh already announced the expiry
            if !matches!(e, ClientError::SessionExpired) {
                client.emit(SessionEvent::Expired);
            }
            Err(e)
        }
    }
}
