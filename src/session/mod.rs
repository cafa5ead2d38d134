//! Session Store
//!
//! Durable holder of the current token pair and the cached user profile.
//!
//! ## Invariants
//!
//! - Access and refresh tokens are always written and cleared together;
//!   a reader never observes one without the other.
//! - `clear()` removes the tokens and the cached user in one step.
//!
//! Stores are injected (`Arc<dyn SessionStore>`) into the HTTP client rather
//! than looked up globally, so tests can run many isolated sessions.

mod error;
mod store;
mod types;

pub use error::{SessionError, SessionResult};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, SESSION_FILE};
pub use types::{ProfileUpdate, TokenPair, User};

/// Storage key for the access token
pub const ACCESS_TOKEN_KEY: &str = "fintrack_access_token";
/// Storage key for the refresh token
pub const REFRESH_TOKEN_KEY: &str = "fintrack_refresh_token";
/// Storage key for the cached user record
pub const USER_KEY: &str = "fintrack_user";
