//! Session store implementations

use super::error::{SessionError, SessionResult};
use super::types::{TokenPair, User};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

/// File name of the persisted session inside the session directory
pub const SESSION_FILE: &str = "session.json";

/// Holder of the current token pair and cached user.
///
/// Implementations must make `save_tokens` and `clear` atomic with respect to
/// readers: `read_tokens` returns either the old pair, the new pair, or
/// nothing, never a mix.
pub trait SessionStore: Send + Sync {
    /// Overwrite both tokens
    fn save_tokens(&self, tokens: &TokenPair) -> SessionResult<()>;

    /// Current token pair, or `None` if never authenticated or cleared
    fn read_tokens(&self) -> SessionResult<Option<TokenPair>>;

    /// Cache the user profile
    fn save_user(&self, user: &User) -> SessionResult<()>;

    /// Cached user profile
    fn read_user(&self) -> SessionResult<Option<User>>;

    /// Remove both tokens and the cached user
    fn clear(&self) -> SessionResult<()>;
}

/// On-disk and in-memory representation, keyed by the fixed storage names
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(rename = "fintrack_access_token", default, skip_serializing_if = "Option::is_none")]
    access: Option<String>,
    #[serde(rename = "fintrack_refresh_token", default, skip_serializing_if = "Option::is_none")]
    refresh: Option<String>,
    #[serde(rename = "fintrack_user", default, skip_serializing_if = "Option::is_none")]
    user: Option<User>,
}

impl StoredSession {
    fn tokens(&self) -> Option<TokenPair> {
        match (&self.access, &self.refresh) {
            (Some(access), Some(refresh)) => Some(TokenPair::new(access.clone(), refresh.clone())),
            _ => None,
        }
    }

    fn set_tokens(&mut self, tokens: &TokenPair) {
        self.access = Some(tokens.access.clone());
        self.refresh = Some(tokens.refresh.clone());
    }
}

// ============================================
// In-memory store
// ============================================

/// Process-local session, lost on exit
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: RwLock<StoredSession>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start out already holding a token pair
    pub fn with_tokens(tokens: TokenPair) -> Self {
        let mut stored = StoredSession::default();
        stored.set_tokens(&tokens);
        Self {
            inner: RwLock::new(stored),
        }
    }
}

fn poisoned<E>(_: E) -> SessionError {
    SessionError::Lock("session lock poisoned".to_string())
}

impl SessionStore for MemorySessionStore {
    fn save_tokens(&self, tokens: &TokenPair) -> SessionResult<()> {
        self.inner.write().map_err(poisoned)?.set_tokens(tokens);
        Ok(())
    }

    fn read_tokens(&self) -> SessionResult<Option<TokenPair>> {
        Ok(self.inner.read().map_err(poisoned)?.tokens())
    }

    fn save_user(&self, user: &User) -> SessionResult<()> {
        self.inner.write().map_err(poisoned)?.user = Some(user.clone());
        Ok(())
    }

    fn read_user(&self) -> SessionResult<Option<User>> {
        Ok(self.inner.read().map_err(poisoned)?.user.clone())
    }

    fn clear(&self) -> SessionResult<()> {
        *self.inner.write().map_err(poisoned)? = StoredSession::default();
        Ok(())
    }
}

// ============================================
// File store
// ============================================

/// Session persisted as a JSON document that survives restarts.
///
/// Every write replaces the whole document through a temp file + rename.
pub struct FileSessionStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    /// Use `<dir>/session.json`, creating `dir` if needed
    pub fn open(dir: impl AsRef<Path>) -> SessionResult<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(SESSION_FILE),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> SessionResult<StoredSession> {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(stored) => Ok(stored),
                Err(e) => {
                    tracing::warn!(path = ?self.path, error = %e, "Discarding unreadable session file");
                    Ok(StoredSession::default())
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(StoredSession::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn persist(&self, stored: &StoredSession) -> SessionResult<()> {
        let bytes = serde_json::to_vec_pretty(stored)?;
        let tmp = self.path.with_extension("json.tmp");

        {
            let mut file = create_private(&tmp)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }

        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut StoredSession)) -> SessionResult<()> {
        let _guard = self.write_lock.lock().map_err(poisoned)?;
        let mut stored = self.load()?;
        f(&mut stored);
        self.persist(&stored)
    }
}

#[cfg(unix)]
fn create_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn create_private(path: &Path) -> std::io::Result<fs::File> {
    fs::File::create(path)
}

impl SessionStore for FileSessionStore {
    fn save_tokens(&self, tokens: &TokenPair) -> SessionResult<()> {
        self.update(|stored| stored.set_tokens(tokens))
    }

    fn read_tokens(&self) -> SessionResult<Option<TokenPair>> {
        Ok(self.load()?.tokens())
    }

    fn save_user(&self, user: &User) -> SessionResult<()> {
        self.update(|stored| stored.user = Some(user.clone()))
    }

    fn read_user(&self) -> SessionResult<Option<User>> {
        Ok(self.load()?.user)
    }

    fn clear(&self) -> SessionResult<()> {
        let _guard = self.write_lock.lock().map_err(poisoned)?;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
