//! Durable token storage.
//!
//! The client-side equivalent of the browser's local storage slot for the
//! bearer token. Reducers never touch storage directly; persistence runs
//! as an effect.

use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Where the bearer token survives between sessions.
pub trait TokenCache: Send + Sync {
    /// Read the stored token, if any.
    fn load(&self) -> impl Future<Output = Option<String>> + Send;

    /// Persist the token, replacing any previous value.
    fn save(&self, token: String) -> impl Future<Output = ()> + Send;

    /// Drop the stored token.
    fn clear(&self) -> impl Future<Output = ()> + Send;
}

/// In-memory cache: survives for the process lifetime only. The default
/// for tests and short-lived tools.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenCache {
    token: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache seeded with a token.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(Mutex::new(Some(token.into()))),
        }
    }
}

impl TokenCache for MemoryTokenCache {
    fn load(&self) -> impl Future<Output = Option<String>> + Send {
        let token = Arc::clone(&self.token);
        async move { token.lock().ok().and_then(|guard| guard.clone()) }
    }

    fn save(&self, value: String) -> impl Future<Output = ()> + Send {
        let token = Arc::clone(&self.token);
        async move {
            if let Ok(mut guard) = token.lock() {
                *guard = Some(value);
            }
        }
    }

    fn clear(&self) -> impl Future<Output = ()> + Send {
        let token = Arc::clone(&self.token);
        async move {
            if let Ok(mut guard) = token.lock() {
                *guard = None;
            }
        }
    }
}

/// File-backed cache for real client processes.
///
/// Storage failures are logged and swallowed: losing the token costs a
/// re-login, never a crash.
#[derive(Debug, Clone)]
pub struct FileTokenCache {
    path: PathBuf,
}

impl FileTokenCache {
    /// Cache backed by the given file path.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TokenCache for FileTokenCache {
    fn load(&self) -> impl Future<Output = Option<String>> + Send {
        let path = self.path.clone();
        async move {
            match tokio::fs::read_to_string(&path).await {
                Ok(token) if !token.trim().is_empty() => Some(token.trim().to_string()),
                _ => None,
            }
        }
    }

    fn save(&self, token: String) -> impl Future<Output = ()> + Send {
        let path = self.path.clone();
        async move {
            if let Err(error) = tokio::fs::write(&path, token).await {
                tracing::warn!(%error, path = %path.display(), "failed to persist token");
            }
        }
    }

    fn clear(&self) -> impl Future<Output = ()> + Send {
        let path = self.path.clone();
        async move {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {}
                Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
                Err(error) => {
                    tracing::warn!(%error, path = %path.display(), "failed to clear token");
                }
            }
        }
    }
}
