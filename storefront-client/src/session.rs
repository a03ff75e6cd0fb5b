//! Session store
//!
//! Holds the bearer token and user record handed over by the identity
//! collaborator. The transport layer only reads it; `set` and `clear` are
//! for whoever performs login and logout.

use std::sync::{Arc, RwLock};

use shared::models::{Role, User};

/// Session data stored in memory during the client's lifecycle.
#[derive(Debug, Clone, Default)]
pub struct SessionData {
    /// Bearer token for protected API calls.
    pub token: Option<String>,
    /// Current user information after login.
    pub user: Option<User>,
}

impl SessionData {
    /// Creates a new empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session from a login result.
    pub fn authenticated(token: impl Into<String>, user: User) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(user),
        }
    }

    /// Returns the token if available.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns the current user info if available.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn role(&self) -> Option<&Role> {
        self.user.as_ref().map(|u| &u.role)
    }
}

/// Shared handle to the current session
///
/// Cloning shares the same underlying session.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<SessionData>>,
}

impl SessionStore {
    /// An empty (anonymous) session
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: SessionData) -> Self {
        Self {
            inner: Arc::new(RwLock::new(session)),
        }
    }

    /// Replace the current session
    pub fn set(&self, session: SessionData) {
        *self.write() = session;
    }

    /// Drop token and user
    pub fn clear(&self) {
        *self.write() = SessionData::default();
    }

    /// Current bearer token
    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    /// Current user
    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().token.is_some()
    }

    /// Snapshot of the whole session
    pub fn snapshot(&self) -> SessionData {
        self.read().clone()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionData> {
        // A poisoned lock still holds a consistent value: writers only assign.
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SessionData> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}
