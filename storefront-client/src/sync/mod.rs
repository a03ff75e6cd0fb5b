//! Cached reads and invalidating writes, one handle per resource
//!
//! Reads go through the [`QueryCache`] under the keys in [`keys`]. Writes
//! are sent once, never retried, and on success invalidate or remove the
//! keys they affect.

mod brand;
mod category;
mod review;
mod user;
mod wishlist;

pub mod keys;

pub use brand::Brands;
pub use category::Categories;
pub use review::Reviews;
pub use user::Users;
pub use wishlist::Wishlists;

use std::future::Future;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::cache::{QueryCache, QueryKey};
use crate::error::{ClientError, ClientResult};
use crate::http::HttpClient;

/// What every resource handle holds
#[derive(Debug, Clone)]
pub(crate) struct SyncContext {
    pub(crate) http: HttpClient,
    pub(crate) cache: QueryCache,
    /// Token the session-scoped keys were cached under
    cached_for: Arc<Mutex<Option<String>>>,
}

impl SyncContext {
    pub(crate) fn new(http: HttpClient, cache: QueryCache) -> Self {
        let cached_for = Arc::new(Mutex::new(http.session().token()));
        Self {
            http,
            cache,
            cached_for,
        }
    }

    /// Cached read of data that belongs to the signed-in session
    ///
    /// Fails with [`ClientError::AuthenticationRequired`] without touching
    /// the cache when the session holds no token.
    pub(crate) async fn read_protected<T, F, Fut>(&self, key: QueryKey, read: F) -> ClientResult<T>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(HttpClient) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ClientResult<T>> + Send + 'static,
    {
        let Some(token) = self.http.session().token() else {
            debug!(query = %key, "protected read refused without a session token");
            return Err(ClientError::AuthenticationRequired);
        };
        self.scope_to(Some(token));
        self.read(key, read).await
    }

    /// Drop session-scoped entries cached under a different token
    pub(crate) fn scope_to(&self, token: Option<String>) {
        // Only ever assigned whole, so a poisoned value is still consistent
        let mut cached_for = self.cached_for.lock().unwrap_or_else(|e| e.into_inner());
        if *cached_for == token {
            return;
        }
        debug!(signed_in = token.is_some(), "session changed, dropping session data");
        self.remove(&keys::session_scoped());
        *cached_for = token;
    }

    /// Cached read of `key`, fetched with `read(http)` on a miss
    pub(crate) async fn read<T, F, Fut>(&self, key: QueryKey, read: F) -> ClientResult<T>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(HttpClient) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ClientResult<T>> + Send + 'static,
    {
        let http = self.http.clone();
        self.cache.fetch(key, move || read(http.clone())).await
    }

    pub(crate) fn invalidate(&self, keys: &[QueryKey]) {
        for key in keys {
            self.cache.invalidate(key);
        }
    }

    pub(crate) fn remove(&self, keys: &[QueryKey]) {
        for key in keys {
            self.cache.remove(key);
        }
    }
}
