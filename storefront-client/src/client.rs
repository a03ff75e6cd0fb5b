//! Client facade and its builder

use std::sync::Arc;

#[cfg(feature = "in-process")]
use axum::Router;
use tokio::sync::broadcast;

use crate::cache::{CacheEvent, QueryCache};
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::http::HttpClient;
use crate::session::{SessionData, SessionStore};
use crate::sync::{Brands, Categories, Reviews, SyncContext, Users, Wishlists};
#[cfg(feature = "in-process")]
use crate::transport::OneshotTransport;
use crate::transport::{NetworkTransport, Transport};

/// Storefront API client
///
/// Holds the transport, the session and the query cache. Cloning shares
/// all three.
///
/// # Example
///
/// ```no_run
/// use storefront_client::{ClientConfig, StorefrontClient};
/// use shared::PageRequest;
///
/// # async fn demo() -> storefront_client::ClientResult<()> {
/// let client = StorefrontClient::builder()
///     .config(ClientConfig::new("http://localhost:8080/api"))
///     .build()?;
/// let page = client.brands().list(&PageRequest::default()).await?;
/// println!("{} brands", page.total_elements);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    ctx: SyncContext,
    config: Arc<ClientConfig>,
}

impl StorefrontClient {
    pub fn builder() -> StorefrontClientBuilder {
        StorefrontClientBuilder::new()
    }

    /// Network client with an anonymous session
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        Self::builder().config(config).build()
    }

    pub fn brands(&self) -> Brands {
        Brands::new(self.ctx.clone())
    }

    pub fn categories(&self) -> Categories {
        Categories::new(self.ctx.clone())
    }

    pub fn reviews(&self) -> Reviews {
        Reviews::new(self.ctx.clone())
    }

    pub fn wishlists(&self) -> Wishlists {
        Wishlists::new(self.ctx.clone())
    }

    pub fn users(&self) -> Users {
        Users::new(self.ctx.clone())
    }

    /// Session the identity layer signs in and out of
    pub fn session(&self) -> &SessionStore {
        self.ctx.http.session()
    }

    /// Replace the session; cached data of the previous one is dropped
    pub fn sign_in(&self, session: SessionData) {
        self.session().set(session);
        self.ctx.scope_to(self.session().token());
    }

    /// Clear the session and every cached read that belonged to it
    pub fn sign_out(&self) {
        self.session().clear();
        self.ctx.scope_to(None);
    }

    /// Uncached API calls
    pub fn http(&self) -> &HttpClient {
        &self.ctx.http
    }

    pub fn cache(&self) -> &QueryCache {
        &self.ctx.cache
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Cache change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.ctx.cache.subscribe()
    }
}

/// Builder for [`StorefrontClient`]
///
/// Without an explicit transport the client talks to `config.base_url`
/// over the network.
#[derive(Debug, Default)]
pub struct StorefrontClientBuilder {
    config: Option<ClientConfig>,
    session: Option<SessionStore>,
    transport: Option<Arc<dyn Transport>>,
}

impl StorefrontClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Share an existing session
    pub fn session(mut self, session: SessionStore) -> Self {
        self.session = Some(session);
        self
    }

    /// Use a custom transport
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Call an axum router in-process instead of the network
    #[cfg(feature = "in-process")]
    pub fn with_router(self, router: Router) -> Self {
        self.transport(Arc::new(OneshotTransport::new(router)))
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` when the network transport cannot be
    /// created from the configuration.
    pub fn build(self) -> ClientResult<StorefrontClient> {
        let config = self.config.unwrap_or_default();
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(NetworkTransport::new(&config)?),
        };
        let session = self.session.unwrap_or_default();
        let cache = QueryCache::from_config(&config);

        tracing::debug!(
            base_url = %config.base_url,
            stale_time = ?config.stale_time,
            retry_attempts = config.retry.max_attempts,
            "storefront client built"
        );

        Ok(StorefrontClient {
            ctx: SyncContext::new(HttpClient::new(transport, session), cache),
            config: Arc::new(config),
        })
    }
}
