//! Client wired to an in-process mock API

#![allow(dead_code)]

use std::time::Duration;

use storefront_client::{ClientConfig, RetryPolicy, SessionData, SessionStore, StorefrontClient};
use storefront_mock::MockState;
use tracing_subscriber::EnvFilter;

pub use storefront_mock::{ADMIN_TOKEN, CUSTOMER_ID, CUSTOMER_TOKEN, Fault};

/// Retries with millisecond backoff so tests stay fast
pub fn test_config() -> ClientConfig {
    ClientConfig::default().with_retry(
        RetryPolicy::default().with_backoff(Duration::from_millis(1), Duration::from_millis(5)),
    )
}

/// Route client logs to the test writer, filtered by `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Client for `state` signed in with `token`, anonymous when `None`
pub fn client(state: &MockState, token: Option<&str>) -> StorefrontClient {
    init_tracing();
    let session = SessionStore::with_session(SessionData {
        token: token.map(str::to_string),
        user: None,
    });
    StorefrontClient::builder()
        .config(test_config())
        .session(session)
        .with_router(storefront_mock::router(state.clone()))
        .build()
        .expect("client builds")
}

/// Seeded mock plus an admin client
pub fn admin() -> (MockState, StorefrontClient) {
    let state = MockState::seeded();
    let client = client(&state, Some(ADMIN_TOKEN));
    (state, client)
}

/// Seeded mock plus a customer client
pub fn customer() -> (MockState, StorefrontClient) {
    let state = MockState::seeded();
    let client = client(&state, Some(CUSTOMER_TOKEN));
    (state, client)
}

/// Id of the first seeded product
pub async fn first_product(state: &MockState) -> String {
    state.db().read().await.products[0].id.clone()
}

/// Register a second customer and return its token
pub async fn other_customer(state: &MockState) -> String {
    let mut db = state.db().write().await;
    let mut other = db.users[1].clone();
    other.id = "user-other".to_string();
    other.email = "other@example.com".to_string();
    other.username = "other".to_string();
    db.users.push(other);
    drop(db);
    state.issue_token("user-other").await
}
