//! Storefront Mock - in-memory storefront API
//!
//! Serves the storefront REST surface under `/api` from memory, with test
//! controls under `/__mock`. Used by the client's tests through an
//! in-process router and runnable as a standalone server.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod state;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::MockConfig;
pub use error::{MockError, MockResult};
pub use state::{
    ADMIN_ID, ADMIN_TOKEN, CUSTOMER_ID, CUSTOMER_TOKEN, CurrentUser, Fault, MockState,
    RequestStats,
};

/// The mock API as a router, ready for `oneshot` calls or serving
pub fn router(state: MockState) -> Router {
    Router::new()
        .nest("/api", api::api_routes())
        .nest("/__mock", api::control_routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::track_requests,
        ))
        .with_state(state)
}

/// Serve the mock API until the process is stopped
pub async fn serve(config: &MockConfig, state: MockState) -> std::io::Result<()> {
    let app = router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!("storefront mock listening on http://{}/api", listener.local_addr()?);
    axum::serve(listener, app).await
}
