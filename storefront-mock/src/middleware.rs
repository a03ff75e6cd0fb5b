//! Request middleware: counters and faults, then bearer authentication

use axum::extract::{Request, State};
use axum::http::{Method, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::MockError;
use crate::state::MockState;

/// Count every `/api` request, apply latency and injected faults
pub async fn track_requests(State(state): State<MockState>, req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    if !path.starts_with("/api/") {
        return next.run(req).await;
    }

    let method = req.method().clone();
    let (latency, fault) = state.observe(&method, &path).await;
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
    if let Some(fault) = fault {
        tracing::info!(%method, %path, status = fault.status.as_u16(), "injected fault");
        return MockError::Injected {
            status: fault.status,
            message: fault.message,
        }
        .into_response();
    }
    next.run(req).await
}

/// Catalog reads are public; everything else under `/api` needs a token
fn is_public(method: &Method, path: &str) -> bool {
    method == Method::GET
        && (path.starts_with("/api/brands") || path.starts_with("/api/categories"))
}

/// Resolve `Authorization: Bearer <token>` into a [`CurrentUser`]
///
/// The user is inserted into the request extensions when a valid token is
/// present, public routes included.
///
/// [`CurrentUser`]: crate::state::CurrentUser
pub async fn require_auth(
    State(state): State<MockState>,
    mut req: Request,
    next: Next,
) -> Result<Response, MockError> {
    let path = req.uri().path();
    if req.method() == Method::OPTIONS || !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }
    let public = is_public(req.method(), path);

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string);

    let user = match token {
        Some(token) => state.authenticate(&token).await,
        None => None,
    };

    match user {
        Some(user) => {
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        None if public => Ok(next.run(req).await),
        None => {
            tracing::debug!(path = %req.uri().path(), "rejected unauthenticated request");
            Err(MockError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_routes() {
        assert!(is_public(&Method::GET, "/api/brands"));
        assert!(is_public(&Method::GET, "/api/categories/slug/shoes"));
        assert!(!is_public(&Method::POST, "/api/brands"));
        assert!(!is_public(&Method::GET, "/api/wishlists"));
        assert!(!is_public(&Method::GET, "/api/review/p-1/reviews"));
    }
}
