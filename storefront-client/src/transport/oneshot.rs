// storefront-client/src/transport/oneshot.rs
// Oneshot transport - in-memory calls (requires the "in-process" feature)

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use bytes::Bytes;
use http::Request;
use tower::ServiceExt;

use super::{ApiRequest, IMAGE_FIELD, ImageUpload, RawResponse, RequestBody, Transport};
use crate::error::{ClientError, ClientResult};

/// Oneshot transport
///
/// Calls an axum `Router` through Tower's `oneshot`, so a client and a
/// server in the same process talk without a socket. Requests go through
/// the same routing, extraction and status handling as over the network.
///
/// # Example
///
/// ```ignore
/// use storefront_client::transport::OneshotTransport;
///
/// let router = storefront_mock::router(storefront_mock::MockState::new());
/// let transport = OneshotTransport::new(router);
/// ```
#[derive(Debug, Clone)]
pub struct OneshotTransport {
    router: Router,
    base_path: String,
}

impl OneshotTransport {
    /// Router serving the API under `/api`
    pub fn new(router: Router) -> Self {
        Self::with_base_path(router, "/api")
    }

    pub fn with_base_path(router: Router, base_path: impl Into<String>) -> Self {
        Self {
            router,
            base_path: base_path.into().trim_end_matches('/').to_string(),
        }
    }

    fn build_request(&self, request: ApiRequest) -> ClientResult<Request<Body>> {
        let uri = request.path_and_query(&self.base_path)?;
        let mut builder = Request::builder().method(request.method.clone()).uri(uri);

        if let Some(auth) = request.auth_header() {
            builder = builder.header(http::header::AUTHORIZATION, auth);
        }

        let body = match request.body {
            RequestBody::Empty => Body::empty(),
            RequestBody::Json(bytes) => {
                builder = builder.header(http::header::CONTENT_TYPE, "application/json");
                Body::from(bytes)
            }
            RequestBody::Image(upload) => {
                let (content_type, bytes) = encode_multipart(IMAGE_FIELD, &upload);
                builder = builder.header(http::header::CONTENT_TYPE, content_type);
                Body::from(bytes)
            }
        };

        builder
            .body(body)
            .map_err(|e| ClientError::Internal(format!("Failed to build request: {}", e)))
    }
}

#[async_trait]
impl Transport for OneshotTransport {
    async fn execute(&self, request: ApiRequest) -> ClientResult<RawResponse> {
        let request = self.build_request(request)?;

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| ClientError::NetworkFailure(format!("Oneshot call failed: {}", e)))?;

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| ClientError::NetworkFailure(format!("Failed to read body: {}", e)))?;

        Ok(RawResponse { status, body })
    }
}

/// Encode a single-file multipart form
///
/// Returns the `Content-Type` header value (with boundary) and the body.
fn encode_multipart(field: &str, upload: &ImageUpload) -> (String, Bytes) {
    let boundary = format!("storefront-{}", uuid::Uuid::new_v4().simple());
    let file_name = upload.file_name.replace('"', "%22");

    let mut body = Vec::with_capacity(upload.data.len() + 256);
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
            boundary, field, file_name, upload.content_type
        )
        .as_bytes(),
    );
    body.extend_from_slice(&upload.data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    (
        format!("multipart/form-data; boundary={}", boundary),
        Bytes::from(body),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_multipart_layout() {
        let upload = ImageUpload::png("logo.png", vec![1u8, 2, 3]);
        let (content_type, body) = encode_multipart(IMAGE_FIELD, &upload);

        let boundary = content_type
            .strip_prefix("multipart/form-data; boundary=")
            .unwrap();
        let text = String::from_utf8_lossy(&body);
        assert!(text.starts_with(&format!("--{}\r\n", boundary)));
        assert!(text.contains("name=\"image\"; filename=\"logo.png\""));
        assert!(text.contains("Content-Type: image/png\r\n\r\n"));
        assert!(text.ends_with(&format!("\r\n--{}--\r\n", boundary)));
    }

    #[test]
    fn test_oneshot_transport_creation() {
        let router: Router = Router::new();
        let transport = OneshotTransport::with_base_path(router, "/api/");
        assert_eq!(transport.base_path, "/api");
    }
}
