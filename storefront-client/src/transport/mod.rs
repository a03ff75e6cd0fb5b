//! Transport layer
//!
//! A transport executes exactly one [`ApiRequest`] and hands back the raw
//! status and body. It fails only when no response arrived at all; status
//! interpretation and the auth gate live in [`crate::http::HttpClient`].

pub mod network;
#[cfg(feature = "in-process")]
pub mod oneshot;

use async_trait::async_trait;
use bytes::Bytes;
use http::{Method, StatusCode};
use reqwest::Url;

use crate::error::{ClientError, ClientResult};

pub use network::NetworkTransport;
#[cfg(feature = "in-process")]
pub use oneshot::OneshotTransport;

/// Multipart field name every image upload uses
pub const IMAGE_FIELD: &str = "image";

/// Binary image attached to an existing entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    pub fn png(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self::new(file_name, "image/png", data)
    }

    pub fn jpeg(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self::new(file_name, "image/jpeg", data)
    }
}

/// Request body variants
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Serialized JSON document
    Json(Bytes),
    /// Multipart form with the image as its only field
    Image(ImageUpload),
}

/// One HTTP request, fully described
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// Human-readable label used in fallback error messages ("Create brand")
    pub operation: String,
    pub method: Method,
    /// Path relative to the API base, starting with `/`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    /// Bearer token, attached as `Authorization: Bearer <token>`
    pub bearer: Option<String>,
}

impl ApiRequest {
    /// Absolute URL of this request under `base`
    pub fn url(&self, base: &str) -> ClientResult<Url> {
        let raw = format!("{}{}", base.trim_end_matches('/'), self.path);
        let mut url = Url::parse(&raw)
            .map_err(|e| ClientError::Config(format!("Invalid URL {}: {}", raw, e)))?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        Ok(url)
    }

    /// Path and encoded query string, prefixed with `base_path`
    pub fn path_and_query(&self, base_path: &str) -> ClientResult<String> {
        let url = self.url(&format!("http://in-process{}", base_path))?;
        Ok(match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        })
    }

    /// `Authorization` header value
    pub fn auth_header(&self) -> Option<String> {
        self.bearer.as_ref().map(|t| format!("Bearer {}", t))
    }
}

/// Raw response as received
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Executes requests against the storefront API
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    async fn execute(&self, request: ApiRequest) -> ClientResult<RawResponse>;
}
