// storefront-client/src/transport/network.rs
// Network transport over reqwest

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};

use super::{ApiRequest, IMAGE_FIELD, RawResponse, RequestBody, Transport};
use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Network transport
#[derive(Debug, Clone)]
pub struct NetworkTransport {
    client: Client,
    base_url: String,
}

impl NetworkTransport {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// API base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for NetworkTransport {
    async fn execute(&self, request: ApiRequest) -> ClientResult<RawResponse> {
        let url = request.url(&self.base_url)?;
        let mut req = self.client.request(request.method.clone(), url);
        if let Some(auth) = request.auth_header() {
            req = req.header(reqwest::header::AUTHORIZATION, auth);
        }

        req = match request.body {
            RequestBody::Empty => req,
            RequestBody::Json(bytes) => req
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(bytes),
            RequestBody::Image(upload) => {
                let part = Part::bytes(upload.data.to_vec())
                    .file_name(upload.file_name)
                    .mime_str(&upload.content_type)?;
                req.multipart(Form::new().part(IMAGE_FIELD, part))
            }
        };

        let response = req.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        Ok(RawResponse { status, body })
    }
}
