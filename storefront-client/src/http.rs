//! HTTP client for the storefront API
//!
//! Every request goes through [`RequestBuilder`], which is the single place
//! where the session token is attached, protected calls are refused when
//! no token is present, and non-success responses are normalized into
//! [`ClientError::RemoteRejected`].

use std::sync::Arc;

use http::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::{ErrorBody, PageRequest, Validate};

use crate::error::{ClientError, ClientResult};
use crate::session::SessionStore;
use crate::transport::{ApiRequest, ImageUpload, RawResponse, RequestBody, Transport};

/// Whether a request needs a session token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Token attached when present, request sent either way
    Public,
    /// Request refused locally when no token is present
    Protected,
}

/// HTTP client bound to a transport and a session
#[derive(Debug, Clone)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    session: SessionStore,
}

impl HttpClient {
    pub fn new(transport: Arc<dyn Transport>, session: SessionStore) -> Self {
        Self { transport, session }
    }

    /// Session this client reads its token from
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// GET request; public unless marked [`RequestBuilder::protected`]
    pub fn get(&self, operation: &str, path: impl Into<String>) -> RequestBuilder {
        self.request(Method::GET, operation, path)
    }

    /// POST request (protected)
    pub fn post(&self, operation: &str, path: impl Into<String>) -> RequestBuilder {
        self.request(Method::POST, operation, path)
    }

    /// PUT request (protected)
    pub fn put(&self, operation: &str, path: impl Into<String>) -> RequestBuilder {
        self.request(Method::PUT, operation, path)
    }

    /// DELETE request (protected)
    pub fn delete(&self, operation: &str, path: impl Into<String>) -> RequestBuilder {
        self.request(Method::DELETE, operation, path)
    }

    /// Start a request; every method other than GET is protected
    pub fn request(&self, method: Method, operation: &str, path: impl Into<String>) -> RequestBuilder {
        let access = if method == Method::GET {
            Access::Public
        } else {
            Access::Protected
        };
        RequestBuilder {
            http: self.clone(),
            operation: operation.to_string(),
            method,
            path: path.into(),
            query: Vec::new(),
            body: Ok(RequestBody::Empty),
            rejected: None,
            access,
        }
    }
}

/// Request under construction
#[derive(Debug)]
pub struct RequestBuilder {
    http: HttpClient,
    operation: String,
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: ClientResult<RequestBody>,
    /// Local rejection, reported after the token gate
    rejected: Option<ClientError>,
    access: Access,
}

impl RequestBuilder {
    /// Require a session token for this request
    pub fn protected(mut self) -> Self {
        self.access = Access::Protected;
        self
    }

    pub fn access(&self) -> Access {
        self.access
    }

    /// Append an entity id as one percent-encoded path segment
    ///
    /// An empty id rejects the request with [`ClientError::Validation`].
    pub fn segment(mut self, kind: &str, id: &str) -> Self {
        if id.trim().is_empty() {
            return self.reject(ClientError::Validation(format!("{} id is required", kind)));
        }
        self.path.push('/');
        self.path.push_str(&urlencoding::encode(id));
        self
    }

    /// Append a fixed path segment
    pub fn join(mut self, literal: &str) -> Self {
        self.path.push('/');
        self.path.push_str(literal);
        self
    }

    /// Refuse the request locally; the first rejection wins
    pub fn reject(mut self, err: ClientError) -> Self {
        self.rejected.get_or_insert(err);
        self
    }

    /// Append a query parameter
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Append pagination parameters
    pub fn page(mut self, page: &PageRequest) -> Self {
        self.query.extend(page.query_pairs());
        self
    }

    /// JSON body
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        self.body = serde_json::to_vec(body)
            .map(|bytes| RequestBody::Json(bytes.into()))
            .map_err(|e| ClientError::Internal(format!("Failed to serialize body: {}", e)));
        self
    }

    /// JSON body, checked against its validation rules first
    pub fn validated_json<B: Serialize + Validate>(self, body: &B) -> Self {
        match body.validate() {
            Ok(()) => self.json(body),
            Err(errors) => self.reject(errors.into()),
        }
    }

    /// Multipart body carrying one image
    pub fn image(mut self, upload: ImageUpload) -> Self {
        self.body = Ok(RequestBody::Image(upload));
        self
    }

    /// Resolve the token and produce the request
    ///
    /// Fails with [`ClientError::AuthenticationRequired`] for a protected
    /// request when the session holds no token, before any local rejection
    /// is reported.
    pub fn build(self) -> ClientResult<ApiRequest> {
        let bearer = match self.access {
            Access::Protected => Some(
                self.http
                    .session
                    .token()
                    .ok_or(ClientError::AuthenticationRequired)?,
            ),
            Access::Public => self.http.session.token(),
        };
        if let Some(err) = self.rejected {
            return Err(err);
        }
        Ok(ApiRequest {
            operation: self.operation,
            method: self.method,
            path: self.path,
            query: self.query,
            body: self.body?,
            bearer,
        })
    }

    /// Send and decode a JSON response
    pub async fn send<T: DeserializeOwned>(self) -> ClientResult<T> {
        let (operation, raw) = self.execute().await?;
        serde_json::from_slice(&raw.body)
            .map_err(|e| ClientError::InvalidResponse(format!("{}: {}", operation, e)))
    }

    /// Send and ignore the response body
    pub async fn send_empty(self) -> ClientResult<()> {
        self.execute().await.map(|_| ())
    }

    /// Send and decode, mapping 404 to `None`
    pub async fn send_optional<T: DeserializeOwned>(self) -> ClientResult<Option<T>> {
        match self.send().await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn execute(self) -> ClientResult<(String, RawResponse)> {
        let transport = self.http.transport.clone();
        let request = match self.build() {
            Ok(request) => request,
            Err(err) => {
                tracing::debug!(error = %err, "request refused before sending");
                return Err(err);
            }
        };
        let operation = request.operation.clone();

        tracing::debug!(
            operation = %operation,
            method = %request.method,
            path = %request.path,
            authenticated = request.bearer.is_some(),
            "sending request"
        );

        let raw = transport.execute(request).await?;
        if !raw.status.is_success() {
            let server_message = serde_json::from_slice::<ErrorBody>(&raw.body)
                .ok()
                .map(|body| body.message);
            let err = ClientError::rejected(&operation, raw.status.as_u16(), server_message);
            tracing::warn!(operation = %operation, status = raw.status.as_u16(), error = %err, "request rejected");
            return Err(err);
        }
        Ok((operation, raw))
    }
}
