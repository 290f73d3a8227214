//! Session-aware HTTP client for the comment service.
//!
//! Every call goes through [`Fetcher::request`], which:
//! 1. resolves the URL from the base URL and the API root (or an override),
//! 2. attaches the anti-forgery header and, when held, the session token,
//! 3. serializes the body and appends the `site` query to non-POST requests,
//! 4. updates the clock skew and the session token from the response,
//! 5. classifies the outcome into a [`Payload`] or a [`FetchError`].
//!
//! The fetcher never retries and never swallows errors.

pub mod error;
pub mod request;

pub use error::{
    mapped_status_message, FetchError, TRANSPORT_ERROR_CODE, UNEXPECTED_ERROR_MESSAGE,
    UNPARSEABLE_ERROR_CODE,
};
pub use request::{RequestDescriptor, RequestOptions};

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::session::SessionContext;
use crate::traits::{
    BrowserEnvironment, Clock, Headers, HttpClient, HttpRequest, Method, RequestBody, Response,
};

/// Cookie holding the anti-forgery token.
pub const XSRF_COOKIE: &str = "XSRF-TOKEN";

/// Header carrying the anti-forgery token.
pub const XSRF_HEADER: &str = "X-XSRF-TOKEN";

/// Header carrying the bearer session token, both ways.
pub const JWT_HEADER: &str = "X-JWT";

/// Query parameter identifying the tenant.
pub const SITE_PARAM: &str = "site";

/// Successful response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Body announced as JSON and decoded
    Json(Value),
    /// Any other body, as text
    Text(String),
}

impl Payload {
    /// Decode the payload of a `status` response into `T`. Text bodies are
    /// offered as a JSON string.
    pub fn into_typed<T: DeserializeOwned>(self, status: u16) -> Result<T, FetchError> {
        let value = match self {
            Payload::Json(value) => value,
            Payload::Text(text) => Value::String(text),
        };
        serde_json::from_value(value).map_err(|e| FetchError::Unparseable {
            status,
            message: format!("Failed to decode response: {}", e),
        })
    }
}

/// HTTP client wrapper owning the dual-credential scheme.
///
/// Cheap to clone; clones share the transport and the session context.
#[derive(Clone)]
pub struct Fetcher {
    http: Arc<dyn HttpClient>,
    browser: Arc<dyn BrowserEnvironment>,
    clock: Arc<dyn Clock>,
    session: Arc<SessionContext>,
    config: Arc<ClientConfig>,
}

impl Fetcher {
    pub fn new(
        config: ClientConfig,
        http: Arc<dyn HttpClient>,
        browser: Arc<dyn BrowserEnvironment>,
        clock: Arc<dyn Clock>,
        session: Arc<SessionContext>,
    ) -> Self {
        Self {
            http,
            browser,
            clock,
            session,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    pub fn browser(&self) -> &Arc<dyn BrowserEnvironment> {
        &self.browser
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Absolute URL for `descriptor`, including the `site` query for non-POST
    /// requests. The query is added even when the site id is empty.
    pub fn build_url(&self, descriptor: &RequestDescriptor) -> String {
        let root = descriptor
            .api_root_override()
            .unwrap_or(self.config.api_root.as_str());
        let mut url = format!(
            "{}{}{}",
            self.config.base_url.trim_end_matches('/'),
            root,
            descriptor.path()
        );

        if descriptor.method() != Method::Post {
            let separator = if url.contains('?') { '&' } else { '?' };
            url.push(separator);
            url.push_str(SITE_PARAM);
            url.push('=');
            url.push_str(&urlencoding::encode(&self.config.site_id));
        }

        url
    }

    /// Issue a request and classify its outcome.
    pub async fn request(&self, descriptor: RequestDescriptor) -> Result<Payload, FetchError> {
        self.exchange(descriptor).await.map(|(_, payload)| payload)
    }

    /// Like [`Fetcher::request`], also returning the success status.
    async fn exchange(&self, descriptor: RequestDescriptor) -> Result<(u16, Payload), FetchError> {
        let request = self.build_request(&descriptor);
        debug!("{} {}", request.method, request.url);

        let response = match self.http.send(request).await {
            Ok(response) => response,
            Err(e) => {
                let err = FetchError::Transport {
                    message: e.to_string(),
                };
                warn!(
                    "{} {} failed without a response: {}",
                    descriptor.method(),
                    descriptor.path(),
                    err
                );
                return Err(err);
            }
        };

        self.apply_session_headers(&response);

        let status = response.status;
        classify(response).map(|payload| (status, payload)).map_err(|err| {
            warn!(
                "{} {} failed (code {}): {}",
                descriptor.method(),
                descriptor.path(),
                err.code(),
                err
            );
            err
        })
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, FetchError> {
        self.typed(RequestDescriptor::new(Method::Get, path, options))
            .await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, FetchError> {
        self.typed(RequestDescriptor::new(Method::Post, path, options))
            .await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, FetchError> {
        self.typed(RequestDescriptor::new(Method::Put, path, options))
            .await
    }

    pub async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, FetchError> {
        self.typed(RequestDescriptor::new(Method::Patch, path, options))
            .await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, FetchError> {
        self.typed(RequestDescriptor::new(Method::Delete, path, options))
            .await
    }

    pub async fn head<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, FetchError> {
        self.typed(RequestDescriptor::new(Method::Head, path, options))
            .await
    }

    async fn typed<T: DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<T, FetchError> {
        let (status, payload) = self.exchange(descriptor).await?;
        payload.into_typed(status)
    }

    fn build_request(&self, descriptor: &RequestDescriptor) -> HttpRequest {
        let mut headers = Headers::new();
        headers.insert(
            XSRF_HEADER.to_string(),
            self.browser.cookie(XSRF_COOKIE).unwrap_or_default(),
        );

        // Redundant with the session cookie; needed where cookies are blocked.
        if let Some(token) = self.session.tokens().get() {
            headers.insert(JWT_HEADER.to_string(), token);
        }

        let body = if let Some(json) = descriptor.json() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
            RequestBody::Text(json.to_string())
        } else if let Some(file) = descriptor.file() {
            RequestBody::Multipart(file.clone())
        } else {
            RequestBody::Empty
        };

        for (name, value) in descriptor.headers() {
            headers.insert(name.clone(), value.clone());
        }

        HttpRequest {
            method: descriptor.method(),
            url: self.build_url(descriptor),
            headers,
            body,
        }
    }

    fn apply_session_headers(&self, response: &Response) {
        self.session
            .clock_skew()
            .observe(response.header_value("date"), self.clock.now());

        // The server may rotate the token on any response.
        if let Some(token) = response.header_value(JWT_HEADER) {
            debug!("session token rotated by server");
            self.session.tokens().rotate(token);
        }

        if response.status == 403 && self.session.tokens().clear_if_held() {
            info!("session token cleared after 403 response");
        }
    }
}

/// Turn a received response into a payload or a classified error.
fn classify(response: Response) -> Result<Payload, FetchError> {
    let status = response.status;

    if status >= 400 {
        if let Some(message) = mapped_status_message(status) {
            return Err(FetchError::MappedStatus { status, message });
        }

        let text = response.text();
        return match serde_json::from_str::<Value>(&text) {
            Ok(payload) => Err(FetchError::Application { status, payload }),
            Err(_) => Err(FetchError::Unparseable {
                status,
                message: UNEXPECTED_ERROR_MESSAGE.to_string(),
            }),
        };
    }

    if response.is_json() {
        if response.body.is_empty() {
            return Ok(Payload::Json(Value::Null));
        }
        return serde_json::from_slice(&response.body)
            .map(Payload::Json)
            .map_err(|e| FetchError::Unparseable {
                status,
                message: format!("Failed to decode response: {}", e),
            });
    }

    Ok(Payload::Text(response.text()))
}
