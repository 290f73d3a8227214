//! Reqwest-based HTTP client adapter.
//!
//! This module provides the production transport, implementing the
//! [`HttpClient`] trait from `crate::traits`.

use async_trait::async_trait;
use reqwest::cookie::Jar;
use std::sync::Arc;

use crate::traits::{Headers, HttpClient, HttpError, HttpRequest, Method, RequestBody, Response};

/// HTTP client implementation using reqwest.
///
/// Cookies are kept by the underlying client so the session cookie set by
/// the auth endpoints travels with later requests, as it would in a browser.
///
/// # Example
///
/// ```ignore
/// use remark_client::adapters::ReqwestHttpClient;
/// use remark_client::traits::{HttpClient, HttpRequest, Headers, Method, RequestBody};
///
/// let client = ReqwestHttpClient::new();
/// let response = client.send(HttpRequest {
///     method: Method::Get,
///     url: "http://127.0.0.1:8080/api/v1/config?site=remark".to_string(),
///     headers: Headers::new(),
///     body: RequestBody::Empty,
/// }).await?;
/// println!("Status: {}", response.status);
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a new ReqwestHttpClient with a cookie store.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }

    /// Create a new ReqwestHttpClient storing cookies in `jar`, so other
    /// components can read what the server set.
    pub fn with_cookie_jar(jar: Arc<Jar>) -> Self {
        let client = reqwest::Client::builder()
            .cookie_provider(jar)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }

    /// Create a new ReqwestHttpClient with a custom reqwest::Client.
    ///
    /// This allows for advanced configuration like custom timeouts,
    /// proxies, or TLS settings.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying reqwest::Client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// Convert reqwest error to HttpError.
    fn convert_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else if err.is_connect() {
            HttpError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            HttpError::InvalidUrl(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }

    /// Convert reqwest headers to our Headers type.
    fn convert_headers(headers: &reqwest::header::HeaderMap) -> Headers {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    /// Apply headers to a request builder.
    fn apply_headers(
        builder: reqwest::RequestBuilder,
        headers: &Headers,
    ) -> reqwest::RequestBuilder {
        let mut builder = builder;
        for (key, value) in headers {
            builder = builder.header(key, value);
        }
        builder
    }

    fn convert_method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
        }
    }

    fn apply_body(
        builder: reqwest::RequestBuilder,
        body: RequestBody,
    ) -> Result<reqwest::RequestBuilder, HttpError> {
        match body {
            RequestBody::Empty => Ok(builder),
            RequestBody::Text(text) => Ok(builder.body(text)),
            RequestBody::Multipart(file) => {
                // reqwest sets the boundary and Content-Type itself.
                let part = reqwest::multipart::Part::bytes(file.bytes.to_vec())
                    .file_name(file.file_name)
                    .mime_str(&file.content_type)
                    .map_err(|e| HttpError::Other(e.to_string()))?;
                let form = reqwest::multipart::Form::new().part(file.field, part);
                Ok(builder.multipart(form))
            }
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, request: HttpRequest) -> Result<Response, HttpError> {
        let builder = self
            .client
            .request(Self::convert_method(request.method), &request.url);
        let builder = Self::apply_headers(builder, &request.headers);
        let builder = Self::apply_body(builder, request.body)?;

        let response = builder.send().await.map_err(Self::convert_error)?;

        let status = response.status().as_u16();
        let response_headers = Self::convert_headers(response.headers());
        let body = response.bytes().await.map_err(Self::convert_error)?;

        Ok(Response::with_headers(status, response_headers, body))
    }
}
