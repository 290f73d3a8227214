//! Request descriptors.

use bytes::Bytes;
use serde_json::Value;

use crate::traits::{FilePart, Method};

/// Optional parts of a request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    json: Option<Value>,
    file: Option<FilePart>,
    headers: Vec<(String, String)>,
    api_root: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send `body` as JSON.
    pub fn json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    /// Send a single file as `multipart/form-data`.
    pub fn file(
        mut self,
        field: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        self.file = Some(FilePart {
            field: field.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        });
        self
    }

    /// Add or override a request header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Use `root` instead of the configured API root. Pass `""` for
    /// endpoints that live on the bare host, such as `/auth/...`.
    pub fn api_root(mut self, root: impl Into<String>) -> Self {
        self.api_root = Some(root.into());
        self
    }
}

/// Immutable description of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    method: Method,
    path: String,
    options: RequestOptions,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>, options: RequestOptions) -> Self {
        Self {
            method,
            path: path.into(),
            options,
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn json(&self) -> Option<&Value> {
        self.options.json.as_ref()
    }

    pub fn file(&self) -> Option<&FilePart> {
        self.options.file.as_ref()
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.options.headers
    }

    pub fn api_root_override(&self) -> Option<&str> {
        self.options.api_root.as_deref()
    }
}
