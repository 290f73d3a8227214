//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP transport used by the fetcher
//! - [`BrowserEnvironment`] - cookies, connectivity, visibility, window opening
//! - [`Clock`] - current time
//! - [`SessionObserver`] - session established/cleared notifications

pub mod browser;
pub mod clock;
pub mod http;
pub mod observer;

pub use browser::{BrowserEnvironment, BrowserError};
pub use clock::Clock;
pub use http::{FilePart, Headers, HttpClient, HttpError, HttpRequest, Method, RequestBody, Response};
pub use observer::SessionObserver;
