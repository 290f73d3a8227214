//! Mock implementations for testing.
//!
//! This module provides mock implementations of all trait abstractions,
//! enabling unit testing without network access or a real browser.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with configurable responses
//! - [`MockBrowser`] - Cookies, connectivity, visibility and popups
//! - [`MockClock`] - Manually driven clock
//! - [`RecordingObserver`] - Records session notifications

pub mod browser;
pub mod clock;
pub mod http;
pub mod observer;

pub use browser::MockBrowser;
pub use clock::MockClock;
pub use http::{MockHttpClient, MockResponse};
pub use observer::{RecordingObserver, SessionEvent};
