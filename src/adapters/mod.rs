//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP transport using reqwest
//! - [`HeadlessBrowser`] - browser environment for non-browser hosts
//! - [`SystemClock`] - wall clock
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles for all adapters:
//! - [`mock::MockHttpClient`] - Configurable HTTP responses
//! - [`mock::MockBrowser`] - Settable cookies and flags, recorded popups
//! - [`mock::MockClock`] - Manually driven time
//! - [`mock::RecordingObserver`] - Recorded session notifications

pub mod headless_browser;
pub mod mock;
pub mod reqwest_http;
pub mod system_clock;

pub use headless_browser::HeadlessBrowser;
pub use reqwest_http::ReqwestHttpClient;
pub use system_clock::SystemClock;
