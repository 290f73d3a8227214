//! Browser environment trait abstraction.
//!
//! The widget reads a handful of facts from its host page: cookies, whether
//! the network is up, whether the tab is visible, and it can open a new
//! browsing context for OAuth. Everything goes through
//! [`BrowserEnvironment`] so the core runs outside a browser and in tests.

use thiserror::Error;

/// Errors raised by browser operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BrowserError {
    /// A new window/tab could not be opened
    #[error("Failed to open {url}: {message}")]
    OpenFailed { url: String, message: String },
}

/// Host-page facilities used by the fetcher, the scheduler and the sign-in flow.
pub trait BrowserEnvironment: Send + Sync {
    /// Value of a cookie readable by the page, if set.
    fn cookie(&self, name: &str) -> Option<String>;

    /// Whether the browser reports network connectivity.
    fn is_online(&self) -> bool;

    /// Whether the document is currently visible.
    fn is_visible(&self) -> bool;

    /// Open `url` in a new browsing context.
    fn open_window(&self, url: &str) -> Result<(), BrowserError>;
}
