//! Client configuration.
//!
//! Use the builder methods to customize where the widget talks to and how
//! it identifies itself.
//!
//! # Example
//!
//! ```ignore
//! use remark_client::config::ClientConfig;
//!
//! let config = ClientConfig::default()
//!     .with_base_url("https://comments.example.com")
//!     .with_site_id("blog")
//!     .with_page_url("https://blog.example.com/posts/1");
//! ```

use std::time::Duration;

/// Default comment service host.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

/// Root of the standard API namespace, appended to the base URL.
pub const DEFAULT_API_ROOT: &str = "/api/v1";

/// Default tenant identifier.
pub const DEFAULT_SITE_ID: &str = "remark";

/// Minimum time between two session revalidations.
pub const REVALIDATION_WINDOW: Duration = Duration::from_secs(60);

/// Configuration shared by every component of the client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Comment service host, without trailing slash
    pub base_url: String,
    /// Default API root used unless a request overrides it
    pub api_root: String,
    /// Tenant identifier appended as `site` to non-POST requests
    pub site_id: String,
    /// URL of the page hosting the widget
    pub page_url: String,
    /// Throttle window for session revalidation
    pub revalidation_window: Duration,
    /// Move to code verification even when "start email sign-in" fails
    pub advance_on_email_start_failure: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_root: DEFAULT_API_ROOT.to_string(),
            site_id: DEFAULT_SITE_ID.to_string(),
            page_url: DEFAULT_BASE_URL.to_string(),
            revalidation_window: REVALIDATION_WINDOW,
            advance_on_email_start_failure: true,
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the comment service host.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the default API root.
    pub fn with_api_root(mut self, root: impl Into<String>) -> Self {
        self.api_root = root.into();
        self
    }

    /// Set the tenant identifier.
    pub fn with_site_id(mut self, site_id: impl Into<String>) -> Self {
        self.site_id = site_id.into();
        self
    }

    /// Set the URL of the hosting page.
    pub fn with_page_url(mut self, url: impl Into<String>) -> Self {
        self.page_url = url.into();
        self
    }

    /// Set the revalidation throttle window.
    pub fn with_revalidation_window(mut self, window: Duration) -> Self {
        self.revalidation_window = window;
        self
    }

    /// Choose whether a failed "start email sign-in" still advances to code entry.
    pub fn with_advance_on_email_start_failure(mut self, advance: bool) -> Self {
        self.advance_on_email_start_failure = advance;
        self
    }

    /// Create config from `REMARK_URL`, `REMARK_SITE_ID` and `REMARK_PAGE_URL`.
    /// Unset variables keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("REMARK_URL") {
            config = config.with_base_url(url);
        }
        if let Ok(site_id) = std::env::var("REMARK_SITE_ID") {
            config = config.with_site_id(site_id);
        }
        match std::env::var("REMARK_PAGE_URL") {
            Ok(page_url) => config.with_page_url(page_url),
            Err(_) => {
                let base = config.base_url.clone();
                config.with_page_url(base)
            }
        }
    }

    /// Address the auth popup returns to: the page origin and path with the
    /// `selfClose` marker, so the popup closes itself after sign-in.
    pub fn return_url(&self) -> String {
        let page = self
            .page_url
            .split(|c| c == '?' || c == '#')
            .next()
            .unwrap_or_default();
        format!("{}?selfClose", page)
    }
}
