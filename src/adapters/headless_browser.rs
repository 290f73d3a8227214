//! Browser environment for running the client outside a browser.
//!
//! Cookies come from the cookie jar shared with the reqwest transport, with
//! values set by the embedder taking precedence. Connectivity and visibility
//! are flags, and OAuth windows go to the system browser via `webbrowser`.

use reqwest::cookie::{CookieStore, Jar};
use reqwest::Url;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

use crate::traits::{BrowserEnvironment, BrowserError};

#[derive(Debug, Clone)]
pub struct HeadlessBrowser {
    cookies: Arc<Mutex<HashMap<String, String>>>,
    jar: Option<(Arc<Jar>, Url)>,
    online: Arc<AtomicBool>,
    visible: Arc<AtomicBool>,
}

impl HeadlessBrowser {
    /// Online and visible, with no cookies.
    pub fn new() -> Self {
        Self {
            cookies: Arc::new(Mutex::new(HashMap::new())),
            jar: None,
            online: Arc::new(AtomicBool::new(true)),
            visible: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Read cookies the server set for `url` from `jar`, the same jar the
    /// transport stores response cookies in.
    pub fn with_cookie_jar(mut self, jar: Arc<Jar>, url: Url) -> Self {
        self.jar = Some((jar, url));
        self
    }

    fn jar_cookie(&self, name: &str) -> Option<String> {
        let (jar, url) = self.jar.as_ref()?;
        let header = jar.cookies(url)?;
        header
            .to_str()
            .ok()?
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.to_string())
    }

    pub fn set_cookie(&self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(name.into(), value.into());
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }
}

impl Default for HeadlessBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserEnvironment for HeadlessBrowser {
    fn cookie(&self, name: &str) -> Option<String> {
        let set = self
            .cookies
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(name)
            .cloned();
        set.or_else(|| self.jar_cookie(name))
    }

    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    fn open_window(&self, url: &str) -> Result<(), BrowserError> {
        info!("Opening {} in the system browser", url);
        webbrowser::open(url).map_err(|e| BrowserError::OpenFailed {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}
