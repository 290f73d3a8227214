//! In-memory browser environment for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::traits::{BrowserEnvironment, BrowserError};

/// Browser double with settable cookies, connectivity and visibility.
///
/// Opened windows are recorded instead of launched.
#[derive(Debug, Clone)]
pub struct MockBrowser {
    cookies: Arc<Mutex<HashMap<String, String>>>,
    online: Arc<AtomicBool>,
    visible: Arc<AtomicBool>,
    fail_open: Arc<AtomicBool>,
    opened: Arc<Mutex<Vec<String>>>,
}

impl MockBrowser {
    /// Online, visible, no cookies.
    pub fn new() -> Self {
        Self {
            cookies: Arc::new(Mutex::new(HashMap::new())),
            online: Arc::new(AtomicBool::new(true)),
            visible: Arc::new(AtomicBool::new(true)),
            fail_open: Arc::new(AtomicBool::new(false)),
            opened: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_cookie(&self, name: &str, value: &str) {
        self.lock_cookies().insert(name.to_string(), value.to_string());
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }

    /// Make every `open_window` call fail.
    pub fn set_fail_open(&self, fail: bool) {
        self.fail_open.store(fail, Ordering::SeqCst);
    }

    /// URLs passed to `open_window`, in order.
    pub fn opened_windows(&self) -> Vec<String> {
        self.opened
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    fn lock_cookies(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.cookies.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl Default for MockBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserEnvironment for MockBrowser {
    fn cookie(&self, name: &str) -> Option<String> {
        self.lock_cookies().get(name).cloned()
    }

    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    fn open_window(&self, url: &str) -> Result<(), BrowserError> {
        if self.fail_open.load(Ordering::SeqCst) {
            return Err(BrowserError::OpenFailed {
                url: url.to_string(),
                message: "popup blocked".to_string(),
            });
        }
        self.opened
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(url.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let browser = MockBrowser::new();
        assert!(browser.is_online());
        assert!(browser.is_visible());
        assert!(browser.cookie("XSRF-TOKEN").is_none());
    }

    #[test]
    fn test_open_window_records_or_fails() {
        let browser = MockBrowser::new();
        browser.open_window("https://a").unwrap();
        assert_eq!(browser.opened_windows(), vec!["https://a".to_string()]);

        browser.set_fail_open(true);
        assert!(browser.open_window("https://b").is_err());
        assert_eq!(browser.opened_windows().len(), 1);
    }
}
