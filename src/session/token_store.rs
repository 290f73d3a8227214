//! In-memory bearer session token.
//!
//! The token is a redundant credential for contexts where the session
//! cookie is unavailable. It lives only as long as the process and is
//! written exclusively by the fetcher, hence the crate-private mutators.

use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct TokenStore {
    token: Mutex<Option<String>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current token, if one is held.
    pub fn get(&self) -> Option<String> {
        self.lock().clone()
    }

    pub fn is_held(&self) -> bool {
        self.lock().is_some()
    }

    /// Replace the token with a server-rotated one, whatever was held before.
    pub(crate) fn rotate(&self, token: &str) {
        *self.lock() = Some(token.to_string());
    }

    /// Drop the token. Returns `true` only if a token was actually held.
    pub(crate) fn clear_if_held(&self) -> bool {
        self.lock().take().is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
