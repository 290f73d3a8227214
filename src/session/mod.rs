//! Session context shared by every component of the client.
//!
//! One [`SessionContext`] is built per widget instance and handed out as an
//! `Arc`. Only the fetcher mutates it; everything else reads.
//!
//! Concurrent responses update the context in completion order: the last
//! response to arrive wins, even if its request was issued earlier.

mod clock_skew;
mod token_store;

pub use clock_skew::ClockSkew;
pub use token_store::TokenStore;

#[derive(Debug, Default)]
pub struct SessionContext {
    tokens: TokenStore,
    skew: ClockSkew,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bearer session token store.
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// The server/client clock skew tracker.
    pub fn clock_skew(&self) -> &ClockSkew {
        &self.skew
    }
}
