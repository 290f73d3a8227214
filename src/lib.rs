//! remark-client - client layer for a hosted comment widget
//!
//! - [`fetcher`]: session-aware HTTP client (anti-forgery header, rotated
//!   bearer token, clock skew, classified errors)
//! - [`auth`]: sign-in state machine and throttled session revalidation
//! - [`api`]: comment service endpoints
//! - [`client`]: facade wiring everything around one session

pub mod adapters;
pub mod api;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod fetcher;
pub mod models;
pub mod session;
pub mod traits;

pub use client::{RemarkClient, RemarkClientBuilder};
pub use config::ClientConfig;
pub use fetcher::{FetchError, Fetcher, Payload, RequestDescriptor, RequestOptions};
pub use models::User;
