//! Authentication for the comment widget.
//!
//! This module provides:
//! - The auth endpoints (anonymous, email, OAuth, logout, current user)
//! - Provider discovery from the server config
//! - Local validation of form fields
//! - The sign-in state machine
//! - Throttled session revalidation

pub mod api;
pub mod flow;
pub mod providers;
pub mod revalidation;
pub mod validation;

pub use api::{stringify_url, AuthApi};
pub use flow::{Field, FlowLifetime, FlowState, SignInFlow, SubmitOutcome};
pub use providers::{FormProvider, OAuthProvider, ProviderSet, OAUTH_PROVIDERS};
pub use revalidation::{Revalidation, RevalidationScheduler};
pub use validation::{
    code_invalid_reason, email_invalid_reason, username_invalid_reason, ValidationError,
};
