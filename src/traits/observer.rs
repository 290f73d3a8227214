//! Session change notifications.

use crate::models::User;

/// Receives session changes produced by the sign-in flow and the
/// revalidation scheduler. This is how the rest of the application learns
/// that a visitor signed in or that the session is gone.
pub trait SessionObserver: Send + Sync {
    /// An identity was obtained (sign-in or successful revalidation).
    fn session_established(&self, user: &User);

    /// No identity is available anymore.
    fn session_cleared(&self);
}
