//! Wall-clock abstraction.

use chrono::{DateTime, Utc};

/// Source of the current time.
///
/// Skew tracking, code expiry checks and the revalidation throttle all ask
/// a `Clock` so tests can move time explicitly.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
