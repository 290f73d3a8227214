//! Server/client clock skew tracking.
//!
//! Every response carrying a parseable `Date` header refreshes the skew as
//! local time minus server time, in seconds. Anything else leaves the last
//! value in place; before the first valid header the skew is 0.

use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct ClockSkew {
    seconds: Mutex<f64>,
}

impl ClockSkew {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last observed skew in seconds. Positive means the local clock is ahead.
    pub fn seconds(&self) -> f64 {
        *self.lock()
    }

    /// Translate a local instant into the server's notion of time.
    pub fn to_server_time(&self, local: DateTime<Utc>) -> DateTime<Utc> {
        let millis = (self.seconds() * 1000.0).round() as i64;
        local - Duration::milliseconds(millis)
    }

    /// Record the skew implied by a response `Date` header.
    ///
    /// Returns the new skew, or `None` when the header was absent or could not
    /// be parsed (in which case the previous value is kept).
    pub(crate) fn observe(&self, date_header: Option<&str>, local: DateTime<Utc>) -> Option<f64> {
        let server = parse_http_date(date_header?)?;
        let skew = (local - server).num_milliseconds() as f64 / 1000.0;
        *self.lock() = skew;
        Some(skew)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, f64> {
        self.seconds.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Parse an HTTP-date (`Sun, 06 Nov 1994 08:49:37 GMT`).
fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|date| date.with_timezone(&Utc))
}
