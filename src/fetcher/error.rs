//! Classified fetch errors.
//!
//! | Variant | When | Code |
//! |---------|------|------|
//! | Transport | no response at all (network, DNS, abort) | -2 |
//! | MappedStatus | status in the fixed table, body ignored | status |
//! | Application | other status >= 400 with a JSON body | status |
//! | Unparseable | other status >= 400 with a non-JSON body | 0 |

use serde_json::Value;
use thiserror::Error;

/// Code carried by transport failures.
pub const TRANSPORT_ERROR_CODE: i64 = -2;

/// Code carried by unparseable error responses.
pub const UNPARSEABLE_ERROR_CODE: i64 = 0;

/// Generic user-facing text for unexpected failures.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "Something went wrong. Please try again a bit later.";

/// Fixed user-facing text for well-known statuses. These take precedence
/// over anything the server put in the body.
pub fn mapped_status_message(status: u16) -> Option<&'static str> {
    match status {
        401 => Some("Not authorized."),
        403 => Some("Forbidden."),
        429 => Some("You have reached maximum request limit."),
        _ => None,
    }
}

/// Error returned by every fetcher operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// The request never produced a response.
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// A status from the fixed table.
    #[error("{message}")]
    MappedStatus { status: u16, message: &'static str },

    /// An unmapped error status whose body decoded as JSON. The payload is
    /// passed through untouched.
    #[error("Request failed ({status}): {payload}")]
    Application { status: u16, payload: Value },

    /// An error status with a body that is not JSON, or a success body that
    /// does not match the expected shape.
    #[error("{message}")]
    Unparseable { status: u16, message: String },
}

impl FetchError {
    /// Numeric code in the widget's error convention.
    pub fn code(&self) -> i64 {
        match self {
            FetchError::Transport { .. } => TRANSPORT_ERROR_CODE,
            FetchError::MappedStatus { status, .. } => i64::from(*status),
            FetchError::Application { status, .. } => i64::from(*status),
            FetchError::Unparseable { .. } => UNPARSEABLE_ERROR_CODE,
        }
    }

    /// HTTP status, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Transport { .. } => None,
            FetchError::MappedStatus { status, .. }
            | FetchError::Application { status, .. }
            | FetchError::Unparseable { status, .. } => Some(*status),
        }
    }

    /// Decoded server payload for application errors.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            FetchError::Application { payload, .. } => Some(payload),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport { .. })
    }

    /// Text suitable for showing to a visitor.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::MappedStatus { message, .. } => message.to_string(),
            FetchError::Application { payload, .. } => payload
                .get("error")
                .or_else(|| payload.get("msg"))
                .and_then(Value::as_str)
                .unwrap_or(UNEXPECTED_ERROR_MESSAGE)
                .to_string(),
            FetchError::Transport { .. } | FetchError::Unparseable { .. } => {
                UNEXPECTED_ERROR_MESSAGE.to_string()
            }
        }
    }
}
