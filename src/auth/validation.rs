//! Local validation of sign-in form fields.
//!
//! All checks run before any network call; a failing field never reaches
//! the server.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

/// Minimum username length, in characters.
pub const MIN_USERNAME_LENGTH: usize = 3;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^@]+@[^.]+\..+").expect("Invalid email regex"));

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\d_ ]+$").expect("Invalid username regex"));

/// Why a form field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Username must be at least 3 characters long")]
    UsernameTooShort,

    #[error("Username must contain only letters, numbers, underscores or spaces")]
    UsernameSymbols,

    #[error("Address should be a valid email")]
    InvalidEmail,

    #[error("Token can't be empty")]
    EmptyCode,

    #[error("Token is expired")]
    ExpiredCode,

    #[error("Token is invalid")]
    InvalidCode,
}

#[derive(Debug, Deserialize)]
struct CodeClaims {
    #[serde(default)]
    exp: Option<serde_json::Value>,
}

pub fn username_invalid_reason(username: &str) -> Option<ValidationError> {
    if username.chars().count() < MIN_USERNAME_LENGTH {
        return Some(ValidationError::UsernameTooShort);
    }

    if !USERNAME_RE.is_match(username.trim()) {
        return Some(ValidationError::UsernameSymbols);
    }

    None
}

pub fn email_invalid_reason(email: &str) -> Option<ValidationError> {
    if !EMAIL_RE.is_match(email) {
        return Some(ValidationError::InvalidEmail);
    }
    None
}

/// Check a verification code, which is a JWT sent by email.
///
/// The signature is not checked. A missing or non-numeric `exp` claim
/// counts as "not expired".
pub fn code_invalid_reason(code: &str, now: DateTime<Utc>) -> Option<ValidationError> {
    if code.is_empty() {
        return Some(ValidationError::EmptyCode);
    }

    match decode_expiry(code) {
        Err(()) => Some(ValidationError::InvalidCode),
        Ok(Some(exp)) if now.timestamp_millis() as f64 > exp * 1000.0 => {
            Some(ValidationError::ExpiredCode)
        }
        Ok(_) => None,
    }
}

/// `exp` claim of a JWT in seconds, `Ok(None)` when the claim is absent.
fn decode_expiry(token: &str) -> Result<Option<f64>, ()> {
    let payload = token.trim().split('.').nth(1).ok_or(())?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|_| ())?;
    let claims: CodeClaims = serde_json::from_slice(&bytes).map_err(|_| ())?;
    Ok(claims.exp.as_ref().and_then(serde_json::Value::as_f64))
}
