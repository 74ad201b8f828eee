//! Username syntax check, applied before any network call.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::AnalysisError;

/// 1-15 characters, ASCII letters, digits, or underscore.
static USERNAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_]{1,15}$").expect("username pattern is a valid regex")
});

pub fn is_valid_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

pub fn validate_username(username: &str) -> Result<(), AnalysisError> {
    if is_valid_username(username) {
        Ok(())
    } else {
        Err(AnalysisError::InvalidUsername)
    }
}
