use std::sync::LazyLock;

use regex::Regex;

use crate::domain::types::MIN_PASSWORD_LEN;
use crate::error::AuthServiceError;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("email regex is valid")
});

pub fn require(field: &'static str, value: &str) -> Result<(), AuthServiceError> {
    if value.trim().is_empty() {
        return Err(AuthServiceError::Validation {
            field,
            reason: "IS_EMPTY",
        });
    }
    Ok(())
}

pub fn email(value: &str) -> Result<(), AuthServiceError> {
    require("email", value)?;
    if !EMAIL_RE.is_match(value.trim()) {
        return Err(AuthServiceError::Validation {
            field: "email",
            reason: "EMAIL_IS_NOT_VALID",
        });
    }
    Ok(())
}

pub fn password(value: &str) -> Result<(), AuthServiceError> {
    require("password", value)?;
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthServiceError::Validation {
            field: "password",
            reason: "PASSWORD_TOO_SHORT_MIN_5",
        });
    }
    Ok(())
}
