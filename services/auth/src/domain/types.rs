use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quizz_core::config::Environment;

/// Placeholder for request metadata the client did not send.
pub const UNKNOWN: &str = "unknown";

/// Country code recorded when the edge did not set `cf-ipcountry`.
pub const UNKNOWN_COUNTRY: &str = "XX";

/// Success message returned by every password change.
pub const PASSWORD_CHANGED: &str = "PASSWORD_CHANGED";

/// Message returned after a reset ticket was created.
pub const RESET_EMAIL_SENT: &str = "RESET_EMAIL_SENT";

/// Minimum accepted password length in characters.
pub const MIN_PASSWORD_LEN: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// Column value stored in `users.role`.
    pub fn as_i16(self) -> i16 {
        match self {
            Self::User => 0,
            Self::Admin => 1,
        }
    }

    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            0 => Some(Self::User),
            1 => Some(Self::Admin),
            _ => None,
        }
    }
}

/// Identity and credential record.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Always lower-cased.
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub verified: bool,
    pub verification: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub login_attempts: i32,
    pub block_expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Audit row written once per issued token.
#[derive(Debug, Clone)]
pub struct UserAccess {
    pub id: Uuid,
    pub email: String,
    pub ip: String,
    pub browser: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
}

/// Single-use password reset ticket.
#[derive(Debug, Clone)]
pub struct ForgotPassword {
    pub id: Uuid,
    pub email: String,
    pub verification: String,
    pub used: bool,
    pub ip_request: String,
    pub browser_request: String,
    pub country_request: String,
    pub ip_changed: Option<String>,
    pub browser_changed: Option<String>,
    pub country_changed: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Where a request came from, as far as the edge tells us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub ip: String,
    pub browser: String,
    pub country: String,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            ip: UNKNOWN.to_owned(),
            browser: UNKNOWN.to_owned(),
            country: UNKNOWN_COUNTRY.to_owned(),
        }
    }
}

/// Redacted projection of [`User`] safe to hand to clients.
///
/// Never carries the password hash or throttle counters. `verification` is
/// only filled outside production, where it saves testers a trip to the inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub verified: bool,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<String>,
}

impl UserInfo {
    pub fn redact(user: &User, env: Environment) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            role: user.role,
            verified: user.verified,
            phone: user.phone.clone(),
            city: user.city.clone(),
            country: user.country.clone(),
            verification: if env.is_production() {
                None
            } else {
                user.verification.clone()
            },
        }
    }
}

/// Lower-case and trim an email the way it is stored.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
