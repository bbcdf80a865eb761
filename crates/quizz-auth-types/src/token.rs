//! Signed-token claims, issuance and validation.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
use serde::Serialize;

/// Errors returned by [`validate_token`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

/// JWT claims payload carried inside every access token.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | user id (UUID string) |
/// | `exp` | `exp` | expiration, seconds since epoch |
///
/// There is no role claim: authorization re-reads the current role from
/// the credential store on every request.
///
/// [`Serialize`] requires the **`USE_ONLY_IN_AUTH_SERVICE`** feature; only the
/// auth service mints tokens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test), derive(Serialize))]
pub struct JwtClaims {
    pub sub: String,
    pub exp: u64,
}

/// Current time in seconds since the UNIX epoch.
pub fn now_secs() -> u64 {
    jsonwebtoken::get_current_timestamp()
}

/// Decode and validate a signed token.
///
/// HS256 only, `exp` and `sub` required, default 60s leeway for clock skew.
pub fn validate_token(token: &str, secret: &str) -> Result<JwtClaims, AuthError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?;

    Ok(data.claims)
}

// ── Feature-gated: auth service only ─────────────────────────────────────

/// Sign claims for `sub` expiring `ttl_secs` from now.
#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
pub fn sign_token(
    sub: &str,
    ttl_secs: u64,
    secret: &str,
) -> Result<(String, JwtClaims), jsonwebtoken::errors::Error> {
    use jsonwebtoken::{EncodingKey, Header, encode};

    let claims = JwtClaims {
        sub: sub.to_owned(),
        exp: now_secs() + ttl_secs,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok((token, claims))
}
