use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use quizz_auth_types::codec::TokenCodec;
use quizz_auth_types::token::{sign_token, validate_token};
use quizz_core::config::Environment;

use crate::domain::repository::{UserAccessRepository, UserRepository};
use crate::domain::types::{RequestContext, User, UserAccess, UserInfo};
use crate::error::AuthServiceError;

/// Mints and reads the opaque access tokens handed to clients.
///
/// A token is an HS256 JWT `{sub, exp}` sealed by [`TokenCodec`], so the
/// user id never travels in the clear.
#[derive(Debug, Clone)]
pub struct TokenService {
    pub codec: TokenCodec,
    pub jwt_secret: String,
    pub ttl_secs: u64,
    pub env: Environment,
}

impl TokenService {
    pub fn mint(&self, user_id: Uuid) -> Result<String, AuthServiceError> {
        let (signed, _claims) = sign_token(&user_id.to_string(), self.ttl_secs, &self.jwt_secret)
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        self.codec
            .encode(&signed)
            .map_err(|e| AuthServiceError::Internal(e.into()))
    }

    /// Recover the subject of a presented token.
    ///
    /// Undecryptable, forged or expired tokens are [`AuthServiceError::BadToken`];
    /// a valid token whose subject is not a record id is
    /// [`AuthServiceError::IdMalformed`].
    pub fn subject(&self, opaque: &str) -> Result<Uuid, AuthServiceError> {
        let signed = self
            .codec
            .decode(opaque.trim())
            .map_err(|_| AuthServiceError::BadToken)?;
        let claims =
            validate_token(&signed, &self.jwt_secret).map_err(|_| AuthServiceError::BadToken)?;
        claims
            .sub
            .parse::<Uuid>()
            .map_err(|_| AuthServiceError::IdMalformed)
    }

    pub fn user_info(&self, user: &User) -> UserInfo {
        UserInfo::redact(user, self.env)
    }
}

#[derive(Debug, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub user: UserInfo,
}

/// Record one access row for `user`, then mint a token.
///
/// The two steps are not transactional; the audit row is advisory.
pub async fn issue_token<A: UserAccessRepository>(
    access: &A,
    tokens: &TokenService,
    user: &User,
    ctx: &RequestContext,
) -> Result<IssuedToken, AuthServiceError> {
    access
        .create(&UserAccess {
            id: Uuid::new_v4(),
            email: user.email.clone(),
            ip: ctx.ip.clone(),
            browser: ctx.browser.clone(),
            country: ctx.country.clone(),
            created_at: Utc::now(),
        })
        .await?;

    Ok(IssuedToken {
        token: tokens.mint(user.id)?,
        user: tokens.user_info(user),
    })
}

// ── RefreshToken ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RefreshTokenOutput {
    pub token: String,
}

pub struct RefreshTokenUseCase<U: UserRepository, A: UserAccessRepository> {
    pub users: U,
    pub access: A,
    pub tokens: TokenService,
}

impl<U: UserRepository, A: UserAccessRepository> RefreshTokenUseCase<U, A> {
    pub async fn execute(
        &self,
        presented: &str,
        ctx: &RequestContext,
    ) -> Result<RefreshTokenOutput, AuthServiceError> {
        let user_id = self.tokens.subject(presented)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthServiceError::UserDoesNotExist)?;

        let issued = issue_token(&self.access, &self.tokens, &user, ctx).await?;
        Ok(RefreshTokenOutput {
            token: issued.token,
        })
    }
}
