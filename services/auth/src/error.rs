use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Auth service domain error variants.
///
/// Not-found variants are deliberately coarse: a consumed ticket and a
/// missing one answer the same, so callers cannot probe which tokens existed.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("{field}: {reason}")]
    Validation {
        field: &'static str,
        reason: &'static str,
    },
    #[error("id malformed")]
    IdMalformed,
    #[error("email already exists")]
    EmailAlreadyExists,
    #[error("user does not exist")]
    UserDoesNotExist,
    #[error("not found")]
    NotFound,
    #[error("not found or already verified")]
    NotFoundOrAlreadyVerified,
    #[error("not found or already used")]
    NotFoundOrAlreadyUsed,
    #[error("blocked user")]
    BlockedUser,
    #[error("wrong password")]
    WrongPassword,
    #[error("bad token")]
    BadToken,
    #[error("unauthorized")]
    Unauthorized,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_FAILED",
            Self::IdMalformed => "ID_MALFORMED",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::UserDoesNotExist => "USER_DOES_NOT_EXIST",
            Self::NotFound => "NOT_FOUND",
            Self::NotFoundOrAlreadyVerified => "NOT_FOUND_OR_ALREADY_VERIFIED",
            Self::NotFoundOrAlreadyUsed => "NOT_FOUND_OR_ALREADY_USED",
            Self::BlockedUser => "BLOCKED_USER",
            Self::WrongPassword => "WRONG_PASSWORD",
            Self::BadToken => "BAD_TOKEN",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::IdMalformed | Self::EmailAlreadyExists => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::UserDoesNotExist
            | Self::NotFound
            | Self::NotFoundOrAlreadyVerified
            | Self::NotFoundOrAlreadyUsed => StatusCode::NOT_FOUND,
            Self::BlockedUser | Self::WrongPassword | Self::BadToken => StatusCode::CONFLICT,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        // TraceLayer records every request; only 500s need the anyhow chain here.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = format!("{e:#}"), kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (self.status(), axum::Json(body)).into_response()
    }
}
