use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;

use crate::domain::notification::Locale;
use crate::domain::types::{RequestContext, Role};
use crate::error::AuthServiceError;
use crate::handlers::extract::AuthenticatedUser;
use crate::state::AppState;
use crate::usecase::authorize::AuthorizeUseCase;
use crate::usecase::login::{LoginInput, LoginUseCase};
use crate::usecase::password::{
    ForgotPasswordUseCase, ResetPasswordInput, ResetPasswordUseCase, UpdatePasswordUseCase,
};
use crate::usecase::register::{RegisterInput, RegisterUseCase};
use crate::usecase::token::RefreshTokenUseCase;
use crate::usecase::verify::VerifyUseCase;

// ── POST /login ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        access: state.user_access_repo(),
        tokens: state.tokens.clone(),
        policy: state.policy,
    };
    let out = usecase
        .execute(
            LoginInput {
                email: body.email,
                password: body.password,
            },
            &ctx,
        )
        .await?;
    Ok((StatusCode::OK, Json(out)))
}

// ── POST /register ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    locale: Locale,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = RegisterUseCase {
        users: state.user_repo(),
        mailer: state.mailer.clone(),
        tokens: state.tokens.clone(),
    };
    let out = usecase
        .execute(
            RegisterInput {
                first_name: body.first_name,
                last_name: body.last_name,
                email: body.email,
                password: body.password,
                phone: body.phone,
                city: body.city,
                country: body.country,
            },
            locale,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(out)))
}

// ── POST /verify ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub id: String,
}

pub async fn verify(
    State(state): State<AppState>,
    Json(body): Json<VerifyRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = VerifyUseCase {
        users: state.user_repo(),
    };
    let out = usecase.execute(&body.id).await?;
    Ok((StatusCode::OK, Json(out)))
}

// ── POST /forgot ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

pub async fn forgot_password(
    State(state): State<AppState>,
    locale: Locale,
    ctx: RequestContext,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = ForgotPasswordUseCase {
        users: state.user_repo(),
        tickets: state.forgot_password_repo(),
        mailer: state.mailer.clone(),
        env: state.tokens.env,
    };
    let out = usecase.execute(&body.email, locale, &ctx).await?;
    Ok((StatusCode::OK, Json(out)))
}

// ── POST /reset ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub id: String,
    pub password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = ResetPasswordUseCase {
        users: state.user_repo(),
        tickets: state.forgot_password_repo(),
    };
    let out = usecase
        .execute(
            ResetPasswordInput {
                verification: body.id,
                password: body.password,
            },
            &ctx,
        )
        .await?;
    Ok((StatusCode::OK, Json(out)))
}

// ── PUT /password/update ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdatePasswordRequest {
    pub password: String,
}

pub async fn update_password(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(body): Json<UpdatePasswordRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = UpdatePasswordUseCase {
        users: state.user_repo(),
    };
    let out = usecase.execute(auth.user_id, &body.password).await?;
    Ok((StatusCode::OK, Json(out)))
}

// ── GET /token ───────────────────────────────────────────────────────────────

pub async fn refresh_token(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    ctx: RequestContext,
) -> Result<impl IntoResponse, AuthServiceError> {
    let gate = AuthorizeUseCase {
        users: state.user_repo(),
    };
    let usecase = RefreshTokenUseCase {
        users: state.user_repo(),
        access: state.user_access_repo(),
        tokens: state.tokens.clone(),
    };
    let out = gate
        .execute(auth.user_id, &[Role::User, Role::Admin], |_user| {
            usecase.execute(&auth.token, &ctx)
        })
        .await?;
    Ok((StatusCode::OK, Json(out)))
}
