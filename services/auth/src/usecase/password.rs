use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use quizz_core::config::Environment;

use crate::domain::notification::{Locale, Notification, Recipient, Template};
use crate::domain::repository::{ForgotPasswordRepository, Mailer, UserRepository};
use crate::domain::types::{
    ForgotPassword, PASSWORD_CHANGED, RESET_EMAIL_SENT, RequestContext, normalize_email,
};
use crate::domain::validation;
use crate::error::AuthServiceError;
use crate::password::hash_password_task;
use crate::usecase::dispatch;

#[derive(Debug, Serialize)]
pub struct MessageOutput {
    pub message: &'static str,
}

// ── ForgotPassword ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ForgotPasswordOutput {
    pub msg: &'static str,
    pub email: String,
    /// Raw ticket token, echoed outside production only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<String>,
}

pub struct ForgotPasswordUseCase<U, F, M>
where
    U: UserRepository,
    F: ForgotPasswordRepository,
    M: Mailer,
{
    pub users: U,
    pub tickets: F,
    pub mailer: M,
    pub env: Environment,
}

impl<U, F, M> ForgotPasswordUseCase<U, F, M>
where
    U: UserRepository,
    F: ForgotPasswordRepository,
    M: Mailer + Clone + 'static,
{
    pub async fn execute(
        &self,
        email: &str,
        locale: Locale,
        ctx: &RequestContext,
    ) -> Result<ForgotPasswordOutput, AuthServiceError> {
        validation::email(email)?;

        let email = normalize_email(email);
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthServiceError::UserDoesNotExist)?;

        let now = Utc::now();
        let ticket = ForgotPassword {
            id: Uuid::new_v4(),
            email: user.email.clone(),
            verification: Uuid::new_v4().to_string(),
            used: false,
            ip_request: ctx.ip.clone(),
            browser_request: ctx.browser.clone(),
            country_request: ctx.country.clone(),
            ip_changed: None,
            browser_changed: None,
            country_changed: None,
            created_at: now,
            updated_at: now,
        };
        self.tickets.create(&ticket).await?;
        info!(user_id = %user.id, ticket_id = %ticket.id, "password reset requested");

        dispatch(
            &self.mailer,
            Notification {
                locale,
                template: Template::ResetPassword {
                    verification: ticket.verification.clone(),
                },
                recipient: Recipient {
                    first_name: user.first_name,
                    last_name: user.last_name,
                    email: user.email,
                },
            },
        );

        Ok(ForgotPasswordOutput {
            msg: RESET_EMAIL_SENT,
            email: ticket.email,
            verification: (!self.env.is_production()).then_some(ticket.verification),
        })
    }
}

// ── ResetPassword ────────────────────────────────────────────────────────────

pub struct ResetPasswordInput {
    pub verification: String,
    pub password: String,
}

pub struct ResetPasswordUseCase<U: UserRepository, F: ForgotPasswordRepository> {
    pub users: U,
    pub tickets: F,
}

impl<U: UserRepository, F: ForgotPasswordRepository> ResetPasswordUseCase<U, F> {
    pub async fn execute(
        &self,
        input: ResetPasswordInput,
        ctx: &RequestContext,
    ) -> Result<MessageOutput, AuthServiceError> {
        validation::require("id", &input.verification)?;
        validation::password(&input.password)?;

        let ticket = self
            .tickets
            .find_unused(input.verification.trim())
            .await?
            .ok_or(AuthServiceError::NotFoundOrAlreadyUsed)?;

        let user = self
            .users
            .find_by_email(&ticket.email)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        let hash = hash_password_task(&input.password).await?;

        // Claim first so two racing requests cannot both succeed.
        if !self.tickets.consume(ticket.id, ctx).await? {
            return Err(AuthServiceError::NotFoundOrAlreadyUsed);
        }

        let written = match self.users.update_password_hash(user.id, &hash).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(AuthServiceError::NotFound),
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            if let Err(release) = self.tickets.release(ticket.id).await {
                warn!(ticket_id = %ticket.id, error = ?release, "failed to release reset ticket");
            }
            return Err(e);
        }
        info!(user_id = %user.id, ticket_id = %ticket.id, "password reset completed");

        Ok(MessageOutput {
            message: PASSWORD_CHANGED,
        })
    }
}

// ── UpdatePassword ───────────────────────────────────────────────────────────

pub struct UpdatePasswordUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> UpdatePasswordUseCase<U> {
    /// Change the password of an already authenticated user.
    pub async fn execute(
        &self,
        user_id: Uuid,
        password: &str,
    ) -> Result<MessageOutput, AuthServiceError> {
        validation::password(password)?;

        let hash = hash_password_task(password).await?;
        if !self.users.update_password_hash(user_id, &hash).await? {
            return Err(AuthServiceError::NotFound);
        }
        info!(user_id = %user_id, "password updated");

        Ok(MessageOutput {
            message: PASSWORD_CHANGED,
        })
    }
}
