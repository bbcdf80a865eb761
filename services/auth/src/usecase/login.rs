use chrono::Utc;
use tracing::{info, warn};

use crate::domain::repository::{UserAccessRepository, UserRepository};
use crate::domain::throttle::{FailureOutcome, ThrottlePolicy, ThrottleState};
use crate::domain::types::{RequestContext, normalize_email};
use crate::domain::validation;
use crate::error::AuthServiceError;
use crate::password::verify_password_task;
use crate::usecase::token::{IssuedToken, TokenService, issue_token};

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub struct LoginUseCase<U: UserRepository, A: UserAccessRepository> {
    pub users: U,
    pub access: A,
    pub tokens: TokenService,
    pub policy: ThrottlePolicy,
}

impl<U: UserRepository, A: UserAccessRepository> LoginUseCase<U, A> {
    pub async fn execute(
        &self,
        input: LoginInput,
        ctx: &RequestContext,
    ) -> Result<IssuedToken, AuthServiceError> {
        validation::email(&input.email)?;
        validation::password(&input.password)?;

        let email = normalize_email(&input.email);
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthServiceError::UserDoesNotExist)?;

        let now = Utc::now();
        match self
            .policy
            .state(user.login_attempts, user.block_expires_at, now)
        {
            ThrottleState::Blocked => {
                info!(user_id = %user.id, "login rejected, user is blocked");
                return Err(AuthServiceError::BlockedUser);
            }
            ThrottleState::ExpiredBlock => {
                // Courtesy reset once the window has passed; not a successful login.
                self.users.reset_login_attempts(user.id).await?;
            }
            ThrottleState::Open => {}
        }

        if !verify_password_task(&input.password, &user.password_hash).await? {
            let attempts = self.users.record_failed_login(user.id).await?;
            return match self.policy.after_failure(attempts, now) {
                FailureOutcome::WrongPassword => Err(AuthServiceError::WrongPassword),
                FailureOutcome::Block { until } => {
                    self.users.block_until(user.id, until).await?;
                    warn!(user_id = %user.id, attempts, %until, "user blocked after failed logins");
                    Err(AuthServiceError::BlockedUser)
                }
            };
        }

        self.users.reset_login_attempts(user.id).await?;
        issue_token(&self.access, &self.tokens, &user, ctx).await
    }
}
