use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::domain::notification::{Locale, Notification, Recipient, Template};
use crate::domain::repository::{Mailer, UserRepository};
use crate::domain::types::{Role, User, normalize_email};
use crate::domain::validation;
use crate::error::AuthServiceError;
use crate::password::hash_password_task;
use crate::usecase::dispatch;
use crate::usecase::token::{IssuedToken, TokenService};

pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

pub struct RegisterUseCase<U: UserRepository, M: Mailer> {
    pub users: U,
    pub mailer: M,
    pub tokens: TokenService,
}

impl<U, M> RegisterUseCase<U, M>
where
    U: UserRepository,
    M: Mailer + Clone + 'static,
{
    pub async fn execute(
        &self,
        input: RegisterInput,
        locale: Locale,
    ) -> Result<IssuedToken, AuthServiceError> {
        validation::require("firstName", &input.first_name)?;
        validation::require("lastName", &input.last_name)?;
        validation::email(&input.email)?;
        validation::password(&input.password)?;

        let email = normalize_email(&input.email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthServiceError::EmailAlreadyExists);
        }

        let password_hash = hash_password_task(&input.password).await?;
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            first_name: input.first_name.trim().to_owned(),
            last_name: input.last_name.trim().to_owned(),
            email,
            password_hash,
            role: Role::User,
            verified: false,
            verification: Some(Uuid::new_v4().to_string()),
            phone: trimmed(input.phone),
            city: trimmed(input.city),
            country: trimmed(input.country),
            login_attempts: 0,
            block_expires_at: now,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await?;
        info!(user_id = %user.id, "user registered");

        if let Some(verification) = user.verification.clone() {
            dispatch(
                &self.mailer,
                Notification {
                    locale,
                    template: Template::Registration { verification },
                    recipient: Recipient {
                        first_name: user.first_name.clone(),
                        last_name: user.last_name.clone(),
                        email: user.email.clone(),
                    },
                },
            );
        }

        Ok(IssuedToken {
            token: self.tokens.mint(user.id)?,
            user: self.tokens.user_info(&user),
        })
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
