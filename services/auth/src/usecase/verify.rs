use serde::Serialize;
use tracing::info;

use crate::domain::repository::UserRepository;
use crate::domain::validation;
use crate::error::AuthServiceError;

#[derive(Debug, Serialize)]
pub struct VerifyOutput {
    pub email: String,
    pub verified: bool,
}

pub struct VerifyUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> VerifyUseCase<U> {
    /// Consume a registration verification token.
    ///
    /// Unknown and already-used tokens both yield
    /// [`AuthServiceError::NotFoundOrAlreadyVerified`].
    pub async fn execute(&self, verification: &str) -> Result<VerifyOutput, AuthServiceError> {
        validation::require("id", verification)?;

        let user = self
            .users
            .find_unverified_by_verification(verification.trim())
            .await?
            .ok_or(AuthServiceError::NotFoundOrAlreadyVerified)?;

        if !self.users.mark_verified(user.id).await? {
            return Err(AuthServiceError::NotFoundOrAlreadyVerified);
        }
        info!(user_id = %user.id, "user verified");

        Ok(VerifyOutput {
            email: user.email,
            verified: true,
        })
    }
}
