use std::future::Future;

use uuid::Uuid;

use crate::domain::repository::UserRepository;
use crate::domain::types::{Role, User};
use crate::error::AuthServiceError;

/// Role gate applied after the token has been verified.
///
/// Always re-reads the stored role, so a demotion takes effect on the next
/// request rather than when the token expires.
pub struct AuthorizeUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> AuthorizeUseCase<U> {
    pub async fn check(&self, user_id: Uuid, allowed: &[Role]) -> Result<User, AuthServiceError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if !allowed.contains(&user.role) {
            tracing::info!(user_id = %user_id, role = ?user.role, "role not allowed");
            return Err(AuthServiceError::Unauthorized);
        }
        Ok(user)
    }

    /// Run `next` only if the user's current role is in `allowed`.
    pub async fn execute<F, Fut, T>(
        &self,
        user_id: Uuid,
        allowed: &[Role],
        next: F,
    ) -> Result<T, AuthServiceError>
    where
        F: FnOnce(User) -> Fut,
        Fut: Future<Output = Result<T, AuthServiceError>>,
    {
        let user = self.check(user_id, allowed).await?;
        next(user).await
    }
}
