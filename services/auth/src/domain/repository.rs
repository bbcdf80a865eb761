#![allow(async_fn_in_trait)]

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::notification::Notification;
use crate::domain::types::{ForgotPassword, RequestContext, User, UserAccess};
use crate::error::AuthServiceError;

/// Credential store for [`User`] records.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthServiceError>;

    /// Lookup by lower-cased email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthServiceError>;

    /// Find a not-yet-verified user holding this exact verification token.
    async fn find_unverified_by_verification(
        &self,
        verification: &str,
    ) -> Result<Option<User>, AuthServiceError>;

    async fn create(&self, user: &User) -> Result<(), AuthServiceError>;

    /// Flip `verified` to true only if it is still false.
    /// Returns `false` if another request got there first.
    async fn mark_verified(&self, id: Uuid) -> Result<bool, AuthServiceError>;

    /// Atomically add one failed attempt and return the new count.
    async fn record_failed_login(&self, id: Uuid) -> Result<i32, AuthServiceError>;

    async fn block_until(&self, id: Uuid, until: DateTime<Utc>) -> Result<(), AuthServiceError>;

    async fn reset_login_attempts(&self, id: Uuid) -> Result<(), AuthServiceError>;

    /// Returns `false` if the user no longer exists.
    async fn update_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<bool, AuthServiceError>;
}

/// Append-only audit log of issued tokens.
pub trait UserAccessRepository: Send + Sync {
    async fn create(&self, access: &UserAccess) -> Result<(), AuthServiceError>;
}

/// Store for password reset tickets.
pub trait ForgotPasswordRepository: Send + Sync {
    async fn create(&self, ticket: &ForgotPassword) -> Result<(), AuthServiceError>;

    async fn find_unused(
        &self,
        verification: &str,
    ) -> Result<Option<ForgotPassword>, AuthServiceError>;

    /// Mark the ticket used and stamp the change metadata, only if it is
    /// still unused. Returns `false` if the ticket was already consumed.
    async fn consume(&self, id: Uuid, ctx: &RequestContext) -> Result<bool, AuthServiceError>;

    /// Undo [`consume`](Self::consume) when the password write behind it failed.
    async fn release(&self, id: Uuid) -> Result<(), AuthServiceError>;
}

/// Outgoing notification sink.
///
/// The future must be `Send`: use cases hand it to `tokio::spawn` so a slow
/// or failing mail provider never holds up the response.
pub trait Mailer: Send + Sync {
    fn send(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<(), AuthServiceError>> + Send;
}
