use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, SqlErr, sea_query::Expr,
};
use uuid::Uuid;

use quizz_auth_schema::{forgot_passwords, user_access, users};

use crate::domain::repository::{ForgotPasswordRepository, UserAccessRepository, UserRepository};
use crate::domain::types::{ForgotPassword, RequestContext, Role, User, UserAccess};
use crate::error::AuthServiceError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn find_unverified_by_verification(
        &self,
        verification: &str,
    ) -> Result<Option<User>, AuthServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Verification.eq(verification))
            .filter(users::Column::Verified.eq(false))
            .one(&self.db)
            .await
            .context("find unverified user")?;
        model.map(user_from_model).transpose()
    }

    async fn create(&self, user: &User) -> Result<(), AuthServiceError> {
        users::ActiveModel {
            id: Set(user.id),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(user.role.as_i16()),
            verification: Set(user.verification.clone()),
            verified: Set(user.verified),
            phone: Set(user.phone.clone()),
            city: Set(user.city.clone()),
            country: Set(user.country.clone()),
            login_attempts: Set(user.login_attempts),
            block_expires_at: Set(user.block_expires_at),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await
        .map_err(create_user_error)?;
        Ok(())
    }

    async fn mark_verified(&self, id: Uuid) -> Result<bool, AuthServiceError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::Verified, Expr::value(true))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .filter(users::Column::Verified.eq(false))
            .exec(&self.db)
            .await
            .context("mark user verified")?;
        Ok(result.rows_affected == 1)
    }

    async fn record_failed_login(&self, id: Uuid) -> Result<i32, AuthServiceError> {
        let updated = users::Entity::update_many()
            .col_expr(
                users::Column::LoginAttempts,
                Expr::col(users::Column::LoginAttempts).add(1),
            )
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .exec_with_returning(&self.db)
            .await
            .context("record failed login")?;
        let model = updated
            .into_iter()
            .next()
            .ok_or(AuthServiceError::UserDoesNotExist)?;
        Ok(model.login_attempts)
    }

    async fn block_until(&self, id: Uuid, until: DateTime<Utc>) -> Result<(), AuthServiceError> {
        users::Entity::update_many()
            .col_expr(users::Column::BlockExpiresAt, Expr::value(until))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("block user")?;
        Ok(())
    }

    async fn reset_login_attempts(&self, id: Uuid) -> Result<(), AuthServiceError> {
        users::Entity::update_many()
            .col_expr(users::Column::LoginAttempts, Expr::value(0))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .filter(users::Column::LoginAttempts.ne(0))
            .exec(&self.db)
            .await
            .context("reset login attempts")?;
        Ok(())
    }

    async fn update_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<bool, AuthServiceError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::PasswordHash, Expr::value(password_hash))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("update password hash")?;
        Ok(result.rows_affected == 1)
    }
}

/// A concurrent registration can pass the email check and lose on the
/// unique index; that is still a taken email, not a server fault.
fn create_user_error(err: DbErr) -> AuthServiceError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AuthServiceError::EmailAlreadyExists,
        _ => anyhow::Error::new(err).context("create user").into(),
    }
}

fn user_from_model(model: users::Model) -> Result<User, AuthServiceError> {
    let role = Role::from_i16(model.role)
        .with_context(|| format!("unknown role {} for user {}", model.role, model.id))?;
    Ok(User {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        password_hash: model.password_hash,
        role,
        verified: model.verified,
        verification: model.verification,
        phone: model.phone,
        city: model.city,
        country: model.country,
        login_attempts: model.login_attempts,
        block_expires_at: model.block_expires_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── UserAccess repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserAccessRepository {
    pub db: DatabaseConnection,
}

impl UserAccessRepository for DbUserAccessRepository {
    async fn create(&self, access: &UserAccess) -> Result<(), AuthServiceError> {
        user_access::ActiveModel {
            id: Set(access.id),
            email: Set(access.email.clone()),
            ip: Set(access.ip.clone()),
            browser: Set(access.browser.clone()),
            country: Set(access.country.clone()),
            created_at: Set(access.created_at),
        }
        .insert(&self.db)
        .await
        .context("create user access")?;
        Ok(())
    }
}

// ── ForgotPassword repository ────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbForgotPasswordRepository {
    pub db: DatabaseConnection,
}

impl ForgotPasswordRepository for DbForgotPasswordRepository {
    async fn create(&self, ticket: &ForgotPassword) -> Result<(), AuthServiceError> {
        forgot_passwords::ActiveModel {
            id: Set(ticket.id),
            email: Set(ticket.email.clone()),
            verification: Set(ticket.verification.clone()),
            used: Set(ticket.used),
            ip_request: Set(ticket.ip_request.clone()),
            browser_request: Set(ticket.browser_request.clone()),
            country_request: Set(ticket.country_request.clone()),
            ip_changed: Set(ticket.ip_changed.clone()),
            browser_changed: Set(ticket.browser_changed.clone()),
            country_changed: Set(ticket.country_changed.clone()),
            created_at: Set(ticket.created_at),
            updated_at: Set(ticket.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create forgot password ticket")?;
        Ok(())
    }

    async fn find_unused(
        &self,
        verification: &str,
    ) -> Result<Option<ForgotPassword>, AuthServiceError> {
        let model = forgot_passwords::Entity::find()
            .filter(forgot_passwords::Column::Verification.eq(verification))
            .filter(forgot_passwords::Column::Used.eq(false))
            .one(&self.db)
            .await
            .context("find unused forgot password ticket")?;
        Ok(model.map(ticket_from_model))
    }

    async fn consume(&self, id: Uuid, ctx: &RequestContext) -> Result<bool, AuthServiceError> {
        let result = forgot_passwords::Entity::update_many()
            .col_expr(forgot_passwords::Column::Used, Expr::value(true))
            .col_expr(forgot_passwords::Column::IpChanged, Expr::value(ctx.ip.clone()))
            .col_expr(
                forgot_passwords::Column::BrowserChanged,
                Expr::value(ctx.browser.clone()),
            )
            .col_expr(
                forgot_passwords::Column::CountryChanged,
                Expr::value(ctx.country.clone()),
            )
            .col_expr(forgot_passwords::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(forgot_passwords::Column::Id.eq(id))
            .filter(forgot_passwords::Column::Used.eq(false))
            .exec(&self.db)
            .await
            .context("consume forgot password ticket")?;
        Ok(result.rows_affected == 1)
    }

    async fn release(&self, id: Uuid) -> Result<(), AuthServiceError> {
        forgot_passwords::Entity::update_many()
            .col_expr(forgot_passwords::Column::Used, Expr::value(false))
            .col_expr(forgot_passwords::Column::IpChanged, Expr::value(Option::<String>::None))
            .col_expr(
                forgot_passwords::Column::BrowserChanged,
                Expr::value(Option::<String>::None),
            )
            .col_expr(
                forgot_passwords::Column::CountryChanged,
                Expr::value(Option::<String>::None),
            )
            .col_expr(forgot_passwords::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(forgot_passwords::Column::Id.eq(id))
            .filter(forgot_passwords::Column::Used.eq(true))
            .exec(&self.db)
            .await
            .context("release forgot password ticket")?;
        Ok(())
    }
}

fn ticket_from_model(model: forgot_passwords::Model) -> ForgotPassword {
    ForgotPassword {
        id: model.id,
        email: model.email,
        verification: model.verification,
        used: model.used,
        ip_request: model.ip_request,
        browser_request: model.browser_request,
        country_request: model.country_request,
        ip_changed: model.ip_changed,
        browser_changed: model.browser_changed,
        country_changed: model.country_changed,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
