use sea_orm::DatabaseConnection;

use crate::domain::throttle::ThrottlePolicy;
use crate::infra::db::{DbForgotPasswordRepository, DbUserAccessRepository, DbUserRepository};
use crate::infra::mailer::AppMailer;
use crate::usecase::token::TokenService;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub tokens: TokenService,
    pub policy: ThrottlePolicy,
    pub mailer: AppMailer,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn user_access_repo(&self) -> DbUserAccessRepository {
        DbUserAccessRepository {
            db: self.db.clone(),
        }
    }

    pub fn forgot_password_repo(&self) -> DbForgotPasswordRepository {
        DbForgotPasswordRepository {
            db: self.db.clone(),
        }
    }
}
