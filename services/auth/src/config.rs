use chrono::Duration;
use serde::Deserialize;

use quizz_auth_types::codec::TokenCodec;
use quizz_core::config::{Config, Environment};

use crate::domain::throttle::ThrottlePolicy;
use crate::infra::mailer::{AppMailer, MailSettings, MailgunMailer};
use crate::usecase::token::TokenService;

/// Auth service configuration loaded from environment variables.
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// Secret for signing tokens and deriving the token codec key.
    pub jwt_secret: String,
    /// Access token lifetime. Env var: `JWT_EXPIRATION_IN_MINUTES`.
    #[serde(default = "default_jwt_expiration_in_minutes")]
    pub jwt_expiration_in_minutes: u64,
    /// Failed logins tolerated before blocking. Env var: `LOGIN_ATTEMPTS`.
    #[serde(default = "default_login_attempts")]
    pub login_attempts: i32,
    /// Block window length. Env var: `HOURS_TO_BLOCK`.
    #[serde(default = "default_hours_to_block")]
    pub hours_to_block: i64,
    /// Env var: `APP_ENV` (`production`, `development` or `test`).
    #[serde(default)]
    pub app_env: Environment,
    /// TCP port to listen on (default 3000). Env var: `AUTH_PORT`.
    #[serde(default = "default_auth_port")]
    pub auth_port: u16,
    /// Base URL used for links in outgoing mail.
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
    #[serde(default = "default_email_from_name")]
    pub email_from_name: String,
    #[serde(default = "default_email_from_address")]
    pub email_from_address: String,
    /// Mailgun credentials; mail goes out over Mailgun only in production
    /// when both are set.
    pub mailgun_api_key: Option<String>,
    pub mailgun_domain: Option<String>,
}

impl Config for AuthConfig {}

// Secrets and the connection URL (which may carry a password) stay out of logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_expiration_in_minutes", &self.jwt_expiration_in_minutes)
            .field("login_attempts", &self.login_attempts)
            .field("hours_to_block", &self.hours_to_block)
            .field("app_env", &self.app_env)
            .field("auth_port", &self.auth_port)
            .field("frontend_url", &self.frontend_url)
            .field("email_from_name", &self.email_from_name)
            .field("email_from_address", &self.email_from_address)
            .field("mailgun_domain", &self.mailgun_domain)
            .finish_non_exhaustive()
    }
}

impl AuthConfig {
    pub fn throttle_policy(&self) -> ThrottlePolicy {
        ThrottlePolicy {
            max_attempts: self.login_attempts,
            block_duration: Duration::hours(self.hours_to_block),
        }
    }

    pub fn token_ttl_secs(&self) -> u64 {
        self.jwt_expiration_in_minutes * 60
    }

    pub fn token_service(&self, codec: TokenCodec) -> TokenService {
        TokenService {
            codec,
            jwt_secret: self.jwt_secret.clone(),
            ttl_secs: self.token_ttl_secs(),
            env: self.app_env,
        }
    }

    /// Mailgun in production, log-only in development, nothing under test.
    pub fn mailer(&self) -> AppMailer {
        let settings = MailSettings {
            from: format!("{} <{}>", self.email_from_name, self.email_from_address),
            frontend_url: self.frontend_url.clone(),
        };
        match (self.app_env, &self.mailgun_api_key, &self.mailgun_domain) {
            (Environment::Production, Some(api_key), Some(domain)) => {
                AppMailer::Mailgun(MailgunMailer {
                    client: reqwest::Client::new(),
                    api_key: api_key.clone(),
                    domain: domain.clone(),
                    settings,
                })
            }
            (Environment::Production, _, _) => {
                tracing::warn!("mailgun is not configured, outgoing mail will only be logged");
                AppMailer::Log(settings)
            }
            (Environment::Development, _, _) => AppMailer::Log(settings),
            (Environment::Test, _, _) => AppMailer::Disabled,
        }
    }
}

fn default_jwt_expiration_in_minutes() -> u64 {
    4320
}

fn default_login_attempts() -> i32 {
    5
}

fn default_hours_to_block() -> i64 {
    2
}

fn default_auth_port() -> u16 {
    3000
}

fn default_frontend_url() -> String {
    "http://localhost:4200".to_owned()
}

fn default_email_from_name() -> String {
    "Quizz".to_owned()
}

fn default_email_from_address() -> String {
    "no-reply@localhost".to_owned()
}
