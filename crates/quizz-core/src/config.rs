use serde::Deserialize;

/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize`; field names map to upper-cased
/// env vars (`jwt_secret` reads `JWT_SECRET`). A `.env` file in the working
/// directory is loaded first when present.
///
/// # Panics
///
/// Panics if any required env var is missing or cannot be deserialized.
pub trait Config: Sized + serde::de::DeserializeOwned {
    fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        envy::from_env().expect("failed to load config from environment")
    }
}

/// Deployment label read from `APP_ENV`.
///
/// Debug aids (echoing verification tokens, logging outgoing mail) are only
/// enabled outside [`Environment::Production`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    #[default]
    Development,
    Test,
}

impl Environment {
    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}
