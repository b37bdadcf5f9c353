use core_config::{ConfigError, Environment, FromEnv, env_optional, server::ServerConfig};

/// Credentials for the admin record created at startup.
///
/// A fresh in-memory store has no admin, which would leave the admin-only
/// operations unreachable. Both variables must be set together.
#[derive(Clone, Debug)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: Environment,
    pub server: ServerConfig,
    pub admin_bootstrap: Option<AdminBootstrap>,
}

impl FromEnv for Config {
    /// - `APP_ENV`: "development" (default) or "production"
    /// - `HOST` / `PORT`: bind address, defaults 0.0.0.0:8080
    /// - `ADMIN_EMAIL` / `ADMIN_PASSWORD`: optional bootstrap admin
    fn from_env() -> Result<Self, ConfigError> {
        let admin_bootstrap = match (env_optional("ADMIN_EMAIL"), env_optional("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminBootstrap { email, password }),
            (Some(_), None) => {
                return Err(ConfigError::MissingEnvVar("ADMIN_PASSWORD".to_string()));
            }
            (None, Some(_)) => {
                return Err(ConfigError::MissingEnvVar("ADMIN_EMAIL".to_string()));
            }
            (None, None) => None,
        };

        Ok(Self {
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?,
            admin_bootstrap,
        })
    }
}
