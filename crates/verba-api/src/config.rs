use anyhow::Context;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Runtime environment, switches the logging format and strict transport headers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub const fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }

    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Server configuration, read from `VERBA_`-prefixed environment variables.
///
/// Only `VERBA_DATABASE_URL` and `VERBA_JWT_SECRET` are required; everything
/// else has a default. A `.env` file is honored when present (loaded by the
/// binary before this runs).
#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    pub database_url: String,
    pub jwt_secret: String,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default = "default_http_addr")]
    pub http_addr: String,
    #[serde(default = "default_jwt_expiry_hours")]
    pub jwt_expiry_hours: i64,
    #[serde(default = "default_refresh_token_expiry_days")]
    pub refresh_token_expiry_days: i64,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
    #[serde(default = "default_database_max_connections")]
    pub database_max_connections: u32,
    #[serde(default = "default_random_word_url")]
    pub random_word_url: String,
    /// Comma-separated list of allowed CORS origins.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

fn default_http_addr() -> String {
    "0.0.0.0:3300".to_string()
}

const fn default_jwt_expiry_hours() -> i64 {
    24
}

const fn default_refresh_token_expiry_days() -> i64 {
    30
}

const fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

const fn default_shutdown_timeout_secs() -> u64 {
    5
}

const fn default_database_max_connections() -> u32 {
    10
}

fn default_random_word_url() -> String {
    "https://random-words-api.vercel.app/word".to_string()
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let config: Self = envy::prefixed("VERBA_")
            .from_env()
            .context("failed to read configuration from environment")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.jwt_secret.len() >= 32,
            "VERBA_JWT_SECRET must be at least 32 bytes"
        );
        anyhow::ensure!(
            (4..=31).contains(&self.bcrypt_cost),
            "VERBA_BCRYPT_COST must be between 4 and 31"
        );
        anyhow::ensure!(
            self.jwt_expiry_hours > 0,
            "VERBA_JWT_EXPIRY_HOURS must be positive"
        );
        anyhow::ensure!(
            self.refresh_token_expiry_days > 0,
            "VERBA_REFRESH_TOKEN_EXPIRY_DAYS must be positive"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> ApiConfig {
        ApiConfig {
            database_url: "postgres://localhost/verba".to_string(),
            jwt_secret: "test_jwt_secret_minimum_32_characters_long".to_string(),
            environment: Environment::Development,
            http_addr: default_http_addr(),
            jwt_expiry_hours: default_jwt_expiry_hours(),
            refresh_token_expiry_days: default_refresh_token_expiry_days(),
            bcrypt_cost: default_bcrypt_cost(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
            database_max_connections: default_database_max_connections(),
            random_word_url: default_random_word_url(),
            allowed_origins: vec![],
        }
    }

    #[test]
    fn test_environment_from_str() {
        assert_eq!(
            "development".parse::<Environment>(),
            Ok(Environment::Development)
        );
        assert_eq!("dev".parse::<Environment>(), Ok(Environment::Development));
        assert_eq!(
            "production".parse::<Environment>(),
            Ok(Environment::Production)
        );
        assert_eq!("PROD".parse::<Environment>(), Ok(Environment::Production));
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_environment_predicates() {
        assert!(Environment::Development.is_development());
        assert!(!Environment::Development.is_production());
        assert!(Environment::Production.is_production());
    }

    #[test]
    fn test_valid_config_passes_validation() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        let config = ApiConfig {
            jwt_secret: "too-short".to_string(),
            ..base_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bcrypt_cost_bounds() {
        let config = ApiConfig {
            bcrypt_cost: 3,
            ..base_config()
        };
        assert!(config.validate().is_err());

        let config = ApiConfig {
            bcrypt_cost: 32,
            ..base_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = base_config();
        assert_eq!(config.http_addr, "0.0.0.0:3300");
        assert_eq!(config.jwt_expiry_hours, 24);
        assert_eq!(config.shutdown_timeout_secs, 5);
    }
}
