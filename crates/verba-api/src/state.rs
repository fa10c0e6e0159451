use axum::extract::FromRef;
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;

use crate::config::{ApiConfig, Environment};

/// Everything the auth layer needs, split out so extractors can pull it via
/// `FromRef` without dragging the whole state along.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub refresh_token_expiry_days: i64,
    pub bcrypt_cost: u32,
}

#[derive(Clone)]
pub struct ApiState {
    pub pool: PgPool,
    pub auth: AuthConfig,
    pub environment: Environment,
    pub random_word_url: String,
    pub http_client: reqwest::Client,
    /// Set once the Prometheus recorder is installed; `None` in tests.
    pub metrics: Option<PrometheusHandle>,
}

impl ApiState {
    pub fn new(config: &ApiConfig, pool: PgPool) -> Self {
        Self {
            pool,
            auth: AuthConfig {
                jwt_secret: config.jwt_secret.clone(),
                jwt_expiry_hours: config.jwt_expiry_hours,
                refresh_token_expiry_days: config.refresh_token_expiry_days,
                bcrypt_cost: config.bcrypt_cost,
            },
            environment: config.environment,
            random_word_url: config.random_word_url.clone(),
            http_client: reqwest::Client::new(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl FromRef<ApiState> for AuthConfig {
    fn from_ref(state: &ApiState) -> Self {
        state.auth.clone()
    }
}
