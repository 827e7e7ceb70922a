/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, OPA_URL, OPA_PATH など)
 * - 設定値のバリデーション (不正なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderName;

use crate::services::policy::authorizer::DEFAULT_REASON_KEY;
use crate::services::policy::opa::{DEFAULT_OPA_URL, OPA_URL_ENV};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub opa_url: String,
    // None => engine default decision
    pub opa_path: Option<String>,
    pub opa_reason_key: String,
    pub opa_timeout: Duration,
    // Injected as input.context.data for every request when set.
    pub opa_context_data: Option<serde_json::Value>,

    pub identity_header: HeaderName,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup (the process env in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port: u16 = match non_empty("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = lookup("APP_ENV")
            .map(|v| AppEnv::parse(&v))
            .unwrap_or(AppEnv::Development);

        let opa_url = non_empty(OPA_URL_ENV).unwrap_or_else(|| DEFAULT_OPA_URL.to_string());

        let opa_path = non_empty("OPA_PATH").map(|p| p.trim().to_string());

        let opa_reason_key =
            non_empty("OPA_REASON_KEY").unwrap_or_else(|| DEFAULT_REASON_KEY.to_string());

        let opa_timeout = non_empty("OPA_TIMEOUT_SECONDS")
            .map(|v| v.parse::<u64>().map_err(|_| ConfigError::Invalid("OPA_TIMEOUT_SECONDS")))
            .transpose()?
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(5));

        let opa_context_data = non_empty("OPA_CONTEXT_DATA")
            .map(|v| {
                serde_json::from_str::<serde_json::Value>(&v)
                    .map_err(|_| ConfigError::Invalid("OPA_CONTEXT_DATA"))
            })
            .transpose()?;

        let identity_header = non_empty("IDENTITY_HEADER")
            .unwrap_or_else(|| "x-forwarded-user".to_string());
        let identity_header = HeaderName::from_str(identity_header.trim())
            .map_err(|_| ConfigError::Invalid("IDENTITY_HEADER"))?;

        let request_timeout = non_empty("REQUEST_TIMEOUT_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        Ok(Self {
            addr,
            app_env,
            opa_url,
            opa_path,
            opa_reason_key,
            opa_timeout,
            opa_context_data,
            identity_header,
            request_timeout,
        })
    }
}
