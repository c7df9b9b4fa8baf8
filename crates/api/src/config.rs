//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use stockroom_infra::InventoryScope;
use stockroom_observability::LogFormat;

pub const ENV_BIND_ADDR: &str = "STOCKROOM_BIND_ADDR";
pub const ENV_SCOPE: &str = "STOCKROOM_SCOPE";
pub const ENV_SESSION_IDLE_SECS: &str = "STOCKROOM_SESSION_IDLE_SECS";
pub const ENV_SWEEP_INTERVAL_SECS: &str = "STOCKROOM_SWEEP_INTERVAL_SECS";
pub const ENV_CURRENCY: &str = "STOCKROOM_CURRENCY";
pub const ENV_LOG_FORMAT: &str = "STOCKROOM_LOG_FORMAT";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}='{value}' is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            var,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub scope: InventoryScope,
    pub session_idle: Duration,
    pub sweep_interval: Duration,
    pub currency: String,
    pub log_format: LogFormat,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            scope: InventoryScope::Session,
            session_idle: Duration::from_secs(30 * 60),
            sweep_interval: Duration::from_secs(60),
            currency: "PLN".to_string(),
            log_format: LogFormat::Json,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source. Unset or blank variables keep their
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut cfg = Self::default();

        if let Some(v) = get(ENV_BIND_ADDR) {
            cfg.bind_addr = v
                .trim()
                .parse()
                .map_err(|e| ConfigError::invalid(ENV_BIND_ADDR, &v, format!("{e}")))?;
        }

        if let Some(v) = get(ENV_SCOPE) {
            cfg.scope = v
                .parse()
                .map_err(|e| ConfigError::invalid(ENV_SCOPE, &v, format!("{e}")))?;
        }

        if let Some(v) = get(ENV_SESSION_IDLE_SECS) {
            cfg.session_idle = positive_secs(ENV_SESSION_IDLE_SECS, &v)?;
        }

        if let Some(v) = get(ENV_SWEEP_INTERVAL_SECS) {
            cfg.sweep_interval = positive_secs(ENV_SWEEP_INTERVAL_SECS, &v)?;
        }

        if let Some(v) = get(ENV_CURRENCY) {
            cfg.currency = v.trim().to_string();
        }

        if let Some(v) = get(ENV_LOG_FORMAT) {
            cfg.log_format = v
                .parse()
                .map_err(|e: String| ConfigError::invalid(ENV_LOG_FORMAT, &v, e))?;
        }

        Ok(cfg)
    }
}

fn positive_secs(var: &'static str, value: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = value
        .trim()
        .parse()
        .map_err(|e| ConfigError::invalid(var, value, format!("{e}")))?;
    if secs == 0 {
        return Err(ConfigError::invalid(var, value, "must be greater than 0"));
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        assert_eq!(from_pairs(&[]).unwrap(), ApiConfig::default());
        assert_eq!(from_pairs(&[(ENV_SCOPE, "  ")]).unwrap(), ApiConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let cfg = from_pairs(&[
            (ENV_BIND_ADDR, "127.0.0.1:9000"),
            (ENV_SCOPE, "shared"),
            (ENV_SESSION_IDLE_SECS, "90"),
            (ENV_SWEEP_INTERVAL_SECS, "5"),
            (ENV_CURRENCY, "EUR"),
            (ENV_LOG_FORMAT, "pretty"),
        ])
        .unwrap();

        assert_eq!(cfg.bind_addr, SocketAddr::from(([127, 0, 0, 1], 9000)));
        assert_eq!(cfg.scope, InventoryScope::Shared);
        assert_eq!(cfg.session_idle, Duration::from_secs(90));
        assert_eq!(cfg.sweep_interval, Duration::from_secs(5));
        assert_eq!(cfg.currency, "EUR");
        assert_eq!(cfg.log_format, LogFormat::Pretty);
    }

    #[test]
    fn rejects_invalid_values() {
        let err = from_pairs(&[(ENV_SCOPE, "global")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: ENV_SCOPE, .. }));

        let err = from_pairs(&[(ENV_SESSION_IDLE_SECS, "0")]).unwrap_err();
        assert!(err.to_string().contains("must be greater than 0"));

        assert!(from_pairs(&[(ENV_SWEEP_INTERVAL_SECS, "-3")]).is_err());
        assert!(from_pairs(&[(ENV_BIND_ADDR, "nowhere")]).is_err());
        assert!(from_pairs(&[(ENV_LOG_FORMAT, "xml")]).is_err());
    }
}
