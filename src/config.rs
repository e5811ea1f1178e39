use std::{env, net::SocketAddr, str::FromStr, time::Duration};

use crate::error::AppError;

/// Which [`TripService`](crate::service::TripService) the server runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceMode {
    #[default]
    Store,
    Fixed,
}

impl FromStr for ServiceMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "store" => Ok(ServiceMode::Store),
            "fixed" => Ok(ServiceMode::Fixed),
            other => Err(AppError::Config(format!(
                "invalid TRIP_SERVICE_MODE: {other} (expected store or fixed)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub listen_addr: SocketAddr,
    pub request_timeout: Duration,
    pub shutdown_timeout: Duration,
    pub service_mode: ServiceMode,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://trips.db?mode=rwc".to_string());

        let max_connections = lookup("DB_MAX_CONNECTIONS")
            .map(|raw| raw.parse::<u32>())
            .transpose()
            .map_err(|err| AppError::Config(format!("invalid DB_MAX_CONNECTIONS: {err}")))?
            .unwrap_or(10);

        let listen_addr: SocketAddr = lookup("APP_LISTEN_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        let request_timeout = seconds(&lookup, "REQUEST_TIMEOUT_SECS", 60)?;
        let shutdown_timeout = seconds(&lookup, "SHUTDOWN_TIMEOUT_SECS", 30)?;

        let service_mode = lookup("TRIP_SERVICE_MODE")
            .map(|raw| raw.parse())
            .transpose()?
            .unwrap_or_default();

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            database_url,
            max_connections,
            listen_addr,
            request_timeout,
            shutdown_timeout,
            service_mode,
            log_format,
        })
    }
}

fn seconds(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u64,
) -> Result<Duration, AppError> {
    let secs = lookup(key)
        .map(|raw| raw.parse::<u64>())
        .transpose()
        .map_err(|err| AppError::Config(format!("invalid {key}: {err}")))?
        .unwrap_or(default);
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.database_url, "sqlite://trips.db?mode=rwc");
        assert_eq!(cfg.max_connections, 10);
        assert_eq!(cfg.listen_addr.port(), 8080);
        assert_eq!(cfg.request_timeout, Duration::from_secs(60));
        assert_eq!(cfg.shutdown_timeout, Duration::from_secs(30));
        assert_eq!(cfg.service_mode, ServiceMode::Store);
        assert_eq!(cfg.log_format, LogFormat::Pretty);
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = config(&[
            ("APP_LISTEN_ADDR", "0.0.0.0:9000"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("SHUTDOWN_TIMEOUT_SECS", "2"),
            ("TRIP_SERVICE_MODE", "Fixed"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();
        assert_eq!(cfg.listen_addr.port(), 9000);
        assert_eq!(cfg.request_timeout, Duration::from_secs(5));
        assert_eq!(cfg.shutdown_timeout, Duration::from_secs(2));
        assert_eq!(cfg.service_mode, ServiceMode::Fixed);
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn bad_values_name_the_variable() {
        let err = config(&[("APP_LISTEN_ADDR", "nowhere")]).unwrap_err();
        assert!(err.to_string().contains("APP_LISTEN_ADDR"));

        let err = config(&[("SHUTDOWN_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("SHUTDOWN_TIMEOUT_SECS"));

        let err = config(&[("TRIP_SERVICE_MODE", "mock")]).unwrap_err();
        assert!(err.to_string().contains("TRIP_SERVICE_MODE"));
    }
}
