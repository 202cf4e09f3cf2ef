use secrecy::{ExposeSecret, Secret};
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

pub const DEFAULT_DATABASE: &str = "clientsdb";
pub const DEFAULT_COLLECTION: &str = "clients";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone)]
pub struct ClientsConfig {
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: Secret<String>,
    pub database: String,
    pub collection: String,
    /// Upper bound for connecting and the first ping, together.
    pub connect_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    /// OTLP collector; span export is off when unset.
    pub otlp_endpoint: Option<String>,
    /// Port for the Prometheus scrape listener; off when unset.
    pub metrics_port: Option<u16>,
}

impl ClientsConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Self::from_lookup(common, |key| env::var(key).ok())
    }

    /// Resolve settings through `lookup` instead of the process environment.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(ClientsConfig {
            common,
            mongodb: MongoConfig::from_lookup(&lookup)?,
            telemetry: TelemetryConfig::from_lookup(&lookup)?,
        })
    }
}

impl MongoConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let uri = non_empty(lookup, "MONGO_URI").ok_or_else(|| {
            AppError::ConfigError(anyhow::anyhow!("MONGO_URI not set"))
        })?;

        let connect_timeout_secs = match non_empty(lookup, "MONGO_CONNECT_TIMEOUT_SECS") {
            Some(raw) => parse_var::<u64>("MONGO_CONNECT_TIMEOUT_SECS", &raw)?,
            None => DEFAULT_CONNECT_TIMEOUT_SECS,
        };
        if connect_timeout_secs == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "MONGO_CONNECT_TIMEOUT_SECS must be greater than zero"
            )));
        }

        Ok(MongoConfig {
            uri: Secret::new(uri),
            database: non_empty(lookup, "MONGO_DATABASE")
                .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            collection: non_empty(lookup, "MONGO_COLLECTION")
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
        })
    }

    /// The connection string with any `user:password@` section masked, for logs.
    pub fn redacted_uri(&self) -> String {
        let uri = self.uri.expose_secret();
        let Some(scheme_end) = uri.find("://").map(|i| i + 3) else {
            return uri.clone();
        };
        let authority_end = uri[scheme_end..]
            .find(['/', '?'])
            .map(|i| scheme_end + i)
            .unwrap_or(uri.len());

        match uri[scheme_end..authority_end].rfind('@') {
            Some(at) => format!(
                "{}***@{}",
                &uri[..scheme_end],
                &uri[scheme_end + at + 1..]
            ),
            None => uri.clone(),
        }
    }
}

impl TelemetryConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let metrics_port = non_empty(lookup, "METRICS_PORT")
            .map(|raw| parse_var::<u16>("METRICS_PORT", &raw))
            .transpose()?;

        Ok(TelemetryConfig {
            log_level: non_empty(lookup, "LOG_LEVEL")
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            otlp_endpoint: non_empty(lookup, "OTLP_ENDPOINT"),
            metrics_port,
        })
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!("{} has invalid value '{}': {}", key, raw, e))
    })
}
