use crate::error::MonitorError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Binance Alpha token list endpoint.
pub const DEFAULT_ENDPOINT: &str =
    "https://www.binance.com/bapi/defi/v1/public/wallet-direct/buw/wallet/cex/alpha/all/token/list";

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

pub const DEFAULT_RETENTION: Duration = Duration::from_secs(48 * 60 * 60);

/// Longest accepted refresh interval.
pub const MAX_REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Longest accepted retention window, in hours.
pub const MAX_RETENTION_HOURS: u64 = 365 * 24;

/// Refresh intervals offered to the user.
pub const REFRESH_INTERVAL_PRESETS: [Duration; 4] = [
    Duration::from_secs(60),
    Duration::from_secs(5 * 60),
    Duration::from_secs(10 * 60),
    Duration::from_secs(30 * 60),
];

const ENV_API_URL: &str = "ALPHA_API_URL";
const ENV_REFRESH_INTERVAL_SECS: &str = "REFRESH_INTERVAL_SECS";
const ENV_HISTORY_RETENTION_HOURS: &str = "HISTORY_RETENTION_HOURS";
const ENV_HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";

/// Startup configuration of the monitor.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub struct MonitorConfig {
    pub endpoint: Url,
    pub refresh_interval: Duration,
    pub retention: Duration,
    /// `None` leaves the fetch without a timeout.
    pub request_timeout: Option<Duration>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            retention: DEFAULT_RETENTION,
            request_timeout: None,
        }
    }
}

impl MonitorConfig {
    pub fn with_endpoint(self, endpoint: Url) -> Self {
        Self { endpoint, ..self }
    }

    pub fn with_refresh_interval(self, refresh_interval: Duration) -> Self {
        Self {
            refresh_interval,
            ..self
        }
    }

    pub fn with_retention(self, retention: Duration) -> Self {
        Self { retention, ..self }
    }

    pub fn with_request_timeout(self, request_timeout: Duration) -> Self {
        Self {
            request_timeout: Some(request_timeout),
            ..self
        }
    }

    /// Construct a [`MonitorConfig`] from the process environment, falling back to defaults for
    /// unset variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `ALPHA_API_URL` | [`DEFAULT_ENDPOINT`] |
    /// | `REFRESH_INTERVAL_SECS` | 300 |
    /// | `HISTORY_RETENTION_HOURS` | 48 |
    /// | `HTTP_TIMEOUT_SECS` | unset |
    pub fn from_env() -> Result<Self, MonitorError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, MonitorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_API_URL) {
            config.endpoint = Url::parse(raw.trim()).map_err(|error| {
                MonitorError::Config(format!("{ENV_API_URL} is not a valid url: {error}"))
            })?;
        }

        if let Some(secs) = parse_positive(
            &lookup,
            ENV_REFRESH_INTERVAL_SECS,
            MAX_REFRESH_INTERVAL.as_secs(),
        )? {
            config.refresh_interval = Duration::from_secs(secs);
        }

        if let Some(hours) =
            parse_positive(&lookup, ENV_HISTORY_RETENTION_HOURS, MAX_RETENTION_HOURS)?
        {
            let secs = hours.checked_mul(60 * 60).ok_or_else(|| {
                MonitorError::Config(format!("{ENV_HISTORY_RETENTION_HOURS} is out of range"))
            })?;
            config.retention = Duration::from_secs(secs);
        }

        config.request_timeout =
            parse_positive(&lookup, ENV_HTTP_TIMEOUT_SECS, u64::MAX)?.map(Duration::from_secs);

        Ok(config)
    }
}

fn default_endpoint() -> Url {
    match Url::parse(DEFAULT_ENDPOINT) {
        Ok(url) => url,
        Err(error) => unreachable!("DEFAULT_ENDPOINT is a valid url: {error}"),
    }
}

/// Parse `key` as a whole number in `1..=max`.
fn parse_positive<F>(lookup: &F, key: &str, max: u64) -> Result<Option<u64>, MonitorError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };

    match raw.trim().parse::<u64>() {
        Ok(0) => Err(MonitorError::Config(format!("{key} must be greater than zero"))),
        Ok(value) if value > max => Err(MonitorError::Config(format!(
            "{key} must be at most {max}, got {value}"
        ))),
        Ok(value) => Ok(Some(value)),
        Err(_) => Err(MonitorError::Config(format!(
            "{key} must be a whole number, got {raw:?}"
        ))),
    }
}
