//! Environment-based configuration.
//!
//! Every setting has a default. A variable that is set but cannot be parsed
//! is reported as an error rather than silently replaced by the default.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use nse_client::{BrowserHeaders, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, NseEndpoints};

use crate::api::ApiServerConfig;
use crate::error::{Error, Result};
use crate::poller::PollerConfig;

/// Outbound HTTP settings.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Whole-request timeout, applied to every outbound call.
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub endpoints: NseEndpoints,
    pub headers: BrowserHeaders,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            endpoints: NseEndpoints::default(),
            headers: BrowserHeaders::default(),
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub poller: PollerConfig,
    pub http: HttpConfig,
    pub api: ApiServerConfig,
    /// Directory for rolling log files. Console only when `None`.
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// Environment variables:
    /// - `POLL_INTERVAL_SECS`: seconds between cycle starts (default: 60)
    /// - `CREDENTIAL_MAX_AGE_SECS`: cookie lifetime before renewal (default: 600)
    /// - `REQUEST_TIMEOUT_SECS`: per-request timeout (default: 10)
    /// - `CONNECT_TIMEOUT_SECS`: TCP/TLS connect timeout (default: 5)
    /// - `NSE_ORIGIN_URL`, `NSE_LANDING_URL`, `NSE_API_URL`: remote endpoints
    /// - `NSE_USER_AGENT`, `NSE_ACCEPT_LANGUAGE`: browser headers
    /// - `API_BIND_ADDRESS` (default: 0.0.0.0), `API_PORT` (default: 8000)
    /// - `LOG_DIR`: enables file logging when set
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();

        if let Some(secs) = parse_var::<u64>("POLL_INTERVAL_SECS", var("POLL_INTERVAL_SECS"))? {
            config.poller.poll_interval = Duration::from_secs(secs);
        }
        if let Some(secs) =
            parse_var::<u64>("CREDENTIAL_MAX_AGE_SECS", var("CREDENTIAL_MAX_AGE_SECS"))?
        {
            config.poller.credential_max_age = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64>("REQUEST_TIMEOUT_SECS", var("REQUEST_TIMEOUT_SECS"))? {
            config.http.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64>("CONNECT_TIMEOUT_SECS", var("CONNECT_TIMEOUT_SECS"))? {
            config.http.connect_timeout = Duration::from_secs(secs);
        }

        if let Some(url) = var("NSE_ORIGIN_URL") {
            config.http.endpoints.origin_url = url;
        }
        if let Some(url) = var("NSE_LANDING_URL") {
            config.http.endpoints.landing_url = url;
        }
        if let Some(url) = var("NSE_API_URL") {
            config.http.endpoints.api_url = url;
        }
        if let Some(ua) = var("NSE_USER_AGENT") {
            config.http.headers.user_agent = ua;
        }
        if let Some(lang) = var("NSE_ACCEPT_LANGUAGE") {
            config.http.headers.accept_language = lang;
        }

        if let Some(bind_address) = var("API_BIND_ADDRESS") {
            config.api.bind_address = bind_address;
        }
        if let Some(port) = parse_var::<u16>("API_PORT", var("API_PORT"))? {
            config.api.port = port;
        }

        config.log_dir = var("LOG_DIR").map(PathBuf::from);

        config.validate()?;
        Ok(config)
    }

    /// Reject values the service cannot run with.
    pub fn validate(&self) -> Result<()> {
        let non_zero = [
            ("POLL_INTERVAL_SECS", self.poller.poll_interval),
            ("CREDENTIAL_MAX_AGE_SECS", self.poller.credential_max_age),
            ("REQUEST_TIMEOUT_SECS", self.http.request_timeout),
            ("CONNECT_TIMEOUT_SECS", self.http.connect_timeout),
        ];
        for (name, value) in non_zero {
            if value.is_zero() {
                return Err(Error::config(format!("{name} must be greater than zero")));
            }
        }

        self.http.endpoints.validate().map_err(Error::config)?;
        Ok(())
    }
}

fn parse_var<T>(name: &str, value: Option<String>) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| Error::config(format!("Invalid {name} '{raw}': {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: FxHashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.poller.poll_interval, Duration::from_secs(60));
        assert_eq!(config.poller.credential_max_age, Duration::from_secs(600));
        assert_eq!(config.http.request_timeout, Duration::from_secs(10));
        assert_eq!(config.http.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.api.port, 8000);
        assert_eq!(config.api.bind_address, "0.0.0.0");
        assert_eq!(config.http.endpoints, NseEndpoints::default());
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("POLL_INTERVAL_SECS", "30"),
            ("CREDENTIAL_MAX_AGE_SECS", " 120 "),
            ("API_PORT", "9000"),
            ("NSE_API_URL", "http://127.0.0.1:9999/api/option-chain-indices?symbol=BANKNIFTY"),
            ("NSE_USER_AGENT", "test-agent"),
            ("LOG_DIR", "/var/log/oi"),
        ])
        .unwrap();

        assert_eq!(config.poller.poll_interval, Duration::from_secs(30));
        assert_eq!(config.poller.credential_max_age, Duration::from_secs(120));
        assert_eq!(config.api.port, 9000);
        assert!(config.http.endpoints.api_url.ends_with("BANKNIFTY"));
        assert_eq!(config.http.headers.user_agent, "test-agent");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/oi")));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = load(&[("POLL_INTERVAL_SECS", "  "), ("API_BIND_ADDRESS", "")]).unwrap();
        assert_eq!(config.poller.poll_interval, Duration::from_secs(60));
        assert_eq!(config.api.bind_address, "0.0.0.0");
    }

    #[test]
    fn test_unparsable_number_is_rejected() {
        let err = load(&[("POLL_INTERVAL_SECS", "sixty")]).unwrap_err();
        assert!(matches!(err, Error::Configuration(ref msg) if msg.contains("POLL_INTERVAL_SECS")));

        let err = load(&[("API_PORT", "70000")]).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_zero_durations_are_rejected() {
        for key in [
            "POLL_INTERVAL_SECS",
            "CREDENTIAL_MAX_AGE_SECS",
            "REQUEST_TIMEOUT_SECS",
            "CONNECT_TIMEOUT_SECS",
        ] {
            let err = load(&[(key, "0")]).unwrap_err();
            assert!(
                matches!(err, Error::Configuration(ref msg) if msg.contains(key)),
                "{key}"
            );
        }
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let err = load(&[("NSE_ORIGIN_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
