use std::fmt;
use std::time::Duration;

pub const FMP_BASE: &str = "https://financialmodelingprep.com/api/v3";
pub const DEFAULT_SYMBOL: &str = "AAPL";
pub const DEFAULT_PERIOD: &str = "annual";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Path the proxy backend serves filtered statements on.
pub const PROXY_PATH: &str = "/financial-data";

pub const ENV_API_KEY: &str = "FMP_API_KEY";
pub const ENV_BASE_URL: &str = "FMP_BASE_URL";
pub const ENV_BACKEND_URL: &str = "INCOME_BACKEND_URL";
pub const ENV_SYMBOL: &str = "INCOME_SYMBOL";
pub const ENV_PERIOD: &str = "INCOME_PERIOD";
pub const ENV_TIMEOUT_SECS: &str = "INCOME_TIMEOUT_SECS";

/// Externally injected settings for the data source.
///
/// The credential is never compiled in; it comes from the environment or
/// from the builder.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub backend_url: Option<String>,
    pub symbol: String,
    pub period: String,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: FMP_BASE.to_string(),
            backend_url: None,
            symbol: DEFAULT_SYMBOL.to_string(),
            period: DEFAULT_PERIOD.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    /// Read configuration from the process environment, falling back to
    /// defaults for anything unset or blank.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };
        let defaults = Self::default();

        let timeout = get(ENV_TIMEOUT_SECS)
            .and_then(|raw| raw.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Self {
            api_key: get(ENV_API_KEY),
            base_url: get(ENV_BASE_URL).unwrap_or(defaults.base_url),
            backend_url: get(ENV_BACKEND_URL),
            symbol: get(ENV_SYMBOL).unwrap_or(defaults.symbol),
            period: get(ENV_PERIOD).unwrap_or(defaults.period),
            timeout,
        }
    }

    /// True when a backend proxy is configured, i.e. filtering happens
    /// server side.
    pub fn uses_proxy(&self) -> bool {
        self.backend_url.is_some()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("backend_url", &self.backend_url)
            .field("symbol", &self.symbol)
            .field("period", &self.period)
            .field("timeout", &self.timeout)
            .finish()
    }
}
