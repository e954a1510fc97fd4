use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, net::SocketAddr, str::FromStr, time::Duration};
use tracing::{debug, warn};

const DEFAULT_RATES_URL: &str = "https://wise.com/rates/history+live";
const DEFAULT_CURRENCIES_URL: &str = "https://wise.com/gb/currency-converter/currencies";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct WiseProviderConfig {
    pub rates_url: String,
    pub currencies_url: String,
    /// Applies to rate-series and currency-list calls.
    pub timeout_secs: u64,
    /// Client-wide timeout for anything else.
    pub default_timeout_secs: u64,
}

impl Default for WiseProviderConfig {
    fn default() -> Self {
        WiseProviderConfig {
            rates_url: DEFAULT_RATES_URL.to_string(),
            currencies_url: DEFAULT_CURRENCIES_URL.to_string(),
            timeout_secs: 15,
            default_timeout_secs: 5,
        }
    }
}

impl WiseProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout_secs)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub wise: WiseProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    pub api_key: Option<String>,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub validate_membership: bool,
    #[serde(default = "default_request_log_capacity")]
    pub request_log_capacity: usize,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_request_log_capacity() -> usize {
    100
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            listen_addr: default_listen_addr(),
            api_key: None,
            providers: ProvidersConfig::default(),
            validate_membership: false,
            request_log_capacity: default_request_log_capacity(),
        }
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("Invalid value for {name}: '{value}'"))
}

impl AppConfig {
    /// Reads the optional YAML file, then applies `.env` and process environment overrides.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        dotenvy::dotenv().ok();
        let mut config = match config_path {
            Some(path) => Self::load_from_path(path)?,
            None => {
                debug!("No config file given, using defaults");
                Self::default()
            }
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;

        if config.api_key.is_none() {
            warn!("API_KEY is not set, every request will be rejected");
        }
        Ok(config)
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("API_KEY").filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup("FOREX_BASE_URL") {
            self.providers.wise.rates_url = url;
        }
        if let Some(url) = lookup("CURRENCIES_URL") {
            self.providers.wise.currencies_url = url;
        }
        if let Some(addr) = lookup("LISTEN_ADDR") {
            self.listen_addr = addr;
        }
        if let Some(secs) = lookup("UPSTREAM_TIMEOUT_SECS") {
            self.providers.wise.timeout_secs = parse_var("UPSTREAM_TIMEOUT_SECS", &secs)?;
        }
        if let Some(flag) = lookup("VALIDATE_MEMBERSHIP") {
            self.validate_membership = parse_var("VALIDATE_MEMBERSHIP", &flag)?;
        }
        if let Some(capacity) = lookup("REQUEST_LOG_CAPACITY") {
            self.request_log_capacity = parse_var("REQUEST_LOG_CAPACITY", &capacity)?;
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        parse_var("listen_addr", &self.listen_addr)
    }
}
