//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `LEADERBOARD_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{DEFAULT_MAX_TOP_K, DEFAULT_PROFILES_TABLE, DEFAULT_SESSION_COOKIE};
use crate::store::RestConfig;
use crate::store::rest::DEFAULT_REQUEST_TIMEOUT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Score store backend selection.
pub enum StoreBackend {
    #[default]
    /// In-process store, optionally seeded from a JSON file.
    Memory,
    /// Hosted table behind a PostgREST API.
    Rest,
}

impl std::str::FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mem" | "local" => Ok(Self::Memory),
            "rest" | "postgrest" | "remote" => Ok(Self::Rest),
            _ => Err(ConfigError::UnknownStoreBackend {
                value: s.to_string(),
            }),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `LEADERBOARD_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Which score store to serve from. Default: [`StoreBackend::Memory`].
    pub store_backend: StoreBackend,

    /// JSON seed for the memory backend.
    pub seed_path: Option<PathBuf>,

    /// Hosted database project URL (rest backend).
    pub rest_url: Option<String>,

    /// Service-role key for the hosted database (rest backend).
    pub service_key: Option<String>,

    /// Table holding balances. Default: `profiles`.
    pub profiles_table: String,

    /// Cookie carrying the caller's access token. Default: `sb-access-token`.
    pub session_cookie: String,

    /// Upper bound for `num_users`. Default: `100`.
    pub max_top_k: usize,

    /// Timeout for hosted-database requests. Default: 5s.
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            store_backend: StoreBackend::Memory,
            seed_path: None,
            rest_url: None,
            service_key: None,
            profiles_table: DEFAULT_PROFILES_TABLE.to_string(),
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            max_top_k: DEFAULT_MAX_TOP_K,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "LEADERBOARD_PORT";
    const ENV_BIND_ADDR: &'static str = "LEADERBOARD_BIND_ADDR";
    const ENV_STORE: &'static str = "LEADERBOARD_STORE";
    const ENV_SEED_PATH: &'static str = "LEADERBOARD_SEED_PATH";
    const ENV_REST_URL: &'static str = "LEADERBOARD_REST_URL";
    const ENV_SERVICE_KEY: &'static str = "LEADERBOARD_SERVICE_KEY";
    const ENV_PROFILES_TABLE: &'static str = "LEADERBOARD_PROFILES_TABLE";
    const ENV_SESSION_COOKIE: &'static str = "LEADERBOARD_SESSION_COOKIE";
    const ENV_MAX_TOP_K: &'static str = "LEADERBOARD_MAX_TOP_K";
    const ENV_REQUEST_TIMEOUT_MS: &'static str = "LEADERBOARD_REQUEST_TIMEOUT_MS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let store_backend = match Self::parse_optional_string_from_env(Self::ENV_STORE) {
            Some(value) => value.parse()?,
            None => defaults.store_backend,
        };
        let seed_path = Self::parse_optional_string_from_env(Self::ENV_SEED_PATH).map(PathBuf::from);
        let rest_url = Self::parse_optional_string_from_env(Self::ENV_REST_URL);
        let service_key = Self::parse_optional_string_from_env(Self::ENV_SERVICE_KEY);
        let profiles_table =
            Self::parse_string_from_env(Self::ENV_PROFILES_TABLE, defaults.profiles_table);
        let session_cookie =
            Self::parse_string_from_env(Self::ENV_SESSION_COOKIE, defaults.session_cookie);
        let max_top_k = Self::parse_u64_from_env(Self::ENV_MAX_TOP_K, defaults.max_top_k as u64)
            as usize;
        let request_timeout = Duration::from_millis(Self::parse_u64_from_env(
            Self::ENV_REQUEST_TIMEOUT_MS,
            defaults.request_timeout.as_millis() as u64,
        ));

        Ok(Self {
            port,
            bind_addr,
            store_backend,
            seed_path,
            rest_url,
            service_key,
            profiles_table,
            session_cookie,
            max_top_k,
            request_timeout,
        })
    }

    /// Checks backend requirements and paths.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_top_k == 0 {
            return Err(ConfigError::InvalidMaxTopK {
                value: self.max_top_k,
            });
        }

        match self.store_backend {
            StoreBackend::Memory => {
                if let Some(ref path) = self.seed_path {
                    if !path.exists() {
                        return Err(ConfigError::PathNotFound { path: path.clone() });
                    }
                    if !path.is_file() {
                        return Err(ConfigError::NotAFile { path: path.clone() });
                    }
                }
            }
            StoreBackend::Rest => {
                if self.rest_url.is_none() {
                    return Err(ConfigError::MissingEnvVar {
                        name: Self::ENV_REST_URL,
                    });
                }
                if self.service_key.is_none() {
                    return Err(ConfigError::MissingEnvVar {
                        name: Self::ENV_SERVICE_KEY,
                    });
                }
            }
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        match self.bind_addr {
            IpAddr::V4(_) => format!("{}:{}", self.bind_addr, self.port),
            IpAddr::V6(_) => format!("[{}]:{}", self.bind_addr, self.port),
        }
    }

    /// Connection settings for the rest backend.
    pub fn rest_config(&self) -> Result<RestConfig, ConfigError> {
        let url = self.rest_url.as_ref().ok_or(ConfigError::MissingEnvVar {
            name: Self::ENV_REST_URL,
        })?;
        let key = self.service_key.as_ref().ok_or(ConfigError::MissingEnvVar {
            name: Self::ENV_SERVICE_KEY,
        })?;

        Ok(RestConfig::new(url.clone(), key.clone())
            .table(self.profiles_table.clone())
            .timeout(self.request_timeout))
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        Self::parse_optional_string_from_env(var_name).unwrap_or(default)
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
}
