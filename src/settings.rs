use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr, time::Duration};

use crate::entities::resource::InvalidationPolicy;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    /// Base URL of the remote REST API, e.g. `https://api.example.com/api/v1`.
    #[serde(default)]
    pub base_api: String,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    /// How long a tagged read stays cached. `None` keeps it until its tag is invalidated.
    #[serde(default)]
    pub cache_ttl: Option<String>,

    #[serde(default = "default_purge_interval")]
    pub cache_purge_interval: String,

    #[serde(default)]
    pub invalidation: InvalidationPolicy,

    #[serde(default = "default_auth_cookie")]
    pub auth_cookie: String,

    /// Prefix for the outgoing `Authorization` header. The raw token is sent when unset.
    #[serde(default)]
    pub auth_scheme: Option<String>,

    #[serde(default)]
    pub jwt_secret: Option<String>,

    #[serde(default = "default_login_path")]
    pub login_path: String,

    #[serde(default = "default_contacts_fetch_limit")]
    pub contacts_fetch_limit: u32,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio-Dashboard".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_purge_interval() -> String {
    "1m".to_string()
}
fn default_auth_cookie() -> String {
    "accessToken".to_string()
}
fn default_login_path() -> String {
    "/login".to_string()
}
fn default_contacts_fetch_limit() -> u32 {
    100
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .try_parsing(true)
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;
        config.base_api = fill_or_env(config.base_api, "BASE_API")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        match url::Url::parse(&self.base_api) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            Ok(_) => errors.push("BASE_API must use http or https".to_string()),
            Err(_) => errors.push("BASE_API must be a valid URL".to_string()),
        }
        if let Some(ttl) = &self.cache_ttl {
            if let Err(e) = humantime::parse_duration(ttl) {
                errors.push(format!("CACHE_TTL is not a duration: {e}"));
            }
        }
        if let Err(e) = humantime::parse_duration(&self.cache_purge_interval) {
            errors.push(format!("CACHE_PURGE_INTERVAL is not a duration: {e}"));
        }
        if self.auth_cookie.trim().is_empty() {
            errors.push("AUTH_COOKIE cannot be empty".to_string());
        }
        if !self.login_path.starts_with('/') {
            errors.push("LOGIN_PATH must start with '/'".to_string());
        }
        if self.jwt_secret.as_deref().is_some_and(|s| s.len() < 32) {
            errors.push("JWT_SECRET must be at least 32 characters".to_string());
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl
            .as_deref()
            .and_then(|ttl| humantime::parse_duration(ttl).ok())
    }

    pub fn cache_purge_interval(&self) -> Duration {
        humantime::parse_duration(&self.cache_purge_interval)
            .unwrap_or(Duration::from_secs(60))
    }

    pub fn base_api(&self) -> &str {
        self.base_api.trim_end_matches('/')
    }
}

fn fill_or_env(current: String, env_key: &str) -> Result<String, ConfigError> {
    if current.trim().is_empty() {
        env::var(env_key).map_err(|_| ConfigError::Message(format!("APP_{env_key} or {env_key} must be set")))
    } else {
        Ok(current)
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("base_api", &self.base_api)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("cache_ttl", &self.cache_ttl)
            .field("cache_purge_interval", &self.cache_purge_interval)
            .field("invalidation", &self.invalidation)
            .field("auth_cookie", &self.auth_cookie)
            .field("auth_scheme", &self.auth_scheme)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "[REDACTED]"))
            .field("login_path", &self.login_path)
            .field("contacts_fetch_limit", &self.contacts_fetch_limit)
            .finish()
    }
}
