// src/config.rs
use crate::application::{
    commands::GrantPolicy, services::ServicePolicy, stores::TokenLifetimes,
};
use std::{env, path::PathBuf, str::FromStr, time::Duration};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    listen_addr: String,
    issuer: String,
    clients_file: PathBuf,
    resource_owners_file: Option<PathBuf>,
    assertion_hmac_secret: Option<String>,
    auth_code_ttl: Duration,
    access_token_ttl: Duration,
    // None = refresh tokens never expire
    refresh_token_ttl: Option<Duration>,
    refresh_token_rotation: bool,
    collaborator_timeout: Duration,
    redis_url: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".into()
}

const DEFAULT_AUTH_CODE_TTL_SECS: u64 = 600;
const DEFAULT_ACCESS_TOKEN_TTL_SECS: u64 = 3600;
const DEFAULT_REFRESH_TOKEN_TTL_SECS: u64 = 60 * 60 * 24 * 30;
const DEFAULT_COLLABORATOR_TIMEOUT_MS: u64 = 5000;

impl AppConfig {
    /// Build configuration from environment variables. A `.env` file, when
    /// present, populates the environment first.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let listen_addr = get("LISTEN_ADDR").unwrap_or_else(default_listen_addr);
        let issuer = get("ISSUER")
            .unwrap_or_else(|| format!("http://{listen_addr}"))
            .trim_end_matches('/')
            .to_string();

        let clients_file = get("CLIENTS_FILE")
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing("CLIENTS_FILE"))?;
        let resource_owners_file = get("RESOURCE_OWNERS_FILE").map(PathBuf::from);
        let assertion_hmac_secret = get("ASSERTION_HMAC_SECRET");

        let auth_code_secs: u64 =
            parse_or(get("AUTH_CODE_TTL_SECONDS"), "AUTH_CODE_TTL_SECONDS", DEFAULT_AUTH_CODE_TTL_SECS)?;
        let access_secs: u64 = parse_or(
            get("ACCESS_TOKEN_TTL_SECONDS"),
            "ACCESS_TOKEN_TTL_SECONDS",
            DEFAULT_ACCESS_TOKEN_TTL_SECS,
        )?;
        let refresh_secs: u64 = parse_or(
            get("REFRESH_TOKEN_TTL_SECONDS"),
            "REFRESH_TOKEN_TTL_SECONDS",
            DEFAULT_REFRESH_TOKEN_TTL_SECS,
        )?;
        let timeout_ms: u64 = parse_or(
            get("COLLABORATOR_TIMEOUT_MS"),
            "COLLABORATOR_TIMEOUT_MS",
            DEFAULT_COLLABORATOR_TIMEOUT_MS,
        )?;

        for (name, value) in [
            ("AUTH_CODE_TTL_SECONDS", auth_code_secs),
            ("ACCESS_TOKEN_TTL_SECONDS", access_secs),
            ("COLLABORATOR_TIMEOUT_MS", timeout_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be greater than zero")));
            }
        }

        let refresh_token_rotation = match get("REFRESH_TOKEN_ROTATION") {
            None => true,
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                ConfigError::Invalid(format!("REFRESH_TOKEN_ROTATION must be a boolean, got '{raw}'"))
            })?,
        };

        Ok(Self {
            listen_addr,
            issuer,
            clients_file,
            resource_owners_file,
            assertion_hmac_secret,
            auth_code_ttl: Duration::from_secs(auth_code_secs),
            access_token_ttl: Duration::from_secs(access_secs),
            refresh_token_ttl: (refresh_secs > 0).then(|| Duration::from_secs(refresh_secs)),
            refresh_token_rotation,
            collaborator_timeout: Duration::from_millis(timeout_ms),
            redis_url: get("REDIS_URL"),
        })
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn clients_file(&self) -> &PathBuf {
        &self.clients_file
    }

    pub fn resource_owners_file(&self) -> Option<&PathBuf> {
        self.resource_owners_file.as_ref()
    }

    pub fn assertion_hmac_secret(&self) -> Option<&str> {
        self.assertion_hmac_secret.as_deref()
    }

    pub fn redis_url(&self) -> Option<&str> {
        self.redis_url.as_deref()
    }

    pub fn refresh_token_ttl(&self) -> Option<Duration> {
        self.refresh_token_ttl
    }

    /// Lifetimes and switches handed to the application services.
    pub fn service_policy(&self) -> Result<ServicePolicy, ConfigError> {
        Ok(ServicePolicy {
            code_ttl: to_chrono(self.auth_code_ttl, "AUTH_CODE_TTL_SECONDS")?,
            tokens: TokenLifetimes {
                access: to_chrono(self.access_token_ttl, "ACCESS_TOKEN_TTL_SECONDS")?,
                refresh: self
                    .refresh_token_ttl
                    .map(|ttl| to_chrono(ttl, "REFRESH_TOKEN_TTL_SECONDS"))
                    .transpose()?,
            },
            grants: GrantPolicy {
                rotate_refresh_tokens: self.refresh_token_rotation,
                collaborator_timeout: self.collaborator_timeout,
            },
        })
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, name: &str, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid(format!("{name} must be a non-negative integer, got '{raw}'"))),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn to_chrono(duration: Duration, name: &str) -> Result<chrono::Duration, ConfigError> {
    chrono::Duration::from_std(duration)
        .map_err(|_| ConfigError::Invalid(format!("{name} is out of range")))
}
