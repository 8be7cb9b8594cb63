// storefront/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_NOTIFY_API_URL: &str = "https://api.brevo.com/v3/smtp/email";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
  Postgres,
  Memory,
}

impl FromStr for StoreBackend {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "postgres" => Ok(StoreBackend::Postgres),
      "memory" => Ok(StoreBackend::Memory),
      other => Err(AppError::Config(format!("Invalid STORE_BACKEND '{}': expected postgres or memory", other))),
    }
  }
}

/// How concurrent mutations of the same cart line are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CartConsistency {
  /// Read-modify-write on one product runs under a per-product lock.
  #[default]
  Serialized,
  /// No lock; concurrent writers may overwrite each other.
  LastWriteWins,
}

impl FromStr for CartConsistency {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "serialized" => Ok(CartConsistency::Serialized),
      "last_write_wins" => Ok(CartConsistency::LastWriteWins),
      other => Err(AppError::Config(format!(
        "Invalid CART_CONSISTENCY '{}': expected serialized or last_write_wins",
        other
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

impl FromStr for LogFormat {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "pretty" => Ok(LogFormat::Pretty),
      "json" => Ok(LogFormat::Json),
      other => Err(AppError::Config(format!("Invalid LOG_FORMAT '{}': expected pretty or json", other))),
    }
  }
}

#[derive(Clone)]
pub struct NotifyConfig {
  pub api_url: String,
  /// `None` selects the logging mailer.
  pub api_key: Option<String>,
  pub sender: String,
  pub recipient: String,
}

#[derive(Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub store_backend: StoreBackend,
  pub database_url: Option<String>,
  pub frontend_url: String,
  pub token_secret: String,
  pub token_ttl_seconds: u64,
  pub cart_consistency: CartConsistency,
  pub notify: NotifyConfig,
  pub seed_db: bool,
  pub log_format: LogFormat,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the configuration from an arbitrary variable source.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_env = |var_name: &str| lookup(var_name).filter(|v| !v.trim().is_empty());
    let require = |var_name: &str| {
      get_env(var_name).ok_or_else(|| AppError::Config(format!("Missing environment variable '{}'", var_name)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|| "5000".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;

    let store_backend = get_env("STORE_BACKEND")
      .map(|v| v.parse::<StoreBackend>())
      .transpose()?
      .unwrap_or(StoreBackend::Postgres);
    let database_url = match store_backend {
      StoreBackend::Postgres => Some(require("DATABASE_URL")?),
      StoreBackend::Memory => get_env("DATABASE_URL"),
    };

    let frontend_url = get_env("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_string());

    let token_secret = get_env("TOKEN_SECRET")
      .or_else(|| get_env("SESSION_SECRET"))
      .ok_or_else(|| AppError::Config("Missing environment variable 'TOKEN_SECRET' (or 'SESSION_SECRET')".to_string()))?;
    let token_ttl_seconds = get_env("TOKEN_TTL_SECONDS")
      .unwrap_or_else(|| "3600".to_string())
      .parse::<u64>()
      .map_err(|e| AppError::Config(format!("Invalid TOKEN_TTL_SECONDS: {}", e)))?;
    if token_ttl_seconds == 0 {
      return Err(AppError::Config("TOKEN_TTL_SECONDS must be greater than zero".to_string()));
    }

    let cart_consistency = get_env("CART_CONSISTENCY")
      .map(|v| v.parse::<CartConsistency>())
      .transpose()?
      .unwrap_or_default();

    let notify = NotifyConfig {
      api_url: get_env("NOTIFY_API_URL").unwrap_or_else(|| DEFAULT_NOTIFY_API_URL.to_string()),
      api_key: get_env("NOTIFY_API_KEY"),
      sender: get_env("NOTIFY_SENDER").unwrap_or_else(|| "noreply@example.com".to_string()),
      recipient: get_env("NOTIFY_RECIPIENT").unwrap_or_else(|| "admin@example.com".to_string()),
    };

    let seed_db = get_env("SEED_DB")
      .unwrap_or_else(|| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_DB value: {}", e)))?;

    let log_format = get_env("LOG_FORMAT")
      .map(|v| v.parse::<LogFormat>())
      .transpose()?
      .unwrap_or_default();

    Ok(Self {
      server_host,
      server_port,
      store_backend,
      database_url,
      frontend_url,
      token_secret,
      token_ttl_seconds,
      cart_consistency,
      notify,
      seed_db,
      log_format,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

// Secrets stay out of logs.
impl fmt::Debug for AppConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AppConfig")
      .field("server_host", &self.server_host)
      .field("server_port", &self.server_port)
      .field("store_backend", &self.store_backend)
      .field("database_url", &self.database_url.as_ref().map(|_| "[REDACTED]"))
      .field("frontend_url", &self.frontend_url)
      .field("token_secret", &"[REDACTED]")
      .field("token_ttl_seconds", &self.token_ttl_seconds)
      .field("cart_consistency", &self.cart_consistency)
      .field("notify", &self.notify)
      .field("seed_db", &self.seed_db)
      .field("log_format", &self.log_format)
      .finish()
  }
}

impl fmt::Debug for NotifyConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("NotifyConfig")
      .field("api_url", &self.api_url)
      .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
      .field("sender", &self.sender)
      .field("recipient", &self.recipient)
      .finish()
  }
}
