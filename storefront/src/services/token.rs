// storefront/src/services/token.rs

use crate::errors::AppError;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Who a token is issued to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
  pub user_id: Uuid,
  pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
  /// User id.
  pub sub: String,
  pub username: String,
  pub iat: i64,
  pub exp: i64,
}

/// Issues and checks bearer tokens.
pub trait TokenIssuer: Send + Sync {
  fn sign(&self, identity: &Identity, ttl: Duration) -> Result<String, AppError>;

  /// Fails with [`AppError::Auth`] for bad signatures, malformed or expired tokens.
  fn verify(&self, token: &str) -> Result<TokenClaims, AppError>;

  fn default_ttl(&self) -> Duration;
}

/// HS256 JSON Web Tokens.
pub struct JwtIssuer {
  encoding_key: EncodingKey,
  decoding_key: DecodingKey,
  validation: Validation,
  default_ttl: Duration,
}

impl JwtIssuer {
  pub fn new(secret: &str, default_ttl: Duration) -> Result<Self, AppError> {
    if secret.trim().is_empty() {
      return Err(AppError::Config("Token secret must not be empty".to_string()));
    }
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);
    Ok(Self {
      encoding_key: EncodingKey::from_secret(secret.as_bytes()),
      decoding_key: DecodingKey::from_secret(secret.as_bytes()),
      validation,
      default_ttl,
    })
  }

  pub(crate) fn sign_at(&self, identity: &Identity, issued_at: DateTime<Utc>, ttl: Duration) -> Result<String, AppError> {
    let ttl_secs = i64::try_from(ttl.as_secs()).map_err(|_| AppError::Token("Token lifetime out of range".to_string()))?;
    let iat = issued_at.timestamp();
    let claims = TokenClaims {
      sub: identity.user_id.to_string(),
      username: identity.username.clone(),
      iat,
      exp: iat.saturating_add(ttl_secs),
    };
    encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
      .map_err(|e| AppError::Token(format!("Failed to sign token: {}", e)))
  }
}

impl TokenIssuer for JwtIssuer {
  #[instrument(name = "JwtIssuer::sign", skip(self, identity), fields(user_id = %identity.user_id), err(Display))]
  fn sign(&self, identity: &Identity, ttl: Duration) -> Result<String, AppError> {
    let token = self.sign_at(identity, Utc::now(), ttl)?;
    debug!(ttl_secs = ttl.as_secs(), "Token issued.");
    Ok(token)
  }

  fn verify(&self, token: &str) -> Result<TokenClaims, AppError> {
    decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
      .map(|data| data.claims)
      .map_err(|e| {
        warn!(error = %e, "Token rejected.");
        AppError::Auth("Invalid or expired token".to_string())
      })
  }

  fn default_ttl(&self) -> Duration {
    self.default_ttl
  }
}
