// storefront/src/services/mailer.rs

//! Outbound mail delivery.

use crate::config::NotifyConfig;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Debug, Error)]
pub enum MailError {
  #[error("mail transport failed: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("mail provider rejected message with status {status}: {body}")]
  Rejected { status: u16, body: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
  pub to: String,
  pub subject: String,
  pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
  async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

#[derive(Serialize)]
struct Address<'a> {
  email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TransactionalEmail<'a> {
  sender: Address<'a>,
  to: [Address<'a>; 1],
  subject: &'a str,
  text_content: &'a str,
}

/// Posts transactional e-mail to a Brevo-compatible HTTP API.
pub struct HttpMailer {
  client: reqwest::Client,
  api_url: String,
  api_key: String,
  sender: String,
}

impl HttpMailer {
  pub fn new(api_url: impl Into<String>, api_key: impl Into<String>, sender: impl Into<String>) -> Result<Self, MailError> {
    let client = reqwest::Client::builder().timeout(Duration::from_secs(10)).build()?;
    Ok(Self {
      client,
      api_url: api_url.into(),
      api_key: api_key.into(),
      sender: sender.into(),
    })
  }
}

#[async_trait]
impl Mailer for HttpMailer {
  #[instrument(name = "HttpMailer::send", skip_all, fields(subject = %mail.subject), err(Display))]
  async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
    let payload = TransactionalEmail {
      sender: Address { email: &self.sender },
      to: [Address { email: &mail.to }],
      subject: &mail.subject,
      text_content: &mail.body,
    };
    let response = self
      .client
      .post(&self.api_url)
      .header("api-key", &self.api_key)
      .json(&payload)
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(MailError::Rejected {
        status: status.as_u16(),
        body,
      });
    }
    debug!(status = status.as_u16(), "Mail accepted by provider.");
    Ok(())
  }
}

/// Writes mail to the log instead of sending it.
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
  async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
    info!(to = %mail.to, subject = %mail.subject, body = %mail.body, "Mail (log only).");
    Ok(())
  }
}

/// `HttpMailer` when an API key is configured, `LogMailer` otherwise.
pub fn mailer_from_config(notify: &NotifyConfig) -> Result<Arc<dyn Mailer>, MailError> {
  match &notify.api_key {
    Some(api_key) => {
      info!(api_url = %notify.api_url, "Notifications delivered over HTTP.");
      Ok(Arc::new(HttpMailer::new(notify.api_url.clone(), api_key.clone(), notify.sender.clone())?))
    }
    None => {
      info!("No notification API key configured; notifications are only logged.");
      Ok(Arc::new(LogMailer))
    }
  }
}
