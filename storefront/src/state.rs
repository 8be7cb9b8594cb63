// storefront/src/state.rs

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::events::CartEvents;
use crate::pipelines;
use crate::services::cart_service::LineLocks;
use crate::services::mailer::Mailer;
use crate::services::notifier::Notifier;
use crate::services::token::{JwtIssuer, TokenIssuer};
use crate::store::Stores;
use std::sync::Arc;
use std::time::Duration;
use storefront_flow::FlowRegistry;

#[derive(Clone)]
pub struct AppState {
  pub stores: Stores,
  pub flows: Arc<FlowRegistry<AppError>>,
  pub config: Arc<AppConfig>,
  pub tokens: Arc<dyn TokenIssuer>,
  pub events: CartEvents,
  pub line_locks: LineLocks,
}

impl AppState {
  /// Wires the token issuer, the notifier subscription and every pipeline.
  pub fn new(config: Arc<AppConfig>, stores: Stores, mailer: Arc<dyn Mailer>) -> Result<Self, AppError> {
    let tokens: Arc<dyn TokenIssuer> = Arc::new(JwtIssuer::new(
      &config.token_secret,
      Duration::from_secs(config.token_ttl_seconds),
    )?);

    let events = CartEvents::new();
    events.subscribe(Arc::new(Notifier::new(mailer, config.notify.recipient.clone())));

    let flows = Arc::new(FlowRegistry::<AppError>::new());
    pipelines::register_all_pipelines(&flows);

    Ok(Self {
      stores,
      flows,
      config,
      tokens,
      events,
      line_locks: LineLocks::new(),
    })
  }
}
