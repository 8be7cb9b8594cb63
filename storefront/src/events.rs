// storefront/src/events.rs

//! Cart domain events and the in-process bus that fans them out.
//!
//! The cart pipelines publish exactly one event per committed add or adjust.
//! Subscribers are invoked synchronously on the publishing task, so anything
//! slow (network delivery, for instance) must be moved off that task by the
//! subscriber itself.

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
  /// An add committed; `quantity` is the persisted value afterwards.
  LineAdded {
    product_id: Uuid,
    product_name: Option<String>,
    delta: i32,
    quantity: i32,
  },
  LineAdjusted {
    product_id: Uuid,
    product_name: Option<String>,
    delta: i32,
    quantity: i32,
  },
  /// An adjust drove the quantity to zero or below and the line was deleted.
  LineRemoved {
    product_id: Uuid,
    product_name: Option<String>,
    delta: i32,
  },
}

impl CartEvent {
  pub fn product_id(&self) -> Uuid {
    match self {
      CartEvent::LineAdded { product_id, .. }
      | CartEvent::LineAdjusted { product_id, .. }
      | CartEvent::LineRemoved { product_id, .. } => *product_id,
    }
  }

  pub fn kind(&self) -> &'static str {
    match self {
      CartEvent::LineAdded { .. } => "line_added",
      CartEvent::LineAdjusted { .. } => "line_adjusted",
      CartEvent::LineRemoved { .. } => "line_removed",
    }
  }
}

pub trait CartEventSubscriber: Send + Sync {
  fn name(&self) -> &'static str;

  fn on_event(&self, event: &CartEvent);
}

#[derive(Clone, Default)]
pub struct CartEvents {
  subscribers: Arc<RwLock<Vec<Arc<dyn CartEventSubscriber>>>>,
}

impl CartEvents {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn subscribe(&self, subscriber: Arc<dyn CartEventSubscriber>) {
    debug!(subscriber = subscriber.name(), "Cart event subscriber added.");
    self.subscribers.write().push(subscriber);
  }

  pub fn subscriber_count(&self) -> usize {
    self.subscribers.read().len()
  }

  /// Hands `event` to every subscriber; returns how many received it.
  #[instrument(name = "CartEvents::publish", skip_all, fields(kind = event.kind(), product_id = %event.product_id()))]
  pub fn publish(&self, event: CartEvent) -> usize {
    let subscribers: Vec<Arc<dyn CartEventSubscriber>> = self.subscribers.read().clone();
    for subscriber in &subscribers {
      subscriber.on_event(&event);
    }
    debug!(delivered = subscribers.len(), "Cart event published.");
    subscribers.len()
  }
}
