// storefront/src/services/notifier.rs

use crate::events::{CartEvent, CartEventSubscriber};
use crate::services::mailer::{Mailer, OutgoingMail};
use std::sync::Arc;
use tracing::{debug, info_span, warn, Instrument};

/// Reports cart events by mail to a fixed recipient.
///
/// Each event yields one delivery attempt on a detached task. Failures are
/// logged and dropped; they never reach the request that caused the event.
pub struct Notifier {
  mailer: Arc<dyn Mailer>,
  recipient: String,
}

impl Notifier {
  pub fn new(mailer: Arc<dyn Mailer>, recipient: impl Into<String>) -> Self {
    Self {
      mailer,
      recipient: recipient.into(),
    }
  }

  pub fn render(&self, event: &CartEvent) -> OutgoingMail {
    let label = |name: &Option<String>, id: &uuid::Uuid| match name {
      Some(name) => name.clone(),
      None => format!("product {}", id),
    };
    let (subject, body) = match event {
      CartEvent::LineAdded {
        product_id,
        product_name,
        delta,
        quantity,
      } => {
        let name = label(product_name, product_id);
        (
          format!("Cart updated: {} added", name),
          format!("{} x {} ({}) added to the cart. Quantity is now {}.", delta, name, product_id, quantity),
        )
      }
      CartEvent::LineAdjusted {
        product_id,
        product_name,
        delta,
        quantity,
      } => {
        let name = label(product_name, product_id);
        (
          format!("Cart updated: {} changed", name),
          format!("Quantity of {} ({}) changed by {}. Quantity is now {}.", name, product_id, delta, quantity),
        )
      }
      CartEvent::LineRemoved {
        product_id,
        product_name,
        delta,
      } => {
        let name = label(product_name, product_id);
        (
          format!("Cart updated: {} removed", name),
          format!("{} ({}) was removed from the cart after a change of {}.", name, product_id, delta),
        )
      }
    };
    OutgoingMail {
      to: self.recipient.clone(),
      subject,
      body,
    }
  }
}

impl CartEventSubscriber for Notifier {
  fn name(&self) -> &'static str {
    "notifier"
  }

  fn on_event(&self, event: &CartEvent) {
    let mail = self.render(event);
    let runtime = match tokio::runtime::Handle::try_current() {
      Ok(handle) => handle,
      Err(_) => {
        warn!(subject = %mail.subject, "No async runtime; notification dropped.");
        return;
      }
    };
    let mailer = self.mailer.clone();
    let span = info_span!("notifier::deliver", kind = event.kind(), product_id = %event.product_id());
    runtime.spawn(
      async move {
        match mailer.send(&mail).await {
          Ok(()) => debug!("Notification delivered."),
          Err(e) => warn!(error = %e, "Notification failed."),
        }
      }
      .instrument(span),
    );
  }
}
