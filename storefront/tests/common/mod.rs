// storefront/tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use storefront::config::{AppConfig, CartConsistency};
use storefront::models::{CartLine, Product};
use storefront::services::mailer::{MailError, Mailer, OutgoingMail};
use storefront::state::AppState;
use storefront::store::memory::MemoryStore;
use storefront::store::{CartLineStore, StoreError, StoreResult, Stores};
use tokio::sync::Barrier;
use tracing::Level;
use uuid::Uuid;

pub const TEST_SECRET: &str = "storefront-test-secret";

static TRACING: Lazy<()> = Lazy::new(|| {
  let _ = tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING);
}

pub fn test_config(consistency: CartConsistency) -> Arc<AppConfig> {
  let consistency = match consistency {
    CartConsistency::Serialized => "serialized",
    CartConsistency::LastWriteWins => "last_write_wins",
  };
  let vars: HashMap<&str, &str> = HashMap::from([
    ("STORE_BACKEND", "memory"),
    ("TOKEN_SECRET", TEST_SECRET),
    ("CART_CONSISTENCY", consistency),
    ("NOTIFY_RECIPIENT", "ops@example.com"),
  ]);
  let config = AppConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
    .expect("test configuration is valid");
  Arc::new(config)
}

/// Records every mail instead of sending it.
#[derive(Default)]
pub struct CountingMailer {
  pub sent: Mutex<Vec<OutgoingMail>>,
}

impl CountingMailer {
  pub fn count(&self) -> usize {
    self.sent.lock().len()
  }

  pub fn subjects(&self) -> Vec<String> {
    self.sent.lock().iter().map(|m| m.subject.clone()).collect()
  }
}

#[async_trait]
impl Mailer for CountingMailer {
  async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
    self.sent.lock().push(mail.clone());
    Ok(())
  }
}

/// Rejects every mail while counting the attempts.
#[derive(Default)]
pub struct FailingMailer {
  pub attempts: AtomicUsize,
}

#[async_trait]
impl Mailer for FailingMailer {
  async fn send(&self, _mail: &OutgoingMail) -> Result<(), MailError> {
    self.attempts.fetch_add(1, Ordering::SeqCst);
    Err(MailError::Rejected {
      status: 503,
      body: "provider down".to_string(),
    })
  }
}

pub fn state_with(consistency: CartConsistency, stores: Stores, mailer: Arc<dyn Mailer>) -> AppState {
  AppState::new(test_config(consistency), stores, mailer).expect("app state builds")
}

/// In-memory state plus the mailer it reports to.
pub fn test_state(consistency: CartConsistency) -> (AppState, Arc<CountingMailer>) {
  let mailer = Arc::new(CountingMailer::default());
  let state = state_with(consistency, Stores::in_memory(), mailer.clone());
  (state, mailer)
}

pub async fn seed_product(state: &AppState, name: &str, price: f64) -> Product {
  state
    .stores
    .catalog
    .insert_product(name, price, None)
    .await
    .expect("product inserted")
}

/// Extra time a count must hold still once it reaches the expected value.
pub const SETTLE: Duration = Duration::from_millis(150);

/// Polls `count` until it reaches `expected` or `timeout` elapses, then keeps
/// watching for [`SETTLE`] so late extra sends are counted too. Returns the
/// final value.
pub async fn wait_for_count(count: impl Fn() -> usize, expected: usize, timeout: Duration) -> usize {
  let deadline = tokio::time::Instant::now() + timeout;
  while count() < expected && tokio::time::Instant::now() < deadline {
    tokio::time::sleep(Duration::from_millis(10)).await;
  }
  tokio::time::sleep(SETTLE).await;
  count()
}

/// Cart store whose first `parties` line reads wait for each other, so that
/// concurrent writers all observe the same starting quantity.
pub struct RendezvousCartStore {
  inner: Arc<MemoryStore>,
  barrier: Barrier,
  parties: usize,
  reads: AtomicUsize,
}

impl RendezvousCartStore {
  pub fn new(inner: Arc<MemoryStore>, parties: usize) -> Self {
    Self {
      inner,
      barrier: Barrier::new(parties),
      parties,
      reads: AtomicUsize::new(0),
    }
  }
}

#[async_trait]
impl CartLineStore for RendezvousCartStore {
  async fn find_line(&self, product_id: Uuid) -> StoreResult<Option<CartLine>> {
    let line = self.inner.find_line(product_id).await?;
    if self.reads.fetch_add(1, Ordering::SeqCst) < self.parties {
      self.barrier.wait().await;
    }
    Ok(line)
  }

  async fn upsert_line(&self, product_id: Uuid, quantity: i32) -> StoreResult<CartLine> {
    self.inner.upsert_line(product_id, quantity).await
  }

  async fn delete_line(&self, product_id: Uuid) -> StoreResult<bool> {
    self.inner.delete_line(product_id).await
  }

  async fn list_lines(&self) -> StoreResult<Vec<CartLine>> {
    self.inner.list_lines().await
  }
}

/// Memory-backed stores whose cart port is a [`RendezvousCartStore`].
pub fn rendezvous_stores(parties: usize) -> Stores {
  let memory = Arc::new(MemoryStore::default());
  Stores {
    catalog: memory.clone(),
    credentials: memory.clone(),
    cart: Arc::new(RendezvousCartStore::new(memory, parties)),
  }
}

/// Cart store that fails selected operations as unavailable.
pub struct FaultyCartStore {
  inner: Arc<MemoryStore>,
  fail_writes: bool,
  fail_listing: bool,
}

fn unavailable() -> StoreError {
  StoreError::Unavailable("cart store is down".to_string())
}

#[async_trait]
impl CartLineStore for FaultyCartStore {
  async fn find_line(&self, product_id: Uuid) -> StoreResult<Option<CartLine>> {
    self.inner.find_line(product_id).await
  }

  async fn upsert_line(&self, product_id: Uuid, quantity: i32) -> StoreResult<CartLine> {
    if self.fail_writes {
      return Err(unavailable());
    }
    self.inner.upsert_line(product_id, quantity).await
  }

  async fn delete_line(&self, product_id: Uuid) -> StoreResult<bool> {
    if self.fail_writes {
      return Err(unavailable());
    }
    self.inner.delete_line(product_id).await
  }

  async fn list_lines(&self) -> StoreResult<Vec<CartLine>> {
    if self.fail_listing {
      return Err(unavailable());
    }
    self.inner.list_lines().await
  }
}

fn faulty_stores(fail_writes: bool, fail_listing: bool) -> (Stores, Arc<MemoryStore>) {
  let memory = Arc::new(MemoryStore::default());
  let stores = Stores {
    catalog: memory.clone(),
    credentials: memory.clone(),
    cart: Arc::new(FaultyCartStore {
      inner: memory.clone(),
      fail_writes,
      fail_listing,
    }),
  };
  (stores, memory)
}

/// Stores whose cart port refuses writes, plus the backing memory store for
/// seeding and inspection.
pub fn unwritable_cart_stores() -> (Stores, Arc<MemoryStore>) {
  faulty_stores(true, false)
}

/// Stores whose cart port writes but cannot list lines.
pub fn unlistable_cart_stores() -> (Stores, Arc<MemoryStore>) {
  faulty_stores(false, true)
}
