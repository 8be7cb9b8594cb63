// storefront/src/store/mod.rs

//! Persistence ports for the catalog, credentials and cart lines.
//!
//! Each port is an object-safe async trait so the application can run against
//! Postgres in production and against the in-memory store in tests or local
//! runs. [`Stores`] bundles one implementation of each behind `Arc`s.

pub mod memory;
pub mod postgres;

use crate::models::{CartLine, Product, User};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("database error: {0}")]
  Database(#[from] sqlx::Error),

  /// A uniqueness constraint rejected the write.
  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store unavailable: {0}")]
  Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait CatalogStore: Send + Sync {
  async fn insert_product(&self, name: &str, price: f64, image: Option<&str>) -> StoreResult<Product>;

  /// All products in catalog order (oldest first).
  async fn list_products(&self) -> StoreResult<Vec<Product>>;

  async fn find_product(&self, id: Uuid) -> StoreResult<Option<Product>>;

  /// Products among `ids` that exist; unknown ids are ignored.
  async fn find_products(&self, ids: &[Uuid]) -> StoreResult<Vec<Product>>;

  async fn count_products(&self) -> StoreResult<i64>;
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
  async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

  /// Fails with [`StoreError::Conflict`] when the username is taken.
  async fn insert_user(&self, username: &str, password_hash: &str) -> StoreResult<User>;
}

#[async_trait]
pub trait CartLineStore: Send + Sync {
  async fn find_line(&self, product_id: Uuid) -> StoreResult<Option<CartLine>>;

  /// Creates the line or overwrites its quantity; at most one line exists per product.
  async fn upsert_line(&self, product_id: Uuid, quantity: i32) -> StoreResult<CartLine>;

  /// Returns whether a line was deleted.
  async fn delete_line(&self, product_id: Uuid) -> StoreResult<bool>;

  async fn list_lines(&self) -> StoreResult<Vec<CartLine>>;
}

#[derive(Clone)]
pub struct Stores {
  pub catalog: Arc<dyn CatalogStore>,
  pub credentials: Arc<dyn CredentialStore>,
  pub cart: Arc<dyn CartLineStore>,
}

impl Stores {
  pub fn in_memory() -> Self {
    let store = Arc::new(memory::MemoryStore::default());
    Self {
      catalog: store.clone(),
      credentials: store.clone(),
      cart: store,
    }
  }

  pub fn postgres(pool: sqlx::PgPool) -> Self {
    let store = Arc::new(postgres::PgStore::new(pool));
    Self {
      catalog: store.clone(),
      credentials: store.clone(),
      cart: store,
    }
  }
}
