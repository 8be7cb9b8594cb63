// storefront/src/store/memory.rs

use super::{CartLineStore, CatalogStore, CredentialStore, StoreError, StoreResult};
use crate::models::{CartLine, Product, User};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

/// Process-local store. Lists keep insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
  products: RwLock<Vec<Product>>,
  users: RwLock<Vec<User>>,
  lines: RwLock<Vec<CartLine>>,
}

#[async_trait]
impl CatalogStore for MemoryStore {
  async fn insert_product(&self, name: &str, price: f64, image: Option<&str>) -> StoreResult<Product> {
    let product = Product {
      id: Uuid::new_v4(),
      name: name.to_string(),
      price,
      image: image.map(str::to_string),
      created_at: Utc::now(),
    };
    self.products.write().push(product.clone());
    Ok(product)
  }

  async fn list_products(&self) -> StoreResult<Vec<Product>> {
    Ok(self.products.read().clone())
  }

  async fn find_product(&self, id: Uuid) -> StoreResult<Option<Product>> {
    Ok(self.products.read().iter().find(|p| p.id == id).cloned())
  }

  async fn find_products(&self, ids: &[Uuid]) -> StoreResult<Vec<Product>> {
    Ok(
      self
        .products
        .read()
        .iter()
        .filter(|p| ids.contains(&p.id))
        .cloned()
        .collect(),
    )
  }

  async fn count_products(&self) -> StoreResult<i64> {
    Ok(self.products.read().len() as i64)
  }
}

#[async_trait]
impl CredentialStore for MemoryStore {
  async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
    Ok(self.users.read().iter().find(|u| u.username == username).cloned())
  }

  async fn insert_user(&self, username: &str, password_hash: &str) -> StoreResult<User> {
    let mut users = self.users.write();
    if users.iter().any(|u| u.username == username) {
      return Err(StoreError::Conflict(format!("username '{}' is taken", username)));
    }
    let user = User {
      id: Uuid::new_v4(),
      username: username.to_string(),
      password_hash: password_hash.to_string(),
      created_at: Utc::now(),
    };
    users.push(user.clone());
    Ok(user)
  }
}

#[async_trait]
impl CartLineStore for MemoryStore {
  async fn find_line(&self, product_id: Uuid) -> StoreResult<Option<CartLine>> {
    Ok(self.lines.read().iter().find(|l| l.product_id == product_id).cloned())
  }

  async fn upsert_line(&self, product_id: Uuid, quantity: i32) -> StoreResult<CartLine> {
    let mut lines = self.lines.write();
    let now = Utc::now();
    match lines.iter_mut().find(|l| l.product_id == product_id) {
      Some(line) => {
        line.quantity = quantity;
        line.updated_at = now;
        Ok(line.clone())
      }
      None => {
        let line = CartLine {
          product_id,
          quantity,
          updated_at: now,
        };
        lines.push(line.clone());
        Ok(line)
      }
    }
  }

  async fn delete_line(&self, product_id: Uuid) -> StoreResult<bool> {
    let mut lines = self.lines.write();
    let before = lines.len();
    lines.retain(|l| l.product_id != product_id);
    Ok(lines.len() != before)
  }

  async fn list_lines(&self) -> StoreResult<Vec<CartLine>> {
    Ok(self.lines.read().clone())
  }
}
