// storefront/src/store/postgres.rs

use super::{CartLineStore, CatalogStore, CredentialStore, StoreError, StoreResult};
use crate::models::{CartLine, Product, User};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info, instrument};
use uuid::Uuid;

const SCHEMA_SQL: &str = include_str!("../../schema.sql");

pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

/// Creates missing tables and indexes.
#[instrument(name = "store::apply_schema", skip(pool), err(Display))]
pub async fn apply_schema(pool: &PgPool) -> StoreResult<()> {
  sqlx::raw_sql(SCHEMA_SQL).execute(pool).await.map_err(|e| {
    error!(error = %e, "Failed to apply database schema.");
    StoreError::Database(e)
  })?;
  info!("Database schema is up to date.");
  Ok(())
}

#[async_trait]
impl CatalogStore for PgStore {
  #[instrument(name = "pg::insert_product", skip(self, image))]
  async fn insert_product(&self, name: &str, price: f64, image: Option<&str>) -> StoreResult<Product> {
    let product = sqlx::query_as::<_, Product>(
      "INSERT INTO products (id, name, price, image) VALUES ($1, $2, $3, $4) \
       RETURNING id, name, price, image, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(price)
    .bind(image)
    .fetch_one(&self.pool)
    .await?;
    Ok(product)
  }

  async fn list_products(&self) -> StoreResult<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(
      "SELECT id, name, price, image, created_at FROM products ORDER BY created_at ASC, id ASC",
    )
    .fetch_all(&self.pool)
    .await?;
    Ok(products)
  }

  async fn find_product(&self, id: Uuid) -> StoreResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT id, name, price, image, created_at FROM products WHERE id = $1")
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(product)
  }

  async fn find_products(&self, ids: &[Uuid]) -> StoreResult<Vec<Product>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }
    let products =
      sqlx::query_as::<_, Product>("SELECT id, name, price, image, created_at FROM products WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
    Ok(products)
  }

  async fn count_products(&self) -> StoreResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
      .fetch_one(&self.pool)
      .await?;
    Ok(count)
  }
}

#[async_trait]
impl CredentialStore for PgStore {
  async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
      "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(&self.pool)
    .await?;
    Ok(user)
  }

  #[instrument(name = "pg::insert_user", skip(self, password_hash))]
  async fn insert_user(&self, username: &str, password_hash: &str) -> StoreResult<User> {
    sqlx::query_as::<_, User>(
      "INSERT INTO users (id, username, password_hash) VALUES ($1, $2, $3) \
       RETURNING id, username, password_hash, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(password_hash)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| match e {
      sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
        StoreError::Conflict(format!("username '{}' is taken", username))
      }
      other => StoreError::Database(other),
    })
  }
}

#[async_trait]
impl CartLineStore for PgStore {
  async fn find_line(&self, product_id: Uuid) -> StoreResult<Option<CartLine>> {
    let line = sqlx::query_as::<_, CartLine>(
      "SELECT product_id, quantity, updated_at FROM cart_lines WHERE product_id = $1",
    )
    .bind(product_id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(line)
  }

  #[instrument(name = "pg::upsert_line", skip(self))]
  async fn upsert_line(&self, product_id: Uuid, quantity: i32) -> StoreResult<CartLine> {
    let line = sqlx::query_as::<_, CartLine>(
      "INSERT INTO cart_lines (product_id, quantity, updated_at) VALUES ($1, $2, NOW()) \
       ON CONFLICT (product_id) DO UPDATE SET quantity = EXCLUDED.quantity, updated_at = NOW() \
       RETURNING product_id, quantity, updated_at",
    )
    .bind(product_id)
    .bind(quantity)
    .fetch_one(&self.pool)
    .await?;
    Ok(line)
  }

  #[instrument(name = "pg::delete_line", skip(self))]
  async fn delete_line(&self, product_id: Uuid) -> StoreResult<bool> {
    let result = sqlx::query("DELETE FROM cart_lines WHERE product_id = $1")
      .bind(product_id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }

  async fn list_lines(&self) -> StoreResult<Vec<CartLine>> {
    let lines = sqlx::query_as::<_, CartLine>(
      "SELECT c.product_id, c.quantity, c.updated_at FROM cart_lines c \
       LEFT JOIN products p ON p.id = c.product_id \
       ORDER BY p.name ASC NULLS LAST, c.product_id ASC",
    )
    .fetch_all(&self.pool)
    .await?;
    Ok(lines)
  }
}
