// storefront/src/services/cart_service.rs

//! Entry points of the cart reconciliation engine.
//!
//! Each operation runs its pipeline and returns the projected cart. With
//! [`CartConsistency::Serialized`] the add, adjust and remove operations hold
//! the product's line lock for the whole read-modify-write.

use crate::config::CartConsistency;
use crate::errors::AppError;
use crate::models::CartEntry;
use crate::pipelines::contexts::{
  AddToCartCtxData, AdjustCartCtxData, CartProjection, RemoveFromCartCtxData, ViewCartCtxData,
};
use crate::state::AppState;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use storefront_flow::{ContextData, PipelineResult};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{instrument, warn};
use uuid::Uuid;

type LockSlots = Arc<Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>>;

/// One async mutex per product reference.
///
/// A slot lives only while some task holds or waits for it; the last
/// [`LineGuard`] to drop removes it from the map.
#[derive(Clone, Default)]
pub struct LineLocks {
  slots: LockSlots,
}

/// Exclusive access to one product's cart line.
pub struct LineGuard {
  product_id: Uuid,
  guard: Option<OwnedMutexGuard<()>>,
  slots: LockSlots,
}

impl Drop for LineGuard {
  fn drop(&mut self) {
    // Release the mutex before inspecting the slot's holders.
    drop(self.guard.take());
    let mut slots = self.slots.lock();
    let idle = slots
      .get(&self.product_id)
      .is_some_and(|slot| Arc::strong_count(slot) == 1);
    if idle {
      slots.remove(&self.product_id);
    }
  }
}

impl LineLocks {
  pub fn new() -> Self {
    Self::default()
  }

  pub async fn lock(&self, product_id: Uuid) -> LineGuard {
    let slot = self.slots.lock().entry(product_id).or_default().clone();
    // Declared before the wait so a cancelled lock still prunes its slot.
    let mut line_guard = LineGuard {
      product_id,
      guard: None,
      slots: self.slots.clone(),
    };
    line_guard.guard = Some(slot.lock_owned().await);
    line_guard
  }

  /// Number of products with a held or awaited lock.
  pub fn active_slots(&self) -> usize {
    self.slots.lock().len()
  }

  async fn lock_for(&self, product_id: Uuid, consistency: CartConsistency) -> Option<LineGuard> {
    match consistency {
      CartConsistency::Serialized => Some(self.lock(product_id).await),
      CartConsistency::LastWriteWins => None,
    }
  }
}

async fn run_cart_flow<T>(app_state: &AppState, ctx: T) -> Result<Vec<CartEntry>, AppError>
where
  T: CartProjection,
{
  let ctx_data = ContextData::new(ctx);
  match app_state.flows.run(ctx_data.clone()).await? {
    PipelineResult::Completed => {
      let cart = ctx_data.write().take_cart();
      Ok(cart)
    }
    PipelineResult::Stopped => {
      warn!(context = std::any::type_name::<T>(), "Cart pipeline halted before completion.");
      Err(AppError::Internal("Cart operation was halted".to_string()))
    }
  }
}

/// Adds `delta` to the line of `product_id`, creating it when absent.
#[instrument(name = "cart_service::add_quantity", skip(app_state))]
pub async fn add_quantity(app_state: &AppState, product_id: Uuid, delta: i32) -> Result<Vec<CartEntry>, AppError> {
  let _line_guard = app_state
    .line_locks
    .lock_for(product_id, app_state.config.cart_consistency)
    .await;
  run_cart_flow(app_state, AddToCartCtxData::new(app_state.clone(), product_id, delta)).await
}

/// Changes an existing line by `delta`; a result of zero or less deletes the line.
#[instrument(name = "cart_service::adjust_quantity", skip(app_state))]
pub async fn adjust_quantity(
  app_state: &AppState,
  product_id: Uuid,
  delta: i32,
) -> Result<Vec<CartEntry>, AppError> {
  let _line_guard = app_state
    .line_locks
    .lock_for(product_id, app_state.config.cart_consistency)
    .await;
  run_cart_flow(app_state, AdjustCartCtxData::new(app_state.clone(), product_id, delta)).await
}

/// Deletes the line of `product_id` if there is one.
#[instrument(name = "cart_service::remove_line", skip(app_state))]
pub async fn remove_line(app_state: &AppState, product_id: Uuid) -> Result<Vec<CartEntry>, AppError> {
  let _line_guard = app_state
    .line_locks
    .lock_for(product_id, app_state.config.cart_consistency)
    .await;
  run_cart_flow(app_state, RemoveFromCartCtxData::new(app_state.clone(), product_id)).await
}

#[instrument(name = "cart_service::list_lines", skip(app_state))]
pub async fn list_lines(app_state: &AppState) -> Result<Vec<CartEntry>, AppError> {
  run_cart_flow(app_state, ViewCartCtxData::new(app_state.clone())).await
}
