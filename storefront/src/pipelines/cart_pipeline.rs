// storefront/src/pipelines/cart_pipeline.rs

//! Cart reconciliation pipelines: add, adjust, remove and view.
//!
//! Add and adjust share the same shape: load the line, compute the new
//! quantity, persist it, project the whole cart, then publish one event.
//! Publishing is the last step and optional: an event goes out only for a
//! call that succeeds, and nothing that happens while reporting a change can
//! fail the change itself.

use crate::errors::AppError;
use crate::events::CartEvent;
use crate::models::CartEntry;
use crate::pipelines::contexts::{
  AddToCartCtxData, AdjustCartCtxData, AdjustOutcome, CartProjection, RemoveFromCartCtxData, ViewCartCtxData,
};
use crate::state::AppState;
use std::collections::HashMap;
use storefront_flow::{ContextData, FlowRegistry, Pipeline, PipelineControl};
use tracing::{debug, info, instrument, warn};

pub fn register_cart_pipelines(flows: &FlowRegistry<AppError>) {
  let mut add = Pipeline::<AddToCartCtxData, AppError>::new(&[
    ("load_line", false, None),
    ("resolve_product", false, None),
    ("reconcile_quantity", false, None),
    ("persist_line", false, None),
    ("project_cart", false, None),
    ("publish_event", true, None),
  ]);
  add.on("load_line", load_add_line);
  add.on("resolve_product", resolve_product);
  add.on("reconcile_quantity", reconcile_add);
  add.on("persist_line", persist_added_line);
  add.on("project_cart", project_cart_step::<AddToCartCtxData>);
  add.on("publish_event", publish_line_added);
  flows.register_pipeline(add);

  let mut adjust = Pipeline::<AdjustCartCtxData, AppError>::new(&[
    ("load_line", false, None),
    ("reconcile_quantity", false, None),
    ("persist_line", false, None),
    ("project_cart", false, None),
    ("publish_event", true, None),
  ]);
  adjust.on("load_line", load_adjust_line);
  adjust.on("reconcile_quantity", reconcile_adjust);
  adjust.on("persist_line", persist_adjusted_line);
  adjust.on("project_cart", project_cart_step::<AdjustCartCtxData>);
  adjust.on("publish_event", publish_line_adjusted);
  flows.register_pipeline(adjust);

  let mut remove = Pipeline::<RemoveFromCartCtxData, AppError>::new(&[
    ("delete_line", false, None),
    ("project_cart", false, None),
  ]);
  remove.on("delete_line", delete_line);
  remove.on("project_cart", project_cart_step::<RemoveFromCartCtxData>);
  flows.register_pipeline(remove);

  let mut view = Pipeline::<ViewCartCtxData, AppError>::new(&[("project_cart", false, None)]);
  view.on("project_cart", project_cart_step::<ViewCartCtxData>);
  flows.register_pipeline(view);

  info!("Cart pipelines registered.");
}

/// Every line joined with its product; lines with a non-positive quantity are left out.
#[instrument(name = "cart::project", skip(app_state))]
pub async fn project_cart(app_state: &AppState) -> Result<Vec<CartEntry>, AppError> {
  let lines = app_state.stores.cart.list_lines().await?;
  let ids: Vec<_> = lines.iter().map(|l| l.product_id).collect();
  let products = app_state.stores.catalog.find_products(&ids).await?;
  let by_id: HashMap<_, _> = products.into_iter().map(|p| (p.id, p)).collect();
  let cart = CartEntry::project(lines, &by_id);
  debug!(entries = cart.len(), "Cart projected.");
  Ok(cart)
}

async fn project_cart_step<T: CartProjection>(ctx_data: ContextData<T>) -> Result<PipelineControl, AppError> {
  let app_state = ctx_data.read().app_state().clone();
  let cart = project_cart(&app_state).await?;
  ctx_data.write().set_cart(cart);
  Ok(PipelineControl::Continue)
}

// --- Add ---

async fn load_add_line(ctx_data: ContextData<AddToCartCtxData>) -> Result<PipelineControl, AppError> {
  let (app_state, product_id) = {
    let guard = ctx_data.read();
    (guard.app_state.clone(), guard.product_id)
  };
  let line = app_state.stores.cart.find_line(product_id).await?;
  debug!(%product_id, existing = line.is_some(), "Cart line loaded.");
  ctx_data.write().existing_line = line;
  Ok(PipelineControl::Continue)
}

async fn resolve_product(ctx_data: ContextData<AddToCartCtxData>) -> Result<PipelineControl, AppError> {
  let (app_state, product_id, line_exists) = {
    let guard = ctx_data.read();
    (guard.app_state.clone(), guard.product_id, guard.existing_line.is_some())
  };
  let product = app_state.stores.catalog.find_product(product_id).await?;
  if product.is_none() && !line_exists {
    warn!(%product_id, "Add to cart for unknown product.");
    return Err(AppError::NotFound("Product not found".to_string()));
  }
  ctx_data.write().product = product;
  Ok(PipelineControl::Continue)
}

async fn reconcile_add(ctx_data: ContextData<AddToCartCtxData>) -> Result<PipelineControl, AppError> {
  let mut guard = ctx_data.write();
  // An existing line only ever grows by delta here, even below zero.
  let new_quantity = match &guard.existing_line {
    Some(line) => line
      .quantity
      .checked_add(guard.delta)
      .ok_or_else(|| AppError::Validation("Quantity out of range".to_string()))?,
    None => guard.delta,
  };
  guard.new_quantity = Some(new_quantity);
  Ok(PipelineControl::Continue)
}

async fn persist_added_line(ctx_data: ContextData<AddToCartCtxData>) -> Result<PipelineControl, AppError> {
  let (app_state, product_id, new_quantity) = {
    let guard = ctx_data.read();
    (guard.app_state.clone(), guard.product_id, guard.new_quantity)
  };
  let quantity = new_quantity.ok_or_else(|| AppError::Internal("Quantity was not reconciled".to_string()))?;
  let line = app_state.stores.cart.upsert_line(product_id, quantity).await?;
  info!(%product_id, quantity = line.quantity, "Cart line saved.");
  Ok(PipelineControl::Continue)
}

async fn publish_line_added(ctx_data: ContextData<AddToCartCtxData>) -> Result<PipelineControl, AppError> {
  let (app_state, event) = {
    let guard = ctx_data.read();
    let quantity = guard
      .new_quantity
      .ok_or_else(|| AppError::Internal("Quantity was not reconciled".to_string()))?;
    let event = CartEvent::LineAdded {
      product_id: guard.product_id,
      product_name: guard.product.as_ref().map(|p| p.name.clone()),
      delta: guard.delta,
      quantity,
    };
    (guard.app_state.clone(), event)
  };
  app_state.events.publish(event);
  Ok(PipelineControl::Continue)
}

// --- Adjust ---

async fn load_adjust_line(ctx_data: ContextData<AdjustCartCtxData>) -> Result<PipelineControl, AppError> {
  let (app_state, product_id) = {
    let guard = ctx_data.read();
    (guard.app_state.clone(), guard.product_id)
  };
  match app_state.stores.cart.find_line(product_id).await? {
    Some(line) => {
      let product = app_state.stores.catalog.find_product(product_id).await?;
      let mut guard = ctx_data.write();
      guard.existing_line = Some(line);
      guard.product = product;
      Ok(PipelineControl::Continue)
    }
    None => {
      debug!(%product_id, "Adjust on absent cart line.");
      Err(AppError::NotFound("Item not found".to_string()))
    }
  }
}

async fn reconcile_adjust(ctx_data: ContextData<AdjustCartCtxData>) -> Result<PipelineControl, AppError> {
  let mut guard = ctx_data.write();
  let current = guard
    .existing_line
    .as_ref()
    .map(|line| line.quantity)
    .ok_or_else(|| AppError::Internal("Cart line was not loaded".to_string()))?;
  let new_quantity = current
    .checked_add(guard.delta)
    .ok_or_else(|| AppError::Validation("Quantity out of range".to_string()))?;
  guard.outcome = Some(if new_quantity <= 0 {
    AdjustOutcome::Deleted
  } else {
    AdjustOutcome::Updated(new_quantity)
  });
  Ok(PipelineControl::Continue)
}

async fn persist_adjusted_line(ctx_data: ContextData<AdjustCartCtxData>) -> Result<PipelineControl, AppError> {
  let (app_state, product_id, outcome) = {
    let guard = ctx_data.read();
    (guard.app_state.clone(), guard.product_id, guard.outcome)
  };
  match outcome {
    Some(AdjustOutcome::Updated(quantity)) => {
      app_state.stores.cart.upsert_line(product_id, quantity).await?;
      info!(%product_id, quantity, "Cart line updated.");
    }
    Some(AdjustOutcome::Deleted) => {
      app_state.stores.cart.delete_line(product_id).await?;
      info!(%product_id, "Cart line dropped to zero and was deleted.");
    }
    None => return Err(AppError::Internal("Adjustment was not reconciled".to_string())),
  }
  Ok(PipelineControl::Continue)
}

async fn publish_line_adjusted(ctx_data: ContextData<AdjustCartCtxData>) -> Result<PipelineControl, AppError> {
  let (app_state, product_id, delta, outcome, product_name) = {
    let guard = ctx_data.read();
    let product_name = guard.product.as_ref().map(|p| p.name.clone());
    (guard.app_state.clone(), guard.product_id, guard.delta, guard.outcome, product_name)
  };
  let event = match outcome {
    Some(AdjustOutcome::Updated(quantity)) => CartEvent::LineAdjusted {
      product_id,
      product_name,
      delta,
      quantity,
    },
    Some(AdjustOutcome::Deleted) => CartEvent::LineRemoved {
      product_id,
      product_name,
      delta,
    },
    None => return Err(AppError::Internal("Adjustment was not reconciled".to_string())),
  };
  app_state.events.publish(event);
  Ok(PipelineControl::Continue)
}

// --- Remove ---

async fn delete_line(ctx_data: ContextData<RemoveFromCartCtxData>) -> Result<PipelineControl, AppError> {
  let (app_state, product_id) = {
    let guard = ctx_data.read();
    (guard.app_state.clone(), guard.product_id)
  };
  let removed = app_state.stores.cart.delete_line(product_id).await?;
  debug!(%product_id, removed, "Cart line delete requested.");
  ctx_data.write().removed = removed;
  Ok(PipelineControl::Continue)
}
