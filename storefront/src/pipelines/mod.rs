// storefront/src/pipelines/mod.rs

//! Pipelines for every multi-step operation, and their registration.

use crate::errors::AppError;
use storefront_flow::FlowRegistry;

pub mod cart_pipeline;
pub mod contexts;
pub mod signin_pipeline;
pub mod signup_pipeline;

/// Registers every pipeline with `flows`. Called once while building the app state.
pub fn register_all_pipelines(flows: &FlowRegistry<AppError>) {
  signup_pipeline::register_signup_pipeline(flows);
  signin_pipeline::register_signin_pipeline(flows);
  cart_pipeline::register_cart_pipelines(flows);
  tracing::info!("All application pipelines registered.");
}
