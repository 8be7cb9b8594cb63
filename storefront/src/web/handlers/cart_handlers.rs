// storefront/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::cart_service;
use crate::state::AppState;

fn default_quantity() -> i32 {
  1
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartPayload {
  pub product_id: Uuid,
  /// Defaults to one item when omitted.
  #[serde(default = "default_quantity")]
  pub quantity: i32,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartPayload {
  pub product_id: Uuid,
  pub change: i32,
}

#[instrument(name = "handler::view_cart", skip(app_state))]
pub async fn view_cart_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let cart = cart_service::list_lines(app_state.get_ref()).await?;
  Ok(HttpResponse::Ok().json(cart))
}

#[instrument(
  name = "handler::add_to_cart",
  skip(app_state, req_payload),
  fields(product_id = %req_payload.product_id, quantity = req_payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<AddToCartPayload>,
) -> Result<HttpResponse, AppError> {
  let cart = cart_service::add_quantity(app_state.get_ref(), req_payload.product_id, req_payload.quantity).await?;
  Ok(HttpResponse::Ok().json(cart))
}

#[instrument(
  name = "handler::update_cart",
  skip(app_state, req_payload),
  fields(product_id = %req_payload.product_id, change = req_payload.change)
)]
pub async fn update_cart_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<UpdateCartPayload>,
) -> Result<HttpResponse, AppError> {
  let cart = cart_service::adjust_quantity(app_state.get_ref(), req_payload.product_id, req_payload.change).await?;
  Ok(HttpResponse::Ok().json(cart))
}

#[instrument(name = "handler::remove_from_cart", skip(app_state, path), fields(product_id = %*path))]
pub async fn remove_from_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let cart = cart_service::remove_line(app_state.get_ref(), path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(cart))
}
