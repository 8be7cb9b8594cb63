// storefront/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::models::NewProduct;
use crate::services::catalog_service;
use crate::state::AppState;

#[instrument(name = "handler::create_product", skip(app_state, req_payload))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<NewProduct>,
) -> Result<HttpResponse, AppError> {
  let product = catalog_service::create_product(app_state.stores.catalog.as_ref(), req_payload.into_inner()).await?;
  Ok(HttpResponse::Created().json(json!({
      "message": "Product added successfully",
      "product": product
  })))
}

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = app_state.stores.catalog.list_products().await?;
  info!(count = products.len(), "Products fetched.");
  Ok(HttpResponse::Ok().json(products))
}
