// storefront/src/web/routes.rs

use crate::errors::AppError;
use crate::web::handlers::{auth_handlers, cart_handlers, product_handlers};
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{web, HttpResponse};

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Registers every route plus the extractor configs that turn malformed
/// bodies and path ids into `400 {"error": ...}` responses.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  let json_config = web::JsonConfig::default().error_handler(|err, _req| {
    tracing::debug!(error = %err, "Rejected request body.");
    AppError::Validation(format!("Invalid request body: {}", err)).into()
  });
  let path_config = web::PathConfig::default().error_handler(|err, _req| {
    AppError::Validation(format!("Invalid path parameter: {}", err)).into()
  });

  cfg
    .app_data(json_config)
    .app_data(path_config)
    .route("/health", web::get().to(health_check_handler))
    .service(
      web::scope("/api")
        .route("/signup", web::post().to(auth_handlers::signup_handler))
        .route("/login", web::post().to(auth_handlers::login_handler))
        .service(
          web::resource("/products")
            .route(web::get().to(product_handlers::list_products_handler))
            .route(web::post().to(product_handlers::create_product_handler)),
        ),
    )
    .service(
      web::scope("/cart")
        .route("", web::get().to(cart_handlers::view_cart_handler))
        .route("", web::post().to(cart_handlers::add_to_cart_handler))
        .route("/update", web::put().to(cart_handlers::update_cart_handler))
        .route("/remove/{product_id}", web::delete().to(cart_handlers::remove_from_cart_handler)),
    );
}

/// CORS policy for the single configured frontend origin.
pub fn cors_for(frontend_url: &str) -> Cors {
  Cors::default()
    .allowed_origin(frontend_url)
    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
    .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
    .max_age(3600)
}
