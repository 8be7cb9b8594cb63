// storefront/src/main.rs

use std::io;
use std::sync::Arc;

use actix_web::{web as actix_data, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

use storefront::config::{AppConfig, LogFormat, StoreBackend};
use storefront::errors::AppError;
use storefront::services::{catalog_service, mailer};
use storefront::state::AppState;
use storefront::store::{postgres, Stores};
use storefront::web::{configure_app_routes, cors_for};

fn init_tracing(format: LogFormat) {
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::INFO.as_str()));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_span_events(FmtSpan::CLOSE);
  match format {
    LogFormat::Json => builder.json().init(),
    LogFormat::Pretty => builder.init(),
  }
}

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
  tracing::error!(error = %err, "{}", context);
  io::Error::other(format!("{}: {}", context, err))
}

async fn build_stores(app_config: &AppConfig) -> Result<Stores, AppError> {
  match app_config.store_backend {
    StoreBackend::Memory => {
      tracing::warn!("Using the in-memory store; data is lost on restart.");
      Ok(Stores::in_memory())
    }
    StoreBackend::Postgres => {
      let database_url = app_config
        .database_url
        .as_deref()
        .ok_or_else(|| AppError::Config("DATABASE_URL is required for the postgres backend".to_string()))?;
      let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(|e| AppError::Persistence(format!("Failed to connect to the database: {}", e)))?;
      tracing::info!("Successfully connected to the database.");
      postgres::apply_schema(&pool).await?;
      Ok(Stores::postgres(pool))
    }
  }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => {
      init_tracing(cfg.log_format);
      Arc::new(cfg)
    }
    Err(e) => {
      init_tracing(LogFormat::Pretty);
      return Err(startup_error("Failed to load application configuration", e));
    }
  };
  tracing::info!(config = ?app_config, "Starting storefront server...");

  let stores = build_stores(&app_config)
    .await
    .map_err(|e| startup_error("Failed to initialise storage", e))?;

  if app_config.seed_db {
    let seeded = catalog_service::seed_catalog(stores.catalog.as_ref())
      .await
      .map_err(|e| startup_error("Failed to seed the catalog", e))?;
    tracing::info!(seeded, "Catalog seeding finished.");
  }

  let mailer = mailer::mailer_from_config(&app_config.notify)
    .map_err(|e| startup_error("Failed to build the notification mailer", e))?;

  let app_state = AppState::new(app_config.clone(), stores, mailer)
    .map_err(|e| startup_error("Failed to build application state", e))?;

  let server_address = app_config.bind_address();
  let frontend_url = app_config.frontend_url.clone();
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(cors_for(&frontend_url))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
