// storefront/src/services/catalog_service.rs

use crate::errors::AppError;
use crate::models::{NewProduct, Product};
use crate::store::CatalogStore;
use tracing::{info, instrument};

const SAMPLE_PRODUCTS: &[(&str, f64, Option<&str>)] = &[
  ("Pen", 1.0, None),
  ("Notebook", 4.5, Some("/images/notebook.png")),
  ("Backpack", 39.99, Some("/images/backpack.png")),
  ("Water Bottle", 12.0, None),
];

#[instrument(name = "catalog_service::create_product", skip(catalog, input), err(Display))]
pub async fn create_product(catalog: &dyn CatalogStore, input: NewProduct) -> Result<Product, AppError> {
  let (name, price, image) = input.validated()?;
  let product = catalog.insert_product(&name, price, image.as_deref()).await?;
  info!(product_id = %product.id, name = %product.name, "Product added.");
  Ok(product)
}

/// Inserts sample products into an empty catalog. Returns how many were added.
#[instrument(name = "catalog_service::seed_catalog", skip(catalog), err(Display))]
pub async fn seed_catalog(catalog: &dyn CatalogStore) -> Result<usize, AppError> {
  if catalog.count_products().await? > 0 {
    info!("Catalog already populated; seeding skipped.");
    return Ok(0);
  }
  for (name, price, image) in SAMPLE_PRODUCTS {
    catalog.insert_product(name, *price, *image).await?;
  }
  info!(count = SAMPLE_PRODUCTS.len(), "Catalog seeded.");
  Ok(SAMPLE_PRODUCTS.len())
}
