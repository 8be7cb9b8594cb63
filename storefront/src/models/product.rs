// storefront/src/models/product.rs

use crate::errors::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub price: f64,
  pub image: Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Catalog input as received on `POST /api/products`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
  #[serde(default)]
  pub name: String,
  pub price: Option<f64>,
  #[serde(default)]
  pub image: Option<String>,
}

impl NewProduct {
  /// Checks the input and returns the normalized `(name, price, image)`.
  pub fn validated(self) -> Result<(String, f64, Option<String>), AppError> {
    let name = self.name.trim().to_string();
    if name.is_empty() {
      return Err(AppError::Validation("Product name is required".to_string()));
    }
    let price = match self.price {
      Some(p) if p.is_finite() && p >= 0.0 => p,
      Some(_) => return Err(AppError::Validation("Product price must be a non-negative number".to_string())),
      None => return Err(AppError::Validation("Product price is required".to_string())),
    };
    let image = self.image.map(|i| i.trim().to_string()).filter(|i| !i.is_empty());
    Ok((name, price, image))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn input(name: &str, price: Option<f64>, image: Option<&str>) -> NewProduct {
    NewProduct {
      name: name.to_string(),
      price,
      image: image.map(str::to_string),
    }
  }

  #[test]
  fn accepts_and_normalizes_valid_input() {
    let (name, price, image) = input("  Pen ", Some(1.0), Some(" ")).validated().unwrap();
    assert_eq!(name, "Pen");
    assert_eq!(price, 1.0);
    assert_eq!(image, None);
  }

  #[test]
  fn rejects_blank_name_and_bad_prices() {
    assert!(input(" ", Some(1.0), None).validated().is_err());
    assert!(input("Pen", None, None).validated().is_err());
    assert!(input("Pen", Some(-0.5), None).validated().is_err());
    assert!(input("Pen", Some(f64::NAN), None).validated().is_err());
  }

  #[test]
  fn serializes_with_camel_case_keys() {
    let product = Product {
      id: Uuid::nil(),
      name: "Pen".into(),
      price: 1.5,
      image: None,
      created_at: Utc::now(),
    };
    let value = serde_json::to_value(&product).unwrap();
    assert!(value.get("createdAt").is_some());
    assert_eq!(value["price"], 1.5);
  }
}
