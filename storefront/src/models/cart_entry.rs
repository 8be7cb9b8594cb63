// storefront/src/models/cart_entry.rs

use crate::models::{CartLine, Product};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// A cart line joined with its product, as returned by every cart route.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
  pub product_id: Uuid,
  /// `None` when the referenced product no longer resolves.
  pub product: Option<Product>,
  pub quantity: i32,
}

impl CartEntry {
  /// Joins `lines` with `products`, keeping line order.
  ///
  /// Lines with a non-positive quantity are left out of the projection; they
  /// can only exist after an add with a negative delta.
  pub fn project(lines: Vec<CartLine>, products: &HashMap<Uuid, Product>) -> Vec<CartEntry> {
    lines
      .into_iter()
      .filter(|line| line.quantity > 0)
      .map(|line| CartEntry {
        product_id: line.product_id,
        product: products.get(&line.product_id).cloned(),
        quantity: line.quantity,
      })
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;

  fn line(product_id: Uuid, quantity: i32) -> CartLine {
    CartLine {
      product_id,
      quantity,
      updated_at: Utc::now(),
    }
  }

  #[test]
  fn joins_products_and_drops_non_positive_lines() {
    let pen = Product {
      id: Uuid::new_v4(),
      name: "Pen".into(),
      price: 1.0,
      image: None,
      created_at: Utc::now(),
    };
    let dangling = Uuid::new_v4();
    let drained = Uuid::new_v4();
    let products = HashMap::from([(pen.id, pen.clone())]);

    let entries = CartEntry::project(vec![line(pen.id, 3), line(drained, 0), line(dangling, 2)], &products);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].product.as_ref().map(|p| p.name.as_str()), Some("Pen"));
    assert_eq!(entries[0].quantity, 3);
    assert_eq!(entries[1].product_id, dangling);
    assert!(entries[1].product.is_none());
  }

  #[test]
  fn serializes_missing_product_as_null() {
    let entry = CartEntry {
      product_id: Uuid::nil(),
      product: None,
      quantity: 1,
    };
    let value = serde_json::to_value(entry).unwrap();
    assert!(value["product"].is_null());
    assert_eq!(value["productId"], "00000000-0000-0000-0000-000000000000");
  }
}
