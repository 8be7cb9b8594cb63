// storefront/src/pipelines/contexts.rs

//! Data structs the pipelines run over. Handlers receive them wrapped in
//! `storefront_flow::ContextData`.

use crate::models::{CartEntry, CartLine, Product, User};
use crate::state::AppState;
use uuid::Uuid;

/// Contexts whose pipeline ends by projecting the whole cart.
pub trait CartProjection: Send + Sync + 'static {
  fn app_state(&self) -> &AppState;

  fn set_cart(&mut self, cart: Vec<CartEntry>);

  fn take_cart(&mut self) -> Vec<CartEntry>;
}

macro_rules! impl_cart_projection {
  ($($ctx:ty),+ $(,)?) => {
    $(
      impl CartProjection for $ctx {
        fn app_state(&self) -> &AppState {
          &self.app_state
        }

        fn set_cart(&mut self, cart: Vec<CartEntry>) {
          self.cart = cart;
        }

        fn take_cart(&mut self) -> Vec<CartEntry> {
          std::mem::take(&mut self.cart)
        }
      }
    )+
  };
}

#[derive(Clone)]
pub struct AddToCartCtxData {
  pub app_state: AppState,
  pub product_id: Uuid,
  pub delta: i32,
  pub existing_line: Option<CartLine>,
  pub product: Option<Product>,
  /// Quantity to persist, set by the reconcile step.
  pub new_quantity: Option<i32>,
  pub cart: Vec<CartEntry>,
}

impl AddToCartCtxData {
  pub fn new(app_state: AppState, product_id: Uuid, delta: i32) -> Self {
    Self {
      app_state,
      product_id,
      delta,
      existing_line: None,
      product: None,
      new_quantity: None,
      cart: Vec::new(),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustOutcome {
  Updated(i32),
  Deleted,
}

#[derive(Clone)]
pub struct AdjustCartCtxData {
  pub app_state: AppState,
  pub product_id: Uuid,
  pub delta: i32,
  pub existing_line: Option<CartLine>,
  /// `None` when the line outlived its product.
  pub product: Option<Product>,
  pub outcome: Option<AdjustOutcome>,
  pub cart: Vec<CartEntry>,
}

impl AdjustCartCtxData {
  pub fn new(app_state: AppState, product_id: Uuid, delta: i32) -> Self {
    Self {
      app_state,
      product_id,
      delta,
      existing_line: None,
      product: None,
      outcome: None,
      cart: Vec::new(),
    }
  }
}

#[derive(Clone)]
pub struct RemoveFromCartCtxData {
  pub app_state: AppState,
  pub product_id: Uuid,
  pub removed: bool,
  pub cart: Vec<CartEntry>,
}

impl RemoveFromCartCtxData {
  pub fn new(app_state: AppState, product_id: Uuid) -> Self {
    Self {
      app_state,
      product_id,
      removed: false,
      cart: Vec::new(),
    }
  }
}

#[derive(Clone)]
pub struct ViewCartCtxData {
  pub app_state: AppState,
  pub cart: Vec<CartEntry>,
}

impl ViewCartCtxData {
  pub fn new(app_state: AppState) -> Self {
    Self {
      app_state,
      cart: Vec::new(),
    }
  }
}

impl_cart_projection!(AddToCartCtxData, AdjustCartCtxData, RemoveFromCartCtxData, ViewCartCtxData);

#[derive(Clone)]
pub struct SignupCtxData {
  pub app_state: AppState,
  pub username: String,
  pub password: String,
  pub password_hash: Option<String>,
  pub created_user_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct SigninCtxData {
  pub app_state: AppState,
  pub username: String,
  pub password: String,
  pub user: Option<User>,
  pub token: Option<String>,
}
