// storefront/tests/cart_engine_tests.rs
mod common;
use common::*;
use storefront::config::CartConsistency;
use storefront::errors::AppError;
use storefront::services::cart_service;
use storefront::store::CartLineStore;
use uuid::Uuid;

#[tokio::test]
async fn pen_scenario_add_grow_collapse_then_not_found() {
  setup_tracing();
  let (state, _mailer) = test_state(CartConsistency::Serialized);
  let pen = seed_product(&state, "Pen", 1.5).await;

  let cart = cart_service::add_quantity(&state, pen.id, 3).await.unwrap();
  assert_eq!(cart.len(), 1);
  assert_eq!(cart[0].product_id, pen.id);
  assert_eq!(cart[0].quantity, 3);
  assert_eq!(cart[0].product.as_ref().map(|p| p.name.as_str()), Some("Pen"));

  let cart = cart_service::add_quantity(&state, pen.id, 2).await.unwrap();
  assert_eq!(cart.len(), 1, "adding again grows the same line");
  assert_eq!(cart[0].quantity, 5);

  let cart = cart_service::adjust_quantity(&state, pen.id, -5).await.unwrap();
  assert!(cart.is_empty());
  assert!(state.stores.cart.find_line(pen.id).await.unwrap().is_none());

  match cart_service::adjust_quantity(&state, pen.id, -1).await {
    Err(AppError::NotFound(msg)) => assert_eq!(msg, "Item not found"),
    other => panic!("expected NotFound, got {:?}", other),
  }
}

#[tokio::test]
async fn adjust_keeps_positive_results() {
  setup_tracing();
  let (state, _mailer) = test_state(CartConsistency::Serialized);
  let pen = seed_product(&state, "Pen", 1.5).await;
  cart_service::add_quantity(&state, pen.id, 5).await.unwrap();

  let cart = cart_service::adjust_quantity(&state, pen.id, -4).await.unwrap();
  assert_eq!(cart[0].quantity, 1);
  let cart = cart_service::adjust_quantity(&state, pen.id, 6).await.unwrap();
  assert_eq!(cart[0].quantity, 7);
}

#[tokio::test]
async fn at_most_one_line_per_product() {
  setup_tracing();
  let (state, _mailer) = test_state(CartConsistency::Serialized);
  let pen = seed_product(&state, "Pen", 1.5).await;
  let book = seed_product(&state, "Book", 12.0).await;

  for _ in 0..3 {
    cart_service::add_quantity(&state, pen.id, 1).await.unwrap();
  }
  let cart = cart_service::add_quantity(&state, book.id, 2).await.unwrap();

  assert_eq!(cart.len(), 2);
  let pen_entry = cart.iter().find(|e| e.product_id == pen.id).unwrap();
  let book_entry = cart.iter().find(|e| e.product_id == book.id).unwrap();
  assert_eq!(pen_entry.quantity, 3);
  assert_eq!(book_entry.quantity, 2);
}

#[tokio::test]
async fn adjust_of_absent_line_is_not_found() {
  setup_tracing();
  let (state, _mailer) = test_state(CartConsistency::Serialized);
  let pen = seed_product(&state, "Pen", 1.5).await;

  match cart_service::adjust_quantity(&state, pen.id, 1).await {
    Err(AppError::NotFound(msg)) => assert_eq!(msg, "Item not found"),
    other => panic!("expected NotFound, got {:?}", other),
  }
  assert!(cart_service::list_lines(&state).await.unwrap().is_empty());
}

#[tokio::test]
async fn adding_an_unknown_product_is_not_found() {
  setup_tracing();
  let (state, _mailer) = test_state(CartConsistency::Serialized);

  match cart_service::add_quantity(&state, Uuid::new_v4(), 1).await {
    Err(AppError::NotFound(msg)) => assert_eq!(msg, "Product not found"),
    other => panic!("expected NotFound, got {:?}", other),
  }
  assert!(state.stores.cart.list_lines().await.unwrap().is_empty());
}

#[tokio::test]
async fn remove_is_idempotent() {
  setup_tracing();
  let (state, _mailer) = test_state(CartConsistency::Serialized);
  let pen = seed_product(&state, "Pen", 1.5).await;
  let book = seed_product(&state, "Book", 12.0).await;
  cart_service::add_quantity(&state, pen.id, 2).await.unwrap();
  cart_service::add_quantity(&state, book.id, 1).await.unwrap();

  let cart = cart_service::remove_line(&state, pen.id).await.unwrap();
  assert_eq!(cart.len(), 1);
  assert_eq!(cart[0].product_id, book.id);

  let again = cart_service::remove_line(&state, pen.id).await.unwrap();
  assert_eq!(again, cart);

  let unknown = cart_service::remove_line(&state, Uuid::new_v4()).await.unwrap();
  assert_eq!(unknown, cart);
}

#[tokio::test]
async fn negative_add_never_deletes_but_hides_the_line() {
  setup_tracing();
  let (state, _mailer) = test_state(CartConsistency::Serialized);
  let pen = seed_product(&state, "Pen", 1.5).await;
  cart_service::add_quantity(&state, pen.id, 2).await.unwrap();

  let cart = cart_service::add_quantity(&state, pen.id, -5).await.unwrap();
  assert!(cart.is_empty());

  let stored = state.stores.cart.find_line(pen.id).await.unwrap().expect("line kept");
  assert_eq!(stored.quantity, -3);

  // The hidden line still accumulates.
  let cart = cart_service::add_quantity(&state, pen.id, 4).await.unwrap();
  assert_eq!(cart.len(), 1);
  assert_eq!(cart[0].quantity, 1);
}

#[tokio::test]
async fn adjust_to_exactly_zero_deletes() {
  setup_tracing();
  let (state, _mailer) = test_state(CartConsistency::Serialized);
  let pen = seed_product(&state, "Pen", 1.5).await;
  cart_service::add_quantity(&state, pen.id, 3).await.unwrap();

  let cart = cart_service::adjust_quantity(&state, pen.id, -3).await.unwrap();
  assert!(cart.is_empty());
  assert!(matches!(
    cart_service::adjust_quantity(&state, pen.id, 1).await,
    Err(AppError::NotFound(_))
  ));
}

#[tokio::test]
async fn quantity_overflow_is_rejected() {
  setup_tracing();
  let (state, _mailer) = test_state(CartConsistency::Serialized);
  let pen = seed_product(&state, "Pen", 1.5).await;
  cart_service::add_quantity(&state, pen.id, i32::MAX).await.unwrap();

  assert!(matches!(
    cart_service::add_quantity(&state, pen.id, 1).await,
    Err(AppError::Validation(_))
  ));
  assert!(matches!(
    cart_service::adjust_quantity(&state, pen.id, 1).await,
    Err(AppError::Validation(_))
  ));
  let stored = state.stores.cart.find_line(pen.id).await.unwrap().unwrap();
  assert_eq!(stored.quantity, i32::MAX);
}

#[tokio::test]
async fn line_with_deleted_product_projects_without_product() {
  setup_tracing();
  let (state, _mailer) = test_state(CartConsistency::Serialized);
  let ghost = Uuid::new_v4();
  state.stores.cart.upsert_line(ghost, 2).await.unwrap();

  let cart = cart_service::list_lines(&state).await.unwrap();
  assert_eq!(cart.len(), 1);
  assert_eq!(cart[0].product_id, ghost);
  assert!(cart[0].product.is_none());

  // An existing line may still grow after its product vanished.
  let cart = cart_service::add_quantity(&state, ghost, 1).await.unwrap();
  assert_eq!(cart[0].quantity, 3);
}

#[tokio::test]
async fn listing_does_not_mutate() {
  setup_tracing();
  let (state, _mailer) = test_state(CartConsistency::Serialized);
  let pen = seed_product(&state, "Pen", 1.5).await;
  cart_service::add_quantity(&state, pen.id, 2).await.unwrap();

  let first = cart_service::list_lines(&state).await.unwrap();
  let second = cart_service::list_lines(&state).await.unwrap();
  assert_eq!(first, second);
}

#[tokio::test]
async fn line_locks_do_not_accumulate_for_unknown_products() {
  setup_tracing();
  let (state, _mailer) = test_state(CartConsistency::Serialized);
  let pen = seed_product(&state, "Pen", 1.5).await;
  cart_service::add_quantity(&state, pen.id, 1).await.unwrap();

  for _ in 0..200 {
    cart_service::remove_line(&state, Uuid::new_v4()).await.unwrap();
    assert!(cart_service::add_quantity(&state, Uuid::new_v4(), 1).await.is_err());
    assert!(cart_service::adjust_quantity(&state, Uuid::new_v4(), 1).await.is_err());
  }
  cart_service::adjust_quantity(&state, pen.id, 1).await.unwrap();

  assert_eq!(state.line_locks.active_slots(), 0);
}

#[tokio::test]
async fn failed_writes_surface_as_persistence_errors_without_side_effects() {
  setup_tracing();
  let (stores, memory) = unwritable_cart_stores();
  let mailer = std::sync::Arc::new(CountingMailer::default());
  let state = state_with(CartConsistency::Serialized, stores, mailer.clone());
  let pen = seed_product(&state, "Pen", 1.5).await;
  let book = seed_product(&state, "Book", 12.0).await;
  memory.upsert_line(pen.id, 2).await.unwrap();

  assert!(matches!(
    cart_service::add_quantity(&state, pen.id, 3).await,
    Err(AppError::Persistence(_))
  ));
  assert!(matches!(
    cart_service::add_quantity(&state, book.id, 1).await,
    Err(AppError::Persistence(_))
  ));
  assert!(matches!(
    cart_service::adjust_quantity(&state, pen.id, -2).await,
    Err(AppError::Persistence(_))
  ));
  assert!(matches!(
    cart_service::remove_line(&state, pen.id).await,
    Err(AppError::Persistence(_))
  ));

  tokio::time::sleep(SETTLE).await;
  assert_eq!(mailer.count(), 0);

  let lines = memory.list_lines().await.unwrap();
  assert_eq!(lines.len(), 1);
  assert_eq!(lines[0].product_id, pen.id);
  assert_eq!(lines[0].quantity, 2);
}
