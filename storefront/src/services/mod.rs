// storefront/src/services/mod.rs

pub mod auth_service;
pub mod cart_service;
pub mod catalog_service;
pub mod mailer;
pub mod notifier;
pub mod token;
