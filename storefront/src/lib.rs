// storefront/src/lib.rs

//! Storefront service: product catalog, credential-based signup and login,
//! and a single shared shopping cart whose mutations run as
//! `storefront_flow` pipelines.

pub mod config;
pub mod errors;
pub mod events;
pub mod models;
pub mod pipelines;
pub mod services;
pub mod state;
pub mod store;
pub mod web;
