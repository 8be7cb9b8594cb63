// storefront/src/models/mod.rs

//! Records persisted by the stores, plus the cart projection returned to clients.

pub mod cart_entry;
pub mod cart_line;
pub mod product;
pub mod user;

pub use cart_entry::CartEntry;
pub use cart_line::CartLine;
pub use product::{NewProduct, Product};
pub use user::User;
