//! Shopping carts.
//!
//! Each customer owns at most one cart, keyed by account id. Line items
//! carry their own generated id so they can be updated or removed without
//! re-stating the product, and adding a product that is already in the
//! cart merges quantities instead of growing a second line.

mod cart;
mod service;
mod store;

pub use cart::{Cart, CartItem, CartStore};
pub use service::{AddCartItem, CartService};
pub use store::InMemoryCartStore;
