//! `stoa-orders` — order documents and the order half of the consistency
//! layer.
//!
//! Orders are the one resource whose visibility spans entities: a company
//! sees its own orders, orders logged against its organization, and orders
//! placed by its customers, which requires resolving the customer roster
//! from the organization document at query time.

pub mod order;
pub mod service;
pub mod store;

pub use order::{Order, OrderLine, OrderStatus, OrderStore};
pub use service::{CreateOrder, OrderLineInput, OrderService, OrderUpdate};
pub use store::InMemoryOrderStore;
