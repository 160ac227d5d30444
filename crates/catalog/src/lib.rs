//! `stoa-catalog` — product documents offered by organizations.

pub mod product;
pub mod service;
pub mod store;

pub use product::{Product, ProductStore};
pub use service::{CatalogService, CreateProduct, ProductUpdate};
pub use store::InMemoryProductStore;
