//! `stoa-core` — shared domain foundations.
//!
//! Strongly-typed identifiers, the platform-wide error taxonomy, and small
//! value objects. No storage, transport, or token concerns live here.

pub mod email;
pub mod error;
pub mod id;

pub use email::Email;
pub use error::{DomainError, DomainResult};
pub use id::{AccountId, CartItemId, CompanyId, OrderId, ProductId};
