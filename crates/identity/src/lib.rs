//! `stoa-identity` — account documents and credential-backed identity.
//!
//! Accounts carry a role and the role-dependent company scope that token
//! issuance and the visibility policy read. Persistence is reached through
//! the [`AccountStore`] seam.

pub mod account;
pub mod service;
pub mod store;

pub use account::{Account, AccountStore, AccountsDirectory};
pub use service::{IdentityService, ProfileUpdate, RegisterAccount};
pub use store::InMemoryAccountStore;
