//! Storage assembly.
//!
//! Each domain crate defines its own store trait next to an in-memory
//! implementation; this crate bundles one instance of each behind shared
//! handles so the API layer and tests can wire every service against the
//! same data.

mod bundle;

pub use bundle::Store;

pub use stoa_auth::{CredentialStore, InMemoryCredentialStore};
pub use stoa_cart::{CartStore, InMemoryCartStore};
pub use stoa_catalog::{InMemoryProductStore, ProductStore};
pub use stoa_identity::{AccountStore, AccountsDirectory, InMemoryAccountStore};
pub use stoa_orders::{InMemoryOrderStore, OrderStore};
pub use stoa_orgs::{CompanyStore, InMemoryCompanyStore};
