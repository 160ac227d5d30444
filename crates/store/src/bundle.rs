use std::sync::Arc;

use stoa_auth::InMemoryCredentialStore;
use stoa_cart::InMemoryCartStore;
use stoa_catalog::InMemoryProductStore;
use stoa_identity::{AccountsDirectory, InMemoryAccountStore};
use stoa_orders::InMemoryOrderStore;
use stoa_orgs::InMemoryCompanyStore;

/// One handle per store, shareable across services.
///
/// Cloning the bundle clones the `Arc`s, so every clone observes the same
/// underlying data.
#[derive(Clone)]
pub struct Store {
    pub accounts: Arc<InMemoryAccountStore>,
    pub credentials: Arc<InMemoryCredentialStore>,
    pub companies: Arc<InMemoryCompanyStore>,
    pub products: Arc<InMemoryProductStore>,
    pub orders: Arc<InMemoryOrderStore>,
    pub carts: Arc<InMemoryCartStore>,
}

impl Store {
    /// A fresh, empty in-memory bundle.
    pub fn in_memory() -> Self {
        Self {
            accounts: Arc::new(InMemoryAccountStore::new()),
            credentials: Arc::new(InMemoryCredentialStore::new()),
            companies: Arc::new(InMemoryCompanyStore::new()),
            products: Arc::new(InMemoryProductStore::new()),
            orders: Arc::new(InMemoryOrderStore::new()),
            carts: Arc::new(InMemoryCartStore::new()),
        }
    }

    /// Account lookups for the token layer, backed by the live account
    /// store.
    pub fn directory(&self) -> AccountsDirectory<Arc<InMemoryAccountStore>> {
        AccountsDirectory::new(self.accounts.clone())
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::in_memory()
    }
}
