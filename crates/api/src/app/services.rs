//! One service instance per domain crate, all over a shared store bundle.

use std::sync::Arc;

use stoa_auth::TokenService;
use stoa_cart::CartService;
use stoa_catalog::CatalogService;
use stoa_identity::{AccountsDirectory, IdentityService};
use stoa_orders::OrderService;
use stoa_orgs::{AssociationService, OrgService};
use stoa_store::{
    InMemoryAccountStore, InMemoryCartStore, InMemoryCompanyStore, InMemoryCredentialStore,
    InMemoryOrderStore, InMemoryProductStore, Store,
};

use crate::config::AppConfig;

pub type Tokens = TokenService<Arc<InMemoryCredentialStore>>;
pub type Directory = AccountsDirectory<Arc<InMemoryAccountStore>>;

pub struct AppServices {
    pub tokens: Arc<Tokens>,
    pub directory: Directory,
    pub identity: IdentityService<Arc<InMemoryAccountStore>>,
    pub orgs: OrgService<Arc<InMemoryCompanyStore>, Arc<InMemoryAccountStore>>,
    pub associations: AssociationService<Arc<InMemoryCompanyStore>, Arc<InMemoryAccountStore>>,
    pub catalog: CatalogService<Arc<InMemoryProductStore>>,
    pub orders: OrderService<Arc<InMemoryOrderStore>, Arc<InMemoryCompanyStore>>,
    pub carts: CartService<Arc<InMemoryCartStore>>,
    /// Mirrors the access TTL so handlers can set cookie lifetimes.
    pub access_ttl_secs: i64,
}

pub fn build_services(config: &AppConfig) -> AppServices {
    let store = Store::in_memory();

    let identity = match config.bcrypt_cost {
        Some(cost) => IdentityService::with_hash_cost(store.accounts.clone(), cost),
        None => IdentityService::new(store.accounts.clone()),
    };

    AppServices {
        tokens: Arc::new(TokenService::new(
            config.jwt_secret.as_bytes(),
            config.token_config(),
            store.credentials.clone(),
        )),
        directory: store.directory(),
        identity,
        orgs: OrgService::new(store.companies.clone(), store.accounts.clone()),
        associations: AssociationService::new(store.companies.clone(), store.accounts.clone()),
        catalog: CatalogService::new(store.products.clone()),
        orders: OrderService::new(store.orders.clone(), store.companies.clone()),
        carts: CartService::new(store.carts.clone()),
        access_ttl_secs: config.access_ttl_secs,
    }
}
