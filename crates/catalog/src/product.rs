//! The product document and its persistence seam.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stoa_core::{AccountId, CompanyId, DomainResult, ProductId};
use stoa_policy::ProductFields;

/// A product document.
///
/// `owner` is the company account that created it; `company_id` the
/// organization it is offered under. Customers see a product iff that
/// organization is in their associate list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub owner: AccountId,
    pub company_id: CompanyId,
    pub name: String,
    pub description: Option<String>,
    /// Price in the smallest currency unit (e.g., cents).
    pub price: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        owner: AccountId,
        company_id: CompanyId,
        name: String,
        description: Option<String>,
        price: u64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ProductId::new(),
            owner,
            company_id,
            name,
            description,
            price,
            created_at: now,
            updated_at: now,
        }
    }
}

impl ProductFields for Product {
    fn owner(&self) -> AccountId {
        self.owner
    }

    fn company_id(&self) -> CompanyId {
        self.company_id
    }
}

/// Product persistence. Plain document CRUD; no uniqueness indexes.
pub trait ProductStore: Send + Sync {
    fn insert(&self, product: Product) -> DomainResult<()>;

    fn get(&self, id: ProductId) -> DomainResult<Option<Product>>;

    fn list(&self) -> DomainResult<Vec<Product>>;

    /// Replace the document; not-found if it is gone.
    fn update(&self, product: Product) -> DomainResult<()>;

    /// Returns whether a document was actually deleted.
    fn delete(&self, id: ProductId) -> DomainResult<bool>;
}

impl<S> ProductStore for std::sync::Arc<S>
where
    S: ProductStore + ?Sized,
{
    fn insert(&self, product: Product) -> DomainResult<()> {
        (**self).insert(product)
    }

    fn get(&self, id: ProductId) -> DomainResult<Option<Product>> {
        (**self).get(id)
    }

    fn list(&self) -> DomainResult<Vec<Product>> {
        (**self).list()
    }

    fn update(&self, product: Product) -> DomainResult<()> {
        (**self).update(product)
    }

    fn delete(&self, id: ProductId) -> DomainResult<bool> {
        (**self).delete(id)
    }
}
