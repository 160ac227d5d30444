//! In-memory product store.

use std::collections::HashMap;
use std::sync::RwLock;

use stoa_core::{DomainError, DomainResult, ProductId};

use crate::product::{Product, ProductStore};

/// In-memory product store.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    products: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(_: impl core::fmt::Debug) -> DomainError {
    DomainError::internal("product store lock poisoned")
}

impl ProductStore for InMemoryProductStore {
    fn insert(&self, product: Product) -> DomainResult<()> {
        let mut map = self.products.write().map_err(poisoned)?;
        map.insert(product.id, product);
        Ok(())
    }

    fn get(&self, id: ProductId) -> DomainResult<Option<Product>> {
        let map = self.products.read().map_err(poisoned)?;
        Ok(map.get(&id).cloned())
    }

    fn list(&self) -> DomainResult<Vec<Product>> {
        let map = self.products.read().map_err(poisoned)?;
        Ok(map.values().cloned().collect())
    }

    fn update(&self, product: Product) -> DomainResult<()> {
        let mut map = self.products.write().map_err(poisoned)?;
        if !map.contains_key(&product.id) {
            return Err(DomainError::NotFound);
        }
        map.insert(product.id, product);
        Ok(())
    }

    fn delete(&self, id: ProductId) -> DomainResult<bool> {
        let mut map = self.products.write().map_err(poisoned)?;
        Ok(map.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stoa_core::{AccountId, CompanyId};

    fn product() -> Product {
        Product::new(
            AccountId::new(),
            CompanyId::new(),
            "Widget".into(),
            None,
            100,
        )
    }

    #[test]
    fn update_requires_an_existing_document() {
        let store = InMemoryProductStore::new();
        let mut product = product();

        assert_eq!(store.update(product.clone()).unwrap_err(), DomainError::NotFound);

        store.insert(product.clone()).unwrap();
        product.price = 250;
        store.update(product.clone()).unwrap();
        assert_eq!(store.get(product.id).unwrap().unwrap().price, 250);
    }

    #[test]
    fn delete_reports_whether_anything_was_removed() {
        let store = InMemoryProductStore::new();
        let product = product();
        store.insert(product.clone()).unwrap();

        assert!(store.delete(product.id).unwrap());
        assert!(!store.delete(product.id).unwrap());
    }
}
