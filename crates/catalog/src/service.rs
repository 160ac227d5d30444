//! Product CRUD under the visibility and mutation rules.

use chrono::Utc;
use serde::Deserialize;

use stoa_auth::AuthContext;
use stoa_core::{DomainError, DomainResult, ProductId};
use stoa_policy::{ensure_company_role, ensure_owner, product_scope};

use crate::product::{Product, ProductStore};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: u64,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<u64>,
}

pub struct CatalogService<P> {
    products: P,
}

impl<P: ProductStore> CatalogService<P> {
    pub fn new(products: P) -> Self {
        Self { products }
    }

    /// Create a product under the caller's organization.
    pub fn create(&self, ctx: &AuthContext, req: CreateProduct) -> DomainResult<Product> {
        ensure_company_role(ctx)?;
        let Some(company_id) = ctx.company_id() else {
            return Err(DomainError::validation(
                "create an organization before adding products",
            ));
        };

        let name = clean_name(&req.name)?;
        if req.price == 0 {
            return Err(DomainError::validation("price must be positive"));
        }

        let product = Product::new(ctx.account_id(), company_id, name, req.description, req.price);
        self.products.insert(product.clone())?;

        tracing::info!(product_id = %product.id, company_id = %company_id, "product created");
        Ok(product)
    }

    /// Read one product. Out-of-scope reads look identical to absent
    /// documents.
    pub fn get(&self, ctx: &AuthContext, id: ProductId) -> DomainResult<Product> {
        let product = self.products.get(id)?.ok_or(DomainError::NotFound)?;
        if !product_scope(ctx).admits(&product) {
            return Err(DomainError::NotFound);
        }
        Ok(product)
    }

    pub fn list(&self, ctx: &AuthContext) -> DomainResult<Vec<Product>> {
        let filter = product_scope(ctx);
        Ok(self
            .products
            .list()?
            .into_iter()
            .filter(|p| filter.admits(p))
            .collect())
    }

    /// Update fields: the owning account only.
    pub fn update(
        &self,
        ctx: &AuthContext,
        id: ProductId,
        changes: ProductUpdate,
    ) -> DomainResult<Product> {
        let mut product = self.products.get(id)?.ok_or(DomainError::NotFound)?;
        ensure_owner(ctx, product.owner)?;

        if let Some(name) = changes.name {
            product.name = clean_name(&name)?;
        }
        if let Some(description) = changes.description {
            product.description = Some(description);
        }
        if let Some(price) = changes.price {
            if price == 0 {
                return Err(DomainError::validation("price must be positive"));
            }
            product.price = price;
        }
        product.updated_at = Utc::now();

        self.products.update(product.clone())?;
        Ok(product)
    }

    /// Delete: the owning account only.
    pub fn delete(&self, ctx: &AuthContext, id: ProductId) -> DomainResult<()> {
        let product = self.products.get(id)?.ok_or(DomainError::NotFound)?;
        ensure_owner(ctx, product.owner)?;

        if !self.products.delete(id)? {
            return Err(DomainError::NotFound);
        }
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }
}

fn clean_name(raw: &str) -> DomainResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::validation("product name must not be empty"));
    }
    Ok(name.to_string())
}
