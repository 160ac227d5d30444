//! Cart operations, customer-only on the caller's own cart.

use serde::Deserialize;

use stoa_auth::AuthContext;
use stoa_core::{CartItemId, DomainError, DomainResult, ProductId};
use stoa_policy::cart_scope;

use crate::cart::{Cart, CartStore};

#[derive(Debug, Clone, Deserialize)]
pub struct AddCartItem {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Cart access for the requesting customer.
///
/// Every operation resolves the cart through `cart_scope`, so non-customer
/// callers are rejected up front and the store is only ever addressed with
/// the caller's own account id.
pub struct CartService<S> {
    carts: S,
}

impl<S: CartStore> CartService<S> {
    pub fn new(carts: S) -> Self {
        Self { carts }
    }

    /// The caller's cart; an empty cart when none has been stored yet.
    pub fn get(&self, ctx: &AuthContext) -> DomainResult<Cart> {
        let filter = cart_scope(ctx)?;
        self.carts.get(filter.owner)
    }

    /// Add a product, merging quantity into an existing line for the same
    /// product instead of opening a second one.
    pub fn add_item(&self, ctx: &AuthContext, req: AddCartItem) -> DomainResult<Cart> {
        let filter = cart_scope(ctx)?;
        ensure_positive(req.quantity)?;

        let cart = self
            .carts
            .merge_item(filter.owner, req.product_id, req.quantity)?;
        tracing::debug!(
            account_id = %filter.owner,
            product_id = %req.product_id,
            "cart line merged"
        );
        Ok(cart)
    }

    /// Replace the quantity of one line, addressed by its item id.
    pub fn update_item(
        &self,
        ctx: &AuthContext,
        item_id: CartItemId,
        quantity: i64,
    ) -> DomainResult<Cart> {
        let filter = cart_scope(ctx)?;
        ensure_positive(quantity)?;
        self.carts.update_item(filter.owner, item_id, quantity)
    }

    /// Remove one line, addressed by its item id.
    pub fn remove_item(&self, ctx: &AuthContext, item_id: CartItemId) -> DomainResult<Cart> {
        let filter = cart_scope(ctx)?;
        self.carts.remove_item(filter.owner, item_id)
    }
}

fn ensure_positive(quantity: i64) -> DomainResult<()> {
    if quantity <= 0 {
        return Err(DomainError::validation("quantity must be positive"));
    }
    Ok(())
}
