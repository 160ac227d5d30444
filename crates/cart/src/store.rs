//! In-memory cart store.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use stoa_core::{AccountId, CartItemId, DomainError, DomainResult, ProductId};

use crate::cart::{Cart, CartItem, CartStore};

/// In-memory cart store.
///
/// All mutations run under one write lock, so the find-or-create and
/// merge-by-product steps of `merge_item` are a single atomic step.
#[derive(Debug, Default)]
pub struct InMemoryCartStore {
    carts: RwLock<HashMap<AccountId, Cart>>,
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(_: impl core::fmt::Debug) -> DomainError {
    DomainError::internal("cart store lock poisoned")
}

impl CartStore for InMemoryCartStore {
    fn get(&self, owner: AccountId) -> DomainResult<Cart> {
        let map = self.carts.read().map_err(poisoned)?;
        Ok(map.get(&owner).cloned().unwrap_or_else(|| Cart::empty(owner)))
    }

    fn merge_item(
        &self,
        owner: AccountId,
        product_id: ProductId,
        quantity: i64,
    ) -> DomainResult<Cart> {
        let mut map = self.carts.write().map_err(poisoned)?;
        let cart = map.entry(owner).or_insert_with(|| Cart::empty(owner));
        match cart.items.iter_mut().find(|item| item.product_id == product_id) {
            Some(item) => item.quantity += quantity,
            None => cart.items.push(CartItem::new(product_id, quantity)),
        }
        cart.updated_at = Utc::now();
        Ok(cart.clone())
    }

    fn update_item(
        &self,
        owner: AccountId,
        item_id: CartItemId,
        quantity: i64,
    ) -> DomainResult<Cart> {
        let mut map = self.carts.write().map_err(poisoned)?;
        let cart = map.get_mut(&owner).ok_or(DomainError::NotFound)?;
        let item = cart
            .items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or(DomainError::NotFound)?;
        item.quantity = quantity;
        cart.updated_at = Utc::now();
        Ok(cart.clone())
    }

    fn remove_item(&self, owner: AccountId, item_id: CartItemId) -> DomainResult<Cart> {
        let mut map = self.carts.write().map_err(poisoned)?;
        let cart = map.get_mut(&owner).ok_or(DomainError::NotFound)?;
        let at = cart
            .items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or(DomainError::NotFound)?;
        cart.items.remove(at);
        cart.updated_at = Utc::now();
        Ok(cart.clone())
    }
}
