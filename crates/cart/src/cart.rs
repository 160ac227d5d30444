use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stoa_core::{AccountId, CartItemId, DomainResult, ProductId};

/// One line of a cart.
///
/// The item id is generated when the line is first created and is the only
/// handle for updating or removing the line afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub quantity: i64,
}

impl CartItem {
    pub fn new(product_id: ProductId, quantity: i64) -> Self {
        Self {
            id: CartItemId::new(),
            product_id,
            quantity,
        }
    }
}

/// A customer's cart, keyed by the owning account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub owner: AccountId,
    pub items: Vec<CartItem>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// A cart with no lines, as returned when the account has never added
    /// anything.
    pub fn empty(owner: AccountId) -> Self {
        Self {
            owner,
            items: Vec::new(),
            updated_at: Utc::now(),
        }
    }
}

/// Storage for carts.
///
/// `merge_item` is the only way to add a line; it folds the quantity into
/// an existing line for the same product inside a single store operation,
/// so two adds of one product can never produce two lines.
pub trait CartStore: Send + Sync {
    /// The account's cart, or an empty one if nothing has been stored yet.
    fn get(&self, owner: AccountId) -> DomainResult<Cart>;

    /// Add `quantity` of `product_id` to the cart, creating the cart and
    /// the line as needed, and returns the updated cart.
    fn merge_item(
        &self,
        owner: AccountId,
        product_id: ProductId,
        quantity: i64,
    ) -> DomainResult<Cart>;

    /// Set the quantity of the line with `item_id`. Not-found when no such
    /// line exists, whatever products the cart holds.
    fn update_item(
        &self,
        owner: AccountId,
        item_id: CartItemId,
        quantity: i64,
    ) -> DomainResult<Cart>;

    /// Drop the line with `item_id`. Not-found when no such line exists.
    fn remove_item(&self, owner: AccountId, item_id: CartItemId) -> DomainResult<Cart>;
}

impl<S: CartStore + ?Sized> CartStore for Arc<S> {
    fn get(&self, owner: AccountId) -> DomainResult<Cart> {
        (**self).get(owner)
    }

    fn merge_item(
        &self,
        owner: AccountId,
        product_id: ProductId,
        quantity: i64,
    ) -> DomainResult<Cart> {
        (**self).merge_item(owner, product_id, quantity)
    }

    fn update_item(
        &self,
        owner: AccountId,
        item_id: CartItemId,
        quantity: i64,
    ) -> DomainResult<Cart> {
        (**self).update_item(owner, item_id, quantity)
    }

    fn remove_item(&self, owner: AccountId, item_id: CartItemId) -> DomainResult<Cart> {
        (**self).remove_item(owner, item_id)
    }
}
