//! In-memory order store.

use std::collections::HashMap;
use std::sync::RwLock;

use stoa_core::{DomainError, DomainResult, OrderId};

use crate::order::{Order, OrderStore};

/// In-memory order store.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(_: impl core::fmt::Debug) -> DomainError {
    DomainError::internal("order store lock poisoned")
}

impl OrderStore for InMemoryOrderStore {
    fn insert(&self, order: Order) -> DomainResult<()> {
        let mut map = self.orders.write().map_err(poisoned)?;
        map.insert(order.id, order);
        Ok(())
    }

    fn get(&self, id: OrderId) -> DomainResult<Option<Order>> {
        let map = self.orders.read().map_err(poisoned)?;
        Ok(map.get(&id).cloned())
    }

    fn list(&self) -> DomainResult<Vec<Order>> {
        let map = self.orders.read().map_err(poisoned)?;
        Ok(map.values().cloned().collect())
    }

    fn update(&self, order: Order) -> DomainResult<()> {
        let mut map = self.orders.write().map_err(poisoned)?;
        if !map.contains_key(&order.id) {
            return Err(DomainError::NotFound);
        }
        map.insert(order.id, order);
        Ok(())
    }

    fn delete(&self, id: OrderId) -> DomainResult<bool> {
        let mut map = self.orders.write().map_err(poisoned)?;
        Ok(map.remove(&id).is_some())
    }
}
