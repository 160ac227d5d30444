//! The order document, its status lifecycle, and its persistence seam.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stoa_core::{AccountId, CompanyId, DomainResult, OrderId, ProductId};
use stoa_policy::OrderFields;

/// Order status lifecycle.
///
/// Pending orders may be confirmed or cancelled; confirmed orders may be
/// shipped or cancelled; shipped and cancelled are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Cancelled,
}

impl OrderStatus {
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Confirmed)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Confirmed, OrderStatus::Shipped)
                | (OrderStatus::Confirmed, OrderStatus::Cancelled)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order line: product, quantity, unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: i64,
    /// Price in the smallest currency unit (e.g., cents).
    pub unit_price: u64,
}

/// An order document.
///
/// `owner` is the account that created the order, `customer_id` the customer
/// it belongs to (the creator itself unless a company declared otherwise),
/// and `company_id` the organization it was resolved to at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub owner: AccountId,
    pub company_id: Option<CompanyId>,
    pub customer_id: AccountId,
    pub lines: Vec<OrderLine>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(
        owner: AccountId,
        company_id: Option<CompanyId>,
        customer_id: AccountId,
        lines: Vec<OrderLine>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: OrderId::new(),
            owner,
            company_id,
            customer_id,
            lines,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

impl OrderFields for Order {
    fn owner(&self) -> AccountId {
        self.owner
    }

    fn company_id(&self) -> Option<CompanyId> {
        self.company_id
    }

    fn customer_id(&self) -> AccountId {
        self.customer_id
    }
}

/// Order persistence. Plain document CRUD; no uniqueness indexes.
pub trait OrderStore: Send + Sync {
    fn insert(&self, order: Order) -> DomainResult<()>;

    fn get(&self, id: OrderId) -> DomainResult<Option<Order>>;

    fn list(&self) -> DomainResult<Vec<Order>>;

    /// Replace the document; not-found if it is gone.
    fn update(&self, order: Order) -> DomainResult<()>;

    /// Returns whether a document was actually deleted.
    fn delete(&self, id: OrderId) -> DomainResult<bool>;
}

impl<S> OrderStore for std::sync::Arc<S>
where
    S: OrderStore + ?Sized,
{
    fn insert(&self, order: Order) -> DomainResult<()> {
        (**self).insert(order)
    }

    fn get(&self, id: OrderId) -> DomainResult<Option<Order>> {
        (**self).get(id)
    }

    fn list(&self) -> DomainResult<Vec<Order>> {
        (**self).list()
    }

    fn update(&self, order: Order) -> DomainResult<()> {
        (**self).update(order)
    }

    fn delete(&self, id: OrderId) -> DomainResult<bool> {
        (**self).delete(id)
    }
}
