//! Order creation, visibility, and lifecycle under the policy rules.

use chrono::Utc;
use serde::Deserialize;

use stoa_auth::{AuthContext, Role};
use stoa_core::{AccountId, DomainError, DomainResult, OrderId, ProductId};
use stoa_orgs::CompanyStore;
use stoa_policy::{OrderFilter, ensure_company_owns_order, ensure_owner, order_scope};

use crate::order::{Order, OrderLine, OrderStatus, OrderStore};

#[derive(Debug, Clone, Deserialize)]
pub struct OrderLineInput {
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price: u64,
}

/// Order creation request. `owner` is declared by the caller and must match
/// the authenticated account.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrder {
    pub owner: AccountId,
    pub customer_id: Option<AccountId>,
    pub lines: Vec<OrderLineInput>,
}

/// Status transition request.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OrderUpdate {
    pub status: OrderStatus,
}

pub struct OrderService<O, C> {
    orders: O,
    companies: C,
}

impl<O: OrderStore, C: CompanyStore> OrderService<O, C> {
    pub fn new(orders: O, companies: C) -> Self {
        Self { orders, companies }
    }

    /// Create an order.
    ///
    /// A declared owner that is not the authenticated account is an
    /// authorization failure, not a validation problem. Customer creators
    /// get the order associated with the first entry of their associate
    /// list; multi-company customers land on that first company.
    pub fn create(&self, ctx: &AuthContext, req: CreateOrder) -> DomainResult<Order> {
        ensure_owner(ctx, req.owner)?;
        let lines = validate_lines(req.lines)?;

        let company_id = match ctx.role() {
            Role::Customer => ctx.associate_company_ids().first().copied(),
            Role::Company => ctx.company_id(),
            Role::Admin => None,
        };

        let customer_id = match ctx.role() {
            Role::Company => req.customer_id.unwrap_or(ctx.account_id()),
            _ => {
                if req.customer_id.is_some_and(|c| c != ctx.account_id()) {
                    return Err(DomainError::validation(
                        "customer_id must be the caller's own account",
                    ));
                }
                ctx.account_id()
            }
        };

        let order = Order::new(ctx.account_id(), company_id, customer_id, lines);
        self.orders.insert(order.clone())?;

        tracing::info!(order_id = %order.id, owner = %order.owner, "order created");
        Ok(order)
    }

    /// Read one order. Out-of-scope reads look identical to absent
    /// documents.
    pub fn get(&self, ctx: &AuthContext, id: OrderId) -> DomainResult<Order> {
        let order = self.orders.get(id)?.ok_or(DomainError::NotFound)?;
        let filter = order_scope(ctx);
        let roster = self.roster_for(&filter)?;
        if !filter.admits(&order, &roster) {
            return Err(DomainError::NotFound);
        }
        Ok(order)
    }

    pub fn list(&self, ctx: &AuthContext) -> DomainResult<Vec<Order>> {
        let filter = order_scope(ctx);
        let roster = self.roster_for(&filter)?;
        Ok(self
            .orders
            .list()?
            .into_iter()
            .filter(|o| filter.admits(o, &roster))
            .collect())
    }

    /// Move an order through its lifecycle: the owning company only.
    pub fn update(&self, ctx: &AuthContext, id: OrderId, req: OrderUpdate) -> DomainResult<Order> {
        let mut order = self.orders.get(id)?.ok_or(DomainError::NotFound)?;
        ensure_company_owns_order(ctx, &order)?;

        if !order.status.can_transition_to(req.status) {
            return Err(DomainError::validation(format!(
                "cannot move order from {} to {}",
                order.status, req.status
            )));
        }
        order.status = req.status;
        order.updated_at = Utc::now();

        self.orders.update(order.clone())?;
        tracing::info!(order_id = %id, status = %order.status, "order status changed");
        Ok(order)
    }

    /// Delete an order: the owning company only.
    pub fn delete(&self, ctx: &AuthContext, id: OrderId) -> DomainResult<()> {
        let order = self.orders.get(id)?.ok_or(DomainError::NotFound)?;
        ensure_company_owns_order(ctx, &order)?;

        if !self.orders.delete(id)? {
            return Err(DomainError::NotFound);
        }
        tracing::info!(order_id = %id, "order deleted");
        Ok(())
    }

    /// Resolve the customer roster the company-reach filter evaluates
    /// against. A deleted organization resolves to an empty roster.
    fn roster_for(&self, filter: &OrderFilter) -> DomainResult<Vec<AccountId>> {
        match filter.roster_company() {
            Some(company_id) => Ok(self
                .companies
                .get(company_id)?
                .map(|c| c.customers)
                .unwrap_or_default()),
            None => Ok(Vec::new()),
        }
    }
}

fn validate_lines(inputs: Vec<OrderLineInput>) -> DomainResult<Vec<OrderLine>> {
    if inputs.is_empty() {
        return Err(DomainError::validation("order must contain at least one line"));
    }
    inputs
        .into_iter()
        .map(|line| {
            if line.quantity <= 0 {
                return Err(DomainError::validation("quantity must be positive"));
            }
            if line.unit_price == 0 {
                return Err(DomainError::validation("unit_price must be positive"));
            }
            Ok(OrderLine {
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
        })
        .collect()
}
