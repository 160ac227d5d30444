//! The visibility table: `scope(context, resource) -> filter`.

use stoa_auth::{AuthContext, RoleScope};

use crate::filter::{CartFilter, OrderFilter, OrganizationFilter, ProductFilter};
use crate::mutation::PolicyError;

pub fn organization_scope(ctx: &AuthContext) -> OrganizationFilter {
    match ctx.scope() {
        RoleScope::Admin => OrganizationFilter::All,
        RoleScope::Company { .. } => OrganizationFilter::OwnedBy(ctx.account_id()),
        RoleScope::Customer {
            associate_company_ids,
        } => OrganizationFilter::IdIn(associate_company_ids.clone()),
    }
}

pub fn product_scope(ctx: &AuthContext) -> ProductFilter {
    match ctx.scope() {
        RoleScope::Admin => ProductFilter::All,
        RoleScope::Company { .. } => ProductFilter::OwnedBy(ctx.account_id()),
        RoleScope::Customer {
            associate_company_ids,
        } => ProductFilter::CompanyIn(associate_company_ids.clone()),
    }
}

pub fn order_scope(ctx: &AuthContext) -> OrderFilter {
    match ctx.scope() {
        RoleScope::Admin => OrderFilter::All,
        RoleScope::Company { company_id } => OrderFilter::CompanyReach {
            owner: ctx.account_id(),
            company_id: *company_id,
        },
        RoleScope::Customer { .. } => OrderFilter::PlacedBy(ctx.account_id()),
    }
}

/// Carts have no admin or company view at all.
pub fn cart_scope(ctx: &AuthContext) -> Result<CartFilter, PolicyError> {
    match ctx.scope() {
        RoleScope::Customer { .. } => Ok(CartFilter {
            owner: ctx.account_id(),
        }),
        _ => Err(PolicyError::CustomerRoleRequired),
    }
}

/// Resource families the visibility table covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Organization,
    Product,
    Order,
    Cart,
}

/// A computed filter for any resource family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceFilter {
    Organization(OrganizationFilter),
    Product(ProductFilter),
    Order(OrderFilter),
    Cart(CartFilter),
}

/// The whole table behind one entry point, for callers that dispatch on
/// resource kind rather than calling the typed functions directly.
pub fn scope(ctx: &AuthContext, resource: ResourceKind) -> Result<ResourceFilter, PolicyError> {
    Ok(match resource {
        ResourceKind::Organization => ResourceFilter::Organization(organization_scope(ctx)),
        ResourceKind::Product => ResourceFilter::Product(product_scope(ctx)),
        ResourceKind::Order => ResourceFilter::Order(order_scope(ctx)),
        ResourceKind::Cart => ResourceFilter::Cart(cart_scope(ctx)?),
    })
}
