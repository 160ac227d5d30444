//! `stoa-policy` — role-scoped visibility and mutation rules.
//!
//! Everything here is a pure function over an [`stoa_auth::AuthContext`]:
//! `scope` computes the filter restricting what a caller may read, and the
//! `ensure_*` gates decide whether a caller may mutate. Resource services own
//! their record types and expose them to this crate through the field-view
//! traits, so policy never depends on a storage layer or a concrete schema.

pub mod filter;
pub mod mutation;
pub mod scope;

pub use filter::{
    CartFilter, OrderFields, OrderFilter, OrganizationFields, OrganizationFilter, ProductFields,
    ProductFilter,
};
pub use mutation::{
    PolicyError, ensure_admin, ensure_company_owns_order, ensure_company_role,
    ensure_customer_role, ensure_owner, ensure_self_or_admin,
};
pub use scope::{
    ResourceFilter, ResourceKind, cart_scope, order_scope, organization_scope, product_scope,
    scope,
};
