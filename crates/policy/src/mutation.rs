//! Mutation gates. Stricter than visibility: an admin can see every
//! product, organization, and order, but may not rewrite records it does
//! not own.

use thiserror::Error;

use stoa_auth::{AuthContext, Role};
use stoa_core::{AccountId, DomainError};

use crate::filter::OrderFields;

/// A mutation or role rule the caller violated. The message is the
/// client-visible reason.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PolicyError {
    #[error("company role required")]
    CompanyRoleRequired,

    #[error("customer role required")]
    CustomerRoleRequired,

    #[error("admin role required")]
    AdminRoleRequired,

    #[error("user id mismatch")]
    UserIdMismatch,

    #[error("company id mismatch")]
    CompanyIdMismatch,
}

impl From<PolicyError> for DomainError {
    fn from(err: PolicyError) -> Self {
        DomainError::Unauthorized(err.to_string())
    }
}

pub fn ensure_company_role(ctx: &AuthContext) -> Result<(), PolicyError> {
    if ctx.role() == Role::Company {
        Ok(())
    } else {
        Err(PolicyError::CompanyRoleRequired)
    }
}

pub fn ensure_customer_role(ctx: &AuthContext) -> Result<(), PolicyError> {
    if ctx.role() == Role::Customer {
        Ok(())
    } else {
        Err(PolicyError::CustomerRoleRequired)
    }
}

pub fn ensure_admin(ctx: &AuthContext) -> Result<(), PolicyError> {
    if ctx.is_admin() {
        Ok(())
    } else {
        Err(PolicyError::AdminRoleRequired)
    }
}

/// Update/delete gate for products and organizations: the owning account
/// only. Admins get no override here.
pub fn ensure_owner(ctx: &AuthContext, owner: AccountId) -> Result<(), PolicyError> {
    if ctx.account_id() == owner {
        Ok(())
    } else {
        Err(PolicyError::UserIdMismatch)
    }
}

/// Self-service gate for account records: the account itself, or an admin.
pub fn ensure_self_or_admin(ctx: &AuthContext, account: AccountId) -> Result<(), PolicyError> {
    if ctx.is_admin() || ctx.account_id() == account {
        Ok(())
    } else {
        Err(PolicyError::UserIdMismatch)
    }
}

/// Update/delete gate for orders: only the company the order is associated
/// with.
pub fn ensure_company_owns_order<O: OrderFields>(
    ctx: &AuthContext,
    order: &O,
) -> Result<(), PolicyError> {
    if ctx.role() != Role::Company {
        return Err(PolicyError::CompanyRoleRequired);
    }
    match (ctx.company_id(), order.company_id()) {
        (Some(own), Some(orders)) if own == orders => Ok(()),
        _ => Err(PolicyError::CompanyIdMismatch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stoa_auth::RoleScope;
    use stoa_core::CompanyId;

    struct OrderRecord {
        owner: AccountId,
        company_id: Option<CompanyId>,
        customer_id: AccountId,
    }

    impl OrderFields for OrderRecord {
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

    fn admin() -> AuthContext {
        AuthContext::new(AccountId::new(), RoleScope::Admin)
    }

    fn company(company_id: Option<CompanyId>) -> AuthContext {
        AuthContext::new(AccountId::new(), RoleScope::Company { company_id })
    }

    fn customer() -> AuthContext {
        AuthContext::new(
            AccountId::new(),
            RoleScope::Customer {
                associate_company_ids: Vec::new(),
            },
        )
    }

    #[test]
    fn ensure_owner_is_literal_even_for_admins() {
        let ctx = company(None);
        assert_eq!(ensure_owner(&ctx, ctx.account_id()), Ok(()));
        assert_eq!(
            ensure_owner(&ctx, AccountId::new()),
            Err(PolicyError::UserIdMismatch)
        );
        // Admin visibility is universal; admin mutation is not.
        assert_eq!(
            ensure_owner(&admin(), AccountId::new()),
            Err(PolicyError::UserIdMismatch)
        );
    }

    #[test]
    fn self_or_admin_lets_admins_through() {
        let ctx = customer();
        assert_eq!(ensure_self_or_admin(&ctx, ctx.account_id()), Ok(()));
        assert_eq!(
            ensure_self_or_admin(&ctx, AccountId::new()),
            Err(PolicyError::UserIdMismatch)
        );
        assert_eq!(ensure_self_or_admin(&admin(), AccountId::new()), Ok(()));
    }

    #[test]
    fn order_mutation_requires_the_owning_company() {
        let company_id = CompanyId::new();
        let order = OrderRecord {
            owner: AccountId::new(),
            company_id: Some(company_id),
            customer_id: AccountId::new(),
        };

        assert_eq!(
            ensure_company_owns_order(&company(Some(company_id)), &order),
            Ok(())
        );
        assert_eq!(
            ensure_company_owns_order(&company(Some(CompanyId::new())), &order),
            Err(PolicyError::CompanyIdMismatch)
        );
        assert_eq!(
            ensure_company_owns_order(&company(None), &order),
            Err(PolicyError::CompanyIdMismatch)
        );
        assert_eq!(
            ensure_company_owns_order(&admin(), &order),
            Err(PolicyError::CompanyRoleRequired)
        );
        assert_eq!(
            ensure_company_owns_order(&customer(), &order),
            Err(PolicyError::CompanyRoleRequired)
        );
    }

    #[test]
    fn companyless_orders_have_no_owning_company() {
        let order = OrderRecord {
            owner: AccountId::new(),
            company_id: None,
            customer_id: AccountId::new(),
        };
        assert_eq!(
            ensure_company_owns_order(&company(Some(CompanyId::new())), &order),
            Err(PolicyError::CompanyIdMismatch)
        );
    }

    #[test]
    fn role_gates_map_to_unauthorized_with_the_rule_text() {
        let err: DomainError = PolicyError::CompanyRoleRequired.into();
        assert_eq!(err, DomainError::Unauthorized("company role required".into()));

        let err: DomainError = PolicyError::UserIdMismatch.into();
        assert_eq!(err, DomainError::Unauthorized("user id mismatch".into()));
    }
}
