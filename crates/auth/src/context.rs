//! The authenticated caller, as request handlers see it.

use stoa_core::{AccountId, CompanyId};

use crate::claims::AccessClaims;
use crate::roles::{Role, RoleScope};

/// Identity and reach of the caller, decoded from a verified access token.
///
/// Handlers receive this instead of raw claims so role-specific fields are
/// impossible to misread: a customer context cannot carry a `company_id`,
/// and a company context cannot carry an associate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    account_id: AccountId,
    scope: RoleScope,
}

impl AuthContext {
    pub fn new(account_id: AccountId, scope: RoleScope) -> Self {
        Self { account_id, scope }
    }

    /// Build a context from verified claims, discarding fields that do not
    /// belong to the claimed role.
    pub fn from_claims(claims: &AccessClaims) -> Self {
        let scope = match claims.user.role {
            Role::Admin => RoleScope::Admin,
            Role::Company => RoleScope::Company {
                company_id: claims.user.company_id,
            },
            Role::Customer => RoleScope::Customer {
                associate_company_ids: claims
                    .user
                    .associate_company_ids
                    .clone()
                    .unwrap_or_default(),
            },
        };
        Self {
            account_id: claims.user.id,
            scope,
        }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn scope(&self) -> &RoleScope {
        &self.scope
    }

    pub fn role(&self) -> Role {
        self.scope.role()
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.scope, RoleScope::Admin)
    }

    /// The company this caller operates, if they hold the company role.
    pub fn company_id(&self) -> Option<CompanyId> {
        match &self.scope {
            RoleScope::Company { company_id } => *company_id,
            _ => None,
        }
    }

    /// Companies a customer caller is associated with; empty for other roles.
    pub fn associate_company_ids(&self) -> &[CompanyId] {
        match &self.scope {
            RoleScope::Customer {
                associate_company_ids,
            } => associate_company_ids,
            _ => &[],
        }
    }
}
