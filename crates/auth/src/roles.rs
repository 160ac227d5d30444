use serde::{Deserialize, Serialize};
use thiserror::Error;

use stoa_core::CompanyId;

/// Account role.
///
/// The set is closed: a token whose `role` claim matches none of these is a
/// contract mismatch between issuer and verifier, and must be rejected
/// loudly rather than treated as the most restrictive role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Company,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Company => "company",
            Role::Admin => "admin",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a role string outside the closed set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl core::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "company" => Ok(Role::Company),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Role plus the scope data that role carries.
///
/// This is the single tagged type every downstream check consumes by pattern
/// match, replacing ad hoc role-string comparisons. A company account holds
/// its organization id once the organization exists; a customer holds the
/// ordered set of organizations it is associated with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleScope {
    Admin,
    Company {
        /// Set once the account has created its organization.
        company_id: Option<CompanyId>,
    },
    Customer {
        /// Ordered: the first entry is the one order creation resolves to.
        associate_company_ids: Vec<CompanyId>,
    },
}

impl RoleScope {
    pub fn role(&self) -> Role {
        match self {
            RoleScope::Admin => Role::Admin,
            RoleScope::Company { .. } => Role::Company,
            RoleScope::Customer { .. } => Role::Customer,
        }
    }
}
