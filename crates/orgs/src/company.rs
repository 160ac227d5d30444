//! The organization document, its join code, and its persistence seam.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stoa_core::{AccountId, CompanyId, DomainError, DomainResult};
use stoa_policy::OrganizationFields;

/// A human-entered code customers present to join an organization.
///
/// Codes are matched exactly as entered (case-sensitive); uniqueness is
/// enforced at the store boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct JoinCode(String);

impl JoinCode {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let code = raw.trim();
        if code.is_empty() {
            return Err(DomainError::validation("join code must not be empty"));
        }
        if code.len() > 32 {
            return Err(DomainError::validation("join code must be at most 32 characters"));
        }
        if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(DomainError::validation(
                "join code may contain only letters, digits, and '-'",
            ));
        }
        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for JoinCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for JoinCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl core::str::FromStr for JoinCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// An organization document.
///
/// `customers` is the company-side half of the bidirectional association;
/// the account-side half lives on each customer's `associate_company_ids`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub owner: AccountId,
    pub name: String,
    pub join_code: JoinCode,
    pub customers: Vec<AccountId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    pub fn new(owner: AccountId, name: String, join_code: JoinCode) -> Self {
        let now = Utc::now();
        Self {
            id: CompanyId::new(),
            owner,
            name,
            join_code,
            customers: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl OrganizationFields for Company {
    fn organization_id(&self) -> CompanyId {
        self.id
    }

    fn owner(&self) -> AccountId {
        self.owner
    }
}

/// Organization persistence.
///
/// One organization per owner and one owner per join code, both enforced as
/// uniqueness at the store boundary. `add_customer` is an atomic add-to-set,
/// never a read-then-write.
pub trait CompanyStore: Send + Sync {
    /// Insert, failing with a conflict if the owner already has an
    /// organization or the join code is taken.
    fn insert(&self, company: Company) -> DomainResult<()>;

    fn get(&self, id: CompanyId) -> DomainResult<Option<Company>>;

    fn find_by_owner(&self, owner: AccountId) -> DomainResult<Option<Company>>;

    fn find_by_join_code(&self, code: &JoinCode) -> DomainResult<Option<Company>>;

    fn list(&self) -> DomainResult<Vec<Company>>;

    /// Replace the document, re-checking join-code uniqueness.
    fn update(&self, company: Company) -> DomainResult<()>;

    /// Returns whether a document was actually deleted.
    fn delete(&self, id: CompanyId) -> DomainResult<bool>;

    /// Atomic add-to-set on `customers`. Returns whether the entry was newly
    /// added; not-found if the organization is absent.
    fn add_customer(&self, id: CompanyId, customer: AccountId) -> DomainResult<bool>;
}

impl<S> CompanyStore for std::sync::Arc<S>
where
    S: CompanyStore + ?Sized,
{
    fn insert(&self, company: Company) -> DomainResult<()> {
        (**self).insert(company)
    }

    fn get(&self, id: CompanyId) -> DomainResult<Option<Company>> {
        (**self).get(id)
    }

    fn find_by_owner(&self, owner: AccountId) -> DomainResult<Option<Company>> {
        (**self).find_by_owner(owner)
    }

    fn find_by_join_code(&self, code: &JoinCode) -> DomainResult<Option<Company>> {
        (**self).find_by_join_code(code)
    }

    fn list(&self) -> DomainResult<Vec<Company>> {
        (**self).list()
    }

    fn update(&self, company: Company) -> DomainResult<()> {
        (**self).update(company)
    }

    fn delete(&self, id: CompanyId) -> DomainResult<bool> {
        (**self).delete(id)
    }

    fn add_customer(&self, id: CompanyId, customer: AccountId) -> DomainResult<bool> {
        (**self).add_customer(id, customer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_code_accepts_human_codes() {
        for raw in ["ACME", "acme-2024", " trimmed ", "X1"] {
            assert!(JoinCode::parse(raw).is_ok(), "rejected {raw:?}");
        }
        assert_eq!(JoinCode::parse(" trimmed ").unwrap().as_str(), "trimmed");
    }

    #[test]
    fn join_code_rejects_empty_long_and_symbolic_input() {
        assert!(JoinCode::parse("").is_err());
        assert!(JoinCode::parse("   ").is_err());
        assert!(JoinCode::parse(&"x".repeat(33)).is_err());
        assert!(JoinCode::parse("has space").is_err());
        assert!(JoinCode::parse("no_underscores").is_err());
    }

    #[test]
    fn join_codes_are_case_sensitive() {
        assert_ne!(JoinCode::parse("ACME").unwrap(), JoinCode::parse("acme").unwrap());
    }
}
