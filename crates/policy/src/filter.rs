//! Typed visibility filters and the record views they evaluate against.
//!
//! Visibility is never stored on a resource; it is computed per request from
//! the caller's context and evaluated against these narrow field views.

use stoa_core::{AccountId, CompanyId};

/// What the policy needs to see of an organization record.
pub trait OrganizationFields {
    fn organization_id(&self) -> CompanyId;
    fn owner(&self) -> AccountId;
}

/// What the policy needs to see of a product record.
pub trait ProductFields {
    fn owner(&self) -> AccountId;
    fn company_id(&self) -> CompanyId;
}

/// What the policy needs to see of an order record.
pub trait OrderFields {
    fn owner(&self) -> AccountId;
    fn company_id(&self) -> Option<CompanyId>;
    fn customer_id(&self) -> AccountId;
}

/// Which organizations a caller may read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrganizationFilter {
    All,
    OwnedBy(AccountId),
    /// Membership filter: the companies a customer is associated with.
    IdIn(Vec<CompanyId>),
}

impl OrganizationFilter {
    pub fn admits<T: OrganizationFields>(&self, record: &T) -> bool {
        match self {
            Self::All => true,
            Self::OwnedBy(owner) => record.owner() == *owner,
            Self::IdIn(ids) => ids.contains(&record.organization_id()),
        }
    }
}

/// Which products a caller may read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductFilter {
    All,
    OwnedBy(AccountId),
    CompanyIn(Vec<CompanyId>),
}

impl ProductFilter {
    pub fn admits<T: ProductFields>(&self, record: &T) -> bool {
        match self {
            Self::All => true,
            Self::OwnedBy(owner) => record.owner() == *owner,
            Self::CompanyIn(ids) => ids.contains(&record.company_id()),
        }
    }
}

/// Which orders a caller may read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderFilter {
    All,
    /// Company reach: orders the caller created, orders logged against the
    /// caller's company, and orders placed by that company's customers.
    /// The customer roster lives on the company record, so the caller
    /// resolves it before evaluation (see [`OrderFilter::roster_company`]).
    CompanyReach {
        owner: AccountId,
        company_id: Option<CompanyId>,
    },
    PlacedBy(AccountId),
}

impl OrderFilter {
    /// Evaluate against a record. `roster` is the resolved customer set of
    /// the caller's company; the other variants ignore it.
    pub fn admits<T: OrderFields>(&self, record: &T, roster: &[AccountId]) -> bool {
        match self {
            Self::All => true,
            Self::CompanyReach { owner, company_id } => {
                record.owner() == *owner
                    || (company_id.is_some() && record.company_id() == *company_id)
                    || roster.contains(&record.customer_id())
            }
            Self::PlacedBy(customer) => record.customer_id() == *customer,
        }
    }

    /// The company whose customer roster this filter needs, if any.
    pub fn roster_company(&self) -> Option<CompanyId> {
        match self {
            Self::CompanyReach { company_id, .. } => *company_id,
            _ => None,
        }
    }
}

/// Carts are private: the only filter is the owning customer's own cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartFilter {
    pub owner: AccountId,
}

impl CartFilter {
    pub fn admits(&self, cart_owner: AccountId) -> bool {
        cart_owner == self.owner
    }
}
