//! In-memory organization store.

use std::collections::HashMap;
use std::sync::RwLock;

use stoa_core::{AccountId, CompanyId, DomainError, DomainResult};

use crate::company::{Company, CompanyStore, JoinCode};

/// In-memory organization store with unique owner and join-code indexes.
///
/// Every operation holds the lock for its whole duration, so each trait
/// method is atomic with respect to the others.
#[derive(Debug, Default)]
pub struct InMemoryCompanyStore {
    companies: RwLock<HashMap<CompanyId, Company>>,
}

impl InMemoryCompanyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(_: impl core::fmt::Debug) -> DomainError {
    DomainError::internal("company store lock poisoned")
}

impl CompanyStore for InMemoryCompanyStore {
    fn insert(&self, company: Company) -> DomainResult<()> {
        let mut map = self.companies.write().map_err(poisoned)?;
        if map.values().any(|c| c.owner == company.owner) {
            return Err(DomainError::conflict("owner already has an organization"));
        }
        if map.values().any(|c| c.join_code == company.join_code) {
            return Err(DomainError::conflict("join code already in use"));
        }
        map.insert(company.id, company);
        Ok(())
    }

    fn get(&self, id: CompanyId) -> DomainResult<Option<Company>> {
        let map = self.companies.read().map_err(poisoned)?;
        Ok(map.get(&id).cloned())
    }

    fn find_by_owner(&self, owner: AccountId) -> DomainResult<Option<Company>> {
        let map = self.companies.read().map_err(poisoned)?;
        Ok(map.values().find(|c| c.owner == owner).cloned())
    }

    fn find_by_join_code(&self, code: &JoinCode) -> DomainResult<Option<Company>> {
        let map = self.companies.read().map_err(poisoned)?;
        Ok(map.values().find(|c| &c.join_code == code).cloned())
    }

    fn list(&self) -> DomainResult<Vec<Company>> {
        let map = self.companies.read().map_err(poisoned)?;
        Ok(map.values().cloned().collect())
    }

    fn update(&self, company: Company) -> DomainResult<()> {
        let mut map = self.companies.write().map_err(poisoned)?;
        if map
            .values()
            .any(|c| c.id != company.id && c.join_code == company.join_code)
        {
            return Err(DomainError::conflict("join code already in use"));
        }
        if map
            .values()
            .any(|c| c.id != company.id && c.owner == company.owner)
        {
            return Err(DomainError::conflict("owner already has an organization"));
        }
        if !map.contains_key(&company.id) {
            return Err(DomainError::NotFound);
        }
        map.insert(company.id, company);
        Ok(())
    }

    fn delete(&self, id: CompanyId) -> DomainResult<bool> {
        let mut map = self.companies.write().map_err(poisoned)?;
        Ok(map.remove(&id).is_some())
    }

    fn add_customer(&self, id: CompanyId, customer: AccountId) -> DomainResult<bool> {
        let mut map = self.companies.write().map_err(poisoned)?;
        let company = map.get_mut(&id).ok_or(DomainError::NotFound)?;
        if company.customers.contains(&customer) {
            return Ok(false);
        }
        company.customers.push(customer);
        Ok(true)
    }
}
