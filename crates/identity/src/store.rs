//! In-memory account store.

use std::collections::HashMap;
use std::sync::RwLock;

use stoa_core::{AccountId, CompanyId, DomainError, DomainResult, Email};

use crate::account::{Account, AccountStore};

/// In-memory account store with a unique email index.
///
/// Every operation holds the lock for its whole duration, so each trait
/// method is atomic with respect to the others. Lookups scan; this store
/// backs tests and single-process deployments, not large datasets.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<AccountId, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(_: impl core::fmt::Debug) -> DomainError {
    DomainError::internal("account store lock poisoned")
}

impl AccountStore for InMemoryAccountStore {
    fn insert(&self, account: Account) -> DomainResult<()> {
        let mut map = self.accounts.write().map_err(poisoned)?;
        if map.values().any(|a| a.email == account.email) {
            return Err(DomainError::conflict("email already registered"));
        }
        map.insert(account.id, account);
        Ok(())
    }

    fn get(&self, id: AccountId) -> DomainResult<Option<Account>> {
        let map = self.accounts.read().map_err(poisoned)?;
        Ok(map.get(&id).cloned())
    }

    fn find_by_email(&self, email: &Email) -> DomainResult<Option<Account>> {
        let map = self.accounts.read().map_err(poisoned)?;
        Ok(map.values().find(|a| &a.email == email).cloned())
    }

    fn update(&self, account: Account) -> DomainResult<()> {
        let mut map = self.accounts.write().map_err(poisoned)?;
        if map
            .values()
            .any(|a| a.id != account.id && a.email == account.email)
        {
            return Err(DomainError::conflict("email already registered"));
        }
        if !map.contains_key(&account.id) {
            return Err(DomainError::NotFound);
        }
        map.insert(account.id, account);
        Ok(())
    }

    fn delete(&self, id: AccountId) -> DomainResult<bool> {
        let mut map = self.accounts.write().map_err(poisoned)?;
        Ok(map.remove(&id).is_some())
    }

    fn add_associate_company(&self, id: AccountId, company_id: CompanyId) -> DomainResult<bool> {
        let mut map = self.accounts.write().map_err(poisoned)?;
        let account = map.get_mut(&id).ok_or(DomainError::NotFound)?;
        if account.associate_company_ids.contains(&company_id) {
            return Ok(false);
        }
        account.associate_company_ids.push(company_id);
        Ok(true)
    }

    fn set_company_id(&self, id: AccountId, company_id: Option<CompanyId>) -> DomainResult<()> {
        let mut map = self.accounts.write().map_err(poisoned)?;
        let account = map.get_mut(&id).ok_or(DomainError::NotFound)?;
        account.company_id = company_id;
        Ok(())
    }
}
