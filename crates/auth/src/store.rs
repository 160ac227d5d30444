//! Credential persistence seam: refresh records and the access-token
//! blacklist.
//!
//! Both collections are written with single-document atomicity only; there
//! is no transaction spanning them, and the service layer is built to
//! tolerate that (see `service`).

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use stoa_core::{AccountId, DomainError, DomainResult};

/// Server-side record backing one refresh credential.
///
/// Keyed by the exact token string. One account may hold any number of live
/// records at once (concurrent sessions).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshRecord {
    pub token: String,
    pub account_id: AccountId,
    pub expires_at: DateTime<Utc>,
}

/// An access token revoked before its natural expiry.
///
/// Entries past `expires_at` are logically dead: the token would fail plain
/// verification anyway, so they only need to be purged lazily.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlacklistEntry {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Storage seam for credential state.
pub trait CredentialStore: Send + Sync {
    /// Persist a refresh record. Never replaces or invalidates prior records
    /// for the same account.
    fn insert_refresh(&self, record: RefreshRecord) -> DomainResult<()>;

    fn get_refresh(&self, token: &str) -> DomainResult<Option<RefreshRecord>>;

    /// Delete a refresh record; `false` when it was already gone.
    fn delete_refresh(&self, token: &str) -> DomainResult<bool>;

    fn insert_blacklist(&self, entry: BlacklistEntry) -> DomainResult<()>;

    /// Whether this token is blacklisted and the entry is still live at `now`.
    fn is_blacklisted(&self, token: &str, now: DateTime<Utc>) -> DomainResult<bool>;

    /// Drop refresh records and blacklist entries dead at `now`; returns how
    /// many were removed.
    fn purge_expired(&self, now: DateTime<Utc>) -> DomainResult<usize>;
}

impl<S> CredentialStore for Arc<S>
where
    S: CredentialStore + ?Sized,
{
    fn insert_refresh(&self, record: RefreshRecord) -> DomainResult<()> {
        (**self).insert_refresh(record)
    }

    fn get_refresh(&self, token: &str) -> DomainResult<Option<RefreshRecord>> {
        (**self).get_refresh(token)
    }

    fn delete_refresh(&self, token: &str) -> DomainResult<bool> {
        (**self).delete_refresh(token)
    }

    fn insert_blacklist(&self, entry: BlacklistEntry) -> DomainResult<()> {
        (**self).insert_blacklist(entry)
    }

    fn is_blacklisted(&self, token: &str, now: DateTime<Utc>) -> DomainResult<bool> {
        (**self).is_blacklisted(token, now)
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        (**self).purge_expired(now)
    }
}

/// In-memory credential store for tests and single-process runs.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    refresh: RwLock<HashMap<String, RefreshRecord>>,
    blacklist: RwLock<HashMap<String, BlacklistEntry>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(_: impl core::fmt::Debug) -> DomainError {
    DomainError::internal("credential store lock poisoned")
}

impl CredentialStore for InMemoryCredentialStore {
    fn insert_refresh(&self, record: RefreshRecord) -> DomainResult<()> {
        let mut map = self.refresh.write().map_err(poisoned)?;
        map.insert(record.token.clone(), record);
        Ok(())
    }

    fn get_refresh(&self, token: &str) -> DomainResult<Option<RefreshRecord>> {
        let map = self.refresh.read().map_err(poisoned)?;
        Ok(map.get(token).cloned())
    }

    fn delete_refresh(&self, token: &str) -> DomainResult<bool> {
        let mut map = self.refresh.write().map_err(poisoned)?;
        Ok(map.remove(token).is_some())
    }

    fn insert_blacklist(&self, entry: BlacklistEntry) -> DomainResult<()> {
        let mut map = self.blacklist.write().map_err(poisoned)?;
        map.insert(entry.token.clone(), entry);
        Ok(())
    }

    fn is_blacklisted(&self, token: &str, now: DateTime<Utc>) -> DomainResult<bool> {
        let map = self.blacklist.read().map_err(poisoned)?;
        Ok(map.get(token).is_some_and(|entry| entry.expires_at > now))
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        let mut removed = 0;

        let mut refresh = self.refresh.write().map_err(poisoned)?;
        let before = refresh.len();
        refresh.retain(|_, record| record.expires_at > now);
        removed += before - refresh.len();
        drop(refresh);

        let mut blacklist = self.blacklist.write().map_err(poisoned)?;
        let before = blacklist.len();
        blacklist.retain(|_, entry| entry.expires_at > now);
        removed += before - blacklist.len();

        Ok(removed)
    }
}
