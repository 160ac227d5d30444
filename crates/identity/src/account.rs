//! The account document and its persistence seam.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stoa_auth::{AccountDirectory, AccountSnapshot, Role};
use stoa_core::{AccountId, CompanyId, DomainResult, Email};

/// An account document.
///
/// `company_id` is populated only for company accounts (once the account has
/// created its organization); `associate_company_ids` only for customers.
/// Emails are stored lowercased, so email uniqueness is case-insensitive by
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub email: Email,
    pub password_hash: String,
    pub role: Role,
    pub name: Option<String>,
    pub company_id: Option<CompanyId>,
    pub associate_company_ids: Vec<CompanyId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(email: Email, password_hash: String, role: Role, name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::new(),
            email,
            password_hash,
            role,
            name,
            company_id: None,
            associate_company_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The slice of account state token issuance reads.
    pub fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            account_id: self.id,
            role: self.role,
            company_id: self.company_id,
            associate_company_ids: self.associate_company_ids.clone(),
        }
    }
}

/// Account persistence.
///
/// Single-document writes are atomic; there are no cross-document
/// transactions. The set-valued and uniqueness-sensitive operations are
/// expressed as store primitives so implementations can make them atomic
/// instead of read-then-write.
pub trait AccountStore: Send + Sync {
    /// Insert a new account, failing with a conflict if the email is taken.
    fn insert(&self, account: Account) -> DomainResult<()>;

    fn get(&self, id: AccountId) -> DomainResult<Option<Account>>;

    fn find_by_email(&self, email: &Email) -> DomainResult<Option<Account>>;

    /// Replace the document. Fails with a conflict if the new email belongs
    /// to another account, not-found if the document is gone.
    fn update(&self, account: Account) -> DomainResult<()>;

    /// Returns whether a document was actually deleted.
    fn delete(&self, id: AccountId) -> DomainResult<bool>;

    /// Atomic add-to-set on `associate_company_ids`. Returns whether the
    /// entry was newly added; not-found if the account is absent.
    fn add_associate_company(&self, id: AccountId, company_id: CompanyId) -> DomainResult<bool>;

    /// Point write of the owned-organization link on a company account.
    fn set_company_id(&self, id: AccountId, company_id: Option<CompanyId>) -> DomainResult<()>;
}

impl<S> AccountStore for std::sync::Arc<S>
where
    S: AccountStore + ?Sized,
{
    fn insert(&self, account: Account) -> DomainResult<()> {
        (**self).insert(account)
    }

    fn get(&self, id: AccountId) -> DomainResult<Option<Account>> {
        (**self).get(id)
    }

    fn find_by_email(&self, email: &Email) -> DomainResult<Option<Account>> {
        (**self).find_by_email(email)
    }

    fn update(&self, account: Account) -> DomainResult<()> {
        (**self).update(account)
    }

    fn delete(&self, id: AccountId) -> DomainResult<bool> {
        (**self).delete(id)
    }

    fn add_associate_company(&self, id: AccountId, company_id: CompanyId) -> DomainResult<bool> {
        (**self).add_associate_company(id, company_id)
    }

    fn set_company_id(&self, id: AccountId, company_id: Option<CompanyId>) -> DomainResult<()> {
        (**self).set_company_id(id, company_id)
    }
}

/// Refresh-time account lookup over any account store.
///
/// Token refresh re-issues claims from the state seen here, so role and
/// company-scope changes take effect on the next refresh, and a deleted
/// account stops refreshing immediately.
pub struct AccountsDirectory<A> {
    accounts: A,
}

impl<A> AccountsDirectory<A> {
    pub fn new(accounts: A) -> Self {
        Self { accounts }
    }
}

impl<A: AccountStore> AccountDirectory for AccountsDirectory<A> {
    fn snapshot(&self, account_id: AccountId) -> DomainResult<Option<AccountSnapshot>> {
        Ok(self.accounts.get(account_id)?.map(|a| a.snapshot()))
    }
}
