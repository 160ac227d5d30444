//! Registration, login, and account self-service.

use chrono::Utc;
use serde::Deserialize;

use stoa_auth::{AuthContext, Role};
use stoa_core::{AccountId, DomainError, DomainResult, Email};
use stoa_policy::{ensure_admin, ensure_self_or_admin};

use crate::account::{Account, AccountStore};

/// Self-registration request. Admin accounts are provisioned, never
/// self-registered.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterAccount {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub name: Option<String>,
}

/// Partial profile update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
}

pub struct IdentityService<A> {
    accounts: A,
    hash_cost: u32,
}

impl<A: AccountStore> IdentityService<A> {
    pub fn new(accounts: A) -> Self {
        Self {
            accounts,
            hash_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Lower-cost hashing for test setups.
    pub fn with_hash_cost(accounts: A, hash_cost: u32) -> Self {
        Self {
            accounts,
            hash_cost,
        }
    }

    pub fn register(&self, req: RegisterAccount) -> DomainResult<Account> {
        let email = Email::parse(&req.email)?;
        if req.role == Role::Admin {
            return Err(DomainError::validation(
                "admin accounts cannot be self-registered",
            ));
        }
        if req.password.is_empty() {
            return Err(DomainError::validation("password must not be empty"));
        }

        let hash = bcrypt::hash(&req.password, self.hash_cost)
            .map_err(|e| DomainError::internal(format!("password hashing failed: {e}")))?;
        let account = Account::new(email, hash, req.role, req.name);
        self.accounts.insert(account.clone())?;

        tracing::info!(account_id = %account.id, role = %account.role, "account registered");
        Ok(account)
    }

    /// Unknown email and wrong password fail identically, so callers cannot
    /// enumerate registered addresses.
    pub fn login(&self, email: &str, password: &str) -> DomainResult<Account> {
        let Ok(email) = Email::parse(email) else {
            return Err(DomainError::Unauthenticated);
        };
        let Some(account) = self.accounts.find_by_email(&email)? else {
            tracing::debug!("login failed: unknown email");
            return Err(DomainError::Unauthenticated);
        };

        let matches = bcrypt::verify(password, &account.password_hash)
            .map_err(|e| DomainError::internal(format!("password verification failed: {e}")))?;
        if !matches {
            tracing::debug!(account_id = %account.id, "login failed: wrong password");
            return Err(DomainError::Unauthenticated);
        }

        Ok(account)
    }

    /// Read an account: the account itself, or an admin.
    pub fn get(&self, ctx: &AuthContext, id: AccountId) -> DomainResult<Account> {
        ensure_self_or_admin(ctx, id)?;
        self.accounts.get(id)?.ok_or(DomainError::NotFound)
    }

    /// Update profile fields: the account itself, or an admin. An email
    /// change re-checks uniqueness at the store boundary.
    pub fn update_profile(
        &self,
        ctx: &AuthContext,
        id: AccountId,
        changes: ProfileUpdate,
    ) -> DomainResult<Account> {
        ensure_self_or_admin(ctx, id)?;
        let mut account = self.accounts.get(id)?.ok_or(DomainError::NotFound)?;

        if let Some(email) = changes.email {
            account.email = Email::parse(&email)?;
        }
        if let Some(name) = changes.name {
            account.name = Some(name);
        }
        account.updated_at = Utc::now();

        self.accounts.update(account.clone())?;
        Ok(account)
    }

    /// Accounts are never deleted except by admin action.
    pub fn delete(&self, ctx: &AuthContext, id: AccountId) -> DomainResult<()> {
        ensure_admin(ctx)?;
        if !self.accounts.delete(id)? {
            return Err(DomainError::NotFound);
        }
        tracing::info!(account_id = %id, "account deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountsDirectory;
    use crate::store::InMemoryAccountStore;
    use stoa_auth::{AccountDirectory, RoleScope};
    use stoa_core::CompanyId;

    fn service() -> IdentityService<InMemoryAccountStore> {
        IdentityService::with_hash_cost(InMemoryAccountStore::new(), 4)
    }

    fn register_customer<A: AccountStore>(service: &IdentityService<A>, email: &str) -> Account {
        service
            .register(RegisterAccount {
                email: email.into(),
                password: "hunter2!".into(),
                role: Role::Customer,
                name: None,
            })
            .unwrap()
    }

    fn self_ctx(account: &Account) -> AuthContext {
        AuthContext::new(
            account.id,
            RoleScope::Customer {
                associate_company_ids: Vec::new(),
            },
        )
    }

    fn admin_ctx() -> AuthContext {
        AuthContext::new(AccountId::new(), RoleScope::Admin)
    }

    #[test]
    fn register_then_login_round_trips() {
        let service = service();
        let account = register_customer(&service, "a@x.com");

        // The stored hash is not the password itself.
        assert_ne!(account.password_hash, "hunter2!");

        let logged_in = service.login("a@x.com", "hunter2!").unwrap();
        assert_eq!(logged_in.id, account.id);
        assert_eq!(logged_in.role, Role::Customer);
    }

    #[test]
    fn register_rejects_admin_role() {
        let err = service()
            .register(RegisterAccount {
                email: "root@x.com".into(),
                password: "pw".into(),
                role: Role::Admin,
                name: None,
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn duplicate_email_conflicts_case_insensitively() {
        let service = service();
        register_customer(&service, "a@x.com");

        let err = service
            .register(RegisterAccount {
                email: "A@X.com".into(),
                password: "other".into(),
                role: Role::Company,
                name: None,
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn login_failures_are_indistinguishable() {
        let service = service();
        register_customer(&service, "a@x.com");

        let unknown = service.login("b@x.com", "hunter2!").unwrap_err();
        let wrong_password = service.login("a@x.com", "nope").unwrap_err();
        let malformed = service.login("not-an-email", "hunter2!").unwrap_err();

        assert_eq!(unknown, DomainError::Unauthenticated);
        assert_eq!(unknown, wrong_password);
        assert_eq!(unknown, malformed);
    }

    #[test]
    fn profile_update_is_self_or_admin() {
        let service = service();
        let account = register_customer(&service, "a@x.com");
        let other = register_customer(&service, "b@x.com");

        let err = service
            .update_profile(
                &self_ctx(&other),
                account.id,
                ProfileUpdate {
                    name: Some("Mallory".into()),
                    ..ProfileUpdate::default()
                },
            )
            .unwrap_err();
        assert_eq!(err, DomainError::unauthorized("user id mismatch"));

        let updated = service
            .update_profile(
                &self_ctx(&account),
                account.id,
                ProfileUpdate {
                    name: Some("Alice".into()),
                    ..ProfileUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name.as_deref(), Some("Alice"));

        let renamed = service
            .update_profile(
                &admin_ctx(),
                account.id,
                ProfileUpdate {
                    name: Some("Alice A.".into()),
                    ..ProfileUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(renamed.name.as_deref(), Some("Alice A."));
    }

    #[test]
    fn email_change_rechecks_uniqueness() {
        let service = service();
        let account = register_customer(&service, "a@x.com");
        register_customer(&service, "b@x.com");

        let err = service
            .update_profile(
                &self_ctx(&account),
                account.id,
                ProfileUpdate {
                    email: Some("B@x.com".into()),
                    ..ProfileUpdate::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn delete_is_admin_only_and_not_repeatable() {
        let service = service();
        let account = register_customer(&service, "a@x.com");

        let err = service.delete(&self_ctx(&account), account.id).unwrap_err();
        assert_eq!(err, DomainError::unauthorized("admin role required"));

        service.delete(&admin_ctx(), account.id).unwrap();
        assert_eq!(
            service.delete(&admin_ctx(), account.id).unwrap_err(),
            DomainError::NotFound
        );
    }

    #[test]
    fn directory_reflects_live_account_state() {
        let store = std::sync::Arc::new(InMemoryAccountStore::new());
        let service = IdentityService::with_hash_cost(store.clone(), 4);
        let account = register_customer(&service, "a@x.com");

        let directory = AccountsDirectory::new(store.clone());
        let snapshot = directory.snapshot(account.id).unwrap().unwrap();
        assert_eq!(snapshot.role, Role::Customer);
        assert!(snapshot.associate_company_ids.is_empty());

        // Association shows up in the next snapshot.
        let company_id = CompanyId::new();
        store.add_associate_company(account.id, company_id).unwrap();
        let snapshot = directory.snapshot(account.id).unwrap().unwrap();
        assert_eq!(snapshot.associate_company_ids, vec![company_id]);

        // A deleted account stops resolving.
        service.delete(&admin_ctx(), account.id).unwrap();
        assert!(directory.snapshot(account.id).unwrap().is_none());
    }
}
