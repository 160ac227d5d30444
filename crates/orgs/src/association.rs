//! The bidirectional company↔customer association.
//!
//! Two entry paths converge on one invariant: after either a
//! company-initiated direct add or a customer-initiated join-by-code, the
//! customer appears exactly once in the organization's `customers` set and
//! the organization exactly once in the customer's `associate_company_ids`.

use serde::Serialize;

use stoa_auth::{AuthContext, Role};
use stoa_core::{AccountId, CompanyId, DomainError, DomainResult};
use stoa_identity::AccountStore;
use stoa_policy::{ensure_customer_role, ensure_owner};

use crate::company::{CompanyStore, JoinCode};

/// Result of an association attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssociationOutcome {
    pub company_id: CompanyId,
    pub customer_id: AccountId,
    /// False when both sides already held the link (idempotent repeat).
    pub newly_linked: bool,
}

pub struct AssociationService<C, A> {
    companies: C,
    accounts: A,
}

impl<C: CompanyStore, A: AccountStore> AssociationService<C, A> {
    pub fn new(companies: C, accounts: A) -> Self {
        Self { companies, accounts }
    }

    /// Company-initiated: attach `target` to the caller's organization. The
    /// caller must own the organization, and the target must be a customer
    /// account (only customers carry an associate list).
    pub fn direct_add(
        &self,
        ctx: &AuthContext,
        company_id: CompanyId,
        target: AccountId,
    ) -> DomainResult<AssociationOutcome> {
        let company = self.companies.get(company_id)?.ok_or(DomainError::NotFound)?;
        ensure_owner(ctx, company.owner)?;

        let account = self.accounts.get(target)?.ok_or(DomainError::NotFound)?;
        if account.role != Role::Customer {
            return Err(DomainError::validation(
                "target account must hold the customer role",
            ));
        }

        self.link(company_id, target)
    }

    /// Customer-initiated: resolve a join code and attach the caller. A code
    /// that is malformed or unknown reports the same not-found.
    pub fn join_by_code(&self, ctx: &AuthContext, code: &str) -> DomainResult<AssociationOutcome> {
        ensure_customer_role(ctx)?;

        let code = JoinCode::parse(code).map_err(|_| DomainError::NotFound)?;
        let company = self
            .companies
            .find_by_join_code(&code)?
            .ok_or(DomainError::NotFound)?;

        self.link(company.id, ctx.account_id())
    }

    /// Both sides are add-to-set-if-absent, each a single-document atomic
    /// write. There is no transaction across the pair: a failure between the
    /// two writes leaves the link half-applied until an idempotent retry,
    /// and concurrent invocations for the same pair converge on one entry
    /// per side.
    fn link(&self, company_id: CompanyId, customer: AccountId) -> DomainResult<AssociationOutcome> {
        let added_company_side = self.companies.add_customer(company_id, customer)?;
        let added_account_side = self.accounts.add_associate_company(customer, company_id)?;

        if added_company_side != added_account_side {
            // Half-applied link from an earlier failure or race, now healed.
            tracing::warn!(
                %company_id,
                customer_id = %customer,
                "association sides were out of step; converged"
            );
        }

        Ok(AssociationOutcome {
            company_id,
            customer_id: customer,
            newly_linked: added_company_side || added_account_side,
        })
    }
}
