//! Organization CRUD under the visibility and mutation rules.

use chrono::Utc;
use serde::Deserialize;

use stoa_auth::AuthContext;
use stoa_core::{CompanyId, DomainError, DomainResult};
use stoa_identity::AccountStore;
use stoa_policy::{ensure_company_role, ensure_owner, organization_scope};

use crate::company::{Company, CompanyStore, JoinCode};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCompany {
    pub name: String,
    pub join_code: String,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub join_code: Option<String>,
}

pub struct OrgService<C, A> {
    companies: C,
    accounts: A,
}

impl<C: CompanyStore, A: AccountStore> OrgService<C, A> {
    pub fn new(companies: C, accounts: A) -> Self {
        Self { companies, accounts }
    }

    /// Create the caller's organization. One per owner; join codes are
    /// globally unique.
    pub fn create(&self, ctx: &AuthContext, req: CreateCompany) -> DomainResult<Company> {
        ensure_company_role(ctx)?;
        let name = clean_name(&req.name)?;
        let join_code = JoinCode::parse(&req.join_code)?;

        let company = Company::new(ctx.account_id(), name, join_code);
        self.companies.insert(company.clone())?;

        // Second, independent write: the organization document is already
        // live even if this link write fails.
        self.accounts
            .set_company_id(ctx.account_id(), Some(company.id))?;

        tracing::info!(company_id = %company.id, owner = %company.owner, "organization created");
        Ok(company)
    }

    /// Read one organization. Out-of-scope reads look identical to absent
    /// documents.
    pub fn get(&self, ctx: &AuthContext, id: CompanyId) -> DomainResult<Company> {
        let company = self.companies.get(id)?.ok_or(DomainError::NotFound)?;
        if !organization_scope(ctx).admits(&company) {
            return Err(DomainError::NotFound);
        }
        Ok(company)
    }

    pub fn list(&self, ctx: &AuthContext) -> DomainResult<Vec<Company>> {
        let filter = organization_scope(ctx);
        Ok(self
            .companies
            .list()?
            .into_iter()
            .filter(|c| filter.admits(c))
            .collect())
    }

    /// Update name or join code: the owning account only.
    pub fn update(
        &self,
        ctx: &AuthContext,
        id: CompanyId,
        changes: CompanyUpdate,
    ) -> DomainResult<Company> {
        let mut company = self.companies.get(id)?.ok_or(DomainError::NotFound)?;
        ensure_owner(ctx, company.owner)?;

        if let Some(name) = changes.name {
            company.name = clean_name(&name)?;
        }
        if let Some(code) = changes.join_code {
            company.join_code = JoinCode::parse(&code)?;
        }
        company.updated_at = Utc::now();

        self.companies.update(company.clone())?;
        Ok(company)
    }

    /// Delete the organization document: the owning account only. Nothing
    /// else is touched; customers keep the company id in their associate
    /// lists and the owner keeps the stale link until a new organization is
    /// created.
    pub fn delete(&self, ctx: &AuthContext, id: CompanyId) -> DomainResult<()> {
        let company = self.companies.get(id)?.ok_or(DomainError::NotFound)?;
        ensure_owner(ctx, company.owner)?;

        if !self.companies.delete(id)? {
            return Err(DomainError::NotFound);
        }
        tracing::info!(company_id = %id, "organization deleted");
        Ok(())
    }
}

fn clean_name(raw: &str) -> DomainResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::validation("organization name must not be empty"));
    }
    Ok(name.to_string())
}
