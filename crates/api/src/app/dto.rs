use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stoa_auth::Role;
use stoa_core::{AccountId, CompanyId};
use stoa_identity::Account;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Refresh tokens travel in the body only, never in headers or cookies.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// Logout needs the refresh token (body only) and an access token, which may
/// arrive by cookie, header, or the `token` body field.
#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DirectAddRequest {
    pub account_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCartItemRequest {
    pub quantity: i64,
}

// -------------------------
// Response DTOs
// -------------------------

/// The account as clients see it; the password hash never leaves the
/// service.
#[derive(Debug, Serialize)]
pub struct AccountView {
    pub id: AccountId,
    pub email: String,
    pub role: Role,
    pub name: Option<String>,
    pub company_id: Option<CompanyId>,
    pub associate_company_ids: Vec<CompanyId>,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email.as_str().to_string(),
            role: account.role,
            name: account.name,
            company_id: account.company_id,
            associate_company_ids: account.associate_company_ids,
            created_at: account.created_at,
        }
    }
}
