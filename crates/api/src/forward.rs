//! Forwarded-identity headers for gateway deployments.
//!
//! When this process fronts the stack it resolves the bearer token once and
//! stamps the result onto the request as `x-user-*` headers; a downstream
//! copy running with `TRUST_FORWARDED_IDENTITY` reads those headers back
//! instead of re-verifying the signature. The associate-company list is the
//! only multi-valued field and travels comma-separated.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use stoa_auth::{AuthContext, Role, RoleScope};
use stoa_core::{AccountId, CompanyId};

pub const USER_ID: &str = "x-user-id";
pub const USER_ROLE: &str = "x-user-role";
pub const COMPANY_ID: &str = "x-company-id";
pub const ASSOCIATE_COMPANY_IDS: &str = "x-associate-company-ids";

/// Header pairs carrying `ctx`, ready to insert into an outbound request.
pub fn encode(ctx: &AuthContext) -> Vec<(HeaderName, HeaderValue)> {
    let mut headers = vec![
        (HeaderName::from_static(USER_ID), ctx.account_id().to_string()),
        (
            HeaderName::from_static(USER_ROLE),
            ctx.role().as_str().to_string(),
        ),
    ];

    match ctx.scope() {
        RoleScope::Admin => {}
        RoleScope::Company { company_id } => {
            if let Some(company_id) = company_id {
                headers.push((HeaderName::from_static(COMPANY_ID), company_id.to_string()));
            }
        }
        RoleScope::Customer {
            associate_company_ids,
        } => {
            let joined = associate_company_ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(",");
            headers.push((HeaderName::from_static(ASSOCIATE_COMPANY_IDS), joined));
        }
    }

    // Uuid and role strings are always valid header values.
    headers
        .into_iter()
        .filter_map(|(name, value)| Some((name, HeaderValue::from_str(&value).ok()?)))
        .collect()
}

/// Rebuild the caller context from forwarded headers.
///
/// `None` means the forwarded context is absent or does not satisfy the
/// claims contract (unknown role, unparseable id); callers must treat that
/// as unauthenticated rather than fall back to a restrictive default.
pub fn decode(headers: &HeaderMap) -> Option<AuthContext> {
    let account_id: AccountId = header_str(headers, USER_ID)?.parse().ok()?;
    let role: Role = header_str(headers, USER_ROLE)?.parse().ok()?;

    let scope = match role {
        Role::Admin => RoleScope::Admin,
        Role::Company => {
            let company_id = match header_str(headers, COMPANY_ID) {
                Some(raw) => Some(raw.parse::<CompanyId>().ok()?),
                None => None,
            };
            RoleScope::Company { company_id }
        }
        Role::Customer => {
            let associate_company_ids = match header_str(headers, ASSOCIATE_COMPANY_IDS) {
                Some(raw) => raw
                    .split(',')
                    .filter(|part| !part.trim().is_empty())
                    .map(|part| part.trim().parse::<CompanyId>())
                    .collect::<Result<Vec<_>, _>>()
                    .ok()?,
                None => Vec::new(),
            };
            RoleScope::Customer {
                associate_company_ids,
            }
        }
    };

    Some(AuthContext::new(account_id, scope))
}

/// Drop any client-supplied identity headers.
///
/// Applied before stamping so a caller cannot smuggle a context past the
/// verifying deployment to a trusting one.
pub fn strip(headers: &mut HeaderMap) {
    for name in [USER_ID, USER_ROLE, COMPANY_ID, ASSOCIATE_COMPANY_IDS] {
        headers.remove(name);
    }
}

fn header_str<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers.get(name)?.to_str().ok()
}
