//! Wire claim shapes for the two credential kinds.
//!
//! The access credential carries a nested `user` object (id, role, and the
//! role's scope fields) plus standard issued-at/expiry seconds. The refresh
//! credential carries only the subject and a unique `jti`; everything else
//! about the session lives server-side in the refresh record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stoa_core::{AccountId, CompanyId};

use crate::roles::Role;

/// Identity portion of the access credential.
///
/// `company_id` is present only for company-role tokens (and only once the
/// organization exists); `associate_company_ids` only for customer-role
/// tokens. Absent fields are omitted from the encoded token entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaims {
    pub id: AccountId,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<CompanyId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associate_company_ids: Option<Vec<CompanyId>>,
}

/// Claims of the short-lived access credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub user: UserClaims,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
}

impl AccessClaims {
    pub fn issued_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.iat, 0).unwrap_or_else(|| DateTime::<Utc>::MIN_UTC)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(|| DateTime::<Utc>::MIN_UTC)
    }
}

/// Claims of the long-lived refresh credential.
///
/// Deliberately minimal: the server-side refresh record, not these claims,
/// is the authority at refresh time, so a role change lands on the next
/// refresh without re-authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: AccountId,
    /// Unique per issuance; distinguishes concurrent sessions of one account.
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer_claims() -> AccessClaims {
        AccessClaims {
            user: UserClaims {
                id: AccountId::new(),
                role: Role::Customer,
                company_id: None,
                associate_company_ids: Some(vec![CompanyId::new()]),
            },
            iat: 1_700_000_000,
            exp: 1_700_000_900,
        }
    }

    #[test]
    fn absent_scope_fields_are_omitted_from_json() {
        let claims = AccessClaims {
            user: UserClaims {
                id: AccountId::new(),
                role: Role::Admin,
                company_id: None,
                associate_company_ids: None,
            },
            iat: 0,
            exp: 60,
        };

        let json = serde_json::to_value(&claims).unwrap();
        let user = json.get("user").unwrap();
        assert!(user.get("company_id").is_none());
        assert!(user.get("associate_company_ids").is_none());
    }

    #[test]
    fn claims_round_trip_through_json() {
        let claims = customer_claims();
        let json = serde_json::to_string(&claims).unwrap();
        let back: AccessClaims = serde_json::from_str(&json).unwrap();
        assert_eq!(back, claims);
    }

    #[test]
    fn timestamp_helpers_convert_unix_seconds() {
        let claims = customer_claims();
        assert_eq!(claims.expires_at().timestamp(), claims.exp);
        assert_eq!(claims.issued_at().timestamp(), claims.iat);
    }
}
