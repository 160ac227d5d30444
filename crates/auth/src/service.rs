//! Token issuance, verification, refresh, and revocation.
//!
//! Verification is purely computational (signature + expiry) and never
//! touches storage; refresh and revoke each perform one storage read
//! followed by at most two single-document writes, with no cross-document
//! transaction between the refresh and blacklist collections.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use uuid::Uuid;

use stoa_core::{AccountId, CompanyId, DomainError, DomainResult};

use crate::claims::{AccessClaims, RefreshClaims, UserClaims};
use crate::keys::TokenKeys;
use crate::roles::Role;
use crate::store::{BlacklistEntry, CredentialStore, RefreshRecord};

/// Current persisted account state, as token issuance needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSnapshot {
    pub account_id: AccountId,
    pub role: Role,
    pub company_id: Option<CompanyId>,
    pub associate_company_ids: Vec<CompanyId>,
}

/// Read-only account lookup used at refresh time.
///
/// Refresh re-issues claims from the state behind this seam, never from the
/// stale claims inside the refresh token, so a role change takes effect on
/// the next refresh.
pub trait AccountDirectory: Send + Sync {
    fn snapshot(&self, account_id: AccountId) -> DomainResult<Option<AccountSnapshot>>;
}

impl<D> AccountDirectory for std::sync::Arc<D>
where
    D: AccountDirectory + ?Sized,
{
    fn snapshot(&self, account_id: AccountId) -> DomainResult<Option<AccountSnapshot>> {
        (**self).snapshot(account_id)
    }
}

/// Credential lifetimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenConfig {
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::days(7),
        }
    }
}

/// A freshly issued credential pair.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access_token: String,
    pub access_claims: AccessClaims,
    pub refresh_token: String,
    pub refresh_expires_at: DateTime<Utc>,
}

/// A re-issued access credential (refresh flow; the refresh token lives on).
#[derive(Debug, Clone)]
pub struct RefreshedAccess {
    pub access_token: String,
    pub access_claims: AccessClaims,
}

/// Token operation failures.
///
/// Verification failures collapse into [`TokenError::Invalid`] regardless of
/// cause, and refresh rejections collapse absent-vs-expired into
/// [`TokenError::RefreshRejected`]; the specific cause is logged server-side
/// but never surfaced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid credential")]
    Invalid,

    #[error("refresh credential rejected")]
    RefreshRejected,

    /// Revocation requires the refresh record to exist.
    #[error("refresh credential not found")]
    RefreshNotFound,

    #[error("token infrastructure error: {0}")]
    Internal(String),
}

impl From<TokenError> for DomainError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid | TokenError::RefreshRejected => DomainError::Unauthenticated,
            TokenError::RefreshNotFound => DomainError::NotFound,
            TokenError::Internal(msg) => DomainError::Internal(msg),
        }
    }
}

impl From<DomainError> for TokenError {
    fn from(err: DomainError) -> Self {
        TokenError::Internal(err.to_string())
    }
}

/// Issues, verifies, refreshes, and revokes the platform's bearer tokens.
pub struct TokenService<S> {
    keys: TokenKeys,
    config: TokenConfig,
    store: S,
}

impl<S: CredentialStore> TokenService<S> {
    pub fn new(secret: &[u8], config: TokenConfig, store: S) -> Self {
        Self {
            keys: TokenKeys::from_secret(secret),
            config,
            store,
        }
    }

    /// Issue a credential pair for the account state in `snapshot`.
    ///
    /// Persists the refresh record without touching any prior records for
    /// the same account: concurrent sessions are allowed.
    pub fn issue(&self, snapshot: &AccountSnapshot) -> Result<IssuedTokens, TokenError> {
        let now = Utc::now();
        let access_claims = self.mint_access_claims(snapshot, now);

        let access_token = self
            .keys
            .encode(&access_claims)
            .map_err(|e| TokenError::Internal(format!("access token signing failed: {e}")))?;

        let refresh_expires_at = now + self.config.refresh_ttl;
        let refresh_claims = RefreshClaims {
            sub: snapshot.account_id,
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: refresh_expires_at.timestamp(),
        };
        let refresh_token = self
            .keys
            .encode(&refresh_claims)
            .map_err(|e| TokenError::Internal(format!("refresh token signing failed: {e}")))?;

        self.store.insert_refresh(RefreshRecord {
            token: refresh_token.clone(),
            account_id: snapshot.account_id,
            expires_at: refresh_expires_at,
        })?;

        Ok(IssuedTokens {
            access_token,
            access_claims,
            refresh_token,
            refresh_expires_at,
        })
    }

    /// Verify signature and expiry of an access token.
    ///
    /// Deliberately does not consult the blacklist: normal request
    /// verification stays O(1) and stateless, and blacklist checks are the
    /// caller's responsibility on the logout path only.
    pub fn verify(&self, access_token: &str) -> Result<AccessClaims, TokenError> {
        self.keys
            .decode::<AccessClaims>(access_token)
            .map_err(|e| {
                tracing::debug!(error = %e, "access token verification failed");
                TokenError::Invalid
            })
    }

    /// Exchange a refresh token for a fresh access credential.
    ///
    /// The server-side record, keyed by the exact token string, is the
    /// authority; the record is read, not deleted, so the refresh token
    /// stays usable until logout.
    pub fn refresh<D: AccountDirectory>(
        &self,
        refresh_token: &str,
        directory: &D,
    ) -> Result<RefreshedAccess, TokenError> {
        let Some(record) = self.store.get_refresh(refresh_token)? else {
            tracing::debug!("refresh rejected: no record for presented token");
            return Err(TokenError::RefreshRejected);
        };

        let now = Utc::now();
        if record.expires_at <= now {
            tracing::debug!(account_id = %record.account_id, "refresh rejected: record expired");
            return Err(TokenError::RefreshRejected);
        }

        let Some(snapshot) = directory.snapshot(record.account_id)? else {
            tracing::debug!(account_id = %record.account_id, "refresh rejected: account gone");
            return Err(TokenError::RefreshRejected);
        };

        let access_claims = self.mint_access_claims(&snapshot, now);
        let access_token = self
            .keys
            .encode(&access_claims)
            .map_err(|e| TokenError::Internal(format!("access token signing failed: {e}")))?;

        Ok(RefreshedAccess {
            access_token,
            access_claims,
        })
    }

    /// Revoke a session: delete the refresh record and blacklist the access
    /// token until its own expiry.
    ///
    /// The refresh record must exist (a repeat revoke fails with not-found).
    /// The access token's signature is checked but its expiry may already
    /// have passed. No check that the two tokens belong to the same account
    /// is performed.
    pub fn revoke(&self, refresh_token: &str, access_token: &str) -> Result<(), TokenError> {
        if self.store.get_refresh(refresh_token)?.is_none() {
            return Err(TokenError::RefreshNotFound);
        }

        let access_claims = self
            .keys
            .decode_allow_expired::<AccessClaims>(access_token)
            .map_err(|e| {
                tracing::debug!(error = %e, "revoke rejected: undecodable access token");
                TokenError::Invalid
            })?;

        self.store.delete_refresh(refresh_token)?;
        self.store.insert_blacklist(BlacklistEntry {
            token: access_token.to_string(),
            expires_at: access_claims.expires_at(),
        })?;

        Ok(())
    }

    /// Whether an access token has been revoked and the entry is still live.
    pub fn is_blacklisted(&self, access_token: &str) -> Result<bool, TokenError> {
        Ok(self.store.is_blacklisted(access_token, Utc::now())?)
    }

    /// Lazily drop dead refresh records and blacklist entries.
    pub fn purge_expired(&self) -> Result<usize, TokenError> {
        Ok(self.store.purge_expired(Utc::now())?)
    }

    fn mint_access_claims(&self, snapshot: &AccountSnapshot, now: DateTime<Utc>) -> AccessClaims {
        let user = match snapshot.role {
            Role::Admin => UserClaims {
                id: snapshot.account_id,
                role: Role::Admin,
                company_id: None,
                associate_company_ids: None,
            },
            Role::Company => UserClaims {
                id: snapshot.account_id,
                role: Role::Company,
                company_id: snapshot.company_id,
                associate_company_ids: None,
            },
            Role::Customer => UserClaims {
                id: snapshot.account_id,
                role: Role::Customer,
                company_id: None,
                associate_company_ids: Some(snapshot.associate_company_ids.clone()),
            },
        };

        AccessClaims {
            user,
            iat: now.timestamp(),
            exp: (now + self.config.access_ttl).timestamp(),
        }
    }
}
