//! Extracting the bearer token from the places clients put it.

use crate::context::AuthContext;
use crate::service::{TokenError, TokenService};
use crate::store::CredentialStore;

/// The raw carriers a request may present a token in, before precedence is
/// applied.
///
/// Precedence is fixed: cookie, then `Authorization` header, then body
/// field. A malformed value in a higher-precedence carrier does not fall
/// through to the next one.
#[derive(Debug, Clone, Default)]
pub struct TokenCarriers {
    pub cookie: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<String>,
}

impl TokenCarriers {
    pub fn from_cookie(token: impl Into<String>) -> Self {
        Self {
            cookie: Some(token.into()),
            ..Self::default()
        }
    }

    pub fn from_authorization(header: impl Into<String>) -> Self {
        Self {
            authorization: Some(header.into()),
            ..Self::default()
        }
    }

    pub fn from_body(token: impl Into<String>) -> Self {
        Self {
            body: Some(token.into()),
            ..Self::default()
        }
    }

    /// The token the request is taken to present, if any.
    pub fn bearer(&self) -> Option<&str> {
        if let Some(cookie) = self.cookie.as_deref() {
            return non_empty(cookie);
        }
        if let Some(header) = self.authorization.as_deref() {
            let token = header.strip_prefix("Bearer ").unwrap_or(header);
            return non_empty(token);
        }
        if let Some(body) = self.body.as_deref() {
            return non_empty(body);
        }
        None
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    if s.is_empty() { None } else { Some(s) }
}

/// Resolve a request's carriers to an authenticated caller.
///
/// Verification is signature + expiry only; the revocation blacklist is not
/// consulted here.
pub fn resolve<S: CredentialStore>(
    service: &TokenService<S>,
    carriers: &TokenCarriers,
) -> Result<AuthContext, TokenError> {
    let token = carriers.bearer().ok_or(TokenError::Invalid)?;
    let claims = service.verify(token)?;
    Ok(AuthContext::from_claims(&claims))
}

/// Like [`resolve`], but also rejects blacklisted tokens.
///
/// Used on the logout path, where a revoked-but-unexpired access token must
/// not pass.
pub fn resolve_checked<S: CredentialStore>(
    service: &TokenService<S>,
    carriers: &TokenCarriers,
) -> Result<AuthContext, TokenError> {
    let token = carriers.bearer().ok_or(TokenError::Invalid)?;
    let claims = service.verify(token)?;
    if service.is_blacklisted(token)? {
        return Err(TokenError::Invalid);
    }
    Ok(AuthContext::from_claims(&claims))
}
