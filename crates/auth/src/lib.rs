//! `stoa-auth` — bearer-credential lifecycle and authorization context.
//!
//! Issues, verifies, refreshes, and revokes the platform's signed tokens;
//! resolves inbound requests into a typed [`AuthContext`]. Storage is reached
//! only through the [`CredentialStore`] and [`AccountDirectory`] seams, so
//! this crate stays decoupled from HTTP routing and persistence engines.

pub mod claims;
pub mod context;
pub mod keys;
pub mod resolver;
pub mod roles;
pub mod service;
pub mod store;

pub use claims::{AccessClaims, RefreshClaims, UserClaims};
pub use context::AuthContext;
pub use keys::TokenKeys;
pub use resolver::{resolve, resolve_checked, TokenCarriers};
pub use roles::{Role, RoleScope, UnknownRole};
pub use service::{
    AccountDirectory, AccountSnapshot, IssuedTokens, RefreshedAccess, TokenConfig, TokenError,
    TokenService,
};
pub use store::{BlacklistEntry, CredentialStore, InMemoryCredentialStore, RefreshRecord};
