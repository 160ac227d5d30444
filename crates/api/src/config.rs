//! Process configuration from the environment.

use chrono::Duration;
use stoa_auth::TokenConfig;

/// Everything the binary reads from the environment, resolved once at
/// startup. Every knob has a default so `from_env` cannot fail.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen address, `BIND_ADDR`.
    pub bind_addr: String,
    /// HS256 signing secret, `JWT_SECRET`.
    pub jwt_secret: String,
    /// Access token lifetime in seconds, `ACCESS_TTL_SECS`.
    pub access_ttl_secs: i64,
    /// Refresh token lifetime in seconds, `REFRESH_TTL_SECS`.
    pub refresh_ttl_secs: i64,
    /// Password hash cost override, `BCRYPT_COST`. Unset means the bcrypt
    /// default.
    pub bcrypt_cost: Option<u32>,
    /// `TRUST_FORWARDED_IDENTITY`: when true the process sits behind a
    /// gateway that already resolved the bearer token, and requests are
    /// authenticated from the forwarded `x-user-*` headers instead of a
    /// token of their own.
    pub trust_forwarded_identity: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            jwt_secret,
            access_ttl_secs: env_i64("ACCESS_TTL_SECS", 15 * 60),
            refresh_ttl_secs: env_i64("REFRESH_TTL_SECS", 7 * 24 * 3600),
            bcrypt_cost: std::env::var("BCRYPT_COST")
                .ok()
                .and_then(|raw| raw.parse().ok()),
            trust_forwarded_identity: env_flag("TRUST_FORWARDED_IDENTITY"),
        }
    }

    pub fn token_config(&self) -> TokenConfig {
        TokenConfig {
            access_ttl: Duration::seconds(self.access_ttl_secs),
            refresh_ttl: Duration::seconds(self.refresh_ttl_secs),
        }
    }
}

fn env_i64(key: &str, default: i64) -> i64 {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "unparseable integer in env; using default");
            default
        }),
        Err(_) => default,
    }
}

fn env_flag(key: &str) -> bool {
    matches!(
        std::env::var(key).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}
