use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, http::StatusCode, middleware::Next, response::Response};

use stoa_auth::TokenCarriers;

use crate::app::errors;
use crate::app::services::Tokens;
use crate::forward;

/// Cookie that may carry the access token.
pub const TOKEN_COOKIE: &str = "token";

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<Tokens>,
    /// Authenticate from forwarded `x-user-*` headers instead of verifying
    /// a token. Only sensible behind a gateway that stripped and re-stamped
    /// those headers itself.
    pub trust_forwarded: bool,
}

/// Authenticates every request on the protected router and stashes the
/// caller context in request extensions.
///
/// In the default mode the resolved context is also stamped onto the
/// forwarded request as `x-user-*` headers, after dropping any the client
/// sent, so a trusting downstream deployment sees exactly what this process
/// verified.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let ctx = if state.trust_forwarded {
        forward::decode(req.headers()).ok_or_else(unauthenticated)?
    } else {
        forward::strip(req.headers_mut());
        let carriers = carriers_from_headers(req.headers());
        let ctx =
            stoa_auth::resolve(&state.tokens, &carriers).map_err(|_| unauthenticated())?;
        for (name, value) in forward::encode(&ctx) {
            req.headers_mut().insert(name, value);
        }
        ctx
    };

    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}

fn unauthenticated() -> Response {
    errors::json_error(
        StatusCode::UNAUTHORIZED,
        "unauthenticated",
        "authentication required",
    )
}

/// Token carriers present at the HTTP layer: the `token` cookie and the
/// `Authorization` header. The body carrier only exists on the refresh and
/// logout endpoints, which read their own payloads.
pub fn carriers_from_headers(headers: &HeaderMap) -> TokenCarriers {
    TokenCarriers {
        cookie: cookie_value(headers, TOKEN_COOKIE),
        authorization: headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
        body: None,
    }
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(axum::http::header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}
