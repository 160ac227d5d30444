use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use stoa_core::DomainError;
use stoa_identity::RegisterAccount;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::middleware;

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

/// Register an account and open its first session.
pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<RegisterAccount>,
) -> axum::response::Response {
    let account = match services.identity.register(body) {
        Ok(account) => account,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let issued = match services.tokens.issue(&account.snapshot()) {
        Ok(issued) => issued,
        Err(e) => return errors::domain_error_to_response(e.into()),
    };

    let mut response = (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "user": dto::AccountView::from(account),
            "token": issued.access_token,
            "refresh_token": issued.refresh_token,
        })),
    )
        .into_response();
    set_token_cookie(&mut response, &issued.access_token, services.access_ttl_secs);
    response
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    let account = match services.identity.login(&body.email, &body.password) {
        Ok(account) => account,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let issued = match services.tokens.issue(&account.snapshot()) {
        Ok(issued) => issued,
        Err(e) => return errors::domain_error_to_response(e.into()),
    };

    let mut response = (
        StatusCode::OK,
        Json(serde_json::json!({
            "user": dto::AccountView::from(account),
            "token": issued.access_token,
            "refresh_token": issued.refresh_token,
        })),
    )
        .into_response();
    set_token_cookie(&mut response, &issued.access_token, services.access_ttl_secs);
    response
}

/// Exchange a refresh token for a fresh access token, minted from the
/// account's current stored state.
pub async fn refresh(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RefreshRequest>,
) -> axum::response::Response {
    let Some(refresh_token) = body.refresh_token else {
        return errors::domain_error_to_response(DomainError::validation(
            "refresh_token is required",
        ));
    };

    match services.tokens.refresh(&refresh_token, &services.directory) {
        Ok(refreshed) => {
            let mut response = (
                StatusCode::OK,
                Json(serde_json::json!({ "token": refreshed.access_token })),
            )
                .into_response();
            set_token_cookie(&mut response, &refreshed.access_token, services.access_ttl_secs);
            response
        }
        Err(e) => errors::domain_error_to_response(e.into()),
    }
}

/// Close a session: the refresh record is deleted and the presented access
/// token is blacklisted until its own expiry.
pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Json(body): Json<dto::LogoutRequest>,
) -> axum::response::Response {
    let Some(refresh_token) = body.refresh_token else {
        return errors::domain_error_to_response(DomainError::validation(
            "refresh_token is required",
        ));
    };

    let mut carriers = middleware::carriers_from_headers(&headers);
    carriers.body = body.token;
    let Some(access_token) = carriers.bearer().map(str::to_string) else {
        return errors::domain_error_to_response(DomainError::Unauthenticated);
    };

    match services.tokens.revoke(&refresh_token, &access_token) {
        Ok(()) => {
            let mut response = (
                StatusCode::OK,
                Json(serde_json::json!({ "message": "logged out" })),
            )
                .into_response();
            clear_token_cookie(&mut response);
            response
        }
        Err(e) => errors::domain_error_to_response(e.into()),
    }
}

/// The caller's own account. Unlike normal request verification this is
/// blacklist-aware, so a freshly revoked token stops working here at once.
pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let carriers = middleware::carriers_from_headers(&headers);
    let ctx = match stoa_auth::resolve_checked(&services.tokens, &carriers) {
        Ok(ctx) => ctx,
        Err(e) => return errors::domain_error_to_response(e.into()),
    };

    match services.identity.get(&ctx, ctx.account_id()) {
        Ok(account) => (
            StatusCode::OK,
            Json(serde_json::json!({ "user": dto::AccountView::from(account) })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

fn set_token_cookie(response: &mut axum::response::Response, token: &str, max_age_secs: i64) {
    let cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        middleware::TOKEN_COOKIE,
        token,
        max_age_secs
    );
    if let Ok(value) = cookie.parse() {
        response.headers_mut().insert(SET_COOKIE, value);
    }
}

fn clear_token_cookie(response: &mut axum::response::Response) {
    let cookie = format!(
        "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0",
        middleware::TOKEN_COOKIE
    );
    if let Ok(value) = cookie.parse() {
        response.headers_mut().insert(SET_COOKIE, value);
    }
}
