use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use stoa_auth::AuthContext;
use stoa_core::{AccountId, CompanyId};
use stoa_orgs::{CompanyUpdate, CreateCompany};

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_company).get(list_companies))
        .route(
            "/:id",
            get(get_company).put(update_company).delete(delete_company),
        )
        .route("/:id/customers", post(add_customer))
        .route("/code/:code/customers", post(join_by_code))
}

pub async fn create_company(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<CreateCompany>,
) -> axum::response::Response {
    match services.orgs.create(&ctx, body) {
        Ok(company) => (StatusCode::CREATED, Json(company)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_companies(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
) -> axum::response::Response {
    match services.orgs.list(&ctx) {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_company(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: CompanyId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match services.orgs.get(&ctx, id) {
        Ok(company) => (StatusCode::OK, Json(company)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_company(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(body): Json<CompanyUpdate>,
) -> axum::response::Response {
    let id: CompanyId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match services.orgs.update(&ctx, id, body) {
        Ok(company) => (StatusCode::OK, Json(company)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_company(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: CompanyId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match services.orgs.delete(&ctx, id) {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "deleted": true })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Company-initiated association: the owner adds a customer account to its
/// roster.
pub async fn add_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::DirectAddRequest>,
) -> axum::response::Response {
    let id: CompanyId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let target: AccountId = match common::parse_id(&body.account_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match services.associations.direct_add(&ctx, id, target) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Customer-initiated association via the company's join code.
pub async fn join_by_code(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(code): Path<String>,
) -> axum::response::Response {
    match services.associations.join_by_code(&ctx, &code) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
