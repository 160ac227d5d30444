use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use stoa_auth::AuthContext;
use stoa_core::OrderId;
use stoa_orders::{CreateOrder, OrderUpdate};

use crate::app::errors;
use crate::app::routes::common;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_order).get(list_orders))
        .route(
            "/:id",
            get(get_order).put(update_order).delete(delete_order),
        )
}

pub async fn create_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<CreateOrder>,
) -> axum::response::Response {
    match services.orders.create(&ctx, body) {
        Ok(order) => (StatusCode::CREATED, Json(order)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
) -> axum::response::Response {
    match services.orders.list(&ctx) {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: OrderId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match services.orders.get(&ctx, id) {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(body): Json<OrderUpdate>,
) -> axum::response::Response {
    let id: OrderId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match services.orders.update(&ctx, id, body) {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: OrderId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match services.orders.delete(&ctx, id) {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "deleted": true })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
