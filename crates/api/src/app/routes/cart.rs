use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};

use stoa_auth::AuthContext;
use stoa_cart::AddCartItem;
use stoa_core::CartItemId;

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(get_cart).post(add_item))
        .route("/:item_id", put(update_item).delete(remove_item))
}

pub async fn get_cart(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
) -> axum::response::Response {
    match services.carts.get(&ctx) {
        Ok(cart) => (StatusCode::OK, Json(cart)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Add a product to the cart; adding the same product again merges into the
/// existing line.
pub async fn add_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<AddCartItem>,
) -> axum::response::Response {
    match services.carts.add_item(&ctx, body) {
        Ok(cart) => (StatusCode::OK, Json(cart)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(item_id): Path<String>,
    Json(body): Json<dto::UpdateCartItemRequest>,
) -> axum::response::Response {
    let item_id: CartItemId = match common::parse_id(&item_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match services.carts.update_item(&ctx, item_id, body.quantity) {
        Ok(cart) => (StatusCode::OK, Json(cart)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn remove_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(item_id): Path<String>,
) -> axum::response::Response {
    let item_id: CartItemId = match common::parse_id(&item_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match services.carts.remove_item(&ctx, item_id) {
        Ok(cart) => (StatusCode::OK, Json(cart)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
