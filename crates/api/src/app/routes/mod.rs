use axum::Router;

pub mod auth;
pub mod cart;
pub mod common;
pub mod companies;
pub mod orders;
pub mod products;
pub mod system;

/// Router for every endpoint behind the auth middleware.
pub fn protected_router() -> Router {
    Router::new()
        .nest("/companies", companies::router())
        .nest("/products", products::router())
        .nest("/orders", orders::router())
        .nest("/cart", cart::router())
}
