use axum::{Router, extract::DefaultBodyLimit, routing::get};

use crate::{error::AppError, state::AppState};

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod products;
pub mod storefront;
pub mod webhook;

// Multipart framing on top of the image itself.
const UPLOAD_OVERHEAD_BYTES: usize = 64 * 1024;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/products", products::router())
        .nest("/categories", products::category_router())
        .nest("/cart", cart::api_router())
        .nest("/orders", orders::router())
}

pub fn app(state: AppState) -> Router {
    let body_limit = state
        .config
        .max_upload_bytes
        .saturating_add(UPLOAD_OVERHEAD_BYTES);

    Router::new()
        .route("/health", get(health::health_check))
        .merge(storefront::router())
        .merge(cart::router())
        .merge(checkout::router())
        .merge(webhook::router())
        .nest("/admin", admin::router().merge(auth::router()))
        .nest("/api", create_api_router())
        .merge(doc::scalar_docs())
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound
}
