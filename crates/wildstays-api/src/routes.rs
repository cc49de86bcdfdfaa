use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
};
use serde_json::{Value, json};
use tower_http::services::ServeDir;

use crate::middleware::require_auth;
use crate::state::AppState;
use crate::{auth, images, listings, reservations};

/// Full API router. Public browse routes live at the top level; everything
/// that acts on behalf of a user sits behind `require_auth`.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/listings", get(listings::browse))
        .route("/listings/{id}", get(listings::details))
        .route("/health", get(health));

    let protected_routes = Router::new()
        .route("/me/listings", get(listings::my_listings))
        .route("/me/listings", post(listings::create_listing))
        .route("/me/listings/{id}", put(listings::update_listing))
        .route("/me/listings/{id}", delete(listings::delete_listing))
        .route("/me/listings/{id}/images", post(images::upload_image))
        .route("/me/listings/{id}/images/{image_id}", delete(images::delete_image))
        .route("/me/reservations", get(reservations::my_reservations))
        .route("/me/reservations/{id}", delete(reservations::cancel))
        .route("/listings/{id}/reservations", post(reservations::create))
        .route("/reservations", get(reservations::by_place))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let uploads = ServeDir::new(state.images.dir());
    let body_limit = state.max_image_bytes;

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .nest_service("/uploads", uploads)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
