//! API router
//!
//! Route table and middleware layering. Authentication wraps every book
//! route; the role gate wraps only the mutating ones.

use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::{require_auth, require_permission, Permission};
use crate::state::AppState;
use crate::MAX_IMAGE_BYTES;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let list_routes = Router::new().route("/", get(handlers::list_books));

    let create_routes = Router::new()
        .route("/", post(handlers::create_book))
        .route_layer(from_fn(require_permission(Permission::BookCreate)));

    let update_routes = Router::new()
        .route("/:id", put(handlers::update_book))
        .route_layer(from_fn(require_permission(Permission::BookUpdate)));

    let delete_routes = Router::new()
        .route("/:id", delete(handlers::delete_book))
        .route_layer(from_fn(require_permission(Permission::BookDelete)));

    let book_routes = list_routes
        .merge(create_routes)
        .merge(update_routes)
        .merge(delete_routes)
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(book_routes)
        // Leave headroom over the image cap so the in-handler size policy
        // answers instead of the transport limit.
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
