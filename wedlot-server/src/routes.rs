//! Route definitions and router construction.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

fn build_cors_layer(allow_all: bool) -> CorsLayer {
    if allow_all {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Same-origin only.
        CorsLayer::new()
    }
}

/// API routes without the `/api` prefix, for nesting.
pub(crate) fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/names",
            get(handlers::names::list)
                .put(handlers::names::save)
                .post(handlers::names::save),
        )
        .route(
            "/winners",
            get(handlers::winners::list)
                .put(handlers::winners::append)
                .post(handlers::winners::append)
                .delete(handlers::winners::reset),
        )
        .route("/announce", post(handlers::announce::synthesize))
        .route("/draw", post(handlers::draw::draw))
}

async fn health() -> &'static str {
    "OK"
}

pub fn create_router(state: AppState, cors_allow_all: bool) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .route("/health", get(health))
        .with_state(state)
        .layer(build_cors_layer(cors_allow_all))
        .layer(TraceLayer::new_for_http())
}
