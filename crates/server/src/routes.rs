use axum::{
    http::HeaderName,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

pub mod auth;
pub mod todos;
pub mod users;

use crate::openapi::ApiDoc;
use auth::{require_auth, ServerState};

pub async fn root() -> &'static str {
    "Todo API Root"
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// CORS for browser clients; the token header must be readable from scripts.
pub fn build_cors(token_header: &HeaderName) -> CorsLayer {
    CorsLayer::very_permissive().expose_headers([token_header.clone()])
}

/// Build the full application router: public routes plus the gated todo and logout routes
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/users", post(users::register))
        .route("/users/login", post(users::login));

    let protected = Router::new()
        .route("/todos", get(todos::list).post(todos::create))
        .route("/todos/:id", get(todos::get).put(todos::update).delete(todos::delete))
        .route("/users/login", delete(users::logout))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public
        .merge(protected)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
