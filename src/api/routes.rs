//! Router configuration for the API.

use axum::http::{Method, header};
use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{auth_middleware, logging_middleware, request_id_middleware};
use crate::error::AppError;
use crate::state::AppState;

/// Prefix of the user resource.
pub const USERS_PATH: &str = "/users";

/// Creates the main application router with all routes and middleware.
///
/// # Routes
/// - `/users` - User CRUD, bearer token required
/// - `/auth` - Registration, login and token refresh
/// - `/health`, `/health/live`, `/health/ready` - Probes
/// - `/swagger-ui`, `/api-docs/openapi.json` - API documentation
///
/// # Middleware Order
/// Layers run outermost first: request id, logging, CORS, compression,
/// then per-route authentication.
pub fn create_router(state: AppState) -> Router {
    let require_auth = middleware::from_fn_with_state(state.clone(), auth_middleware);
    let user_routes = handlers::users::user_routes().route_layer(require_auth.clone());

    let (router, openapi) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest(USERS_PATH, user_routes)
        .nest("/auth", handlers::auth::auth_routes())
        .merge(handlers::health::health_routes())
        .split_for_parts();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    router
        // A nested `/` only matches `/users`; `/users/` needs its own route
        .route(
            &format!("{USERS_PATH}/"),
            handlers::users::collection_routes().route_layer(require_auth),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .fallback(|| async { AppError::not_found("Route not found") })
        .layer(CompressionLayer::new())
        .layer(cors)
        // Last added runs first, so logging sees the request id
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
