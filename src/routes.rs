use axum::{
    BoxError, Router,
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
};
use axum_tracing_opentelemetry::middleware::OtelAxumLayer;
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;

use crate::config::HttpConfig;
use crate::error::ServerError;
use crate::handlers::{create_user, delete_user, get_all_users, get_user, update_user};
use crate::state::AppState;

pub fn create_router(state: AppState, config: &HttpConfig) -> Router {
    let middleware = ServiceBuilder::new()
        // Request spans, exported when an OTLP endpoint is configured.
        .layer(OtelAxumLayer::default())
        // Turns an elapsed deadline into the usual JSON error body.
        .layer(HandleErrorLayer::new(handle_middleware_error))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(DefaultBodyLimit::max(config.body_limit));

    Router::new()
        .route("/user/create", post(create_user))
        .route("/user/all", get(get_all_users))
        .route("/user/update", put(update_user))
        .route("/user/delete", delete(delete_user))
        .route("/user/get", get(get_user))
        .layer(middleware)
        .with_state(state)
}

async fn handle_middleware_error(err: BoxError) -> ServerError {
    ServerError::from(err)
}
