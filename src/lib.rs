//! HTTP service exposing CRUD operations on users stored in PostgreSQL.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod telemetry;

/// Sends one request through `app` without binding a socket.
#[cfg(test)]
pub(crate) async fn make_request(
    app: axum::Router,
    method: axum::http::Method,
    path: &str,
    body: String,
) -> axum::response::Response {
    use axum::body::Body;
    use axum::extract::Request;
    use axum::http::header;
    use tower::util::ServiceExt;

    app.oneshot(
        Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}
