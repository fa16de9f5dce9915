use axum::{
    body::Bytes,
    extract::{
        Query, State,
        rejection::{BytesRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use tracing::{Span, field};
use uuid::Uuid;

use crate::error::{Result, ServerError};
use crate::models::{IdQuery, Pagination, UserBody};
use crate::state::AppState;

pub const DELETED_MESSAGE: &str = "Deleted User";

/// `POST /user/create`
#[tracing::instrument(skip_all, fields(id = field::Empty))]
pub async fn create_user(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Response> {
    let body = parse_body(&body?)?;

    let user = body.into_user(Uuid::new_v4().to_string());
    Span::current().record("id", user.id.as_str());

    let created = state.store.create_user(&user).await?;

    state.users_created_counter.add(1, &[]);
    tracing::info!("user created");

    json(StatusCode::CREATED, &created)
}

/// `PUT /user/update?id=`
#[tracing::instrument(skip_all, fields(id = field::Empty))]
pub async fn update_user(
    State(state): State<AppState>,
    query: std::result::Result<Query<IdQuery>, QueryRejection>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Response> {
    let Query(IdQuery { id }) = query?;
    Span::current().record("id", id.as_str());
    let body = parse_body(&body?)?;

    let updated = state.store.update_user(&id, &body).await?;
    tracing::info!("user updated");

    json(StatusCode::OK, &updated)
}

/// `DELETE /user/delete?id=`
#[tracing::instrument(skip_all, fields(id = field::Empty))]
pub async fn delete_user(
    State(state): State<AppState>,
    query: std::result::Result<Query<IdQuery>, QueryRejection>,
) -> Result<&'static str> {
    let Query(IdQuery { id }) = query?;
    Span::current().record("id", id.as_str());

    state.store.delete_user(&id).await?;
    tracing::info!("user deleted");

    Ok(DELETED_MESSAGE)
}

/// `GET /user/get?id=`
#[tracing::instrument(skip_all, fields(id = field::Empty))]
pub async fn get_user(
    State(state): State<AppState>,
    query: std::result::Result<Query<IdQuery>, QueryRejection>,
) -> Result<Response> {
    let Query(IdQuery { id }) = query?;
    Span::current().record("id", id.as_str());

    let user = state.store.get_user(&id).await?;
    tracing::debug!("user fetched");

    json(StatusCode::OK, &user)
}

/// `GET /user/all?page=&limit=`
#[tracing::instrument(skip_all, fields(page = field::Empty, limit = field::Empty))]
pub async fn get_all_users(
    State(state): State<AppState>,
    query: std::result::Result<Query<Pagination>, QueryRejection>,
) -> Result<Response> {
    let Query(pagination) = query?;
    let span = Span::current();
    span.record("page", pagination.page);
    span.record("limit", pagination.limit);

    let offset = pagination.offset().map_err(ServerError::Validation)?;

    let users = state.store.get_all_users(pagination.limit, offset).await?;
    tracing::debug!(count = users.len(), "users listed");

    json(StatusCode::OK, &users)
}

/// The body is buffered whole before parsing; no content type is required.
/// Only a JSON object is accepted, never an array in field order.
fn parse_body(bytes: &Bytes) -> Result<UserBody> {
    match serde_json::from_slice::<Value>(bytes).map_err(ServerError::Json)? {
        value @ Value::Object(_) => serde_json::from_value(value).map_err(ServerError::Json),
        _ => Err(ServerError::Validation("request body must be a JSON object".into())),
    }
}

fn json<T: Serialize>(status: StatusCode, value: &T) -> Result<Response> {
    let body = serde_json::to_vec(value).map_err(ServerError::Serialization)?;

    Ok((status, [(header::CONTENT_TYPE, "application/json")], body).into_response())
}
