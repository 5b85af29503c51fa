use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;

use service::todo::domain::{NewTodo, Todo, TodoFilter, TodoPatch};

use crate::errors::JsonApiError;
use crate::routes::auth::{AuthContext, ServerState};
use crate::routes::users::json_body;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub completed: Option<String>,
    pub q: Option<String>,
}

/// Ids that do not parse are simply todos that do not exist.
fn parse_id(raw: &str) -> Result<i32, JsonApiError> {
    raw.parse::<i32>().map_err(|_| JsonApiError::not_found())
}

#[utoipa::path(get, path = "/todos", tag = "todos", params(("completed" = Option<String>, Query, description = "true or false"), ("q" = Option<String>, Query, description = "Case-insensitive description search")), responses((status = 200, description = "Caller's todos", body = [crate::openapi::TodoDoc]), (status = 401, description = "Unauthorized")))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<Todo>>, JsonApiError> {
    let filter = TodoFilter::from_query(q.completed.as_deref(), q.q.as_deref());
    let todos = state.todo_svc.list(ctx.user.id, &filter).await?;
    Ok(Json(todos))
}

#[utoipa::path(get, path = "/todos/{id}", tag = "todos", params(("id" = i32, Path, description = "Todo id")), responses((status = 200, description = "Todo", body = crate::openapi::TodoDoc), (status = 401, description = "Unauthorized"), (status = 404, description = "Not Found")))]
pub async fn get(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, JsonApiError> {
    let id = parse_id(&id)?;
    let todo = state.todo_svc.get(ctx.user.id, id).await?;
    Ok(Json(todo))
}

#[utoipa::path(post, path = "/todos", tag = "todos", request_body = crate::openapi::CreateTodoRequest, responses((status = 200, description = "Created", body = crate::openapi::TodoDoc), (status = 400, description = "Validation Error"), (status = 401, description = "Unauthorized")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Todo>, JsonApiError> {
    let input = NewTodo::from_json(&json_body(body)?)?;
    let todo = state.todo_svc.create(ctx.user.id, input).await?;
    Ok(Json(todo))
}

/// The whole body is validated before anything is written.
#[utoipa::path(put, path = "/todos/{id}", tag = "todos", params(("id" = i32, Path, description = "Todo id")), request_body = crate::openapi::UpdateTodoRequest, responses((status = 200, description = "Updated", body = crate::openapi::TodoDoc), (status = 400, description = "Validation Error"), (status = 401, description = "Unauthorized"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Todo>, JsonApiError> {
    let id = parse_id(&id)?;
    let patch = TodoPatch::from_json(&json_body(body)?)?;
    let todo = state.todo_svc.update(ctx.user.id, id, patch).await?;
    Ok(Json(todo))
}

#[utoipa::path(delete, path = "/todos/{id}", tag = "todos", params(("id" = i32, Path, description = "Todo id")), responses((status = 204, description = "Deleted"), (status = 401, description = "Unauthorized"), (status = 404, description = "Not Found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, JsonApiError> {
    let id = parse_id(&id)?;
    state.todo_svc.delete(ctx.user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_numeric_id_is_not_found() {
        assert_eq!(parse_id("42").ok(), Some(42));
        for raw in ["abc", "1.5", "", "99999999999"] {
            assert_eq!(parse_id(raw).unwrap_err().status, StatusCode::NOT_FOUND);
        }
    }
}
