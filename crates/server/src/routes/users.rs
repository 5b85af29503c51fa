use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    Extension, Json,
};
use serde_json::Value;

use service::auth::domain::{AuthUser, LoginInput, RegisterInput};
use service::auth::errors::AuthError;

use crate::errors::JsonApiError;
use crate::routes::auth::{AuthContext, ServerState};

pub(crate) fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, JsonApiError> {
    body.map(|Json(v)| v).map_err(|e| JsonApiError::bad_request(e.body_text()))
}

#[utoipa::path(post, path = "/users", tag = "users", request_body = crate::openapi::CredentialsRequest, responses((status = 200, description = "Registered", body = crate::openapi::UserDoc), (status = 400, description = "Validation failed or email taken")))]
pub async fn register(
    State(state): State<ServerState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AuthUser>, JsonApiError> {
    let input = RegisterInput::from_json(&json_body(body)?)?;
    let user = state.auth_svc.register(input).await?;
    Ok(Json(user))
}

/// Every login failure, malformed body included, is a plain 401.
#[utoipa::path(post, path = "/users/login", tag = "users", request_body = crate::openapi::CredentialsRequest, responses((status = 200, description = "Logged in; token in the auth header", body = crate::openapi::UserDoc), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(HeaderMap, Json<AuthUser>), JsonApiError> {
    let input = body
        .ok()
        .and_then(|Json(v)| LoginInput::from_json(&v).ok())
        .ok_or_else(JsonApiError::unauthorized)?;

    let session = match state.auth_svc.login(input).await {
        Ok(s) => s,
        Err(AuthError::Validation(_)) => return Err(JsonApiError::unauthorized()),
        Err(e) => return Err(e.into()),
    };

    let value = HeaderValue::from_str(&session.token).map_err(JsonApiError::internal)?;
    let mut headers = HeaderMap::new();
    headers.insert(state.auth.token_header.clone(), value);
    Ok((headers, Json(session.user)))
}

#[utoipa::path(delete, path = "/users/login", tag = "users", responses((status = 204, description = "Token revoked"), (status = 401, description = "Unauthorized")))]
pub async fn logout(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<StatusCode, JsonApiError> {
    state.auth_svc.logout(&ctx.token).await?;
    tracing::info!(user_id = %ctx.user.id, "session closed");
    Ok(StatusCode::NO_CONTENT)
}
