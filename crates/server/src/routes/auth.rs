use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderName,
    middleware::Next,
    response::Response,
};

use service::auth::domain::AuthUser;
use service::auth::AuthService;
use service::todo::TodoService;

use crate::errors::JsonApiError;

#[derive(Clone)]
pub struct ServerAuthConfig {
    /// Request/response header carrying the token.
    pub token_header: HeaderName,
}

#[derive(Clone)]
pub struct ServerState {
    pub auth: ServerAuthConfig,
    pub auth_svc: Arc<AuthService>,
    pub todo_svc: Arc<TodoService>,
}

/// Identity attached to a request that passed the gate.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: AuthUser,
    pub token: String,
}

/// Gate for protected routes: resolves the token header to a live user.
///
/// Missing header, undecodable value, bad token, unknown user and revoked
/// token all answer with the same 401; store failures become 500.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_owned();

    let token = match req.headers().get(&state.auth.token_header) {
        Some(value) => match value.to_str() {
            Ok(t) if !t.trim().is_empty() => t.trim().to_owned(),
            _ => {
                tracing::warn!(path = %path, "unreadable auth header");
                return Err(JsonApiError::unauthorized());
            }
        },
        None => {
            tracing::debug!(path = %path, "missing auth header");
            return Err(JsonApiError::unauthorized());
        }
    };

    match state.auth_svc.authenticate(&token).await {
        Ok(user) => {
            req.extensions_mut().insert(AuthContext { user, token });
            Ok(next.run(req).await)
        }
        Err(e) if e.is_unauthenticated() => {
            tracing::warn!(path = %path, code = e.code(), err = %e, "token rejected");
            Err(JsonApiError::unauthorized())
        }
        Err(e) => {
            tracing::error!(path = %path, code = e.code(), "token check failed");
            Err(JsonApiError::internal(e))
        }
    }
}
