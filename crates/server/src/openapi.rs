use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct CredentialsRequest { pub email: String, pub password: String }

/// Public user; the password hash is never serialized.
#[derive(ToSchema)]
pub struct UserDoc { pub id: Uuid, pub email: String }

#[derive(ToSchema)]
pub struct TodoDoc {
    pub id: i32,
    pub description: String,
    pub completed: bool,
    pub user_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(ToSchema)]
pub struct CreateTodoRequest { pub description: String, pub completed: Option<bool> }

#[derive(ToSchema)]
pub struct UpdateTodoRequest { pub description: Option<String>, pub completed: Option<bool> }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::users::register,
        crate::routes::users::login,
        crate::routes::users::logout,
        crate::routes::todos::list,
        crate::routes::todos::get,
        crate::routes::todos::create,
        crate::routes::todos::update,
        crate::routes::todos::delete,
    ),
    components(
        schemas(
            HealthResponse,
            CredentialsRequest,
            UserDoc,
            TodoDoc,
            CreateTodoRequest,
            UpdateTodoRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "users"),
        (name = "todos")
    )
)]
pub struct ApiDoc;
