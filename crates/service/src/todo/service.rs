use std::sync::Arc;
use uuid::Uuid;
use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::todo::domain::{NewTodo, Todo, TodoFilter, TodoPatch};
use crate::todo::repository::TodoRepository;

/// Application service for todos; every call is made on behalf of `user_id`.
pub struct TodoService {
    repo: Arc<dyn TodoRepository>,
}

impl TodoService {
    pub fn new(repo: Arc<dyn TodoRepository>) -> Self { Self { repo } }

    pub async fn list(&self, user_id: Uuid, filter: &TodoFilter) -> Result<Vec<Todo>, ServiceError> {
        self.repo.list(user_id, filter).await
    }

    /// A todo owned by someone else is reported as not found.
    pub async fn get(&self, user_id: Uuid, id: i32) -> Result<Todo, ServiceError> {
        self.repo.get(user_id, id).await?.ok_or_else(|| ServiceError::not_found("todo"))
    }

    #[instrument(skip(self, input), fields(user_id = %user_id))]
    pub async fn create(&self, user_id: Uuid, input: NewTodo) -> Result<Todo, ServiceError> {
        let todo = self.repo.create(user_id, input).await?;
        info!(todo_id = todo.id, "todo_created");
        Ok(todo)
    }

    /// Apply an already validated patch; an empty patch just returns the todo.
    #[instrument(skip(self, patch), fields(user_id = %user_id))]
    pub async fn update(&self, user_id: Uuid, id: i32, patch: TodoPatch) -> Result<Todo, ServiceError> {
        if patch.is_empty() {
            return self.get(user_id, id).await;
        }
        self.repo
            .update(user_id, id, patch)
            .await?
            .ok_or_else(|| ServiceError::not_found("todo"))
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn delete(&self, user_id: Uuid, id: i32) -> Result<(), ServiceError> {
        if self.repo.delete(user_id, id).await? {
            info!(todo_id = id, "todo_deleted");
            Ok(())
        } else {
            Err(ServiceError::not_found("todo"))
        }
    }
}
