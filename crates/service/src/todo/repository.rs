use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{NewTodo, Todo, TodoFilter, TodoPatch};
use crate::errors::ServiceError;

/// Owner-scoped todo persistence. Implementations must apply `user_id` to
/// every query; a row owned by someone else behaves exactly like a missing one.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn list(&self, user_id: Uuid, filter: &TodoFilter) -> Result<Vec<Todo>, ServiceError>;
    async fn get(&self, user_id: Uuid, id: i32) -> Result<Option<Todo>, ServiceError>;
    async fn create(&self, user_id: Uuid, input: NewTodo) -> Result<Todo, ServiceError>;
    async fn update(&self, user_id: Uuid, id: i32, patch: TodoPatch) -> Result<Option<Todo>, ServiceError>;
    async fn delete(&self, user_id: Uuid, id: i32) -> Result<bool, ServiceError>;
}

pub mod memory {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::{Mutex, MutexGuard};

    use chrono::Utc;

    #[derive(Default)]
    struct State {
        last_id: i32,
        rows: BTreeMap<i32, Todo>,
    }

    /// Ids are assigned sequentially from 1, like a serial column.
    #[derive(Default)]
    pub struct MemoryTodoRepository {
        state: Mutex<State>,
    }

    impl MemoryTodoRepository {
        fn lock(&self) -> Result<MutexGuard<'_, State>, ServiceError> {
            self.state.lock().map_err(|_| ServiceError::Db("in-memory store lock poisoned".into()))
        }
    }

    #[async_trait]
    impl TodoRepository for MemoryTodoRepository {
        async fn list(&self, user_id: Uuid, filter: &TodoFilter) -> Result<Vec<Todo>, ServiceError> {
            let state = self.lock()?;
            Ok(state
                .rows
                .values()
                .filter(|t| t.user_id == user_id && filter.matches(t))
                .cloned()
                .collect())
        }

        async fn get(&self, user_id: Uuid, id: i32) -> Result<Option<Todo>, ServiceError> {
            let state = self.lock()?;
            Ok(state.rows.get(&id).filter(|t| t.user_id == user_id).cloned())
        }

        async fn create(&self, user_id: Uuid, input: NewTodo) -> Result<Todo, ServiceError> {
            let mut state = self.lock()?;
            state.last_id += 1;
            let now = Utc::now();
            let todo = Todo {
                id: state.last_id,
                description: input.description().to_string(),
                completed: input.completed(),
                user_id,
                created_at: now,
                updated_at: now,
            };
            state.rows.insert(todo.id, todo.clone());
            Ok(todo)
        }

        async fn update(&self, user_id: Uuid, id: i32, patch: TodoPatch) -> Result<Option<Todo>, ServiceError> {
            let mut state = self.lock()?;
            let Some(todo) = state.rows.get_mut(&id).filter(|t| t.user_id == user_id) else {
                return Ok(None);
            };
            if let Some(description) = patch.description() {
                todo.description = description.to_string();
            }
            if let Some(completed) = patch.completed() {
                todo.completed = completed;
            }
            todo.updated_at = Utc::now();
            Ok(Some(todo.clone()))
        }

        async fn delete(&self, user_id: Uuid, id: i32) -> Result<bool, ServiceError> {
            let mut state = self.lock()?;
            let owned = state.rows.get(&id).is_some_and(|t| t.user_id == user_id);
            if owned {
                state.rows.remove(&id);
            }
            Ok(owned)
        }
    }
}
