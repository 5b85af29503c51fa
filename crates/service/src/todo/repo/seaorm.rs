use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use models::todo;

use crate::errors::ServiceError;
use crate::todo::domain::{NewTodo, Todo, TodoFilter, TodoPatch};
use crate::todo::repository::TodoRepository;

/// SeaORM-backed repository implementation.
pub struct SeaOrmTodoRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmTodoRepository {
    async fn find_owned(&self, user_id: Uuid, id: i32) -> Result<Option<todo::Model>, ServiceError> {
        let found = todo::Entity::find_by_id(id)
            .filter(todo::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        Ok(found)
    }
}

/// `LIKE` pattern matching `q` literally anywhere in the text.
fn contains_pattern(q: &str) -> String {
    let escaped = q
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl TodoRepository for SeaOrmTodoRepository {
    async fn list(&self, user_id: Uuid, filter: &TodoFilter) -> Result<Vec<Todo>, ServiceError> {
        let mut query = todo::Entity::find().filter(todo::Column::UserId.eq(user_id));
        if let Some(completed) = filter.completed {
            query = query.filter(todo::Column::Completed.eq(completed));
        }
        if let Some(q) = &filter.q {
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(todo::Column::Description))).like(contains_pattern(q)),
            );
        }
        let rows = query.order_by_asc(todo::Column::Id).all(&self.db).await?;
        Ok(rows.into_iter().map(Todo::from).collect())
    }

    async fn get(&self, user_id: Uuid, id: i32) -> Result<Option<Todo>, ServiceError> {
        Ok(self.find_owned(user_id, id).await?.map(Todo::from))
    }

    async fn create(&self, user_id: Uuid, input: NewTodo) -> Result<Todo, ServiceError> {
        // owner is part of the inserted row; there is no unlinked intermediate state
        let created = todo::create(&self.db, user_id, input.description(), input.completed()).await?;
        Ok(Todo::from(created))
    }

    async fn update(&self, user_id: Uuid, id: i32, patch: TodoPatch) -> Result<Option<Todo>, ServiceError> {
        let Some(found) = self.find_owned(user_id, id).await? else {
            return Ok(None);
        };
        let mut am: todo::ActiveModel = found.into();
        if let Some(description) = patch.description() {
            am.description = Set(description.to_string());
        }
        if let Some(completed) = patch.completed() {
            am.completed = Set(completed);
        }
        am.updated_at = Set(Utc::now().into());
        let updated = am.update(&self.db).await?;
        Ok(Some(Todo::from(updated)))
    }

    async fn delete(&self, user_id: Uuid, id: i32) -> Result<bool, ServiceError> {
        let res = todo::Entity::delete_many()
            .filter(todo::Column::Id.eq(id))
            .filter(todo::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected > 0)
    }
}
