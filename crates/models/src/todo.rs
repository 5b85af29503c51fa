use sea_orm::{entity::prelude::*, Set, DatabaseConnection, ActiveModelTrait};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "todo")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub description: String,
    pub completed: bool,
    pub user_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub const MAX_DESCRIPTION_LEN: usize = 250;

/// Trim a description and check it is non-empty and within bounds.
pub fn validate_description(description: &str) -> Result<String, errors::ModelError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(errors::ModelError::Validation("description must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(errors::ModelError::Validation(format!(
            "description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Insert a todo already linked to its owner.
pub async fn create(
    db: &DatabaseConnection,
    user_id: Uuid,
    description: &str,
    completed: bool,
) -> Result<Model, errors::ModelError> {
    let description = validate_description(description)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Default::default(),
        description: Set(description),
        completed: Set(completed),
        user_id: Set(user_id),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_is_trimmed() {
        assert_eq!(validate_description("  Buy milk  ").unwrap(), "Buy milk");
    }

    #[test]
    fn blank_or_oversized_description_rejected() {
        assert!(validate_description("").is_err());
        assert!(validate_description(" \t\n ").is_err());
        assert!(validate_description(&"x".repeat(MAX_DESCRIPTION_LEN)).is_ok());
        assert!(validate_description(&"x".repeat(MAX_DESCRIPTION_LEN + 1)).is_err());
    }
}
