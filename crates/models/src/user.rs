use sea_orm::{entity::prelude::*, Set, DatabaseConnection, SqlErr};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::{todo, token};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub password_algorithm: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Todo,
    Token,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Todo => Entity::has_many(todo::Entity).into(),
            Relation::Token => Entity::has_many(token::Entity).into(),
        }
    }
}

impl Related<todo::Entity> for Entity {
    fn to() -> RelationDef { Relation::Todo.def() }
}

impl Related<token::Entity> for Entity {
    fn to() -> RelationDef { Relation::Token.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub const MAX_EMAIL_LEN: usize = 255;

/// Canonical form of an email: trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(errors::ModelError::Validation("email required".into()));
    }
    if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        return Err(errors::ModelError::Validation("invalid email".into()));
    }
    if email.chars().count() > MAX_EMAIL_LEN {
        return Err(errors::ModelError::Validation("email too long".into()));
    }
    Ok(())
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, errors::ModelError> {
    let found = Entity::find()
        .filter(Column::Email.eq(normalize_email(email)))
        .one(db)
        .await?;
    Ok(found)
}

/// Insert a user row; the password hash must already be computed.
pub async fn create(
    db: &DatabaseConnection,
    email: &str,
    password_hash: String,
    password_algorithm: &str,
) -> Result<Model, errors::ModelError> {
    validate_email(email)?;
    if password_hash.trim().is_empty() {
        return Err(errors::ModelError::Validation("password hash required".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(normalize_email(email)),
        password_hash: Set(password_hash),
        password_algorithm: Set(password_algorithm.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => errors::ModelError::Conflict("email already registered".into()),
        _ => errors::ModelError::Db(e.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_normalization_and_validation() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("   ").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@x.com").is_err());
        let long = format!("{}@x.com", "a".repeat(MAX_EMAIL_LEN));
        assert!(validate_email(&long).is_err());
    }
}
