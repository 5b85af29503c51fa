use crate::db::connect;
use crate::{todo, token, user};
use anyhow::Result;
use migration::MigratorTrait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

/// Setup test database with migrations
async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = connect().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::test]
async fn test_user_crud() -> Result<()> {
    if !common::env::db_tests_enabled() {
        return Ok(());
    }
    let db = setup_test_db().await?;

    let email = format!("Model_{}@Example.com", Uuid::new_v4());
    let created = user::create(&db, &email, "$argon2id$v=19$placeholder".into(), "argon2").await?;
    assert_eq!(created.email, email.to_lowercase());

    let found = user::find_by_email(&db, &email.to_uppercase()).await?;
    assert_eq!(found.map(|u| u.id), Some(created.id));

    // unique email is enforced by the table
    let dup = user::create(&db, &email, "$argon2id$v=19$other".into(), "argon2").await;
    assert!(dup.is_err());

    user::Entity::delete_by_id(created.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_todo_and_token_cascade_with_user() -> Result<()> {
    if !common::env::db_tests_enabled() {
        return Ok(());
    }
    let db = setup_test_db().await?;

    let email = format!("cascade_{}@example.com", Uuid::new_v4());
    let owner = user::create(&db, &email, "$argon2id$v=19$placeholder".into(), "argon2").await?;

    let t = todo::create(&db, owner.id, "  Walk the dog ", false).await?;
    assert_eq!(t.description, "Walk the dog");
    assert!(!t.completed);
    assert_eq!(t.user_id, owner.id);

    let digest = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    let tok = token::create(&db, owner.id, &digest, "authentication").await?;
    assert_eq!(tok.user_id, owner.id);
    assert!(token::create(&db, owner.id, "short", "authentication").await.is_err());

    user::Entity::delete_by_id(owner.id).exec(&db).await?;

    let orphans = todo::Entity::find()
        .filter(todo::Column::UserId.eq(owner.id))
        .all(&db)
        .await?;
    assert!(orphans.is_empty());
    assert!(!token::delete_by_hash(&db, &digest).await?);
    Ok(())
}
