//! Create `token` table holding live session tokens.
//!
//! Only the SHA-256 digest of a token is stored; deleting the row revokes it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Token::Table)
                    .if_not_exists()
                    .col(uuid(Token::Id).primary_key())
                    .col(uuid(Token::UserId).not_null())
                    .col(string_len(Token::TokenHash, 64).unique_key().not_null())
                    .col(string_len(Token::Purpose, 32).not_null())
                    .col(timestamp_with_time_zone(Token::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_token_user")
                            .from(Token::Table, Token::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Token::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Token { Table, Id, UserId, TokenHash, Purpose, CreatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
