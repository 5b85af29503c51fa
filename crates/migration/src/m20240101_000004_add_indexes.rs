use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Todo: every query filters by owner
        manager
            .create_index(
                Index::create()
                    .name("idx_todo_user")
                    .table(Todo::Table)
                    .col(Todo::UserId)
                    .to_owned(),
            )
            .await?;

        // Token: logout-everywhere and cascade lookups by owner
        manager
            .create_index(
                Index::create()
                    .name("idx_token_user")
                    .table(Token::Table)
                    .col(Token::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_todo_user").table(Todo::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_token_user").table(Token::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Todo { Table, UserId }

#[derive(DeriveIden)]
enum Token { Table, UserId }
