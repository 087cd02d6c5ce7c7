//! Migration to create the activity_logs table.
//!
//! Activity logs are write-once audit records; there is no updated_at.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ActivityLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActivityLogs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ActivityLogs::Action)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ActivityLogs::EntityType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ActivityLogs::EntityId).uuid().null())
                    .col(ColumnDef::new(ActivityLogs::Details).json_binary().null())
                    .col(ColumnDef::new(ActivityLogs::OwnerId).uuid().null())
                    .col(
                        ColumnDef::new(ActivityLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activity_logs_owner_id")
                    .table(ActivityLogs::Table)
                    .col(ActivityLogs::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activity_logs_entity_type")
                    .table(ActivityLogs::Table)
                    .col(ActivityLogs::EntityType)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activity_logs_action")
                    .table(ActivityLogs::Table)
                    .col(ActivityLogs::Action)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_activity_logs_owner_id").to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_activity_logs_entity_type")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(Index::drop().name("idx_activity_logs_action").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ActivityLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ActivityLogs {
    Table,
    Id,
    Action,
    EntityType,
    EntityId,
    Details,
    OwnerId,
    CreatedAt,
}
