//! Migration to create the apartments table.
//!
//! Apartments are the top-level properties owned by a single owner. They are
//! soft-deleted through the `is_active` flag rather than removed.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Apartments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Apartments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Apartments::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Apartments::Location)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Apartments::TotalUnits).integer().not_null())
                    .col(ColumnDef::new(Apartments::Floors).integer().not_null())
                    .col(
                        ColumnDef::new(Apartments::UnitsPerFloor)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Apartments::Description).text().null())
                    .col(
                        ColumnDef::new(Apartments::PriceRange)
                            .string_len(100)
                            .null(),
                    )
                    .col(ColumnDef::new(Apartments::Amenities).json_binary().null())
                    .col(ColumnDef::new(Apartments::OwnerId).uuid().not_null())
                    .col(
                        ColumnDef::new(Apartments::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Apartments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Apartments::UpdatedAt)
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
                    .name("idx_apartments_owner_id")
                    .table(Apartments::Table)
                    .col(Apartments::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_apartments_is_active")
                    .table(Apartments::Table)
                    .col(Apartments::IsActive)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_apartments_location")
                    .table(Apartments::Table)
                    .col(Apartments::Location)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_apartments_owner_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_apartments_is_active").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_apartments_location").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Apartments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Apartments {
    Table,
    Id,
    Name,
    Location,
    TotalUnits,
    Floors,
    UnitsPerFloor,
    Description,
    PriceRange,
    Amenities,
    OwnerId,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
