//! Migration to create the units table.
//!
//! Units are the sellable spaces inside an apartment. The unit number is
//! unique within its apartment, and the status column drives the lifecycle
//! state machine.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Units::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Units::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Units::ApartmentId).uuid().not_null())
                    .col(ColumnDef::new(Units::UnitNumber).string_len(20).not_null())
                    .col(ColumnDef::new(Units::Floor).integer().not_null())
                    .col(ColumnDef::new(Units::Area).decimal_len(8, 2).not_null())
                    .col(ColumnDef::new(Units::Price).decimal_len(15, 2).not_null())
                    .col(
                        ColumnDef::new(Units::Bedrooms)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Units::Bathrooms)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Units::UnitType)
                            .string_len(16)
                            .not_null()
                            .default("one_br"),
                    )
                    .col(
                        ColumnDef::new(Units::Status)
                            .string_len(16)
                            .not_null()
                            .default("available"),
                    )
                    .col(ColumnDef::new(Units::Features).json_binary().null())
                    .col(
                        ColumnDef::new(Units::ReservedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Units::SoldAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Units::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Units::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_units_apartment_id")
                            .from(Units::Table, Units::ApartmentId)
                            .to(Apartments::Table, Apartments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unit numbers are unique per apartment.
        manager
            .create_index(
                Index::create()
                    .name("idx_units_apartment_unit_number")
                    .table(Units::Table)
                    .col(Units::ApartmentId)
                    .col(Units::UnitNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_units_apartment_id")
                    .table(Units::Table)
                    .col(Units::ApartmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_units_status")
                    .table(Units::Table)
                    .col(Units::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_units_floor")
                    .table(Units::Table)
                    .col(Units::Floor)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_units_apartment_unit_number")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(Index::drop().name("idx_units_apartment_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_units_status").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_units_floor").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Units::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Units {
    Table,
    Id,
    ApartmentId,
    UnitNumber,
    Floor,
    Area,
    Price,
    Bedrooms,
    Bathrooms,
    UnitType,
    Status,
    Features,
    ReservedAt,
    SoldAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Apartments {
    Table,
    Id,
}
