//! Migration to create the tenants table.
//!
//! A tenant is bound to at most one unit. Deleting a unit nullifies the
//! binding instead of removing the tenant record.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tenants::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tenants::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Tenants::UnitId).uuid().null())
                    .col(ColumnDef::new(Tenants::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Tenants::Email).string_len(100).not_null())
                    .col(ColumnDef::new(Tenants::Phone).string_len(20).not_null())
                    .col(ColumnDef::new(Tenants::IdNumber).string_len(20).null())
                    .col(ColumnDef::new(Tenants::Occupation).string_len(100).null())
                    .col(
                        ColumnDef::new(Tenants::EmergencyContact)
                            .string_len(100)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Tenants::MonthlyIncome)
                            .decimal_len(12, 2)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Tenants::Status)
                            .string_len(16)
                            .not_null()
                            .default("prospect"),
                    )
                    .col(
                        ColumnDef::new(Tenants::JoinDate)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Tenants::MoveInDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Tenants::Notes).text().null())
                    .col(
                        ColumnDef::new(Tenants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Tenants::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tenants_unit_id")
                            .from(Tenants::Table, Tenants::UnitId)
                            .to(Units::Table, Units::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tenants_id_number")
                    .table(Tenants::Table)
                    .col(Tenants::IdNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tenants_unit_id")
                    .table(Tenants::Table)
                    .col(Tenants::UnitId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tenants_status")
                    .table(Tenants::Table)
                    .col(Tenants::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tenants_email")
                    .table(Tenants::Table)
                    .col(Tenants::Email)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_tenants_id_number").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_tenants_unit_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_tenants_status").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_tenants_email").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Tenants::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
    UnitId,
    Name,
    Email,
    Phone,
    IdNumber,
    Occupation,
    EmergencyContact,
    MonthlyIncome,
    Status,
    JoinDate,
    MoveInDate,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Units {
    Table,
    Id,
}
