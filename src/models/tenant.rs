//! Tenant entity model
//!
//! This module contains the SeaORM entity model for the tenants table. A
//! tenant is bound to at most one unit; the binding is created together with
//! the unit's status change in a single transaction.

use rust_decimal::Decimal;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Tenant entity representing the buyer/occupant bound to a unit
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tenants")]
pub struct Model {
    /// Unique identifier for the tenant (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Bound unit; nullified when the unit is deleted
    pub unit_id: Option<Uuid>,

    pub name: String,

    pub email: String,

    pub phone: String,

    /// National id number (optional, unique)
    pub id_number: Option<String>,

    pub occupation: Option<String>,

    pub emergency_contact: Option<String>,

    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub monthly_income: Option<Decimal>,

    pub status: TenantStatus,

    pub join_date: DateTimeWithTimeZone,

    pub move_in_date: Option<DateTimeWithTimeZone>,

    pub notes: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::unit::Entity",
        from = "Column::UnitId",
        to = "super::unit::Column::Id"
    )]
    Unit,
    #[sea_orm(has_many = "super::payment::Entity")]
    Payment,
}

impl Related<super::unit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Unit.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Lifecycle status of a tenant record
#[derive(
    Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum TenantStatus {
    #[sea_orm(string_value = "prospect")]
    Prospect,
    #[sea_orm(string_value = "current")]
    Current,
    #[sea_orm(string_value = "installment")]
    Installment,
    #[sea_orm(string_value = "overdue")]
    Overdue,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "terminated")]
    Terminated,
}
