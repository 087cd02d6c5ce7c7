//! Payment entity model
//!
//! This module contains the SeaORM entity model for the payments table.
//! Payments are append-only ledger rows; after creation only the
//! verification flag may change. Each row keeps both the tenant and the
//! unit foreign key, but aggregates are derived via the tenant only.

use rust_decimal::Decimal;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Payment ledger entry
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    /// Unique identifier for the payment (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub tenant_id: Uuid,

    /// Denormalized unit reference kept alongside the tenant reference
    pub unit_id: Uuid,

    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub amount: Decimal,

    pub payment_date: DateTimeWithTimeZone,

    pub payment_method: PaymentMethod,

    pub payment_plan: PaymentPlan,

    /// Position within an installment plan (1 for full payments)
    pub installment_number: i32,

    pub total_installments: i32,

    /// Balance declared by the payer at recording time; informational only
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub balance_remaining: Decimal,

    /// Receipt reference (optional, unique)
    pub receipt_number: Option<String>,

    pub notes: Option<String>,

    /// The only mutable field on a ledger row
    pub is_verified: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenant::Entity",
        from = "Column::TenantId",
        to = "super::tenant::Column::Id"
    )]
    Tenant,
    #[sea_orm(
        belongs_to = "super::unit::Entity",
        from = "Column::UnitId",
        to = "super::unit::Column::Id"
    )]
    Unit,
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl Related<super::unit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Unit.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Accepted payment channels
#[derive(
    Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    #[sea_orm(string_value = "mpesa")]
    Mpesa,
    #[sea_orm(string_value = "cheque")]
    Cheque,
    #[sea_orm(string_value = "card")]
    Card,
    #[sea_orm(string_value = "crypto")]
    Crypto,
}

/// Installment plan the payment belongs to
#[derive(
    Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
#[serde(rename_all = "snake_case")]
pub enum PaymentPlan {
    #[sea_orm(string_value = "full_payment")]
    FullPayment,
    #[sea_orm(string_value = "three_months")]
    ThreeMonths,
    #[sea_orm(string_value = "six_months")]
    SixMonths,
    #[sea_orm(string_value = "twelve_months")]
    TwelveMonths,
    #[sea_orm(string_value = "eighteen_months")]
    EighteenMonths,
    #[sea_orm(string_value = "twenty_four_months")]
    TwentyFourMonths,
    #[sea_orm(string_value = "thirty_six_months")]
    ThirtySixMonths,
}
