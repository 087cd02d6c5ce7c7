//! Unit entity model
//!
//! This module contains the SeaORM entity model for the units table, plus the
//! lifecycle status enum and its transition table. The status column is the
//! primary state machine of the service.

use rust_decimal::Decimal;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

/// Unit entity representing a sellable space within an apartment
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "units")]
pub struct Model {
    /// Unique identifier for the unit (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning apartment
    pub apartment_id: Uuid,

    /// Unit number, unique within the apartment
    pub unit_number: String,

    /// Floor the unit is on (1-based)
    pub floor: i32,

    /// Floor area in square meters
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub area: Decimal,

    /// Listing price
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub price: Decimal,

    pub bedrooms: i32,

    pub bathrooms: i32,

    pub unit_type: UnitType,

    /// Lifecycle status; transitions are validated against
    /// [`UnitStatus::can_transition_to`]
    pub status: UnitStatus,

    /// Feature list stored as JSON (optional)
    #[sea_orm(column_type = "JsonBinary")]
    pub features: Option<JsonValue>,

    /// Stamped when the unit enters `reserved`
    pub reserved_at: Option<DateTimeWithTimeZone>,

    /// Stamped when the unit enters `sold`
    pub sold_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::apartment::Entity",
        from = "Column::ApartmentId",
        to = "super::apartment::Column::Id"
    )]
    Apartment,
    #[sea_orm(has_one = "super::tenant::Entity")]
    Tenant,
    #[sea_orm(has_many = "super::payment::Entity")]
    Payment,
}

impl Related<super::apartment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Apartment.def()
    }
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Lifecycle status of a unit
#[derive(
    Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    #[sea_orm(string_value = "available")]
    Available,
    #[sea_orm(string_value = "reserved")]
    Reserved,
    #[sea_orm(string_value = "sold")]
    Sold,
    #[sea_orm(string_value = "installment")]
    Installment,
    #[sea_orm(string_value = "fully_paid")]
    FullyPaid,
}

impl UnitStatus {
    /// Statuses counted as occupied in occupancy and revenue summaries.
    pub fn is_sold_bucket(self) -> bool {
        matches!(self, Self::Sold | Self::FullyPaid | Self::Installment)
    }

    /// Allowed targets from this status: the forward chain
    /// available → reserved → sold → installment → fully_paid, the direct
    /// available → sold jump used by tenant binding, and single-step
    /// reversions. Same-status requests are not listed and therefore
    /// rejected.
    pub fn allowed_targets(self) -> &'static [UnitStatus] {
        match self {
            Self::Available => &[Self::Reserved, Self::Sold],
            Self::Reserved => &[Self::Available, Self::Sold],
            Self::Sold => &[
                Self::Reserved,
                Self::Available,
                Self::Installment,
                Self::FullyPaid,
            ],
            Self::Installment => &[Self::Sold, Self::FullyPaid],
            Self::FullyPaid => &[Self::Installment, Self::Sold],
        }
    }

    /// Returns whether a transition from `self` to `target` is allowed.
    pub fn can_transition_to(self, target: UnitStatus) -> bool {
        self.allowed_targets().contains(&target)
    }
}

/// Layout category of a unit
#[derive(
    Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    #[sea_orm(string_value = "studio")]
    Studio,
    #[sea_orm(string_value = "one_br")]
    OneBr,
    #[sea_orm(string_value = "two_br")]
    TwoBr,
    #[sea_orm(string_value = "three_br")]
    ThreeBr,
    #[sea_orm(string_value = "four_br_plus")]
    FourBrPlus,
    #[sea_orm(string_value = "penthouse")]
    Penthouse,
}

#[cfg(test)]
mod tests {
    use super::UnitStatus;

    #[test]
    fn forward_chain_is_allowed() {
        assert!(UnitStatus::Available.can_transition_to(UnitStatus::Reserved));
        assert!(UnitStatus::Reserved.can_transition_to(UnitStatus::Sold));
        assert!(UnitStatus::Sold.can_transition_to(UnitStatus::Installment));
        assert!(UnitStatus::Installment.can_transition_to(UnitStatus::FullyPaid));
    }

    #[test]
    fn direct_sale_from_available_is_allowed() {
        assert!(UnitStatus::Available.can_transition_to(UnitStatus::Sold));
    }

    #[test]
    fn reversions_are_allowed() {
        assert!(UnitStatus::Reserved.can_transition_to(UnitStatus::Available));
        assert!(UnitStatus::Sold.can_transition_to(UnitStatus::Reserved));
        assert!(UnitStatus::Installment.can_transition_to(UnitStatus::Sold));
        assert!(UnitStatus::FullyPaid.can_transition_to(UnitStatus::Installment));
    }

    #[test]
    fn skipping_and_self_transitions_are_rejected() {
        assert!(!UnitStatus::Available.can_transition_to(UnitStatus::FullyPaid));
        assert!(!UnitStatus::Available.can_transition_to(UnitStatus::Installment));
        assert!(!UnitStatus::Reserved.can_transition_to(UnitStatus::Reserved));
        assert!(!UnitStatus::FullyPaid.can_transition_to(UnitStatus::Available));
    }

    #[test]
    fn sold_bucket_membership() {
        assert!(UnitStatus::Sold.is_sold_bucket());
        assert!(UnitStatus::Installment.is_sold_bucket());
        assert!(UnitStatus::FullyPaid.is_sold_bucket());
        assert!(!UnitStatus::Available.is_sold_bucket());
        assert!(!UnitStatus::Reserved.is_sold_bucket());
    }
}
