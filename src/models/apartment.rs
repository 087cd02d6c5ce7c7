//! Apartment entity model
//!
//! This module contains the SeaORM entity model for the apartments table.
//! An apartment is the top-level property owned by a single owner; it is
//! soft-deleted through the `is_active` flag.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;

/// Apartment entity representing an owner's property
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "apartments")]
pub struct Model {
    /// Unique identifier for the apartment (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Display name of the property
    pub name: String,

    /// Street address or area description
    pub location: String,

    /// Declared number of units; stored as given, never recomputed
    pub total_units: i32,

    /// Number of floors
    pub floors: i32,

    /// Declared units per floor
    pub units_per_floor: i32,

    /// Free-form description (optional)
    pub description: Option<String>,

    /// Marketing price range label (optional)
    pub price_range: Option<String>,

    /// Amenity list stored as JSON (optional)
    #[sea_orm(column_type = "JsonBinary")]
    pub amenities: Option<JsonValue>,

    /// Owner identity as validated by the upstream identity provider
    pub owner_id: Uuid,

    /// Soft-delete flag; inactive apartments are hidden from all queries
    pub is_active: bool,

    /// Timestamp when the apartment was created
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the apartment was last updated
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::unit::Entity")]
    Unit,
}

impl Related<super::unit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Unit.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
