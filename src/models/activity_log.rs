//! Activity log entity model
//!
//! Write-once audit records. Rows are never updated or deleted.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

/// Audit trail entry for a mutation on a core entity
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "activity_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Action slug, e.g. `unit_status_updated`
    pub action: String,

    pub entity_type: EntityType,

    pub entity_id: Option<Uuid>,

    /// Action-specific context stored as JSON
    #[sea_orm(column_type = "JsonBinary")]
    pub details: Option<JsonValue>,

    /// Acting owner, when known
    pub owner_id: Option<Uuid>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Kind of entity an audit record refers to
#[derive(
    Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    #[sea_orm(string_value = "apartment")]
    Apartment,
    #[sea_orm(string_value = "unit")]
    Unit,
    #[sea_orm(string_value = "tenant")]
    Tenant,
    #[sea_orm(string_value = "payment")]
    Payment,
}
