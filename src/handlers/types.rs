//! Shared response DTOs for the Estates API handlers.
//!
//! Entities are mapped into these DTOs at the handler boundary; timestamps
//! are rendered as RFC 3339 strings and monetary values keep their decimal
//! representation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::payment::{self, PaymentMethod, PaymentPlan};
use crate::models::tenant::{self, TenantStatus};
use crate::models::unit::{self, UnitStatus, UnitType};
use crate::models::{apartment, unit::Model as UnitModel};

/// Apartment representation returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApartmentDto {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub total_units: i32,
    pub floors: i32,
    pub units_per_floor: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amenities: Option<JsonValue>,
    pub owner_id: Uuid,
    pub is_active: bool,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
    /// Last update timestamp (ISO 8601)
    pub updated_at: String,
}

impl From<apartment::Model> for ApartmentDto {
    fn from(model: apartment::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            location: model.location,
            total_units: model.total_units,
            floors: model.floors,
            units_per_floor: model.units_per_floor,
            description: model.description,
            price_range: model.price_range,
            amenities: model.amenities,
            owner_id: model.owner_id,
            is_active: model.is_active,
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }
}

/// Unit representation returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UnitDto {
    pub id: Uuid,
    pub apartment_id: Uuid,
    pub unit_number: String,
    pub floor: i32,
    #[schema(value_type = String, example = "85.50")]
    pub area: Decimal,
    #[schema(value_type = String, example = "4500000.00")]
    pub price: Decimal,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub unit_type: UnitType,
    pub status: UnitStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sold_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<UnitModel> for UnitDto {
    fn from(model: UnitModel) -> Self {
        Self {
            id: model.id,
            apartment_id: model.apartment_id,
            unit_number: model.unit_number,
            floor: model.floor,
            area: model.area,
            price: model.price,
            bedrooms: model.bedrooms,
            bathrooms: model.bathrooms,
            unit_type: model.unit_type,
            status: model.status,
            features: model.features,
            reserved_at: model.reserved_at.map(|ts| ts.to_rfc3339()),
            sold_at: model.sold_at.map(|ts| ts.to_rfc3339()),
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }
}

/// Trimmed unit descriptor embedded in tenant-facing payloads and events
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UnitBriefDto {
    pub id: Uuid,
    pub unit_number: String,
    pub apartment_id: Uuid,
}

impl From<&unit::Model> for UnitBriefDto {
    fn from(model: &unit::Model) -> Self {
        Self {
            id: model.id,
            unit_number: model.unit_number.clone(),
            apartment_id: model.apartment_id,
        }
    }
}

/// Tenant representation returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TenantDto {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "120000.00")]
    pub monthly_income: Option<Decimal>,
    pub status: TenantStatus,
    pub join_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_in_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: String,
}

impl From<tenant::Model> for TenantDto {
    fn from(model: tenant::Model) -> Self {
        Self {
            id: model.id,
            unit_id: model.unit_id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            id_number: model.id_number,
            occupation: model.occupation,
            emergency_contact: model.emergency_contact,
            monthly_income: model.monthly_income,
            status: model.status,
            join_date: model.join_date.to_rfc3339(),
            move_in_date: model.move_in_date.map(|ts| ts.to_rfc3339()),
            notes: model.notes,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// Payment representation returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentDto {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub unit_id: Uuid,
    #[schema(value_type = String, example = "1500000.00")]
    pub amount: Decimal,
    pub payment_date: String,
    pub payment_method: PaymentMethod,
    pub payment_plan: PaymentPlan,
    pub installment_number: i32,
    pub total_installments: i32,
    #[schema(value_type = String, example = "3000000.00")]
    pub balance_remaining: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub is_verified: bool,
    pub created_at: String,
}

impl From<payment::Model> for PaymentDto {
    fn from(model: payment::Model) -> Self {
        Self {
            id: model.id,
            tenant_id: model.tenant_id,
            unit_id: model.unit_id,
            amount: model.amount,
            payment_date: model.payment_date.to_rfc3339(),
            payment_method: model.payment_method,
            payment_plan: model.payment_plan,
            installment_number: model.installment_number,
            total_installments: model.total_installments,
            balance_remaining: model.balance_remaining,
            receipt_number: model.receipt_number,
            notes: model.notes,
            is_verified: model.is_verified,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}
