//! # Unit API Handlers
//!
//! Unit listing, creation and the status transition endpoint. Transitions
//! are validated against the lifecycle table; entering `reserved` or `sold`
//! stamps the matching timestamp, and every successful mutation is broadcast
//! to the owning apartment's topic.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::{OperatorAuth, OwnerExtension};
use crate::error::{ApiError, ApiJson};
use crate::events::{Envelope, EventKind, Topic};
use crate::handlers::types::{PaymentDto, TenantDto, UnitDto};
use crate::models::activity_log::EntityType;
use crate::models::unit::{UnitStatus, UnitType};
use crate::repositories::{
    ActivityLogRepository, CreateUnitRequest, PaymentRepository, TenantRepository, UnitFilter,
    UnitRepository,
};
use crate::server::AppState;

/// Query parameters for the unit listing
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListUnitsParams {
    /// Apartment to list units for (required)
    pub apartment_id: Uuid,
    /// Restrict to one floor
    pub floor: Option<i32>,
    /// Restrict to one lifecycle status
    pub status: Option<UnitStatus>,
}

/// Unit list entry with its tenant and recent payment history
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UnitListItemDto {
    #[serde(flatten)]
    pub unit: UnitDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<TenantDto>,
    pub recent_payments: Vec<PaymentDto>,
}

/// Request payload for creating a new unit
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateUnitRequestDto {
    pub apartment_id: Uuid,
    #[schema(example = "3B")]
    pub unit_number: String,
    #[schema(example = 3)]
    pub floor: i32,
    #[schema(value_type = String, example = "85.50")]
    pub area: Decimal,
    #[schema(value_type = String, example = "4500000.00")]
    pub price: Decimal,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub unit_type: Option<UnitType>,
    pub features: Option<JsonValue>,
}

/// Request payload for a unit status transition
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateUnitStatusRequestDto {
    pub unit_id: Uuid,
    /// Target lifecycle status
    pub status: UnitStatus,
    /// Free-form note recorded in the audit trail
    pub notes: Option<String>,
}

/// List units of an owned apartment ordered by floor and unit number
#[utoipa::path(
    get,
    path = "/api/v1/units",
    security(("bearer_auth" = [])),
    params(ListUnitsParams, crate::auth::OwnerHeader),
    responses(
        (status = 200, description = "Units with tenants and recent payments", body = [UnitListItemDto]),
        (status = 404, description = "Apartment not found or not owned", body = ApiError)
    ),
    tag = "units"
)]
pub async fn list_units(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    OwnerExtension(owner): OwnerExtension,
    Query(params): Query<ListUnitsParams>,
) -> Result<Json<Vec<UnitListItemDto>>, ApiError> {
    let unit_repo = UnitRepository::new(&state.db);
    let units = unit_repo
        .list_for_apartment(
            owner.0,
            params.apartment_id,
            UnitFilter {
                floor: params.floor,
                status: params.status,
            },
        )
        .await?;

    let unit_ids: Vec<Uuid> = units.iter().map(|u| u.id).collect();
    let tenants = TenantRepository::new(&state.db).for_units(&unit_ids).await?;
    let tenant_ids: Vec<Uuid> = tenants.iter().map(|t| t.id).collect();
    let mut payments = PaymentRepository::new(&state.db)
        .recent_for_tenants(&tenant_ids, 5)
        .await?;

    let mut tenants_by_unit: HashMap<Uuid, TenantDto> = HashMap::new();
    let mut tenant_ids_by_unit: HashMap<Uuid, Uuid> = HashMap::new();
    for tenant in tenants {
        if let Some(unit_id) = tenant.unit_id {
            tenant_ids_by_unit.insert(unit_id, tenant.id);
            tenants_by_unit.insert(unit_id, tenant.into());
        }
    }

    let items = units
        .into_iter()
        .map(|unit| {
            let tenant = tenants_by_unit.remove(&unit.id);
            let recent_payments = tenant_ids_by_unit
                .get(&unit.id)
                .and_then(|tenant_id| payments.remove(tenant_id))
                .unwrap_or_default()
                .into_iter()
                .map(PaymentDto::from)
                .collect();

            UnitListItemDto {
                unit: unit.into(),
                tenant,
                recent_payments,
            }
        })
        .collect();

    Ok(Json(items))
}

/// Create a new unit under an owned apartment
#[utoipa::path(
    post,
    path = "/api/v1/units",
    security(("bearer_auth" = [])),
    params(crate::auth::OwnerHeader),
    request_body = CreateUnitRequestDto,
    responses(
        (status = 201, description = "Unit created", body = UnitDto, headers(
            ("Location", description = "URL of the created unit")
        )),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Apartment not found or not owned", body = ApiError),
        (status = 409, description = "Duplicate unit number within the apartment", body = ApiError)
    ),
    tag = "units"
)]
pub async fn create_unit(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    OwnerExtension(owner): OwnerExtension,
    ApiJson(request): ApiJson<CreateUnitRequestDto>,
) -> Result<(StatusCode, [(&'static str, String); 1], Json<UnitDto>), ApiError> {
    let repo = UnitRepository::new(&state.db);
    let unit = repo
        .create_unit(
            owner.0,
            CreateUnitRequest {
                apartment_id: request.apartment_id,
                unit_number: request.unit_number,
                floor: request.floor,
                area: request.area,
                price: request.price,
                bedrooms: request.bedrooms,
                bathrooms: request.bathrooms,
                unit_type: request.unit_type,
                features: request.features,
            },
        )
        .await?;

    ActivityLogRepository::new(&state.db)
        .record(
            "unit_created",
            EntityType::Unit,
            Some(unit.id),
            Some(json!({
                "unit_number": unit.unit_number,
                "apartment_id": unit.apartment_id,
                "price": unit.price,
            })),
            Some(owner.0),
        )
        .await;

    let dto = UnitDto::from(unit);
    state.events.publish(
        &Topic::Apartment(dto.apartment_id),
        Envelope::new(
            EventKind::UnitCreated,
            serde_json::to_value(&dto).unwrap_or(JsonValue::Null),
        ),
    );

    let location = format!("/api/v1/units/{}", dto.id);
    Ok((StatusCode::CREATED, [("Location", location)], Json(dto)))
}

/// Apply a lifecycle status transition to a unit
#[utoipa::path(
    patch,
    path = "/api/v1/units",
    security(("bearer_auth" = [])),
    params(crate::auth::OwnerHeader),
    request_body = UpdateUnitStatusRequestDto,
    responses(
        (status = 200, description = "Unit updated", body = UnitDto),
        (status = 404, description = "Unit not found or not owned", body = ApiError),
        (status = 409, description = "Transition not allowed from the current status", body = ApiError)
    ),
    tag = "units"
)]
pub async fn update_unit_status(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    OwnerExtension(owner): OwnerExtension,
    ApiJson(request): ApiJson<UpdateUnitStatusRequestDto>,
) -> Result<Json<UnitDto>, ApiError> {
    let repo = UnitRepository::new(&state.db);
    let (unit, old_status) = repo
        .update_status(owner.0, request.unit_id, request.status)
        .await?;

    ActivityLogRepository::new(&state.db)
        .record(
            "unit_status_updated",
            EntityType::Unit,
            Some(unit.id),
            Some(json!({
                "old_status": old_status,
                "new_status": unit.status,
                "notes": request.notes,
            })),
            Some(owner.0),
        )
        .await;

    let dto = UnitDto::from(unit);
    state.events.publish(
        &Topic::Apartment(dto.apartment_id),
        Envelope::new(
            EventKind::UnitUpdated,
            serde_json::to_value(&dto).unwrap_or(JsonValue::Null),
        ),
    );

    Ok(Json(dto))
}
