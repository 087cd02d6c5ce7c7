//! # Tenant API Handlers
//!
//! Tenant binding and the paginated tenant listing. Binding requires an
//! available unit, creates the tenant and flips the unit to `sold` in one
//! transaction, then broadcasts `tenant_created` to the apartment topic.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::{OperatorAuth, OwnerExtension};
use crate::error::{ApiError, ApiJson};
use crate::events::{Envelope, EventKind, Topic};
use crate::handlers::types::{PaymentDto, TenantDto, UnitBriefDto};
use crate::models::activity_log::EntityType;
use crate::models::tenant::TenantStatus;
use crate::repositories::{
    ActivityLogRepository, BindTenantRequest, PaymentRepository, TenantListQuery, TenantRepository,
    UnitRepository,
};
use crate::server::AppState;

/// Request payload for binding a tenant to a unit
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateTenantRequestDto {
    /// Unit to bind; must be in status `available`
    pub unit_id: Uuid,
    #[schema(example = "Amina Odhiambo")]
    pub name: String,
    #[schema(example = "amina@example.com")]
    pub email: String,
    #[schema(example = "+254700111222")]
    pub phone: String,
    pub id_number: Option<String>,
    pub occupation: Option<String>,
    pub emergency_contact: Option<String>,
    #[schema(value_type = Option<String>, example = "120000.00")]
    pub monthly_income: Option<Decimal>,
    pub move_in_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Query parameters for the tenant listing
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListTenantsParams {
    /// Substring match against name, email or phone
    pub search: Option<String>,
    /// Restrict to one tenant status
    pub status: Option<TenantStatus>,
    /// Restrict to one apartment
    pub apartment_id: Option<Uuid>,
    /// 1-based page number (default 1)
    pub page: Option<u64>,
    /// Page size (bounded by configuration)
    pub limit: Option<u64>,
}

/// Tenant list entry with its unit descriptor and recent payments
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TenantListItemDto {
    #[serde(flatten)]
    pub tenant: TenantDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<UnitBriefDto>,
    pub recent_payments: Vec<PaymentDto>,
}

/// Paging metadata for tenant listings
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginationDto {
    pub total: u64,
    pub page: u64,
    pub pages: u64,
    pub limit: u64,
}

/// Paginated tenant listing response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TenantListResponseDto {
    pub tenants: Vec<TenantListItemDto>,
    pub pagination: PaginationDto,
}

/// List tenants across the caller's apartments
#[utoipa::path(
    get,
    path = "/api/v1/tenants",
    security(("bearer_auth" = [])),
    params(ListTenantsParams, crate::auth::OwnerHeader),
    responses(
        (status = 200, description = "Paginated tenants", body = TenantListResponseDto),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError)
    ),
    tag = "tenants"
)]
pub async fn list_tenants(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    OwnerExtension(owner): OwnerExtension,
    Query(params): Query<ListTenantsParams>,
) -> Result<Json<TenantListResponseDto>, ApiError> {
    let listing = &state.config.listing;
    let limit = params
        .limit
        .unwrap_or(listing.default_page_size)
        .clamp(1, listing.max_page_size);

    let repo = TenantRepository::new(&state.db);
    let page = repo
        .list_tenants(
            owner.0,
            TenantListQuery {
                search: params.search,
                status: params.status,
                apartment_id: params.apartment_id,
                page: params.page.unwrap_or(1),
                limit,
            },
        )
        .await?;

    let unit_ids: Vec<Uuid> = page.tenants.iter().filter_map(|t| t.unit_id).collect();
    let units = UnitRepository::new(&state.db).by_ids(&unit_ids).await?;
    let units_by_id: HashMap<Uuid, UnitBriefDto> =
        units.iter().map(|u| (u.id, UnitBriefDto::from(u))).collect();

    let tenant_ids: Vec<Uuid> = page.tenants.iter().map(|t| t.id).collect();
    let mut payments = PaymentRepository::new(&state.db)
        .recent_for_tenants(&tenant_ids, 3)
        .await?;

    let tenants = page
        .tenants
        .into_iter()
        .map(|tenant| {
            let unit = tenant
                .unit_id
                .and_then(|unit_id| units_by_id.get(&unit_id).cloned());
            let recent_payments = payments
                .remove(&tenant.id)
                .unwrap_or_default()
                .into_iter()
                .map(PaymentDto::from)
                .collect();

            TenantListItemDto {
                tenant: tenant.into(),
                unit,
                recent_payments,
            }
        })
        .collect();

    Ok(Json(TenantListResponseDto {
        tenants,
        pagination: PaginationDto {
            total: page.total,
            page: page.page,
            pages: page.pages,
            limit: page.limit,
        },
    }))
}

/// Bind a tenant to an available unit
#[utoipa::path(
    post,
    path = "/api/v1/tenants",
    security(("bearer_auth" = [])),
    params(crate::auth::OwnerHeader),
    request_body = CreateTenantRequestDto,
    responses(
        (status = 201, description = "Tenant created and unit sold", body = TenantDto, headers(
            ("Location", description = "URL of the created tenant")
        )),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Unit not found or not owned", body = ApiError),
        (status = 409, description = "Unit is not available", body = ApiError)
    ),
    tag = "tenants"
)]
pub async fn create_tenant(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    OwnerExtension(owner): OwnerExtension,
    ApiJson(request): ApiJson<CreateTenantRequestDto>,
) -> Result<(StatusCode, [(&'static str, String); 1], Json<TenantDto>), ApiError> {
    let repo = TenantRepository::new(&state.db);
    let (tenant, unit) = repo
        .bind_tenant(
            owner.0,
            BindTenantRequest {
                unit_id: request.unit_id,
                name: request.name,
                email: request.email,
                phone: request.phone,
                id_number: request.id_number,
                occupation: request.occupation,
                emergency_contact: request.emergency_contact,
                monthly_income: request.monthly_income,
                move_in_date: request.move_in_date,
                notes: request.notes,
            },
        )
        .await?;

    ActivityLogRepository::new(&state.db)
        .record(
            "tenant_created",
            EntityType::Tenant,
            Some(tenant.id),
            Some(json!({
                "name": tenant.name,
                "unit_id": unit.id,
                "unit_number": unit.unit_number,
            })),
            Some(owner.0),
        )
        .await;

    let dto = TenantDto::from(tenant);
    state.events.publish(
        &Topic::Apartment(unit.apartment_id),
        Envelope::new(
            EventKind::TenantCreated,
            json!({
                "tenant": serde_json::to_value(&dto).unwrap_or(JsonValue::Null),
                "unit": serde_json::to_value(UnitBriefDto::from(&unit))
                    .unwrap_or(JsonValue::Null),
            }),
        ),
    );

    let location = format!("/api/v1/tenants/{}", dto.id);
    Ok((StatusCode::CREATED, [("Location", location)], Json(dto)))
}
