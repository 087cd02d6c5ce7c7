//! # Apartment API Handlers
//!
//! Handlers for apartment creation, listing and soft deletion. The list is
//! enriched with read-time unit rollups; apartment creation is the one event
//! broadcast on the global topic so every connected dashboard refreshes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{OperatorAuth, OwnerExtension};
use crate::error::{ApiError, ApiJson};
use crate::events::{Envelope, EventKind, Topic};
use crate::handlers::types::ApartmentDto;
use crate::models::activity_log::EntityType;
use crate::repositories::{ActivityLogRepository, ApartmentRepository, CreateApartmentRequest};
use crate::server::AppState;

/// Request payload for creating a new apartment
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateApartmentRequestDto {
    /// Display name of the property (required)
    #[schema(example = "Sunrise Towers")]
    pub name: String,
    /// Street address or area (required)
    #[schema(example = "Riverside Drive 14")]
    pub location: String,
    /// Declared number of units; stored verbatim
    #[schema(example = 20)]
    pub total_units: i32,
    #[schema(example = 4)]
    pub floors: i32,
    #[schema(example = 5)]
    pub units_per_floor: i32,
    pub description: Option<String>,
    pub price_range: Option<String>,
    pub amenities: Option<JsonValue>,
}

/// Apartment list entry with its read-time rollup
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApartmentListItemDto {
    #[serde(flatten)]
    pub apartment: ApartmentDto,
    pub sold_units: i64,
    pub reserved_units: i64,
    pub available_units: i64,
    #[schema(value_type = String, example = "9000000.00")]
    pub total_revenue: Decimal,
    pub occupancy_rate: i32,
}

/// List the caller's active apartments, newest first
#[utoipa::path(
    get,
    path = "/api/v1/apartments",
    security(("bearer_auth" = [])),
    params(crate::auth::OwnerHeader),
    responses(
        (status = 200, description = "Apartments with unit rollups", body = [ApartmentListItemDto]),
        (status = 400, description = "Missing or invalid owner header", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError)
    ),
    tag = "apartments"
)]
pub async fn list_apartments(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    OwnerExtension(owner): OwnerExtension,
) -> Result<Json<Vec<ApartmentListItemDto>>, ApiError> {
    let repo = ApartmentRepository::new(&state.db);
    let rows = repo.list_with_summary(owner.0).await?;

    let items = rows
        .into_iter()
        .map(|(apartment, summary)| ApartmentListItemDto {
            apartment: apartment.into(),
            sold_units: summary.sold_units,
            reserved_units: summary.reserved_units,
            available_units: summary.available_units,
            total_revenue: summary.total_revenue,
            occupancy_rate: summary.occupancy_rate,
        })
        .collect();

    Ok(Json(items))
}

/// Create a new apartment
#[utoipa::path(
    post,
    path = "/api/v1/apartments",
    security(("bearer_auth" = [])),
    params(crate::auth::OwnerHeader),
    request_body = CreateApartmentRequestDto,
    responses(
        (status = 201, description = "Apartment created", body = ApartmentDto, headers(
            ("Location", description = "URL of the created apartment")
        )),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError)
    ),
    tag = "apartments"
)]
pub async fn create_apartment(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    OwnerExtension(owner): OwnerExtension,
    ApiJson(request): ApiJson<CreateApartmentRequestDto>,
) -> Result<(StatusCode, [(&'static str, String); 1], Json<ApartmentDto>), ApiError> {
    let repo = ApartmentRepository::new(&state.db);
    let apartment = repo
        .create_apartment(
            owner.0,
            CreateApartmentRequest {
                name: request.name,
                location: request.location,
                total_units: request.total_units,
                floors: request.floors,
                units_per_floor: request.units_per_floor,
                description: request.description,
                price_range: request.price_range,
                amenities: request.amenities,
            },
        )
        .await?;

    ActivityLogRepository::new(&state.db)
        .record(
            "apartment_created",
            EntityType::Apartment,
            Some(apartment.id),
            Some(json!({
                "name": apartment.name,
                "location": apartment.location,
                "total_units": apartment.total_units,
            })),
            Some(owner.0),
        )
        .await;

    let dto = ApartmentDto::from(apartment);
    state.events.publish(
        &Topic::Global,
        Envelope::new(
            EventKind::ApartmentCreated,
            serde_json::to_value(&dto).unwrap_or(JsonValue::Null),
        ),
    );

    let location = format!("/api/v1/apartments/{}", dto.id);
    Ok((StatusCode::CREATED, [("Location", location)], Json(dto)))
}

/// Soft-delete an apartment
#[utoipa::path(
    delete,
    path = "/api/v1/apartments/{id}",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Apartment UUID"),
        crate::auth::OwnerHeader
    ),
    responses(
        (status = 200, description = "Apartment deactivated", body = ApartmentDto),
        (status = 404, description = "Apartment not found or not owned", body = ApiError)
    ),
    tag = "apartments"
)]
pub async fn delete_apartment(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    OwnerExtension(owner): OwnerExtension,
    Path(apartment_id): Path<Uuid>,
) -> Result<Json<ApartmentDto>, ApiError> {
    let repo = ApartmentRepository::new(&state.db);
    let apartment = repo.soft_delete(owner.0, apartment_id).await?;

    ActivityLogRepository::new(&state.db)
        .record(
            "apartment_deleted",
            EntityType::Apartment,
            Some(apartment.id),
            Some(json!({ "name": apartment.name })),
            Some(owner.0),
        )
        .await;

    Ok(Json(apartment.into()))
}
