//! # Dashboard API Handlers
//!
//! The aggregate read behind the per-apartment dashboard. Every figure is
//! derived from current rows at read time: status bucket counts, payment
//! revenue via the Unit → Tenant → Payments path, and a trailing-12-month
//! calendar bucketing of the ledger.

use axum::{
    extract::{Query, State},
    response::Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::{OperatorAuth, OwnerExtension};
use crate::error::ApiError;
use crate::repositories::ApartmentRepository;
use crate::server::AppState;

/// Query parameters for the dashboard read
#[derive(Debug, Deserialize, IntoParams)]
pub struct DashboardParams {
    /// Apartment to aggregate (required)
    pub apartment_id: Uuid,
}

/// Apartment header block of the dashboard
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardApartmentDto {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub total_units: i32,
    pub sold_units: i64,
    pub available_units: i64,
    pub reserved_units: i64,
    #[schema(value_type = String, example = "1500000.00")]
    pub total_revenue: Decimal,
    pub occupancy_rate: i32,
    pub overdue_tenants: i64,
}

/// Revenue for one calendar month (`YYYY-MM`)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MonthlyRevenueDto {
    #[schema(example = "2025-06")]
    pub month: String,
    #[schema(value_type = String, example = "250000.00")]
    pub revenue: Decimal,
}

/// Dashboard statistics response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardStatsDto {
    pub apartment: DashboardApartmentDto,
    pub monthly_revenue: Vec<MonthlyRevenueDto>,
}

/// Aggregate dashboard statistics for one apartment
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/stats",
    security(("bearer_auth" = [])),
    params(DashboardParams, crate::auth::OwnerHeader),
    responses(
        (status = 200, description = "Derived dashboard statistics", body = DashboardStatsDto),
        (status = 404, description = "Apartment not found or not owned", body = ApiError)
    ),
    tag = "dashboard"
)]
pub async fn dashboard_stats(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    OwnerExtension(owner): OwnerExtension,
    Query(params): Query<DashboardParams>,
) -> Result<Json<DashboardStatsDto>, ApiError> {
    let repo = ApartmentRepository::new(&state.db);
    let stats = repo.dashboard_stats(owner.0, params.apartment_id).await?;

    Ok(Json(DashboardStatsDto {
        apartment: DashboardApartmentDto {
            id: stats.apartment.id,
            name: stats.apartment.name,
            location: stats.apartment.location,
            total_units: stats.apartment.total_units,
            sold_units: stats.sold_units,
            available_units: stats.available_units,
            reserved_units: stats.reserved_units,
            total_revenue: stats.total_revenue,
            occupancy_rate: stats.occupancy_rate,
            overdue_tenants: stats.overdue_tenants,
        },
        monthly_revenue: stats
            .monthly_revenue
            .into_iter()
            .map(|m| MonthlyRevenueDto {
                month: m.month,
                revenue: m.revenue,
            })
            .collect(),
    }))
}
