//! # Apartment Repository
//!
//! Owner-scoped apartment access plus the read-time aggregation behind the
//! apartment list and the dashboard. All revenue figures are derived on
//! read; nothing aggregated is ever persisted.

use chrono::{Months, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::apartment::{self, Entity as Apartment};
use crate::models::payment::{self, Entity as Payment};
use crate::models::tenant::{self, Entity as Tenant, TenantStatus};
use crate::models::unit::{self, Entity as Unit, UnitStatus};
use crate::repositories::payment::{bucket_by_month, total_paid};

/// Request data for creating a new apartment
#[derive(Debug, Clone)]
pub struct CreateApartmentRequest {
    pub name: String,
    pub location: String,
    pub total_units: i32,
    pub floors: i32,
    pub units_per_floor: i32,
    pub description: Option<String>,
    pub price_range: Option<String>,
    pub amenities: Option<JsonValue>,
}

/// Read-time rollup attached to each apartment in listings.
///
/// `available_units` is derived from the declared total, while the dashboard
/// counts actual `available` rows; both reflect observed behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApartmentSummary {
    pub sold_units: i64,
    pub reserved_units: i64,
    pub available_units: i64,
    pub total_revenue: Decimal,
    pub occupancy_rate: i32,
}

/// Revenue for one calendar month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: Decimal,
}

/// Full dashboard aggregation for one apartment
#[derive(Debug, Clone)]
pub struct DashboardStats {
    pub apartment: apartment::Model,
    pub sold_units: i64,
    pub available_units: i64,
    pub reserved_units: i64,
    pub total_revenue: Decimal,
    pub overdue_tenants: i64,
    pub occupancy_rate: i32,
    pub monthly_revenue: Vec<MonthlyRevenue>,
}

/// Repository for apartment database operations
pub struct ApartmentRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ApartmentRepository<'a> {
    /// Create a new ApartmentRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create an apartment for `owner_id`.
    ///
    /// `total_units` is stored exactly as declared; it is not reconciled
    /// with floors × units_per_floor.
    pub async fn create_apartment(
        &self,
        owner_id: Uuid,
        request: CreateApartmentRequest,
    ) -> Result<apartment::Model, RepositoryError> {
        if request.name.trim().is_empty() {
            return Err(RepositoryError::validation("name cannot be empty"));
        }
        if request.location.trim().is_empty() {
            return Err(RepositoryError::validation("location cannot be empty"));
        }
        if request.total_units < 1 || request.floors < 1 || request.units_per_floor < 1 {
            return Err(RepositoryError::validation(
                "total_units, floors and units_per_floor must be at least 1",
            ));
        }

        let now = Utc::now();
        let model = apartment::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name.trim().to_string()),
            location: Set(request.location.trim().to_string()),
            total_units: Set(request.total_units),
            floors: Set(request.floors),
            units_per_floor: Set(request.units_per_floor),
            description: Set(request.description),
            price_range: Set(request.price_range),
            amenities: Set(request.amenities),
            owner_id: Set(owner_id),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        Ok(model.insert(self.db).await?)
    }

    /// Fetch an active apartment by id scoped to `owner_id`.
    pub async fn find_owned(
        &self,
        owner_id: Uuid,
        apartment_id: Uuid,
    ) -> Result<Option<apartment::Model>, RepositoryError> {
        Ok(Apartment::find_by_id(apartment_id)
            .filter(apartment::Column::OwnerId.eq(owner_id))
            .filter(apartment::Column::IsActive.eq(true))
            .one(self.db)
            .await?)
    }

    /// Soft-delete an owned apartment by clearing `is_active`.
    pub async fn soft_delete(
        &self,
        owner_id: Uuid,
        apartment_id: Uuid,
    ) -> Result<apartment::Model, RepositoryError> {
        let apartment = self
            .find_owned(owner_id, apartment_id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Apartment not found"))?;

        let mut active = apartment.into_active_model();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(self.db).await?)
    }

    /// List the owner's active apartments, newest first, each with its
    /// read-time unit rollup.
    pub async fn list_with_summary(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<(apartment::Model, ApartmentSummary)>, RepositoryError> {
        let apartments = Apartment::find()
            .filter(apartment::Column::OwnerId.eq(owner_id))
            .filter(apartment::Column::IsActive.eq(true))
            .order_by_desc(apartment::Column::CreatedAt)
            .find_with_related(Unit)
            .all(self.db)
            .await?;

        Ok(apartments
            .into_iter()
            .map(|(apartment, units)| {
                let summary = summarize_units(&apartment, &units);
                (apartment, summary)
            })
            .collect())
    }

    /// Aggregate dashboard statistics for one owned apartment.
    ///
    /// Revenue walks the canonical Unit → Tenant → Payments path; the
    /// denormalized unit reference on payments is never used here.
    pub async fn dashboard_stats(
        &self,
        owner_id: Uuid,
        apartment_id: Uuid,
    ) -> Result<DashboardStats, RepositoryError> {
        let apartment = self
            .find_owned(owner_id, apartment_id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Apartment not found"))?;

        let units = Unit::find()
            .filter(unit::Column::ApartmentId.eq(apartment.id))
            .all(self.db)
            .await?;

        let unit_ids: Vec<Uuid> = units.iter().map(|u| u.id).collect();
        let tenants = if unit_ids.is_empty() {
            Vec::new()
        } else {
            Tenant::find()
                .filter(tenant::Column::UnitId.is_in(unit_ids))
                .all(self.db)
                .await?
        };

        let tenant_ids: Vec<Uuid> = tenants.iter().map(|t| t.id).collect();
        let payments = if tenant_ids.is_empty() {
            Vec::new()
        } else {
            Payment::find()
                .filter(payment::Column::TenantId.is_in(tenant_ids))
                .order_by_asc(payment::Column::PaymentDate)
                .all(self.db)
                .await?
        };

        let sold_units = units.iter().filter(|u| u.status.is_sold_bucket()).count() as i64;
        let available_units = units
            .iter()
            .filter(|u| u.status == UnitStatus::Available)
            .count() as i64;
        let reserved_units = units
            .iter()
            .filter(|u| u.status == UnitStatus::Reserved)
            .count() as i64;
        let overdue_tenants = tenants
            .iter()
            .filter(|t| t.status == TenantStatus::Overdue)
            .count() as i64;

        let total_revenue = total_paid(&payments);

        let window_start: sea_orm::prelude::DateTimeWithTimeZone = Utc::now()
            .checked_sub_months(Months::new(12))
            .unwrap_or_else(Utc::now)
            .into();
        let recent: Vec<payment::Model> = payments
            .into_iter()
            .filter(|p| p.payment_date >= window_start)
            .collect();
        let monthly_revenue = bucket_by_month(&recent)
            .into_iter()
            .map(|(month, revenue)| MonthlyRevenue { month, revenue })
            .collect();

        let occupancy_rate =
            occupancy_rate(sold_units + reserved_units, apartment.total_units as i64);

        Ok(DashboardStats {
            apartment,
            sold_units,
            available_units,
            reserved_units,
            total_revenue,
            overdue_tenants,
            occupancy_rate,
            monthly_revenue,
        })
    }
}

/// Rollup used by the apartment list: counts by status bucket, price-based
/// revenue over sold/fully-paid units, and the declared-total-derived
/// availability.
fn summarize_units(apartment: &apartment::Model, units: &[unit::Model]) -> ApartmentSummary {
    let sold_units = units.iter().filter(|u| u.status.is_sold_bucket()).count() as i64;
    let reserved_units = units
        .iter()
        .filter(|u| u.status == UnitStatus::Reserved)
        .count() as i64;

    let total_revenue = units
        .iter()
        .filter(|u| matches!(u.status, UnitStatus::Sold | UnitStatus::FullyPaid))
        .map(|u| u.price)
        .sum();

    ApartmentSummary {
        sold_units,
        reserved_units,
        available_units: apartment.total_units as i64 - sold_units - reserved_units,
        total_revenue,
        occupancy_rate: occupancy_rate(sold_units + reserved_units, apartment.total_units as i64),
    }
}

/// Percentage of occupied units over the declared total, rounded half away
/// from zero. A non-positive total yields 0.
pub fn occupancy_rate(occupied: i64, total_units: i64) -> i32 {
    if total_units <= 0 {
        return 0;
    }

    (Decimal::from(occupied * 100) / Decimal::from(total_units))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i32()
        .unwrap_or(0)
}
