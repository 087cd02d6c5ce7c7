//! # Unit Repository
//!
//! Owner-scoped data access for units, including the status transition
//! handler. A unit whose apartment does not belong to the calling owner is
//! reported as not found, never as forbidden.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::apartment;
use crate::models::unit::{self, Entity as Unit, UnitStatus, UnitType};

/// Request data for creating a new unit
#[derive(Debug, Clone)]
pub struct CreateUnitRequest {
    pub apartment_id: Uuid,
    pub unit_number: String,
    pub floor: i32,
    pub area: Decimal,
    pub price: Decimal,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub unit_type: Option<UnitType>,
    pub features: Option<JsonValue>,
}

/// Optional filters for unit listings
#[derive(Debug, Clone, Default)]
pub struct UnitFilter {
    pub floor: Option<i32>,
    pub status: Option<UnitStatus>,
}

/// Repository for unit database operations
pub struct UnitRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UnitRepository<'a> {
    /// Create a new UnitRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a unit under an apartment owned by `owner_id`.
    pub async fn create_unit(
        &self,
        owner_id: Uuid,
        request: CreateUnitRequest,
    ) -> Result<unit::Model, RepositoryError> {
        if request.unit_number.trim().is_empty() {
            return Err(RepositoryError::validation("unit_number cannot be empty"));
        }
        if request.floor < 1 {
            return Err(RepositoryError::validation("floor must be at least 1"));
        }
        if request.area < Decimal::ZERO || request.price < Decimal::ZERO {
            return Err(RepositoryError::validation(
                "area and price cannot be negative",
            ));
        }

        let apartment = apartment::Entity::find_by_id(request.apartment_id)
            .filter(apartment::Column::OwnerId.eq(owner_id))
            .filter(apartment::Column::IsActive.eq(true))
            .one(self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Apartment not found"))?;

        let now = Utc::now();
        let model = unit::ActiveModel {
            id: Set(Uuid::new_v4()),
            apartment_id: Set(apartment.id),
            unit_number: Set(request.unit_number.trim().to_string()),
            floor: Set(request.floor),
            area: Set(request.area),
            price: Set(request.price),
            bedrooms: Set(request.bedrooms.unwrap_or(1)),
            bathrooms: Set(request.bathrooms.unwrap_or(1)),
            unit_type: Set(request.unit_type.unwrap_or(UnitType::OneBr)),
            status: Set(UnitStatus::Available),
            features: Set(request.features),
            reserved_at: Set(None),
            sold_at: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        Ok(model.insert(self.db).await?)
    }

    /// Find a unit by id together with its apartment, scoped to `owner_id`.
    pub async fn find_owned(
        &self,
        owner_id: Uuid,
        unit_id: Uuid,
    ) -> Result<Option<(unit::Model, apartment::Model)>, RepositoryError> {
        let result = Unit::find_by_id(unit_id)
            .find_also_related(apartment::Entity)
            .filter(apartment::Column::OwnerId.eq(owner_id))
            .one(self.db)
            .await?;

        Ok(result.and_then(|(unit, apartment)| apartment.map(|a| (unit, a))))
    }

    /// Apply a status transition to an owned unit.
    ///
    /// The target must be allowed by [`UnitStatus::can_transition_to`];
    /// entering `reserved` or `sold` stamps the matching timestamp.
    pub async fn update_status(
        &self,
        owner_id: Uuid,
        unit_id: Uuid,
        target: UnitStatus,
    ) -> Result<(unit::Model, UnitStatus), RepositoryError> {
        let (unit, _apartment) = self
            .find_owned(owner_id, unit_id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Unit not found"))?;

        let current = unit.status;
        if !current.can_transition_to(target) {
            return Err(RepositoryError::conflict(format!(
                "Transition from {:?} to {:?} is not allowed",
                current, target
            )));
        }

        let now = Utc::now();
        let mut active = unit.into_active_model();
        active.status = Set(target);
        active.updated_at = Set(now.into());
        match target {
            UnitStatus::Sold => active.sold_at = Set(Some(now.into())),
            UnitStatus::Reserved => active.reserved_at = Set(Some(now.into())),
            _ => {}
        }

        let updated = active.update(self.db).await?;
        Ok((updated, current))
    }

    /// Fetch units by id, unscoped; callers resolve ownership beforehand.
    pub async fn by_ids(&self, unit_ids: &[Uuid]) -> Result<Vec<unit::Model>, RepositoryError> {
        if unit_ids.is_empty() {
            return Ok(Vec::new());
        }

        Ok(Unit::find()
            .filter(unit::Column::Id.is_in(unit_ids.iter().copied()))
            .all(self.db)
            .await?)
    }

    /// List the units of an owned, active apartment, ordered by floor then
    /// unit number.
    pub async fn list_for_apartment(
        &self,
        owner_id: Uuid,
        apartment_id: Uuid,
        filter: UnitFilter,
    ) -> Result<Vec<unit::Model>, RepositoryError> {
        apartment::Entity::find_by_id(apartment_id)
            .filter(apartment::Column::OwnerId.eq(owner_id))
            .filter(apartment::Column::IsActive.eq(true))
            .one(self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Apartment not found"))?;

        let mut query = Unit::find().filter(unit::Column::ApartmentId.eq(apartment_id));

        if let Some(floor) = filter.floor {
            query = query.filter(unit::Column::Floor.eq(floor));
        }
        if let Some(status) = filter.status {
            query = query.filter(unit::Column::Status.eq(status));
        }

        Ok(query
            .order_by_asc(unit::Column::Floor)
            .order_by_asc(unit::Column::UnitNumber)
            .all(self.db)
            .await?)
    }
}
