//! # Tenant Repository
//!
//! Tenant binding and owner-scoped tenant listings. Binding a tenant flips
//! the target unit from `available` straight to `sold`; the tenant insert
//! and the unit update happen in one transaction so neither takes effect
//! without the other.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::apartment;
use crate::models::tenant::{self, Entity as Tenant, TenantStatus};
use crate::models::unit::{self, UnitStatus};

/// Request data for binding a tenant to a unit
#[derive(Debug, Clone)]
pub struct BindTenantRequest {
    pub unit_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub id_number: Option<String>,
    pub occupation: Option<String>,
    pub emergency_contact: Option<String>,
    pub monthly_income: Option<Decimal>,
    pub move_in_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Filters and paging for tenant listings
#[derive(Debug, Clone)]
pub struct TenantListQuery {
    pub search: Option<String>,
    pub status: Option<TenantStatus>,
    pub apartment_id: Option<Uuid>,
    pub page: u64,
    pub limit: u64,
}

/// One page of tenants plus paging metadata
#[derive(Debug, Clone)]
pub struct TenantPage {
    pub tenants: Vec<tenant::Model>,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
    pub limit: u64,
}

/// Repository for tenant database operations
pub struct TenantRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TenantRepository<'a> {
    /// Create a new TenantRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Bind a tenant to an available unit owned by `owner_id`.
    ///
    /// Returns the created tenant and the updated unit. The unit must be in
    /// status `available`; any other status is a conflict. The status moves
    /// directly to `sold` without stamping `sold_at` — the stamp belongs to
    /// the explicit transition endpoint.
    pub async fn bind_tenant(
        &self,
        owner_id: Uuid,
        request: BindTenantRequest,
    ) -> Result<(tenant::Model, unit::Model), RepositoryError> {
        if request.name.trim().is_empty() {
            return Err(RepositoryError::validation("name cannot be empty"));
        }
        if request.email.trim().is_empty() || !request.email.contains('@') {
            return Err(RepositoryError::validation("email is invalid"));
        }
        if request.phone.trim().is_empty() {
            return Err(RepositoryError::validation("phone cannot be empty"));
        }

        let txn = self.db.begin().await?;

        let found = unit::Entity::find_by_id(request.unit_id)
            .find_also_related(apartment::Entity)
            .filter(apartment::Column::OwnerId.eq(owner_id))
            .one(&txn)
            .await?
            .and_then(|(unit, apartment)| apartment.map(|a| (unit, a)));

        let Some((unit, _apartment)) = found else {
            txn.rollback().await?;
            return Err(RepositoryError::not_found("Unit not found"));
        };

        if unit.status != UnitStatus::Available {
            txn.rollback().await?;
            return Err(RepositoryError::conflict("Unit is not available"));
        }

        let now = Utc::now();
        let tenant = tenant::ActiveModel {
            id: Set(Uuid::new_v4()),
            unit_id: Set(Some(unit.id)),
            name: Set(request.name.trim().to_string()),
            email: Set(request.email.trim().to_string()),
            phone: Set(request.phone.trim().to_string()),
            id_number: Set(request.id_number),
            occupation: Set(request.occupation),
            emergency_contact: Set(request.emergency_contact),
            monthly_income: Set(request.monthly_income),
            status: Set(TenantStatus::Current),
            join_date: Set(now.into()),
            move_in_date: Set(request.move_in_date.map(Into::into)),
            notes: Set(request.notes),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let tenant = tenant.insert(&txn).await?;

        let mut active_unit = unit.into_active_model();
        active_unit.status = Set(UnitStatus::Sold);
        active_unit.updated_at = Set(now.into());
        let unit = active_unit.update(&txn).await?;

        txn.commit().await?;

        Ok((tenant, unit))
    }

    /// Fetch a tenant by id, scoped through its unit's apartment to
    /// `owner_id`.
    pub async fn find_owned(
        &self,
        owner_id: Uuid,
        tenant_id: Uuid,
    ) -> Result<Option<tenant::Model>, RepositoryError> {
        Ok(Tenant::find_by_id(tenant_id)
            .join(JoinType::InnerJoin, tenant::Relation::Unit.def())
            .join(JoinType::InnerJoin, unit::Relation::Apartment.def())
            .filter(apartment::Column::OwnerId.eq(owner_id))
            .one(self.db)
            .await?)
    }

    /// Fetch the tenants bound to any of the given units.
    pub async fn for_units(
        &self,
        unit_ids: &[Uuid],
    ) -> Result<Vec<tenant::Model>, RepositoryError> {
        if unit_ids.is_empty() {
            return Ok(Vec::new());
        }

        Ok(Tenant::find()
            .filter(tenant::Column::UnitId.is_in(unit_ids.iter().copied()))
            .all(self.db)
            .await?)
    }

    /// List tenants across the owner's active apartments with search, status
    /// and apartment filters, newest first.
    pub async fn list_tenants(
        &self,
        owner_id: Uuid,
        query: TenantListQuery,
    ) -> Result<TenantPage, RepositoryError> {
        let mut select = Tenant::find()
            .join(JoinType::InnerJoin, tenant::Relation::Unit.def())
            .join(JoinType::InnerJoin, unit::Relation::Apartment.def())
            .filter(apartment::Column::OwnerId.eq(owner_id))
            .filter(apartment::Column::IsActive.eq(true));

        if let Some(status) = query.status {
            select = select.filter(tenant::Column::Status.eq(status));
        }
        if let Some(apartment_id) = query.apartment_id {
            select = select.filter(apartment::Column::Id.eq(apartment_id));
        }
        if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let needle = search.trim();
            select = select.filter(
                Condition::any()
                    .add(tenant::Column::Name.contains(needle))
                    .add(tenant::Column::Email.contains(needle))
                    .add(tenant::Column::Phone.contains(needle)),
            );
        }

        let limit = query.limit.max(1);
        let page = query.page.max(1);

        let paginator = select
            .order_by_desc(tenant::Column::CreatedAt)
            .paginate(self.db, limit);

        let total = paginator.num_items().await?;
        let tenants = paginator.fetch_page(page - 1).await?;
        let pages = total.div_ceil(limit);

        Ok(TenantPage {
            tenants,
            total,
            page,
            pages,
            limit,
        })
    }
}
