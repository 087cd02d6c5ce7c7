//! # Payment Repository
//!
//! Append-only ledger access plus the read-time derivations built on it.
//! Percent-paid is never stored; it is recomputed from the ledger on every
//! read. The ledger row keeps both tenant and unit references, but every
//! aggregate walks the canonical Unit → Tenant → Payments path.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::apartment;
use crate::models::payment::{self, Entity as Payment, PaymentMethod, PaymentPlan};
use crate::models::tenant::Entity as Tenant;
use crate::models::unit;

/// Request data for appending a ledger entry
#[derive(Debug, Clone)]
pub struct RecordPaymentRequest {
    pub tenant_id: Uuid,
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub payment_plan: Option<PaymentPlan>,
    pub installment_number: Option<i32>,
    pub total_installments: Option<i32>,
    pub balance_remaining: Option<Decimal>,
    pub receipt_number: Option<String>,
    pub notes: Option<String>,
}

/// Repository for payment database operations
pub struct PaymentRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PaymentRepository<'a> {
    /// Create a new PaymentRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Append a payment for a tenant bound to a unit the caller owns.
    ///
    /// Returns the ledger row together with the bound unit. No balance
    /// check is performed and the unit status is never promoted here;
    /// settlement progress is derived at read time only.
    pub async fn record_payment(
        &self,
        owner_id: Uuid,
        request: RecordPaymentRequest,
    ) -> Result<(payment::Model, unit::Model), RepositoryError> {
        if request.amount < Decimal::ZERO {
            return Err(RepositoryError::validation("amount cannot be negative"));
        }

        let tenant = Tenant::find_by_id(request.tenant_id)
            .one(self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Tenant not found"))?;

        let Some(unit_id) = tenant.unit_id else {
            return Err(RepositoryError::validation("Tenant is not bound to a unit"));
        };

        let unit = unit::Entity::find_by_id(unit_id)
            .find_also_related(apartment::Entity)
            .filter(apartment::Column::OwnerId.eq(owner_id))
            .one(self.db)
            .await?
            .and_then(|(unit, apartment)| apartment.map(|_| unit))
            .ok_or_else(|| RepositoryError::not_found("Tenant not found"))?;

        let now = Utc::now();
        let model = payment::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant.id),
            unit_id: Set(unit.id),
            amount: Set(request.amount),
            payment_date: Set(request.payment_date.into()),
            payment_method: Set(request.payment_method),
            payment_plan: Set(request.payment_plan.unwrap_or(PaymentPlan::FullPayment)),
            installment_number: Set(request.installment_number.unwrap_or(1)),
            total_installments: Set(request.total_installments.unwrap_or(1)),
            balance_remaining: Set(request.balance_remaining.unwrap_or(Decimal::ZERO)),
            receipt_number: Set(request.receipt_number),
            notes: Set(request.notes),
            is_verified: Set(false),
            created_at: Set(now.into()),
        };

        let payment = model.insert(self.db).await?;
        Ok((payment, unit))
    }

    /// List a tenant's payments, newest first.
    pub async fn list_for_tenant(
        &self,
        tenant_id: Uuid,
    ) -> Result<Vec<payment::Model>, RepositoryError> {
        Ok(Payment::find()
            .filter(payment::Column::TenantId.eq(tenant_id))
            .order_by_desc(payment::Column::PaymentDate)
            .all(self.db)
            .await?)
    }

    /// Fetch payments for a set of tenants, newest first, capped per tenant.
    ///
    /// Used by listings that attach a short payment history to each row.
    pub async fn recent_for_tenants(
        &self,
        tenant_ids: &[Uuid],
        per_tenant: usize,
    ) -> Result<HashMap<Uuid, Vec<payment::Model>>, RepositoryError> {
        if tenant_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = Payment::find()
            .filter(payment::Column::TenantId.is_in(tenant_ids.iter().copied()))
            .order_by_desc(payment::Column::PaymentDate)
            .all(self.db)
            .await?;

        let mut by_tenant: HashMap<Uuid, Vec<payment::Model>> = HashMap::new();
        for row in rows {
            let entry = by_tenant.entry(row.tenant_id).or_default();
            if entry.len() < per_tenant {
                entry.push(row);
            }
        }

        Ok(by_tenant)
    }
}

/// Sum a slice of ledger rows.
pub fn total_paid(payments: &[payment::Model]) -> Decimal {
    payments.iter().map(|p| p.amount).sum()
}

/// Derived settlement progress: round(total / price × 100).
///
/// Returns 0 for a zero or negative price rather than dividing by it.
pub fn percent_paid(total: Decimal, price: Decimal) -> i32 {
    if price <= Decimal::ZERO {
        return 0;
    }

    (total / price * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i32()
        .unwrap_or(0)
}

/// Bucket ledger rows by calendar month (`YYYY-MM`), ascending, the way a
/// GROUP BY on a month date-bucket would.
pub fn bucket_by_month(payments: &[payment::Model]) -> BTreeMap<String, Decimal> {
    let mut buckets: BTreeMap<String, Decimal> = BTreeMap::new();
    for p in payments {
        let month = p.payment_date.format("%Y-%m").to_string();
        *buckets.entry(month).or_insert(Decimal::ZERO) += p.amount;
    }
    buckets
}
