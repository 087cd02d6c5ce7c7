//! # Payment API Handlers
//!
//! Ledger appends and the tenant ledger read. Settlement progress
//! (`total_paid`, `percent_paid`) is derived from the ledger at read time
//! and never stored; recording a payment does not promote the unit status.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::{OperatorAuth, OwnerExtension};
use crate::error::{ApiError, ApiJson, RepositoryError};
use crate::events::{Envelope, EventKind, Topic};
use crate::handlers::types::PaymentDto;
use crate::models::activity_log::EntityType;
use crate::models::payment::{PaymentMethod, PaymentPlan};
use crate::repositories::payment::{percent_paid, total_paid};
use crate::repositories::{
    ActivityLogRepository, PaymentRepository, RecordPaymentRequest, TenantRepository,
    UnitRepository,
};
use crate::server::AppState;

/// Request payload for appending a ledger entry
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RecordPaymentRequestDto {
    pub tenant_id: Uuid,
    #[schema(value_type = String, example = "1500000.00")]
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub payment_plan: Option<PaymentPlan>,
    pub installment_number: Option<i32>,
    pub total_installments: Option<i32>,
    #[schema(value_type = Option<String>, example = "3000000.00")]
    pub balance_remaining: Option<Decimal>,
    pub receipt_number: Option<String>,
    pub notes: Option<String>,
}

/// Query parameters for the tenant ledger read
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListPaymentsParams {
    /// Tenant whose ledger to read (required)
    pub tenant_id: Uuid,
}

/// A tenant's ledger with derived settlement progress
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TenantLedgerDto {
    pub payments: Vec<PaymentDto>,
    /// Sum of all ledger amounts (derived, never stored)
    #[schema(value_type = String, example = "1500000.00")]
    pub total_paid: Decimal,
    /// round(total_paid / unit price × 100); 0 when no unit is bound
    pub percent_paid: i32,
}

/// Append a payment to a tenant's ledger
#[utoipa::path(
    post,
    path = "/api/v1/payments",
    security(("bearer_auth" = [])),
    params(crate::auth::OwnerHeader),
    request_body = RecordPaymentRequestDto,
    responses(
        (status = 201, description = "Payment recorded", body = PaymentDto, headers(
            ("Location", description = "URL of the created payment")
        )),
        (status = 400, description = "Validation failed or tenant unbound", body = ApiError),
        (status = 404, description = "Tenant not found or not owned", body = ApiError)
    ),
    tag = "payments"
)]
pub async fn record_payment(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    OwnerExtension(owner): OwnerExtension,
    ApiJson(request): ApiJson<RecordPaymentRequestDto>,
) -> Result<(StatusCode, [(&'static str, String); 1], Json<PaymentDto>), ApiError> {
    let repo = PaymentRepository::new(&state.db);
    let (payment, unit) = repo
        .record_payment(
            owner.0,
            RecordPaymentRequest {
                tenant_id: request.tenant_id,
                amount: request.amount,
                payment_date: request.payment_date,
                payment_method: request.payment_method,
                payment_plan: request.payment_plan,
                installment_number: request.installment_number,
                total_installments: request.total_installments,
                balance_remaining: request.balance_remaining,
                receipt_number: request.receipt_number,
                notes: request.notes,
            },
        )
        .await?;

    ActivityLogRepository::new(&state.db)
        .record(
            "payment_recorded",
            EntityType::Payment,
            Some(payment.id),
            Some(json!({
                "tenant_id": payment.tenant_id,
                "unit_id": payment.unit_id,
                "amount": payment.amount,
            })),
            Some(owner.0),
        )
        .await;

    let dto = PaymentDto::from(payment);
    state.events.publish(
        &Topic::Apartment(unit.apartment_id),
        Envelope::new(
            EventKind::PaymentRecorded,
            serde_json::to_value(&dto).unwrap_or(serde_json::Value::Null),
        ),
    );

    let location = format!("/api/v1/payments/{}", dto.id);
    Ok((StatusCode::CREATED, [("Location", location)], Json(dto)))
}

/// Read a tenant's ledger with derived settlement progress
#[utoipa::path(
    get,
    path = "/api/v1/payments",
    security(("bearer_auth" = [])),
    params(ListPaymentsParams, crate::auth::OwnerHeader),
    responses(
        (status = 200, description = "Ledger with derived totals", body = TenantLedgerDto),
        (status = 404, description = "Tenant not found or not owned", body = ApiError)
    ),
    tag = "payments"
)]
pub async fn list_payments(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    OwnerExtension(owner): OwnerExtension,
    Query(params): Query<ListPaymentsParams>,
) -> Result<Json<TenantLedgerDto>, ApiError> {
    let tenant = TenantRepository::new(&state.db)
        .find_owned(owner.0, params.tenant_id)
        .await?
        .ok_or(RepositoryError::NotFound("Tenant not found".to_string()))?;

    let payments = PaymentRepository::new(&state.db)
        .list_for_tenant(tenant.id)
        .await?;

    let total = total_paid(&payments);
    let percent = match tenant.unit_id {
        Some(unit_id) => {
            let units = UnitRepository::new(&state.db).by_ids(&[unit_id]).await?;
            units
                .first()
                .map(|unit| percent_paid(total, unit.price))
                .unwrap_or(0)
        }
        None => 0,
    };

    Ok(Json(TenantLedgerDto {
        payments: payments.into_iter().map(PaymentDto::from).collect(),
        total_paid: total,
        percent_paid: percent,
    }))
}
