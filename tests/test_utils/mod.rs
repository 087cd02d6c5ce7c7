//! Test utilities for database and router testing.
//!
//! Provides an in-memory SQLite database with all migrations applied,
//! fixture builders that go through the repository layer, and helpers for
//! authenticated router requests.

use anyhow::Result;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use estates::config::AppConfig;
use estates::models::{apartment, tenant, unit};
use estates::repositories::{
    ApartmentRepository, BindTenantRequest, CreateApartmentRequest, CreateUnitRequest,
    TenantRepository, UnitRepository,
};
use estates::server::{AppState, create_app, create_test_app_state};
use migration::{Migrator, MigratorTrait};
use rust_decimal::Decimal;
use sea_orm::{Database, DatabaseConnection};
use serde_json::Value;
use uuid::Uuid;

pub const TEST_TOKEN: &str = "test-token";

/// Sets up an in-memory SQLite database with all migrations applied.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// Builds the full router plus its state over a fresh in-memory database.
#[allow(dead_code)]
pub async fn setup_test_app() -> Result<(AppState, Router)> {
    let config = AppConfig {
        profile: "test".to_string(),
        operator_tokens: vec![TEST_TOKEN.to_string()],
        ..Default::default()
    };

    let db = setup_test_db().await?;
    let state = create_test_app_state(config, db);
    let app = create_app(state.clone());
    Ok((state, app))
}

/// Creates an apartment fixture for `owner` (20 units over 4 floors).
#[allow(dead_code)]
pub async fn create_apartment(db: &DatabaseConnection, owner: Uuid) -> Result<apartment::Model> {
    let repo = ApartmentRepository::new(db);
    let apartment = repo
        .create_apartment(
            owner,
            CreateApartmentRequest {
                name: "Sunrise Towers".to_string(),
                location: "Riverside Drive 14".to_string(),
                total_units: 20,
                floors: 4,
                units_per_floor: 5,
                description: None,
                price_range: None,
                amenities: None,
            },
        )
        .await?;
    Ok(apartment)
}

/// Creates a unit fixture priced at `price`.
#[allow(dead_code)]
pub async fn create_unit(
    db: &DatabaseConnection,
    owner: Uuid,
    apartment_id: Uuid,
    unit_number: &str,
    price: i64,
) -> Result<unit::Model> {
    let repo = UnitRepository::new(db);
    let unit = repo
        .create_unit(
            owner,
            CreateUnitRequest {
                apartment_id,
                unit_number: unit_number.to_string(),
                floor: 1,
                area: Decimal::new(8550, 2),
                price: Decimal::from(price),
                bedrooms: None,
                bathrooms: None,
                unit_type: None,
                features: None,
            },
        )
        .await?;
    Ok(unit)
}

/// Binds a tenant fixture to `unit_id`.
#[allow(dead_code)]
pub async fn bind_tenant(
    db: &DatabaseConnection,
    owner: Uuid,
    unit_id: Uuid,
    name: &str,
) -> Result<(tenant::Model, unit::Model)> {
    let repo = TenantRepository::new(db);
    let bound = repo
        .bind_tenant(
            owner,
            BindTenantRequest {
                unit_id,
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                phone: "+254700111222".to_string(),
                id_number: None,
                occupation: None,
                emergency_contact: None,
                monthly_income: None,
                move_in_date: None,
                notes: None,
            },
        )
        .await?;
    Ok(bound)
}

/// Builds an authenticated request carrying the operator token and owner id.
#[allow(dead_code)]
pub fn auth_request(method: &str, uri: &str, owner: Uuid, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {}", TEST_TOKEN))
        .header("X-Owner-Id", owner.to_string())
        .header("Content-Type", "application/json");

    match body {
        Some(value) => builder.body(Body::from(value.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Reads a JSON response body.
#[allow(dead_code)]
pub async fn read_json(response: Response<Body>) -> Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}
