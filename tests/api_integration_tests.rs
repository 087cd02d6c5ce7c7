//! End-to-end router tests covering the HTTP status taxonomy and the JSON
//! shapes of the core endpoints.

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::{
    auth_request, bind_tenant, create_apartment, create_unit, read_json, setup_test_app,
};

#[tokio::test]
async fn root_and_health_are_public() -> Result<()> {
    let (_state, app) = setup_test_app().await?;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await?;
    assert_eq!(body["service"], "estates");

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await?;
    assert_eq!(body["status"], "OK");
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_bearer_token() -> Result<()> {
    let (_state, app) = setup_test_app().await?;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/apartments")
                .header("X-Owner-Id", Uuid::new_v4().to_string())
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn apartment_create_and_list_round_trip() -> Result<()> {
    let (_state, app) = setup_test_app().await?;
    let owner = Uuid::new_v4();

    let response = app
        .clone()
        .oneshot(auth_request(
            "POST",
            "/api/v1/apartments",
            owner,
            Some(json!({
                "name": "Sunrise Towers",
                "location": "Riverside Drive 14",
                "total_units": 20,
                "floors": 4,
                "units_per_floor": 5
            })),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(
        response
            .headers()
            .get("Location")
            .unwrap()
            .to_str()?
            .starts_with("/api/v1/apartments/")
    );
    let created = read_json(response).await?;
    assert_eq!(created["total_units"], 20);
    assert_eq!(created["floors"], 4);
    assert_eq!(created["units_per_floor"], 5);

    let response = app
        .oneshot(auth_request("GET", "/api/v1/apartments", owner, None))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let listed = read_json(response).await?;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["total_units"], 20);
    assert_eq!(listed[0]["occupancy_rate"], 0);
    assert_eq!(listed[0]["available_units"], 20);
    Ok(())
}

#[tokio::test]
async fn unknown_body_fields_are_rejected() -> Result<()> {
    let (_state, app) = setup_test_app().await?;
    let owner = Uuid::new_v4();

    let response = app
        .oneshot(auth_request(
            "POST",
            "/api/v1/apartments",
            owner,
            Some(json!({
                "name": "Sunrise Towers",
                "location": "Riverside Drive 14",
                "total_units": 20,
                "floors": 4,
                "units_per_floor": 5,
                "surprise": true
            })),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await?;
    assert_eq!(body["code"], "VALIDATION_FAILED");
    Ok(())
}

#[tokio::test]
async fn missing_required_fields_are_rejected() -> Result<()> {
    let (_state, app) = setup_test_app().await?;
    let owner = Uuid::new_v4();

    // unit_id is required for the transition endpoint.
    let response = app
        .oneshot(auth_request(
            "PATCH",
            "/api/v1/units",
            owner,
            Some(json!({ "status": "reserved" })),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn patch_units_applies_transition_and_returns_the_unit() -> Result<()> {
    let (state, app) = setup_test_app().await?;
    let owner = Uuid::new_v4();
    let apartment = create_apartment(&state.db, owner).await?;
    let unit = create_unit(&state.db, owner, apartment.id, "3B", 4_500_000).await?;

    let response = app
        .oneshot(auth_request(
            "PATCH",
            "/api/v1/units",
            owner,
            Some(json!({ "unit_id": unit.id, "status": "reserved" })),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await?;
    assert_eq!(body["status"], "reserved");
    assert!(body["reserved_at"].is_string());
    Ok(())
}

#[tokio::test]
async fn patch_units_rejects_disallowed_transitions_with_409() -> Result<()> {
    let (state, app) = setup_test_app().await?;
    let owner = Uuid::new_v4();
    let apartment = create_apartment(&state.db, owner).await?;
    let unit = create_unit(&state.db, owner, apartment.id, "3B", 4_500_000).await?;

    let response = app
        .oneshot(auth_request(
            "PATCH",
            "/api/v1/units",
            owner,
            Some(json!({ "unit_id": unit.id, "status": "fully_paid" })),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = read_json(response).await?;
    assert_eq!(body["code"], "CONFLICT");
    Ok(())
}

#[tokio::test]
async fn patch_units_hides_other_owners_units_behind_404() -> Result<()> {
    let (state, app) = setup_test_app().await?;
    let owner = Uuid::new_v4();
    let apartment = create_apartment(&state.db, owner).await?;
    let unit = create_unit(&state.db, owner, apartment.id, "3B", 4_500_000).await?;

    let response = app
        .oneshot(auth_request(
            "PATCH",
            "/api/v1/units",
            Uuid::new_v4(),
            Some(json!({ "unit_id": unit.id, "status": "reserved" })),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await?;
    assert_eq!(body["code"], "NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn post_tenants_binds_and_conflicts_when_unavailable() -> Result<()> {
    let (state, app) = setup_test_app().await?;
    let owner = Uuid::new_v4();
    let apartment = create_apartment(&state.db, owner).await?;
    let unit = create_unit(&state.db, owner, apartment.id, "U1", 4_500_000).await?;

    let request_body = json!({
        "unit_id": unit.id,
        "name": "Amina Odhiambo",
        "email": "amina@example.com",
        "phone": "+254700111222"
    });

    let response = app
        .clone()
        .oneshot(auth_request(
            "POST",
            "/api/v1/tenants",
            owner,
            Some(request_body.clone()),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let tenant = read_json(response).await?;
    assert_eq!(tenant["status"], "current");
    assert_eq!(tenant["unit_id"], json!(unit.id));

    // The unit is no longer available, so a second binding conflicts.
    let response = app
        .oneshot(auth_request(
            "POST",
            "/api/v1/tenants",
            owner,
            Some(request_body),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = read_json(response).await?;
    assert_eq!(body["code"], "CONFLICT");
    Ok(())
}

#[tokio::test]
async fn payments_flow_exposes_derived_percent_paid() -> Result<()> {
    let (state, app) = setup_test_app().await?;
    let owner = Uuid::new_v4();
    let apartment = create_apartment(&state.db, owner).await?;
    let unit = create_unit(&state.db, owner, apartment.id, "U1", 4_500_000).await?;
    let (tenant, _) = bind_tenant(&state.db, owner, unit.id, "Amina Odhiambo").await?;

    let response = app
        .clone()
        .oneshot(auth_request(
            "POST",
            "/api/v1/payments",
            owner,
            Some(json!({
                "tenant_id": tenant.id,
                "amount": "1500000",
                "payment_date": "2025-06-15T10:00:00Z",
                "payment_method": "mpesa"
            })),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(auth_request(
            "GET",
            &format!("/api/v1/payments?tenant_id={}", tenant.id),
            owner,
            None,
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let ledger = read_json(response).await?;
    assert_eq!(ledger["payments"].as_array().unwrap().len(), 1);
    assert_eq!(ledger["percent_paid"], 33);
    Ok(())
}

#[tokio::test]
async fn dashboard_stats_is_owner_scoped() -> Result<()> {
    let (state, app) = setup_test_app().await?;
    let owner = Uuid::new_v4();
    let apartment = create_apartment(&state.db, owner).await?;

    let uri = format!("/api/v1/dashboard/stats?apartment_id={}", apartment.id);

    let response = app
        .clone()
        .oneshot(auth_request("GET", &uri, owner, None))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let stats = read_json(response).await?;
    assert_eq!(stats["apartment"]["total_units"], 20);
    assert_eq!(stats["apartment"]["occupancy_rate"], 0);

    let response = app
        .oneshot(auth_request("GET", &uri, Uuid::new_v4(), None))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn tenant_listing_paginates_and_filters() -> Result<()> {
    let (state, app) = setup_test_app().await?;
    let owner = Uuid::new_v4();
    let apartment = create_apartment(&state.db, owner).await?;

    for i in 0..3 {
        let unit = create_unit(
            &state.db,
            owner,
            apartment.id,
            &format!("U{}", i),
            1_000_000,
        )
        .await?;
        bind_tenant(&state.db, owner, unit.id, &format!("Tenant {}", i)).await?;
    }

    let response = app
        .clone()
        .oneshot(auth_request(
            "GET",
            "/api/v1/tenants?page=1&limit=2",
            owner,
            None,
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await?;
    assert_eq!(body["tenants"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["pages"], 2);

    let response = app
        .oneshot(auth_request(
            "GET",
            "/api/v1/tenants?search=Tenant%200",
            owner,
            None,
        ))
        .await?;
    let body = read_json(response).await?;
    assert_eq!(body["tenants"].as_array().unwrap().len(), 1);
    assert_eq!(body["tenants"][0]["name"], "Tenant 0");
    Ok(())
}
