//! Tests for the notification fan-out wired through the HTTP surface:
//! apartment-scoped delivery, the global topic, and at-most-once semantics.

use anyhow::Result;
use estates::events::{EventKind, Topic};
use serde_json::json;
use tokio::sync::broadcast::error::TryRecvError;
use tower::ServiceExt;
use uuid::Uuid;

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::{auth_request, create_apartment, create_unit, read_json, setup_test_app};

#[tokio::test]
async fn tenant_creation_reaches_only_its_apartment_topic() -> Result<()> {
    let (state, app) = setup_test_app().await?;
    let owner = Uuid::new_v4();

    let apartment_a = create_apartment(&state.db, owner).await?;
    let apartment_b = create_apartment(&state.db, owner).await?;
    let unit = create_unit(&state.db, owner, apartment_a.id, "U1", 4_500_000).await?;

    let mut rx_a = state.events.subscribe(&Topic::Apartment(apartment_a.id));
    let mut rx_b = state.events.subscribe(&Topic::Apartment(apartment_b.id));

    let response = app
        .oneshot(auth_request(
            "POST",
            "/api/v1/tenants",
            owner,
            Some(json!({
                "unit_id": unit.id,
                "name": "Amina Odhiambo",
                "email": "amina@example.com",
                "phone": "+254700111222"
            })),
        ))
        .await?;
    assert_eq!(response.status(), 201);
    let tenant = read_json(response).await?;

    // Exactly one tenant_created lands on apartment A's topic.
    let envelope = rx_a.recv().await?;
    assert_eq!(envelope.event, EventKind::TenantCreated);
    assert_eq!(envelope.payload["tenant"]["id"], tenant["id"]);
    assert_eq!(envelope.payload["unit"]["id"], json!(unit.id));
    assert_eq!(
        envelope.payload["unit"]["apartment_id"],
        json!(apartment_a.id)
    );
    assert!(matches!(rx_a.try_recv(), Err(TryRecvError::Empty)));

    // Apartment B's subscriber sees nothing for this mutation.
    assert!(matches!(rx_b.try_recv(), Err(TryRecvError::Empty)));
    Ok(())
}

#[tokio::test]
async fn unit_status_update_is_broadcast_to_the_apartment_topic() -> Result<()> {
    let (state, app) = setup_test_app().await?;
    let owner = Uuid::new_v4();

    let apartment = create_apartment(&state.db, owner).await?;
    let unit = create_unit(&state.db, owner, apartment.id, "U1", 4_500_000).await?;

    let mut rx = state.events.subscribe(&Topic::Apartment(apartment.id));

    let response = app
        .oneshot(auth_request(
            "PATCH",
            "/api/v1/units",
            owner,
            Some(json!({
                "unit_id": unit.id,
                "status": "reserved",
                "notes": "holding deposit received"
            })),
        ))
        .await?;
    assert_eq!(response.status(), 200);

    let envelope = rx.recv().await?;
    assert_eq!(envelope.event, EventKind::UnitUpdated);
    assert_eq!(envelope.payload["id"], json!(unit.id));
    assert_eq!(envelope.payload["status"], "reserved");
    Ok(())
}

#[tokio::test]
async fn apartment_creation_goes_to_the_global_topic() -> Result<()> {
    let (state, app) = setup_test_app().await?;
    let owner = Uuid::new_v4();

    let mut rx = state.events.subscribe(&Topic::Global);

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
                "units_per_floor": 5
            })),
        ))
        .await?;
    assert_eq!(response.status(), 201);

    let envelope = rx.recv().await?;
    assert_eq!(envelope.event, EventKind::ApartmentCreated);
    assert_eq!(envelope.payload["name"], "Sunrise Towers");
    Ok(())
}

#[tokio::test]
async fn failed_mutations_emit_nothing() -> Result<()> {
    let (state, app) = setup_test_app().await?;
    let owner = Uuid::new_v4();

    let apartment = create_apartment(&state.db, owner).await?;
    let unit = create_unit(&state.db, owner, apartment.id, "U1", 4_500_000).await?;

    let mut rx = state.events.subscribe(&Topic::Apartment(apartment.id));

    // Disallowed transition: available → fully_paid.
    let response = app
        .oneshot(auth_request(
            "PATCH",
            "/api/v1/units",
            owner,
            Some(json!({
                "unit_id": unit.id,
                "status": "fully_paid"
            })),
        ))
        .await?;
    assert_eq!(response.status(), 409);

    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    Ok(())
}

#[tokio::test]
async fn subscriber_arriving_after_the_event_misses_it() -> Result<()> {
    let (state, app) = setup_test_app().await?;
    let owner = Uuid::new_v4();

    let apartment = create_apartment(&state.db, owner).await?;
    let unit = create_unit(&state.db, owner, apartment.id, "U1", 4_500_000).await?;

    // Nobody is subscribed when the mutation lands.
    let response = app
        .oneshot(auth_request(
            "PATCH",
            "/api/v1/units",
            owner,
            Some(json!({ "unit_id": unit.id, "status": "reserved" })),
        ))
        .await?;
    assert_eq!(response.status(), 200);

    // A later subscriber gets no replay.
    let mut rx = state.events.subscribe(&Topic::Apartment(apartment.id));
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    Ok(())
}
