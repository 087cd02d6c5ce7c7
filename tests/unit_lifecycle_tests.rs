//! Tests for the unit status lifecycle: the transition table, timestamp
//! stamping, owner scoping, and write ordering.

use anyhow::Result;
use estates::error::RepositoryError;
use estates::models::unit::UnitStatus;
use estates::repositories::UnitRepository;
use uuid::Uuid;

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::{create_apartment, create_unit, setup_test_db};

#[tokio::test]
async fn reserving_a_unit_stamps_reserved_at() -> Result<()> {
    let db = setup_test_db().await?;
    let owner = Uuid::new_v4();
    let apartment = create_apartment(&db, owner).await?;
    let unit = create_unit(&db, owner, apartment.id, "1A", 4_500_000).await?;

    assert_eq!(unit.status, UnitStatus::Available);
    assert!(unit.reserved_at.is_none());

    let repo = UnitRepository::new(&db);
    let (updated, old_status) = repo
        .update_status(owner, unit.id, UnitStatus::Reserved)
        .await?;

    assert_eq!(old_status, UnitStatus::Available);
    assert_eq!(updated.status, UnitStatus::Reserved);
    assert!(updated.reserved_at.is_some());
    assert!(updated.sold_at.is_none());
    Ok(())
}

#[tokio::test]
async fn selling_a_unit_stamps_sold_at() -> Result<()> {
    let db = setup_test_db().await?;
    let owner = Uuid::new_v4();
    let apartment = create_apartment(&db, owner).await?;
    let unit = create_unit(&db, owner, apartment.id, "1A", 4_500_000).await?;

    let repo = UnitRepository::new(&db);
    repo.update_status(owner, unit.id, UnitStatus::Reserved)
        .await?;
    let (updated, old_status) = repo.update_status(owner, unit.id, UnitStatus::Sold).await?;

    assert_eq!(old_status, UnitStatus::Reserved);
    assert_eq!(updated.status, UnitStatus::Sold);
    assert!(updated.sold_at.is_some());
    // The reservation stamp survives the sale.
    assert!(updated.reserved_at.is_some());
    Ok(())
}

#[tokio::test]
async fn full_forward_chain_is_accepted() -> Result<()> {
    let db = setup_test_db().await?;
    let owner = Uuid::new_v4();
    let apartment = create_apartment(&db, owner).await?;
    let unit = create_unit(&db, owner, apartment.id, "1A", 4_500_000).await?;

    let repo = UnitRepository::new(&db);
    for target in [
        UnitStatus::Reserved,
        UnitStatus::Sold,
        UnitStatus::Installment,
        UnitStatus::FullyPaid,
    ] {
        let (updated, _) = repo.update_status(owner, unit.id, target).await?;
        assert_eq!(updated.status, target);
    }
    Ok(())
}

#[tokio::test]
async fn disallowed_transition_is_rejected_and_unit_unchanged() -> Result<()> {
    let db = setup_test_db().await?;
    let owner = Uuid::new_v4();
    let apartment = create_apartment(&db, owner).await?;
    let unit = create_unit(&db, owner, apartment.id, "1A", 4_500_000).await?;

    let repo = UnitRepository::new(&db);
    let err = repo
        .update_status(owner, unit.id, UnitStatus::FullyPaid)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)));

    let (current, _) = repo
        .find_owned(owner, unit.id)
        .await?
        .expect("unit should still exist");
    assert_eq!(current.status, UnitStatus::Available);
    assert!(current.sold_at.is_none());
    Ok(())
}

#[tokio::test]
async fn same_status_request_is_rejected() -> Result<()> {
    let db = setup_test_db().await?;
    let owner = Uuid::new_v4();
    let apartment = create_apartment(&db, owner).await?;
    let unit = create_unit(&db, owner, apartment.id, "1A", 4_500_000).await?;

    let repo = UnitRepository::new(&db);
    let err = repo
        .update_status(owner, unit.id, UnitStatus::Available)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)));
    Ok(())
}

#[tokio::test]
async fn transition_by_non_owner_fails_not_found_without_mutation() -> Result<()> {
    let db = setup_test_db().await?;
    let owner = Uuid::new_v4();
    let intruder = Uuid::new_v4();
    let apartment = create_apartment(&db, owner).await?;
    let unit = create_unit(&db, owner, apartment.id, "1A", 4_500_000).await?;

    let repo = UnitRepository::new(&db);
    let err = repo
        .update_status(intruder, unit.id, UnitStatus::Reserved)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(_)));

    let (current, _) = repo
        .find_owned(owner, unit.id)
        .await?
        .expect("unit should still exist");
    assert_eq!(current.status, UnitStatus::Available);
    assert!(current.reserved_at.is_none());
    Ok(())
}

#[tokio::test]
async fn last_committed_write_wins() -> Result<()> {
    let db = setup_test_db().await?;
    let owner = Uuid::new_v4();
    let apartment = create_apartment(&db, owner).await?;
    let unit = create_unit(&db, owner, apartment.id, "2B", 4_500_000).await?;

    // Two conflicting updates land in some order; whichever commits last is
    // the persisted state, with no version check rejecting the second.
    let repo = UnitRepository::new(&db);
    repo.update_status(owner, unit.id, UnitStatus::Reserved)
        .await?;
    let (after_second, _) = repo.update_status(owner, unit.id, UnitStatus::Sold).await?;

    assert_eq!(after_second.status, UnitStatus::Sold);

    let (persisted, _) = repo
        .find_owned(owner, unit.id)
        .await?
        .expect("unit should still exist");
    assert_eq!(persisted.status, after_second.status);
    Ok(())
}
