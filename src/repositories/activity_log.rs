//! # Activity Log Repository
//!
//! Best-effort, write-once audit recording. A failed write must never fail
//! the mutation it describes, so errors are logged and swallowed here.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::models::activity_log::{self, EntityType};

/// Repository for audit trail writes
pub struct ActivityLogRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ActivityLogRepository<'a> {
    /// Create a new ActivityLogRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Record an audit entry.
    ///
    /// Failures are reported through the log only; the caller's operation
    /// has already succeeded and must stay successful.
    pub async fn record(
        &self,
        action: &str,
        entity_type: EntityType,
        entity_id: Option<Uuid>,
        details: Option<JsonValue>,
        owner_id: Option<Uuid>,
    ) {
        let model = activity_log::ActiveModel {
            id: Set(Uuid::new_v4()),
            action: Set(action.to_string()),
            entity_type: Set(entity_type),
            entity_id: Set(entity_id),
            details: Set(details),
            owner_id: Set(owner_id),
            created_at: Set(Utc::now().into()),
        };

        if let Err(err) = model.insert(self.db).await {
            tracing::warn!(action, ?err, "Activity logging failed");
        }
    }
}
