//! # Data Models
//!
//! This module contains the SeaORM entities and shared response types for the
//! Estates API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod activity_log;
pub mod apartment;
pub mod payment;
pub mod tenant;
pub mod unit;

pub use activity_log::Entity as ActivityLog;
pub use apartment::Entity as Apartment;
pub use payment::Entity as Payment;
pub use tenant::Entity as Tenant;
pub use unit::Entity as Unit;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "estates".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
