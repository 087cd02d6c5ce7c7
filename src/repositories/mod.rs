//! # Repository Layer
//!
//! This module contains repository implementations that encapsulate SeaORM
//! operations for database entities, providing a clean API for data access
//! with owner-scoped methods.

pub mod activity_log;
pub mod apartment;
pub mod payment;
pub mod tenant;
pub mod unit;

pub use activity_log::ActivityLogRepository;
pub use apartment::{ApartmentRepository, CreateApartmentRequest};
pub use payment::{PaymentRepository, RecordPaymentRequest};
pub use tenant::{BindTenantRequest, TenantListQuery, TenantRepository};
pub use unit::{CreateUnitRequest, UnitFilter, UnitRepository};
