//! # Estates API Library
//!
//! This library provides the core functionality for the Estates API service:
//! the unit lifecycle, tenant binding, the payment ledger and per-apartment
//! event fan-out, along with the handlers, models and server configuration
//! around them.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod server;
pub mod telemetry;
pub use migration;
