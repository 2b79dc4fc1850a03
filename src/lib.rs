//! # Insurdesk - Insurance Agency Customer/Policy Tracker
//!
//! Single-user, file-backed record store for an insurance agency:
//! customers, their policy contracts, and the billing-date engine that
//! derives upcoming/overdue payment views from them.
//!
//! Insurdesk provides:
//! - SQLite-backed customer/policy store with additive schema migration
//! - Recurring billing-date arithmetic (monthly/yearly, month-end clamping)
//! - Overdue sweep and payment-completion status transitions
//! - CSV customer import with dedup, validation and error reporting
//! - CSV export, database backup/restore, demo-data seeding

pub mod backup;
pub mod billing;
pub mod config;
pub mod csvio;
pub mod customer;
pub mod export;
pub mod import;
pub mod policy;
pub mod seed;
pub mod storage;
pub mod ui;
pub mod validate;

// Re-exports for convenient access
pub use customer::{Customer, DrivingType, PaymentChannel};
pub use policy::{BillingCycle, PaymentMethod, Policy, PolicyStatus};
pub use storage::CrmStore;

/// Result type alias for Insurdesk operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Insurdesk operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Duplicate phone number: {0}")]
    DuplicatePhone(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
