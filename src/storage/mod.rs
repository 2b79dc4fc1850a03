//! Storage layer - SQLite-backed persistence
//!
//! System of record is a single SQLite file with two tables:
//! - customers(id, name, phone, resident_id, ..., created_at, updated_at)
//! - policies(id, customer_id, insurer, premium, billing_cycle, billing_day,
//!   status, next_payment_date, ...) with ON DELETE CASCADE to customers
//!
//! The billing-date engine rules (next payment computation, overdue
//! sweep, payment completion) are applied here on every relevant write.

pub mod schema;
pub mod sqlite;

pub use sqlite::{CrmStore, DbStats, OverduePolicy, UpcomingPayment};
