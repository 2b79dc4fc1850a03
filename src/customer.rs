//! Customer model - the aggregate root of the record store
//!
//! A customer owns zero or more policies (cascade-deleted with the
//! customer). Medical disclosure fields mirror the underwriting form:
//! comma-joined category lists plus boolean flags with free-text detail.

use crate::{Error, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Driving-risk classification for underwriting.
///
/// `commercial_detail` tags (`taxi,construction`) are only meaningful
/// when the classification is `Commercial`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DrivingType {
    /// Does not drive
    #[default]
    None,
    /// Personal vehicle
    Personal,
    /// Commercial driving (taxi, construction machinery, ...)
    Commercial,
}

impl DrivingType {
    /// Get the string representation stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            DrivingType::None => "none",
            DrivingType::Personal => "personal",
            DrivingType::Commercial => "commercial",
        }
    }

    /// Korean display label (as used on the agency's forms and exports)
    pub fn label(&self) -> &'static str {
        match self {
            DrivingType::None => "미운전",
            DrivingType::Personal => "자가용",
            DrivingType::Commercial => "영업용",
        }
    }

    /// Decode a database value. Legacy rows may hold NULL or junk;
    /// those decode as `None` rather than failing the whole read.
    pub fn from_db(s: &str) -> Self {
        s.parse().unwrap_or(DrivingType::None)
    }
}

impl FromStr for DrivingType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "" | "none" => Ok(DrivingType::None),
            "personal" => Ok(DrivingType::Personal),
            "commercial" => Ok(DrivingType::Commercial),
            other => Err(Error::InvalidValue(format!("unknown driving type: {}", other))),
        }
    }
}

impl std::fmt::Display for DrivingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Premium payment channel for the customer as a whole.
///
/// Stored under its Korean name, which is what the agency's spreadsheets
/// and forms use verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentChannel {
    /// 계좌이체 - bank transfer
    BankTransfer,
    /// 신용카드 - credit card
    CreditCard,
    /// 자동이체 - auto-debit
    AutoDebit,
}

impl PaymentChannel {
    /// Get the string representation stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentChannel::BankTransfer => "계좌이체",
            PaymentChannel::CreditCard => "신용카드",
            PaymentChannel::AutoDebit => "자동이체",
        }
    }

    /// All channels, for form pickers and validation
    pub fn all() -> &'static [PaymentChannel] {
        &[
            PaymentChannel::BankTransfer,
            PaymentChannel::CreditCard,
            PaymentChannel::AutoDebit,
        ]
    }
}

impl FromStr for PaymentChannel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "계좌이체" => Ok(PaymentChannel::BankTransfer),
            "신용카드" => Ok(PaymentChannel::CreditCard),
            "자동이체" => Ok(PaymentChannel::AutoDebit),
            other => Err(Error::InvalidValue(format!("unknown payment channel: {}", other))),
        }
    }
}

impl std::fmt::Display for PaymentChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A customer record.
///
/// `id`, `created_at` and `updated_at` are populated by the store;
/// callers leave them at their defaults on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Customer {
    pub id: Option<i64>,

    // Basic info
    pub name: String,
    /// Globally unique; acts as the natural key alongside name for dedup
    pub phone: String,
    /// Resident registration number, `######-#######` when present
    pub resident_id: String,
    /// `YYYY-MM-DD` when present
    pub birth_date: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub memo: Option<String>,
    pub occupation: Option<String>,

    // Insurance info
    pub driving_type: DrivingType,
    /// Comma-joined tags (`taxi,construction`); commercial drivers only
    pub commercial_detail: Option<String>,
    pub payment_channel: Option<PaymentChannel>,

    // Medical disclosure
    /// Comma-joined medication categories (고혈압,당뇨병, ...)
    pub med_medication: Option<String>,
    pub med_hospitalized: bool,
    pub med_hospital_detail: Option<String>,
    /// Saw a doctor within the last three months
    pub med_recent_exam: bool,
    pub med_recent_exam_detail: Option<String>,
    /// Comma-joined diagnoses within five years (암,뇌졸중, ...)
    pub med_5yr_diagnosis: Option<String>,
    pub med_5yr_custom: Option<String>,

    /// Free-text content disclosed to the insurer at signup
    pub notification_content: Option<String>,

    // System fields, owned by the store
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Customer {
    /// Create a customer with the two required fields
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            ..Default::default()
        }
    }

    /// Set the resident registration number
    pub fn with_resident_id(mut self, resident_id: impl Into<String>) -> Self {
        self.resident_id = resident_id.into();
        self
    }

    /// Set the driving classification
    pub fn with_driving_type(mut self, driving_type: DrivingType) -> Self {
        self.driving_type = driving_type;
        self
    }

    /// Set the premium payment channel
    pub fn with_payment_channel(mut self, channel: PaymentChannel) -> Self {
        self.payment_channel = Some(channel);
        self
    }

    /// Current local time in the store's timestamp format
    pub fn current_timestamp() -> String {
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
