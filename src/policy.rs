//! Policy model - one insurance contract owned by exactly one customer
//!
//! Policies carry the recurring billing parameters (cycle, billing day)
//! that the date engine in [`crate::billing`] consumes. Card-paid
//! policies additionally carry card details and participate in automatic
//! overdue detection; transfer-paid policies are assumed self-executing.

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Maximum accepted premium in won (flat integer, no currency math)
pub const MAX_PREMIUM: i64 = 100_000_000;

/// How this policy's premium is collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Charged to a registered card; tracked by the overdue sweep
    Card,
    /// Bank transfer / auto-debit; excluded from delinquency tracking
    Transfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Transfer => "transfer",
        }
    }

    /// Decode a database value, defaulting to transfer for legacy junk
    /// so an unreadable row never enters the delinquency pipeline.
    pub fn from_db(s: &str) -> Self {
        s.parse().unwrap_or(PaymentMethod::Transfer)
    }
}

impl FromStr for PaymentMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "card" => Ok(PaymentMethod::Card),
            "transfer" => Ok(PaymentMethod::Transfer),
            other => Err(Error::InvalidValue(format!("unknown payment method: {}", other))),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recurrence unit for premium due dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    #[default]
    Monthly,
    Yearly,
}

impl BillingCycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "monthly",
            BillingCycle::Yearly => "yearly",
        }
    }

    /// Decode a database value.
    ///
    /// Unknown cycle strings decode as monthly with a warning. The typed
    /// API is a strict enum, so the lenient fallback exists only at this
    /// boundary, for rows written before the cycle column was policed.
    pub fn from_db(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| {
            tracing::warn!("unknown billing cycle {:?} in database, treating as monthly", s);
            BillingCycle::Monthly
        })
    }
}

impl FromStr for BillingCycle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "monthly" => Ok(BillingCycle::Monthly),
            "yearly" => Ok(BillingCycle::Yearly),
            other => Err(Error::InvalidValue(format!("unknown billing cycle: {}", other))),
        }
    }
}

impl std::fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment standing of a policy.
///
/// `Active -> Overdue` happens only through the automatic sweep (card
/// policies whose next payment date has passed). `Overdue -> Active`
/// happens only through explicit payment completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PolicyStatus {
    #[default]
    Active,
    Overdue,
}

impl PolicyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyStatus::Active => "active",
            PolicyStatus::Overdue => "overdue",
        }
    }

    /// Decode a database value, treating junk as active
    pub fn from_db(s: &str) -> Self {
        s.parse().unwrap_or(PolicyStatus::Active)
    }
}

impl FromStr for PolicyStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "active" => Ok(PolicyStatus::Active),
            "overdue" => Ok(PolicyStatus::Overdue),
            other => Err(Error::InvalidValue(format!("unknown policy status: {}", other))),
        }
    }
}

impl std::fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One insurance contract.
///
/// `next_payment_date` may be left `None` on insert; the store computes
/// it from the contract start date, cycle and billing day before the row
/// is written, so it is never null once persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub id: Option<i64>,
    pub customer_id: i64,

    pub insurer: String,
    pub product_name: String,
    /// Flat premium in won, positive and at most [`MAX_PREMIUM`]
    pub premium: i64,

    pub payment_method: PaymentMethod,
    pub billing_cycle: BillingCycle,
    /// Target day-of-month (1-31), clamped to shorter months
    pub billing_day: u32,

    // Card details, populated only when payment_method is Card
    pub card_issuer: Option<String>,
    pub card_number: Option<String>,
    /// `MM/YY`
    pub card_expiry: Option<String>,

    pub contract_start_date: NaiveDate,
    pub contract_end_date: Option<NaiveDate>,

    pub status: PolicyStatus,
    pub next_payment_date: Option<NaiveDate>,
    pub last_payment_date: Option<NaiveDate>,

    pub memo: Option<String>,

    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Policy {
    /// Create a policy with the required contract fields
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        customer_id: i64,
        insurer: impl Into<String>,
        product_name: impl Into<String>,
        premium: i64,
        payment_method: PaymentMethod,
        billing_cycle: BillingCycle,
        billing_day: u32,
        contract_start_date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            customer_id,
            insurer: insurer.into(),
            product_name: product_name.into(),
            premium,
            payment_method,
            billing_cycle,
            billing_day,
            card_issuer: None,
            card_number: None,
            card_expiry: None,
            contract_start_date,
            contract_end_date: None,
            status: PolicyStatus::Active,
            next_payment_date: None,
            last_payment_date: None,
            memo: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Attach card details (card-paid policies only)
    pub fn with_card(
        mut self,
        issuer: impl Into<String>,
        number: impl Into<String>,
        expiry: impl Into<String>,
    ) -> Self {
        self.card_issuer = Some(issuer.into());
        self.card_number = Some(number.into());
        self.card_expiry = Some(expiry.into());
        self
    }

    /// Set an explicit next payment date, overriding auto-computation
    pub fn with_next_payment_date(mut self, date: NaiveDate) -> Self {
        self.next_payment_date = Some(date);
        self
    }

    /// Set the contract end date
    pub fn with_end_date(mut self, date: NaiveDate) -> Self {
        self.contract_end_date = Some(date);
        self
    }
}
