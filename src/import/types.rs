//! Import result types - summary, per-row results and error details

use serde::{Deserialize, Serialize};

/// Dedup key for a customer: normalized phone + normalized name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomerKey {
    pub normalized_phone: String,
    pub normalized_name: String,
}

impl CustomerKey {
    /// Flat string form used in reports and set membership
    pub fn value(&self) -> String {
        format!("{}|{}", self.normalized_phone, self.normalized_name)
    }
}

/// Outcome of one input row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    Success,
    Skip,
    Fail,
}

impl RowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowStatus::Success => "success",
            RowStatus::Skip => "skip",
            RowStatus::Fail => "fail",
        }
    }
}

/// A problem (or deliberate skip) tied to a specific sheet cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportErrorDetail {
    pub sheet: String,
    pub row: usize,
    pub column: String,
    pub error_code: String,
    pub message: String,
    pub value: String,
    pub action_hint: String,
}

impl ImportErrorDetail {
    pub fn new(
        sheet: &str,
        row: usize,
        column: &str,
        error_code: &str,
        message: &str,
        action_hint: &str,
    ) -> Self {
        Self {
            sheet: sheet.to_string(),
            row,
            column: column.to_string(),
            error_code: error_code.to_string(),
            message: message.to_string(),
            value: String::new(),
            action_hint: action_hint.to_string(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

/// Per-row processing record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRowResult {
    pub status: RowStatus,
    pub row: usize,
    pub key: String,
    pub customer_id: Option<i64>,
    pub reason_code: String,
    pub reason_message: String,
}

impl ImportRowResult {
    pub fn success(row: usize, key: &str, customer_id: Option<i64>) -> Self {
        Self {
            status: RowStatus::Success,
            row,
            key: key.to_string(),
            customer_id,
            reason_code: String::new(),
            reason_message: String::new(),
        }
    }

    pub fn skip(row: usize, key: &str, detail: &ImportErrorDetail) -> Self {
        Self {
            status: RowStatus::Skip,
            row,
            key: key.to_string(),
            customer_id: None,
            reason_code: detail.error_code.clone(),
            reason_message: detail.message.clone(),
        }
    }

    pub fn fail(row: usize, key: &str, detail: &ImportErrorDetail) -> Self {
        Self {
            status: RowStatus::Fail,
            row,
            key: key.to_string(),
            customer_id: None,
            reason_code: detail.error_code.clone(),
            reason_message: detail.message.clone(),
        }
    }
}

/// Structured result of one import run (preview or commit)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total_rows: usize,
    pub success_count: usize,
    pub skip_count: usize,
    pub fail_count: usize,
    pub results: Vec<ImportRowResult>,
    pub errors: Vec<ImportErrorDetail>,
    pub skips: Vec<ImportErrorDetail>,
}
