//! Customer sheet reader - fixed header contract with Korean aliases
//!
//! The import file is a CSV whose first record is the header row. Header
//! names are matched case-insensitively and common Korean labels are
//! accepted as aliases. Unknown columns are ignored; blank rows are
//! skipped.

use std::path::Path;

use super::types::ImportErrorDetail;
use crate::csvio;
use crate::Result;

pub const CUSTOMER_SHEET_NAME: &str = "customers";

/// Canonical header order, also used by the template writer
pub const CUSTOMER_HEADERS: &[&str] = &[
    "name",
    "phone",
    "resident_id",
    "address",
    "occupation",
    "driving_type",
    "payment_method",
    "memo",
];

/// One raw input row, untyped until validation
#[derive(Debug, Clone, Default)]
pub struct RawCustomerRow {
    /// 1-based line number in the file, for error reporting
    pub row_number: usize,
    pub name: String,
    pub phone: String,
    pub resident_id: String,
    pub address: String,
    pub occupation: String,
    pub driving_type: String,
    pub payment_method: String,
    pub memo: String,
}

fn canonical_header(header: &str) -> Option<&'static str> {
    let trimmed = header.trim();
    let lowered = trimmed.to_lowercase();
    match (trimmed, lowered.as_str()) {
        ("이름", _) | ("성명", _) | (_, "name") => Some("name"),
        ("전화번호", _) | ("연락처", _) | (_, "phone") => Some("phone"),
        ("주민번호", _) | ("주민등록번호", _) | (_, "resident_id") => Some("resident_id"),
        ("주소", _) | (_, "address") => Some("address"),
        ("직업", _) | (_, "occupation") => Some("occupation"),
        ("운전여부", _) | (_, "driving_type") => Some("driving_type"),
        ("입금방식", _) | (_, "payment_method") => Some("payment_method"),
        ("메모", _) | (_, "memo") => Some("memo"),
        _ => None,
    }
}

/// Read the customer sheet. File-shape problems come back as error
/// details (never a raw panic up into the caller), matching the error
/// codes the report format documents.
pub fn read_customer_sheet(path: &Path) -> (Vec<RawCustomerRow>, Vec<ImportErrorDetail>) {
    let mut errors = Vec::new();

    let records = match csvio::read_records(path) {
        Ok(records) => records,
        Err(e) => {
            errors.push(
                ImportErrorDetail::new(
                    CUSTOMER_SHEET_NAME,
                    1,
                    "sheet",
                    "E001",
                    "failed to read import file",
                    "파일 경로와 형식을 확인해주세요",
                )
                .with_value(e.to_string()),
            );
            return (Vec::new(), errors);
        }
    };

    if records.is_empty() {
        errors.push(ImportErrorDetail::new(
            CUSTOMER_SHEET_NAME,
            1,
            "header",
            "E002",
            "header row is missing",
            "템플릿 헤더를 유지해주세요",
        ));
        return (Vec::new(), errors);
    }

    let header_map: Vec<Option<&'static str>> = records[0]
        .iter()
        .map(|h| canonical_header(h))
        .collect();
    let has = |key: &str| header_map.iter().any(|h| *h == Some(key));

    if !has("name") || !has("phone") {
        errors.push(ImportErrorDetail::new(
            CUSTOMER_SHEET_NAME,
            1,
            "header",
            "E003",
            "required headers(name, phone) are missing",
            "템플릿 헤더를 수정하지 마세요",
        ));
        return (Vec::new(), errors);
    }

    let mut rows = Vec::new();
    for (idx, record) in records.iter().enumerate().skip(1) {
        if record.iter().all(|v| v.trim().is_empty()) {
            continue;
        }

        let mut row = RawCustomerRow {
            row_number: idx + 1,
            ..Default::default()
        };
        for (col, value) in record.iter().enumerate() {
            let value = value.trim().to_string();
            match header_map.get(col).copied().flatten() {
                Some("name") => row.name = value,
                Some("phone") => row.phone = value,
                Some("resident_id") => row.resident_id = value,
                Some("address") => row.address = value,
                Some("occupation") => row.occupation = value,
                Some("driving_type") => row.driving_type = value,
                Some("payment_method") => row.payment_method = value,
                Some("memo") => row.memo = value,
                _ => {}
            }
        }
        rows.push(row);
    }

    (rows, errors)
}

/// Write an empty import template with one example row
pub fn write_customer_template(path: &Path) -> Result<()> {
    let header: Vec<String> = CUSTOMER_HEADERS.iter().map(|h| h.to_string()).collect();
    let example = vec![
        "홍길동".to_string(),
        "010-1234-5678".to_string(),
        "900101-1234567".to_string(),
        "서울시 강남구".to_string(),
        "회사원".to_string(),
        "personal".to_string(),
        "신용카드".to_string(),
        String::new(),
    ];
    csvio::write_records(path, &[header, example])
}
