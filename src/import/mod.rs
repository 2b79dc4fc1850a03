//! Customer import service
//!
//! Reads a tabular customer file, validates each row, dedups against the
//! store by normalized (phone, name) key and inserts only genuinely new
//! customers. Existing customers are never overwritten by an import.
//!
//! `preview` runs the whole pipeline without writing; `commit` writes.
//! Both return the same [`ImportSummary`] shape.

pub mod normalizer;
pub mod reader;
pub mod report;
pub mod types;
pub mod validator;

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::customer::Customer;
use crate::storage::CrmStore;
use crate::{Error, Result};
use normalizer::{build_customer_key, normalize_name, normalize_phone};
use reader::{CUSTOMER_SHEET_NAME, RawCustomerRow, read_customer_sheet};
use types::{ImportErrorDetail, ImportRowResult, ImportSummary};
use validator::validate_customer_row;

pub use reader::write_customer_template;
pub use report::export_error_report;

/// Customer import over a [`CrmStore`]
pub struct CustomerImportService<'a> {
    store: &'a CrmStore,
}

impl<'a> CustomerImportService<'a> {
    pub fn new(store: &'a CrmStore) -> Self {
        Self { store }
    }

    /// Dry run: validate and dedup, write nothing
    pub fn preview(&self, path: &Path) -> Result<ImportSummary> {
        self.process(path, false)
    }

    /// Full run: insert every importable row
    pub fn commit(&self, path: &Path) -> Result<ImportSummary> {
        self.process(path, true)
    }

    fn process(&self, path: &Path, commit: bool) -> Result<ImportSummary> {
        let mut summary = ImportSummary::default();

        let (rows, read_errors) = read_customer_sheet(path);
        summary.total_rows = rows.len();

        if !read_errors.is_empty() {
            summary.fail_count = read_errors.len();
            summary.errors = read_errors;
            return Ok(summary);
        }

        // Snapshot the existing customer keys once up front
        let mut existing_keys: HashSet<String> = HashSet::new();
        let mut phone_to_name: HashMap<String, String> = HashMap::new();
        for customer in self.store.get_all_customers()? {
            let key = build_customer_key(&customer.name, &customer.phone);
            phone_to_name.insert(key.normalized_phone.clone(), key.normalized_name.clone());
            existing_keys.insert(key.value());
        }

        let mut seen_file_keys: HashSet<String> = HashSet::new();

        for row in &rows {
            let row_errors = validate_customer_row(row);
            if let Some(first) = row_errors.first() {
                summary
                    .results
                    .push(ImportRowResult::fail(row.row_number, "", first));
                summary.errors.extend(row_errors);
                summary.fail_count += 1;
                continue;
            }

            let key = build_customer_key(&row.name, &row.phone);
            let key_value = key.value();
            let phone = normalize_phone(&row.phone);
            let name = normalize_name(&row.name);

            if seen_file_keys.contains(&key_value) {
                let detail = ImportErrorDetail::new(
                    CUSTOMER_SHEET_NAME,
                    row.row_number,
                    "phone+name",
                    "E201",
                    "duplicate key inside file",
                    "동일 고객행을 하나만 남겨주세요",
                )
                .with_value(&key_value);
                summary
                    .results
                    .push(ImportRowResult::fail(row.row_number, &key_value, &detail));
                summary.errors.push(detail);
                summary.fail_count += 1;
                continue;
            }
            seen_file_keys.insert(key_value.clone());

            // Same phone, different name: the unique constraint would
            // reject it anyway, but this is a data problem worth its own
            // code and hint.
            if phone_to_name.get(&phone).is_some_and(|n| *n != name) {
                let detail = ImportErrorDetail::new(
                    CUSTOMER_SHEET_NAME,
                    row.row_number,
                    "phone",
                    "E106",
                    "phone already exists with different name",
                    "기존 고객명과 전화번호 조합을 확인하세요",
                )
                .with_value(&row.phone);
                summary
                    .results
                    .push(ImportRowResult::fail(row.row_number, &key_value, &detail));
                summary.errors.push(detail);
                summary.fail_count += 1;
                continue;
            }

            if existing_keys.contains(&key_value) {
                let detail = ImportErrorDetail::new(
                    CUSTOMER_SHEET_NAME,
                    row.row_number,
                    "phone+name",
                    "E202",
                    "existing customer kept as-is",
                    "기존 고객은 수정하지 않고 유지됩니다",
                )
                .with_value(&key_value);
                summary
                    .results
                    .push(ImportRowResult::skip(row.row_number, &key_value, &detail));
                summary.skips.push(detail);
                summary.skip_count += 1;
                continue;
            }

            if !commit {
                summary
                    .results
                    .push(ImportRowResult::success(row.row_number, &key_value, None));
                summary.success_count += 1;
                continue;
            }

            match self.store.add_customer(&customer_from_row(row)) {
                Ok(customer_id) => {
                    existing_keys.insert(key_value.clone());
                    phone_to_name.insert(phone, name);
                    summary.results.push(ImportRowResult::success(
                        row.row_number,
                        &key_value,
                        Some(customer_id),
                    ));
                    summary.success_count += 1;
                }
                Err(e @ (Error::DuplicatePhone(_) | Error::Storage(_))) => {
                    let detail = ImportErrorDetail::new(
                        CUSTOMER_SHEET_NAME,
                        row.row_number,
                        "db",
                        "E901",
                        "failed to insert customer",
                        "입력값 및 중복 데이터를 확인하세요",
                    )
                    .with_value(e.to_string());
                    summary
                        .results
                        .push(ImportRowResult::fail(row.row_number, &key_value, &detail));
                    summary.errors.push(detail);
                    summary.fail_count += 1;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(summary)
    }
}

fn customer_from_row(row: &RawCustomerRow) -> Customer {
    let non_empty = |s: &str| {
        let trimmed = s.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    };

    Customer {
        name: normalize_name(&row.name),
        phone: normalize_phone(&row.phone),
        resident_id: row.resident_id.trim().to_string(),
        address: non_empty(&row.address),
        occupation: non_empty(&row.occupation),
        driving_type: crate::customer::DrivingType::from_db(row.driving_type.trim()),
        payment_channel: row.payment_method.trim().parse().ok(),
        memo: non_empty(&row.memo),
        ..Default::default()
    }
}
