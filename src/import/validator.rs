//! Per-row validation for imported customers

use super::normalizer::{normalize_name, normalize_phone};
use super::reader::{CUSTOMER_SHEET_NAME, RawCustomerRow};
use super::types::ImportErrorDetail;

const ALLOWED_PAYMENT_METHODS: &[&str] = &["", "계좌이체", "신용카드", "자동이체"];
const ALLOWED_DRIVING_TYPES: &[&str] = &["", "none", "personal", "commercial"];

/// Check one raw row. Returns every problem found, not just the first.
pub fn validate_customer_row(row: &RawCustomerRow) -> Vec<ImportErrorDetail> {
    let mut errors = Vec::new();

    let name = normalize_name(&row.name);
    let phone = normalize_phone(&row.phone);
    let payment_method = row.payment_method.trim();
    let driving_type = row.driving_type.trim();

    if name.is_empty() {
        errors.push(ImportErrorDetail::new(
            CUSTOMER_SHEET_NAME,
            row.row_number,
            "name",
            "E101",
            "name is required",
            "고객 이름을 입력하세요",
        ));
    }

    if phone.is_empty() {
        errors.push(ImportErrorDetail::new(
            CUSTOMER_SHEET_NAME,
            row.row_number,
            "phone",
            "E102",
            "phone is required",
            "전화번호를 입력하세요",
        ));
    } else if phone.len() != 10 && phone.len() != 11 {
        errors.push(
            ImportErrorDetail::new(
                CUSTOMER_SHEET_NAME,
                row.row_number,
                "phone",
                "E103",
                "invalid phone format",
                "01012345678 형태로 입력하세요",
            )
            .with_value(&row.phone),
        );
    }

    if !ALLOWED_PAYMENT_METHODS.contains(&payment_method) {
        errors.push(
            ImportErrorDetail::new(
                CUSTOMER_SHEET_NAME,
                row.row_number,
                "payment_method",
                "E104",
                "invalid payment_method",
                "계좌이체/신용카드/자동이체 중 선택하세요",
            )
            .with_value(payment_method),
        );
    }

    if !ALLOWED_DRIVING_TYPES.contains(&driving_type) {
        errors.push(
            ImportErrorDetail::new(
                CUSTOMER_SHEET_NAME,
                row.row_number,
                "driving_type",
                "E105",
                "invalid driving_type",
                "none/personal/commercial 중 선택하세요",
            )
            .with_value(driving_type),
        );
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, phone: &str) -> RawCustomerRow {
        RawCustomerRow {
            row_number: 2,
            name: name.to_string(),
            phone: phone.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_row() {
        assert!(validate_customer_row(&row("김철수", "010-1234-5678")).is_empty());
    }

    #[test]
    fn test_missing_name_and_phone() {
        let errors = validate_customer_row(&row("", ""));
        let codes: Vec<&str> = errors.iter().map(|e| e.error_code.as_str()).collect();
        assert_eq!(codes, vec!["E101", "E102"]);
    }

    #[test]
    fn test_short_phone() {
        let errors = validate_customer_row(&row("김철수", "010-1234"));
        assert_eq!(errors[0].error_code, "E103");
        assert_eq!(errors[0].value, "010-1234");
    }

    #[test]
    fn test_invalid_payment_method() {
        let mut r = row("김철수", "010-1234-5678");
        r.payment_method = "현금".to_string();
        let errors = validate_customer_row(&r);
        assert_eq!(errors[0].error_code, "E104");
    }

    #[test]
    fn test_invalid_driving_type() {
        let mut r = row("김철수", "010-1234-5678");
        r.driving_type = "비행기".to_string();
        let errors = validate_customer_row(&r);
        assert_eq!(errors[0].error_code, "E105");
    }

    #[test]
    fn test_blank_optionals_allowed() {
        let mut r = row("김철수", "010-1234-5678");
        r.payment_method = String::new();
        r.driving_type = String::new();
        assert!(validate_customer_row(&r).is_empty());
    }
}
