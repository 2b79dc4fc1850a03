//! Input validation - format checks applied before any write
//!
//! The store only enforces the constraints the schema declares (unique
//! phone, foreign keys); everything business-format-shaped is checked
//! here, each failure with a human-readable message for the form or
//! import layer to display.

use crate::policy::MAX_PREMIUM;
use crate::{Error, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // With or without hyphens: 010-1234-5678, 01012345678, 02-1234-5678
    RE.get_or_init(|| Regex::new(r"^\d{2,3}-?\d{3,4}-?\d{4}$").expect("valid regex"))
}

fn resident_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{6}-\d{7}$").expect("valid regex"))
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid regex")
    })
}

fn card_expiry_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(0[1-9]|1[0-2])/\d{2}$").expect("valid regex"))
}

/// Name is required and must be non-blank
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation("이름은 필수 항목입니다".to_string()));
    }
    Ok(())
}

/// Phone is required; hyphens optional
pub fn validate_phone(phone: &str) -> Result<()> {
    if phone.trim().is_empty() {
        return Err(Error::Validation("전화번호는 필수 항목입니다".to_string()));
    }
    if !phone_re().is_match(phone.trim()) {
        return Err(Error::Validation(
            "유효하지 않은 전화번호 형식입니다 (예: 010-1234-5678)".to_string(),
        ));
    }
    Ok(())
}

/// Resident registration number, `######-#######`. Blank is allowed;
/// content is optional but the format is not.
pub fn validate_resident_id(resident_id: &str) -> Result<()> {
    if resident_id.trim().is_empty() {
        return Ok(());
    }
    if !resident_id_re().is_match(resident_id.trim()) {
        return Err(Error::Validation(
            "유효하지 않은 주민등록번호 형식입니다 (예: 900115-1234567)".to_string(),
        ));
    }
    Ok(())
}

/// Email is optional; format checked only when present
pub fn validate_email(email: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Ok(());
    }
    if !email_re().is_match(email.trim()) {
        return Err(Error::Validation(
            "유효하지 않은 이메일 형식입니다 (예: example@email.com)".to_string(),
        ));
    }
    Ok(())
}

/// `YYYY-MM-DD`, must be a real calendar date; blank is allowed
pub fn validate_date(date_str: &str) -> Result<()> {
    if date_str.trim().is_empty() {
        return Ok(());
    }
    parse_date(date_str).map(|_| ())
}

/// Parse a required `YYYY-MM-DD` date
pub fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidDate(format!("날짜 형식이 올바르지 않습니다: {}", date_str)))
}

/// Premium must be a positive flat amount within range
pub fn validate_premium(premium: i64) -> Result<()> {
    if premium <= 0 {
        return Err(Error::Validation("보험료는 0보다 커야 합니다".to_string()));
    }
    if premium > MAX_PREMIUM {
        return Err(Error::Validation(format!(
            "보험료는 {}원을 초과할 수 없습니다",
            MAX_PREMIUM
        )));
    }
    Ok(())
}

/// Billing day targets a day-of-month; months shorter than the target
/// clamp at payment time, so 29-31 are all legal here
pub fn validate_billing_day(day: u32) -> Result<()> {
    if !(1..=31).contains(&day) {
        return Err(Error::Validation(
            "납부일은 1일부터 31일 사이여야 합니다".to_string(),
        ));
    }
    Ok(())
}

/// 16 digits, hyphens allowed between groups
pub fn validate_card_number(number: &str) -> Result<()> {
    let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
    let separators_only = number
        .chars()
        .all(|c| c.is_ascii_digit() || c == '-' || c == ' ');
    if digits.len() != 16 || !separators_only {
        return Err(Error::Validation(
            "카드번호는 16자리 숫자여야 합니다".to_string(),
        ));
    }
    Ok(())
}

/// Card expiry in `MM/YY`
pub fn validate_card_expiry(expiry: &str) -> Result<()> {
    if !card_expiry_re().is_match(expiry.trim()) {
        return Err(Error::Validation(
            "카드 유효기간 형식이 올바르지 않습니다 (예: 12/26)".to_string(),
        ));
    }
    Ok(())
}

/// Contract end date must not precede the start date
pub fn validate_date_order(start: NaiveDate, end: Option<NaiveDate>) -> Result<()> {
    if let Some(end) = end {
        if end < start {
            return Err(Error::Validation(
                "계약 종료일은 시작일보다 빠를 수 없습니다".to_string(),
            ));
        }
    }
    Ok(())
}

/// Validate all format rules of a policy before it reaches the store
pub fn validate_policy(policy: &crate::policy::Policy) -> Result<()> {
    validate_premium(policy.premium)?;
    validate_billing_day(policy.billing_day)?;
    validate_date_order(policy.contract_start_date, policy.contract_end_date)?;

    if policy.payment_method == crate::policy::PaymentMethod::Card {
        if let Some(number) = &policy.card_number {
            validate_card_number(number)?;
        }
        if let Some(expiry) = &policy.card_expiry {
            validate_card_expiry(expiry)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_formats() {
        assert!(validate_phone("010-1234-5678").is_ok());
        assert!(validate_phone("01012345678").is_ok());
        assert!(validate_phone("02-1234-5678").is_ok());
        assert!(validate_phone("").is_err());
        assert!(validate_phone("invalid").is_err());
        assert!(validate_phone("010-12-34").is_err());
    }

    #[test]
    fn test_resident_id() {
        assert!(validate_resident_id("900115-1234567").is_ok());
        assert!(validate_resident_id("").is_ok());
        assert!(validate_resident_id("900115").is_err());
        assert!(validate_resident_id("9001151234567").is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("").is_ok());
        assert!(validate_email("invalid").is_err());
    }

    #[test]
    fn test_date() {
        assert!(validate_date("1990-01-15").is_ok());
        assert!(validate_date("").is_ok());
        assert!(validate_date("2023-13-01").is_err());
        assert!(validate_date("2026-02-30").is_err());
        assert!(validate_date("15-01-1990").is_err());
    }

    #[test]
    fn test_premium_range() {
        assert!(validate_premium(1).is_ok());
        assert!(validate_premium(MAX_PREMIUM).is_ok());
        assert!(validate_premium(0).is_err());
        assert!(validate_premium(-100).is_err());
        assert!(validate_premium(MAX_PREMIUM + 1).is_err());
    }

    #[test]
    fn test_billing_day_range() {
        assert!(validate_billing_day(1).is_ok());
        assert!(validate_billing_day(31).is_ok());
        assert!(validate_billing_day(0).is_err());
        assert!(validate_billing_day(32).is_err());
    }

    #[test]
    fn test_card_number() {
        assert!(validate_card_number("1234-5678-9012-3456").is_ok());
        assert!(validate_card_number("1234567890123456").is_ok());
        assert!(validate_card_number("1234-5678-9012").is_err());
        assert!(validate_card_number("1234-5678-9012-345x").is_err());
    }

    #[test]
    fn test_card_expiry() {
        assert!(validate_card_expiry("12/26").is_ok());
        assert!(validate_card_expiry("01/30").is_ok());
        assert!(validate_card_expiry("13/26").is_err());
        assert!(validate_card_expiry("1226").is_err());
        assert!(validate_card_expiry("00/26").is_err());
    }

    #[test]
    fn test_date_order() {
        let start = "2026-01-01".parse().unwrap();
        let end = "2026-12-31".parse().unwrap();
        assert!(validate_date_order(start, Some(end)).is_ok());
        assert!(validate_date_order(start, Some(start)).is_ok());
        assert!(validate_date_order(end, Some(start)).is_err());
        assert!(validate_date_order(start, None).is_ok());
    }

    #[test]
    fn test_validate_policy() {
        use crate::policy::{BillingCycle, PaymentMethod, Policy};

        let good = Policy::new(
            1,
            "삼성생명",
            "종신보험",
            50_000,
            PaymentMethod::Card,
            BillingCycle::Monthly,
            25,
            "2026-01-01".parse().unwrap(),
        )
        .with_card("신한카드", "1234-5678-9012-3456", "12/26");
        assert!(validate_policy(&good).is_ok());

        let mut bad = good.clone();
        bad.card_expiry = Some("26/12".to_string());
        assert!(validate_policy(&bad).is_err());
    }
}
