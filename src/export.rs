//! Customer CSV export - Korean-labelled, human-facing dump
//!
//! Read-only convenience for the agency: every customer field, with the
//! enumerations rendered as the Korean labels used on the paper forms.
//! No round-trip requirement; the import pipeline has its own template.

use std::path::Path;

use crate::Result;
use crate::csvio;
use crate::customer::Customer;

const EXPORT_HEADERS: &[&str] = &[
    "이름",
    "전화번호",
    "주민등록번호",
    "생년월일",
    "주소",
    "이메일",
    "직업",
    "운전여부",
    "영업상세",
    "입금방식",
    "약복용",
    "입원여부",
    "입원상세",
    "5년진단",
    "고지내용",
    "메모",
    "생성일시",
    "수정일시",
];

fn commercial_detail_label(detail: &str) -> String {
    detail
        .split(',')
        .map(|tag| match tag.trim() {
            "taxi" => "택시",
            "construction" => "건설용",
            other => other,
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn customer_record(customer: &Customer) -> Vec<String> {
    let opt = |value: &Option<String>| value.clone().unwrap_or_default();

    vec![
        customer.name.clone(),
        customer.phone.clone(),
        customer.resident_id.clone(),
        opt(&customer.birth_date),
        opt(&customer.address),
        opt(&customer.email),
        opt(&customer.occupation),
        customer.driving_type.label().to_string(),
        customer
            .commercial_detail
            .as_deref()
            .map(commercial_detail_label)
            .unwrap_or_default(),
        customer
            .payment_channel
            .map(|c| c.as_str().to_string())
            .unwrap_or_default(),
        opt(&customer.med_medication),
        if customer.med_hospitalized { "있음" } else { "없음" }.to_string(),
        opt(&customer.med_hospital_detail),
        opt(&customer.med_5yr_diagnosis),
        opt(&customer.notification_content),
        opt(&customer.memo),
        opt(&customer.created_at),
        opt(&customer.updated_at),
    ]
}

/// Write all customers to a CSV file (UTF-8 BOM for Excel)
pub fn export_to_csv(customers: &[Customer], path: &Path) -> Result<()> {
    let mut records = vec![EXPORT_HEADERS.iter().map(|h| h.to_string()).collect()];
    records.extend(customers.iter().map(customer_record));
    csvio::write_records(path, &records)
}
