//! CSV error/skip report for an import run

use std::path::Path;

use super::types::ImportErrorDetail;
use crate::Result;
use crate::csvio;

const REPORT_HEADERS: &[&str] = &[
    "type",
    "sheet",
    "row",
    "column",
    "error_code",
    "message",
    "value",
    "action_hint",
];

fn detail_record(kind: &str, detail: &ImportErrorDetail) -> Vec<String> {
    vec![
        kind.to_string(),
        detail.sheet.clone(),
        detail.row.to_string(),
        detail.column.clone(),
        detail.error_code.clone(),
        detail.message.clone(),
        detail.value.clone(),
        detail.action_hint.clone(),
    ]
}

/// Write all errors and skips of a run to a CSV file the agency can
/// open in Excel and work through row by row.
pub fn export_error_report(
    errors: &[ImportErrorDetail],
    skips: &[ImportErrorDetail],
    path: &Path,
) -> Result<()> {
    let mut records = vec![REPORT_HEADERS.iter().map(|h| h.to_string()).collect()];
    records.extend(errors.iter().map(|d| detail_record("ERROR", d)));
    records.extend(skips.iter().map(|d| detail_record("SKIP", d)));
    csvio::write_records(path, &records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_report_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.csv");

        let errors = vec![
            ImportErrorDetail::new("customers", 3, "phone", "E103", "invalid phone format", "힌트")
                .with_value("12-34"),
        ];
        let skips = vec![ImportErrorDetail::new(
            "customers",
            5,
            "phone+name",
            "E202",
            "existing customer kept as-is",
            "기존 고객은 수정하지 않고 유지됩니다",
        )];

        export_error_report(&errors, &skips, &path).unwrap();

        let records = csvio::read_records(&path).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0][0], "type");
        assert_eq!(records[1][0], "ERROR");
        assert_eq!(records[1][4], "E103");
        assert_eq!(records[1][6], "12-34");
        assert_eq!(records[2][0], "SKIP");
        assert_eq!(records[2][2], "5");
    }
}
