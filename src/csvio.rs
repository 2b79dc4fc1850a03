//! Minimal CSV plumbing shared by import, export and report writing
//!
//! Handles quoted fields, embedded commas/quotes and CRLF. Files are
//! written with a UTF-8 BOM so Excel opens Korean text correctly.

use crate::Result;
use std::io::Write;
use std::path::Path;

/// UTF-8 byte order mark, prepended to every file we write for Excel
pub const UTF8_BOM: &str = "\u{feff}";

/// Quote a field if it needs quoting
pub fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Join fields into one CSV record (no trailing newline)
pub fn format_record(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|f| escape_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Split one CSV record into fields, honoring quotes
pub fn parse_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Read a CSV file into records, stripping a BOM and blank lines
pub fn read_records(path: &Path) -> Result<Vec<Vec<String>>> {
    let contents = std::fs::read_to_string(path)?;
    let contents = contents.strip_prefix(UTF8_BOM).unwrap_or(&contents);

    Ok(contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_record)
        .collect())
}

/// Write records to a CSV file with a BOM
pub fn write_records(path: &Path, records: &[Vec<String>]) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    write!(file, "{}", UTF8_BOM)?;
    for record in records {
        let fields: Vec<&str> = record.iter().map(String::as_str).collect();
        writeln!(file, "{}", format_record(&fields))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_plain() {
        assert_eq!(escape_field("홍길동"), "홍길동");
    }

    #[test]
    fn test_escape_comma_and_quote() {
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_parse_simple() {
        assert_eq!(parse_record("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_quoted() {
        assert_eq!(parse_record("\"a,b\",c"), vec!["a,b", "c"]);
        assert_eq!(parse_record("\"he said \"\"hi\"\"\",x"), vec!["he said \"hi\"", "x"]);
    }

    #[test]
    fn test_parse_trailing_empty() {
        assert_eq!(parse_record("a,,"), vec!["a", "", ""]);
    }

    #[test]
    fn test_round_trip_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("t.csv");
        let records = vec![
            vec!["name".to_string(), "memo".to_string()],
            vec!["김철수".to_string(), "특약, 포함".to_string()],
        ];
        write_records(&path, &records).unwrap();
        assert_eq!(read_records(&path).unwrap(), records);
    }
}
