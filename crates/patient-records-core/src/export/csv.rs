//! CSV export of patient records.

use crate::models::Record;

/// Column headers, in output order.
pub const CSV_HEADERS: [&str; 4] = ["Name", "Reg No", "Hospital", "Date"];

/// Render `records` as CSV: a header row, then one line per record.
///
/// Lines are joined with `\n` and there is no trailing newline.
pub fn records_to_csv(records: &[Record]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_HEADERS.join(","));

    for record in records {
        lines.push(format!(
            "{},{},{},{}",
            escape_csv(&record.name),
            escape_csv(&record.reg_no),
            escape_csv(&record.hospital),
            escape_csv(&record.date),
        ));
    }

    lines.join("\n")
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, hospital: &str) -> Record {
        Record {
            id: "id".into(),
            name: name.into(),
            reg_no: "R1".into(),
            hospital: hospital.into(),
            date: "2024-01-05".into(),
        }
    }

    #[test]
    fn test_header_only() {
        assert_eq!(records_to_csv(&[]), "Name,Reg No,Hospital,Date");
    }

    #[test]
    fn test_records_csv() {
        let csv = records_to_csv(&[record("Ann", "St. Mary"), record("Bob", "City")]);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3); // Header + 2 records
        assert_eq!(lines[0], "Name,Reg No,Hospital,Date");
        assert_eq!(lines[1], "Ann,R1,St. Mary,2024-01-05");
        assert_eq!(lines[2], "Bob,R1,City,2024-01-05");
    }

    #[test]
    fn test_csv_escaping() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");

        let csv = records_to_csv(&[record("Doe, Jane", "City")]);
        assert!(csv.ends_with("\"Doe, Jane\",R1,City,2024-01-05"));
    }
}
