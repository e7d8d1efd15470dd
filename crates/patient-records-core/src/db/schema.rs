//! SQLite schema definition.

/// Complete database schema for patient records.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Patient Records
-- ============================================================================

-- Business columns are nullable: rows written by older clients may be
-- incomplete, and readers treat NULL as blank.
CREATE TABLE IF NOT EXISTS patient_records (
    id TEXT PRIMARY KEY,
    name TEXT,
    reg_no TEXT,
    hospital TEXT,
    visit_date TEXT,                             -- ISO YYYY-MM-DD
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_records_hospital ON patient_records(hospital);
CREATE INDEX IF NOT EXISTS idx_records_visit_date ON patient_records(visit_date);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }

    #[test]
    fn test_id_is_unique() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        conn.execute("INSERT INTO patient_records (id, name) VALUES ('a', 'Ann')", [])
            .unwrap();
        let result = conn.execute("INSERT INTO patient_records (id, name) VALUES ('a', 'Bob')", []);
        assert!(result.is_err());
    }
}
