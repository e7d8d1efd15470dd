//! Patient record database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::{NewRecord, Record};
use crate::store::{RecordStore, StoreError, StoreResult};

const SELECT_COLUMNS: &str = "SELECT id, name, reg_no, hospital, visit_date FROM patient_records";

impl Database {
    /// Insert a record.
    pub fn insert_record(&self, record: &Record) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO patient_records (id, name, reg_no, hospital, visit_date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                record.id,
                record.name,
                record.reg_no,
                record.hospital,
                record.date,
            ],
        )?;
        Ok(())
    }

    /// Get a record by ID.
    pub fn get_record(&self, id: &str) -> DbResult<Option<Record>> {
        self.conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?"),
                [id],
                record_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all records in insertion order.
    pub fn list_records(&self) -> DbResult<Vec<Record>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_COLUMNS} ORDER BY rowid"))?;
        let rows = stmt.query_map([], record_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a record.
    pub fn delete_record_by_id(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM patient_records WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<Record> {
    Ok(Record {
        id: row.get(0)?,
        name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        reg_no: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        hospital: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        date: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
    })
}

impl RecordStore for Database {
    fn create_record(&self, fields: &NewRecord) -> StoreResult<Record> {
        let fields = fields
            .clone()
            .validate()
            .map_err(|e| StoreError::Rejected(e.to_string()))?;
        let record = Record::from_new(uuid::Uuid::new_v4().to_string(), fields);
        self.insert_record(&record)?;
        tracing::debug!(id = %record.id, "Stored patient record");
        Ok(record)
    }

    fn list_all_records(&self) -> StoreResult<Vec<Record>> {
        Ok(self.list_records()?)
    }

    fn delete_record(&self, id: &str) -> StoreResult<()> {
        if self.delete_record_by_id(id)? {
            tracing::debug!(id, "Deleted patient record");
            Ok(())
        } else {
            Err(StoreError::NotFound(id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn fields(name: &str, date: &str) -> NewRecord {
        NewRecord::new(name, "R1", "St. Mary", date)
    }

    #[test]
    fn test_create_and_get() {
        let db = setup_db();

        let record = db.create_record(&fields("Ann", "2024-01-05")).unwrap();
        assert_eq!(record.id.len(), 36); // UUID format

        let retrieved = db.get_record(&record.id).unwrap().unwrap();
        assert_eq!(retrieved, record);
    }

    #[test]
    fn test_create_rejects_blank_fields() {
        let db = setup_db();

        let result = db.create_record(&NewRecord::new("Ann", "R1", "", "2024-01-05"));
        assert!(matches!(result, Err(StoreError::Rejected(_))));
        assert!(db.list_records().unwrap().is_empty());
    }

    #[test]
    fn test_list_in_insertion_order() {
        let db = setup_db();

        let a = db.create_record(&fields("Ann", "2024-03-01")).unwrap();
        let b = db.create_record(&fields("Bob", "2024-01-01")).unwrap();
        let c = db.create_record(&fields("Cat", "2024-02-01")).unwrap();

        let ids: Vec<String> = db
            .list_all_records()
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![a.id, b.id, c.id]);
    }

    #[test]
    fn test_delete() {
        let db = setup_db();

        let record = db.create_record(&fields("Ann", "2024-01-05")).unwrap();
        db.delete_record(&record.id).unwrap();
        assert!(db.get_record(&record.id).unwrap().is_none());

        let result = db.delete_record(&record.id);
        assert!(matches!(result, Err(StoreError::NotFound(id)) if id == record.id));
    }

    #[test]
    fn test_null_columns_read_as_blank() {
        let db = setup_db();
        db.conn()
            .execute("INSERT INTO patient_records (id, name) VALUES ('legacy-1', 'Old')", [])
            .unwrap();

        let record = db.get_record("legacy-1").unwrap().unwrap();
        assert_eq!(record.name, "Old");
        assert_eq!(record.hospital, "");
        assert_eq!(record.visit_date(), None);
    }
}
