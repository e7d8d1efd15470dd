//! Record store gateway: the persistence boundary.
//!
//! The session only needs three calls from the backing store. The bundled
//! implementation is the SQLite [`Database`](crate::db::Database); tests plug
//! in their own.

use thiserror::Error;

use crate::db::DbError;
use crate::models::{NewRecord, Record};

/// Store gateway errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Backend error: {0}")]
    Backend(#[from] DbError),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Rejected by store: {0}")]
    Rejected(String),

    /// Gateway could not be reached; raised by network-backed stores, never by SQLite
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Create / list / delete over the patient record collection.
pub trait RecordStore {
    /// Persist `fields` and return the record with its assigned id.
    fn create_record(&self, fields: &NewRecord) -> StoreResult<Record>;

    /// Every stored record, in collection order.
    fn list_all_records(&self) -> StoreResult<Vec<Record>>;

    /// Remove the record with `id`. Unknown ids fail with [`StoreError::NotFound`].
    fn delete_record(&self, id: &str) -> StoreResult<()>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn create_record(&self, fields: &NewRecord) -> StoreResult<Record> {
        (**self).create_record(fields)
    }

    fn list_all_records(&self) -> StoreResult<Vec<Record>> {
        (**self).list_all_records()
    }

    fn delete_record(&self, id: &str) -> StoreResult<()> {
        (**self).delete_record(id)
    }
}
