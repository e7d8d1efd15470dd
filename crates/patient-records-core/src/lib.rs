//! Patient Records Core Library
//!
//! Record, filter and summarize patient visits over a small record store.
//!
//! # Architecture
//!
//! ```text
//!   Presentation layer (forms, tables)
//!            │  FFI: PatientRecordsCore
//!            ▼
//!      RecordSession ──── QueryState { filter, sort, page }
//!        │        │
//!        │        ▼
//!        │   RecordCache ──▶ query::apply ──┬──▶ query::paginate ──▶ page
//!        │        ▲          (filter, sort) └──▶ query::summarize ──▶ stats
//!        │        │ confirmed Append / Remove
//!        ▼        │
//!     RecordStore (SQLite Database)
//! ```
//!
//! # Core Principle
//!
//! **The cache only mirrors confirmed writes.** A create or delete reaches the
//! cache after the store reports success, never before.
//!
//! # Modules
//!
//! - [`models`]: Domain types (Record, FilterSpec, QueryState)
//! - [`query`]: Filter/sort pipeline, aggregation and pagination
//! - [`store`]: Store gateway trait
//! - [`db`]: SQLite store implementation
//! - [`cache`]: Client-side record cache
//! - [`session`]: Controller tying the above together
//! - [`export`]: CSV export
//! - [`config`]: TOML/env configuration
//! - [`logging`]: Tracing setup

pub mod cache;
pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod models;
pub mod query;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use cache::{CacheState, CacheTransition, RecordCache};
pub use config::Config;
pub use db::Database;
pub use models::{FilterSpec, NewRecord, QueryState, Record, SortDirection};
pub use query::{PageInfo, Summary, DEFAULT_PAGE_SIZE};
pub use session::{RecordSession, RecordView};
pub use store::{RecordStore, StoreError};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum PatientRecordsError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<db::DbError> for PatientRecordsError {
    fn from(e: db::DbError) -> Self {
        PatientRecordsError::DatabaseError(e.to_string())
    }
}

impl From<StoreError> for PatientRecordsError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => PatientRecordsError::NotFound(id),
            StoreError::Rejected(reason) => PatientRecordsError::InvalidInput(reason),
            other => PatientRecordsError::DatabaseError(other.to_string()),
        }
    }
}

impl From<session::SessionError> for PatientRecordsError {
    fn from(e: session::SessionError) -> Self {
        match e {
            session::SessionError::Store(e) => e.into(),
            session::SessionError::Invalid(e) => PatientRecordsError::InvalidInput(e.to_string()),
            session::SessionError::Cache(e) => PatientRecordsError::DatabaseError(e.to_string()),
        }
    }
}

impl From<config::ConfigError> for PatientRecordsError {
    fn from(e: config::ConfigError) -> Self {
        PatientRecordsError::ConfigError(e.to_string())
    }
}

impl From<serde_json::Error> for PatientRecordsError {
    fn from(e: serde_json::Error) -> Self {
        PatientRecordsError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for PatientRecordsError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        PatientRecordsError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a record database at the given path and load it.
#[uniffi::export]
pub fn open_records(path: String) -> Result<Arc<PatientRecordsCore>, PatientRecordsError> {
    let db = Database::open(&path)?;
    PatientRecordsCore::start(RecordSession::new(db))
}

/// Create an in-memory record database (for testing).
#[uniffi::export]
pub fn open_records_in_memory() -> Result<Arc<PatientRecordsCore>, PatientRecordsError> {
    let db = Database::open_in_memory()?;
    PatientRecordsCore::start(RecordSession::new(db))
}

/// Open using a TOML config file, or defaults plus environment when `None`.
///
/// Also installs the tracing subscriber with the configured filter.
#[uniffi::export]
pub fn open_records_with_config(
    config_path: Option<String>,
) -> Result<Arc<PatientRecordsCore>, PatientRecordsError> {
    let config = match config_path {
        Some(path) => Config::load(path)?,
        None => Config::from_env()?,
    };
    logging::init(&config.log_filter);

    let db = Database::open(&config.database_path)?;
    PatientRecordsCore::start(RecordSession::with_page_size(db, config.page_size))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe session wrapper for FFI.
///
/// The mutex serializes every cache mutation behind a single writer.
#[derive(uniffi::Object)]
pub struct PatientRecordsCore {
    session: Arc<Mutex<RecordSession<Database>>>,
}

impl PatientRecordsCore {
    fn start(
        mut session: RecordSession<Database>,
    ) -> Result<Arc<Self>, PatientRecordsError> {
        session.load()?;
        Ok(Arc::new(Self {
            session: Arc::new(Mutex::new(session)),
        }))
    }
}

#[uniffi::export]
impl PatientRecordsCore {
    // =========================================================================
    // Record Operations
    // =========================================================================

    /// Re-fetch all records from the store.
    pub fn reload(&self) -> Result<u32, PatientRecordsError> {
        let mut session = self.session.lock()?;
        Ok(session.load()? as u32)
    }

    /// Add a visit record.
    pub fn add_record(
        &self,
        name: String,
        reg_no: String,
        hospital: String,
        date: String,
    ) -> Result<FfiRecord, PatientRecordsError> {
        let mut session = self.session.lock()?;
        let record = session.create(NewRecord::new(name, reg_no, hospital, date))?;
        Ok(record.into())
    }

    /// Delete a visit record by ID.
    pub fn delete_record(&self, id: String) -> Result<(), PatientRecordsError> {
        let mut session = self.session.lock()?;
        session.delete(&id)?;
        Ok(())
    }

    // =========================================================================
    // Query Operations
    // =========================================================================

    /// Set the name / registration number search term.
    pub fn set_search(&self, term: String) -> Result<FfiQueryState, PatientRecordsError> {
        let mut session = self.session.lock()?;
        Ok(session.set_search(term).into())
    }

    /// Restrict to one hospital; `None` or "" shows all.
    pub fn set_hospital_filter(
        &self,
        hospital: Option<String>,
    ) -> Result<FfiQueryState, PatientRecordsError> {
        let mut session = self.session.lock()?;
        Ok(session.set_hospital_filter(hospital).into())
    }

    /// Set the inclusive visit date range (`YYYY-MM-DD`; `None` or "" for open).
    pub fn set_date_range(
        &self,
        start: Option<String>,
        end: Option<String>,
    ) -> Result<FfiQueryState, PatientRecordsError> {
        let start = parse_filter_date(start)?;
        let end = parse_filter_date(end)?;
        let mut session = self.session.lock()?;
        Ok(session.set_date_range(start, end).into())
    }

    pub fn reset_filters(&self) -> Result<FfiQueryState, PatientRecordsError> {
        let mut session = self.session.lock()?;
        Ok(session.reset_filters().into())
    }

    pub fn toggle_sort(&self) -> Result<FfiQueryState, PatientRecordsError> {
        let mut session = self.session.lock()?;
        Ok(session.toggle_sort().into())
    }

    pub fn next_page(&self) -> Result<FfiQueryState, PatientRecordsError> {
        let mut session = self.session.lock()?;
        Ok(session.next_page().into())
    }

    pub fn previous_page(&self) -> Result<FfiQueryState, PatientRecordsError> {
        let mut session = self.session.lock()?;
        Ok(session.previous_page().into())
    }

    /// Current page, statistics and selector options.
    pub fn view(&self) -> Result<FfiRecordView, PatientRecordsError> {
        let session = self.session.lock()?;
        Ok(session.view().into())
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Export every cached record as CSV.
    pub fn export_csv(&self) -> Result<String, PatientRecordsError> {
        let session = self.session.lock()?;
        Ok(session.export_csv())
    }

    /// Export the filtered, sorted records as CSV.
    pub fn export_filtered_csv(&self) -> Result<String, PatientRecordsError> {
        let session = self.session.lock()?;
        Ok(session.export_filtered_csv())
    }

    /// Export statistics for the current filter as JSON.
    pub fn export_summary_json(&self) -> Result<String, PatientRecordsError> {
        let session = self.session.lock()?;
        Ok(session.view().summary.to_json()?)
    }
}

fn parse_filter_date(value: Option<String>) -> Result<Option<NaiveDate>, PatientRecordsError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, models::DATE_FORMAT)
            .map(Some)
            .map_err(|_| PatientRecordsError::InvalidInput(format!("Invalid date: {}", s))),
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRecord {
    pub id: String,
    pub name: String,
    pub reg_no: String,
    pub hospital: String,
    pub date: String,
}

impl From<Record> for FfiRecord {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            name: record.name,
            reg_no: record.reg_no,
            hospital: record.hospital,
            date: record.date,
        }
    }
}

/// FFI-safe query state.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiQueryState {
    pub search: String,
    pub hospital: Option<String>,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub sort_descending: bool,
    pub page: u32,
}

impl From<&QueryState> for FfiQueryState {
    fn from(state: &QueryState) -> Self {
        let format = |d: NaiveDate| d.format(models::DATE_FORMAT).to_string();
        Self {
            search: state.filter.search.clone(),
            hospital: state.filter.hospital.clone(),
            date_start: state.filter.date_start.map(format),
            date_end: state.filter.date_end.map(format),
            sort_descending: state.sort.is_descending(),
            page: state.page as u32,
        }
    }
}

/// FFI-safe keyed count (month or hospital).
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCount {
    pub key: String,
    pub count: u32,
}

/// FFI-safe summary statistics.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSummary {
    pub total_count: u32,
    pub monthly_count: Vec<FfiCount>,
    pub hospital_count: Vec<FfiCount>,
    pub undated_count: u32,
    pub unassigned_hospital_count: u32,
}

impl From<Summary> for FfiSummary {
    fn from(summary: Summary) -> Self {
        let counts = |map: std::collections::BTreeMap<String, usize>| -> Vec<FfiCount> {
            map.into_iter()
                .map(|(key, count)| FfiCount {
                    key,
                    count: count as u32,
                })
                .collect()
        };
        Self {
            total_count: summary.total_count as u32,
            monthly_count: counts(summary.monthly_count),
            hospital_count: counts(summary.hospital_count),
            undated_count: summary.undated_count as u32,
            unassigned_hospital_count: summary.unassigned_hospital_count as u32,
        }
    }
}

/// FFI-safe records screen.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRecordView {
    pub records: Vec<FfiRecord>,
    pub page: u32,
    pub total_pages: u32,
    pub has_previous: bool,
    pub has_next: bool,
    pub page_label: String,
    pub summary: FfiSummary,
    pub hospital_options: Vec<String>,
    pub sort_label: String,
}

impl From<RecordView> for FfiRecordView {
    fn from(view: RecordView) -> Self {
        Self {
            records: view.records.into_iter().map(|r| r.into()).collect(),
            page: view.page_info.page as u32,
            total_pages: view.page_info.total_pages as u32,
            has_previous: view.page_info.has_previous,
            has_next: view.page_info.has_next,
            page_label: view.page_info.label(),
            summary: view.summary.into(),
            hospital_options: view.hospital_options,
            sort_label: view.sort.label().to_string(),
        }
    }
}
