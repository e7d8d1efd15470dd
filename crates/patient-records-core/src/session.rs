//! Record session: the controller between the presentation layer, the record
//! cache and the store gateway.
//!
//! Store calls happen first; the cache only changes once a call succeeds.
//! Query changes never touch the store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::{CacheError, CacheTransition, RecordCache};
use crate::export::records_to_csv;
use crate::models::{FilterSpec, NewRecord, QueryState, Record, SortDirection, ValidationError};
use crate::query::{self, PageInfo, Summary, DEFAULT_PAGE_SIZE};
use crate::store::{RecordStore, StoreError};

/// Session errors.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Invalid record: {0}")]
    Invalid(#[from] ValidationError),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Everything needed to render the records screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordView {
    /// Records on the current page
    pub records: Vec<Record>,
    pub page_info: PageInfo,
    /// Aggregates over the whole filtered set
    pub summary: Summary,
    /// Facility selector options, from the unfiltered cache
    pub hospital_options: Vec<String>,
    pub sort: SortDirection,
}

/// Cache + gateway + query state for one user.
pub struct RecordSession<S: RecordStore> {
    store: S,
    cache: RecordCache,
    query: QueryState,
    page_size: usize,
}

impl<S: RecordStore> RecordSession<S> {
    /// Create a session with an empty cache. Call [`load`](Self::load) next.
    pub fn new(store: S) -> Self {
        Self::with_page_size(store, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(store: S, page_size: usize) -> Self {
        Self {
            store,
            cache: RecordCache::new(),
            query: QueryState::default(),
            page_size: page_size.max(1),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn cache(&self) -> &RecordCache {
        &self.cache
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    // =========================================================================
    // Store-backed operations
    // =========================================================================

    /// Fetch every record from the store into the cache.
    pub fn load(&mut self) -> SessionResult<usize> {
        self.cache.begin_load()?;

        match self.store.list_all_records() {
            Ok(records) => {
                let count = records.len();
                self.cache.finish_load(records);
                self.clamp_page();
                tracing::info!(count, "Loaded patient records");
                Ok(count)
            }
            Err(e) => {
                self.cache.fail_load();
                tracing::warn!("Failed to load patient records: {e}");
                Err(e.into())
            }
        }
    }

    /// Validate and persist a new record, then append it to the cache.
    pub fn create(&mut self, fields: NewRecord) -> SessionResult<Record> {
        if !self.cache.is_loaded() {
            return Err(CacheError::NotLoaded.into());
        }
        let fields = fields.validate()?;

        let record = self.store.create_record(&fields).map_err(|e| {
            tracing::warn!("Failed to create patient record: {e}");
            e
        })?;

        self.cache.apply(CacheTransition::Append(record.clone()))?;
        tracing::info!(id = %record.id, "Created patient record");
        Ok(record)
    }

    /// Delete a record from the store, then drop it from the cache.
    ///
    /// On a store failure (including an unknown id) the cache is unchanged.
    pub fn delete(&mut self, id: &str) -> SessionResult<()> {
        if !self.cache.is_loaded() {
            return Err(CacheError::NotLoaded.into());
        }

        self.store.delete_record(id).map_err(|e| {
            tracing::warn!(id, "Failed to delete patient record: {e}");
            e
        })?;

        self.cache.apply(CacheTransition::Remove(id.to_string()))?;
        self.clamp_page();
        tracing::info!(id, "Deleted patient record");
        Ok(())
    }

    // =========================================================================
    // Query state
    // =========================================================================

    /// Replace the whole query state.
    pub fn set_query(&mut self, query: QueryState) -> &QueryState {
        self.query = query;
        self.clamp_page();
        &self.query
    }

    pub fn set_filter(&mut self, filter: FilterSpec) -> &QueryState {
        let next = self.query.clone().with_filter(filter);
        self.set_query(next)
    }

    pub fn set_search(&mut self, search: impl Into<String>) -> &QueryState {
        let filter = self.query.filter.clone().with_search(search);
        self.set_filter(filter)
    }

    pub fn set_hospital_filter(&mut self, hospital: Option<String>) -> &QueryState {
        let filter = self.query.filter.clone().with_hospital(hospital);
        self.set_filter(filter)
    }

    pub fn set_date_range(
        &mut self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> &QueryState {
        let filter = self.query.filter.clone().with_date_range(start, end);
        self.set_filter(filter)
    }

    pub fn reset_filters(&mut self) -> &QueryState {
        let next = self.query.clone().reset_filters();
        self.set_query(next)
    }

    pub fn toggle_sort(&mut self) -> &QueryState {
        let next = self.query.clone().toggle_sort();
        self.set_query(next)
    }

    pub fn next_page(&mut self) -> &QueryState {
        let total = self.total_pages();
        let next = self.query.clone().next_page(total);
        self.set_query(next)
    }

    pub fn previous_page(&mut self) -> &QueryState {
        let next = self.query.clone().previous_page();
        self.set_query(next)
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    /// Cached records passing the current filter, sorted.
    pub fn filtered(&self) -> Vec<Record> {
        query::apply(self.cache.records(), &self.query.filter, self.query.sort)
    }

    /// Page count for the current filter.
    pub fn total_pages(&self) -> usize {
        let matched = self
            .cache
            .records()
            .iter()
            .filter(|r| query::matches(r, &self.query.filter))
            .count();
        query::total_pages(matched, self.page_size)
    }

    /// Recompute the page, summary and selector options.
    pub fn view(&self) -> RecordView {
        let filtered = self.filtered();
        let total_pages = query::total_pages(filtered.len(), self.page_size);
        let page = self.query.page.min(total_pages).max(1);

        RecordView {
            records: query::paginate(&filtered, self.page_size, page).to_vec(),
            page_info: PageInfo::new(page, total_pages),
            summary: query::summarize(&filtered),
            hospital_options: query::hospital_options(self.cache.records()),
            sort: self.query.sort,
        }
    }

    /// CSV of every cached record, in cache order.
    pub fn export_csv(&self) -> String {
        records_to_csv(self.cache.records())
    }

    /// CSV of the filtered, sorted records.
    pub fn export_filtered_csv(&self) -> String {
        records_to_csv(&self.filtered())
    }

    fn clamp_page(&mut self) {
        let total = self.total_pages();
        if self.query.page > total.max(1) {
            self.query = self.query.clone().clamp_page(total);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn loaded_session() -> RecordSession<Database> {
        let mut session = RecordSession::new(Database::open_in_memory().unwrap());
        session.load().unwrap();
        session
    }

    #[test]
    fn test_operations_require_load() {
        let mut session = RecordSession::new(Database::open_in_memory().unwrap());
        let result = session.create(NewRecord::new("Ann", "R1", "City", "2024-01-05"));
        assert!(matches!(result, Err(SessionError::Cache(CacheError::NotLoaded))));
        assert!(session.store().list_records().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_submission_never_reaches_store() {
        let mut session = loaded_session();
        let result = session.create(NewRecord::new("", "R1", "City", "2024-01-05"));
        assert!(matches!(result, Err(SessionError::Invalid(_))));
        assert!(session.store().list_records().unwrap().is_empty());
        assert!(session.cache().records().is_empty());
    }

    #[test]
    fn test_create_then_delete() {
        let mut session = loaded_session();
        let record = session
            .create(NewRecord::new("Ann", "R1", "City", "2024-01-05"))
            .unwrap();
        assert_eq!(session.cache().records(), &[record.clone()]);

        session.delete(&record.id).unwrap();
        assert!(session.cache().records().is_empty());
        assert!(session.store().list_records().unwrap().is_empty());
    }

    #[test]
    fn test_page_clamped_after_delete() {
        let mut session = RecordSession::with_page_size(Database::open_in_memory().unwrap(), 2);
        session.load().unwrap();
        let mut ids = Vec::new();
        for day in 1..=3 {
            let record = session
                .create(NewRecord::new("Ann", "R1", "City", format!("2024-01-0{day}")))
                .unwrap();
            ids.push(record.id);
        }

        session.next_page();
        assert_eq!(session.query().page, 2);

        // Removing the only record on page 2 pulls the page back
        session.delete(&ids[0]).unwrap();
        assert_eq!(session.query().page, 1);
        assert_eq!(session.view().page_info.label(), "Page 1 of 1");
    }
}
