//! Client-side mirror of the record store.
//!
//! ```text
//! Empty ──begin_load──▶ Loading ──finish_load──▶ Loaded ◀──┐
//!   ▲                      │                        │      │ apply(Append | Remove)
//!   └──────fail_load───────┘                        └──────┘
//! ```
//!
//! Transitions describe a write the store has already confirmed. Callers
//! build one only from a successful gateway result, so a failed write never
//! reaches the cache and there is nothing to roll back.

use crate::models::Record;

/// Load state of the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Loading,
    Loaded(Vec<Record>),
}

/// A confirmed store write to mirror locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheTransition {
    /// A record was created
    Append(Record),
    /// The record with this id was deleted
    Remove(String),
}

/// Cache operation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    #[error("Record cache is not loaded")]
    NotLoaded,

    #[error("Record cache is already loading")]
    AlreadyLoading,
}

/// In-memory ordered record collection.
#[derive(Debug, Clone)]
pub struct RecordCache {
    state: CacheState,
}

impl Default for RecordCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordCache {
    pub fn new() -> Self {
        Self {
            state: CacheState::Empty,
        }
    }

    pub fn state(&self) -> &CacheState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, CacheState::Loaded(_))
    }

    /// Cached records, or an empty slice before the first load completes.
    pub fn records(&self) -> &[Record] {
        match &self.state {
            CacheState::Loaded(records) => records.as_slice(),
            _ => &[],
        }
    }

    /// Mark a bulk load as outstanding.
    ///
    /// Reloading a loaded cache is allowed; its records stay visible until the
    /// new snapshot arrives via [`finish_load`](Self::finish_load).
    pub fn begin_load(&mut self) -> Result<(), CacheError> {
        match self.state {
            CacheState::Loading => Err(CacheError::AlreadyLoading),
            CacheState::Empty => {
                self.state = CacheState::Loading;
                Ok(())
            }
            CacheState::Loaded(_) => Ok(()),
        }
    }

    /// Replace the contents with a fresh snapshot from the store.
    pub fn finish_load(&mut self, records: Vec<Record>) {
        self.state = CacheState::Loaded(records);
    }

    /// Abandon an outstanding initial load.
    pub fn fail_load(&mut self) {
        if matches!(self.state, CacheState::Loading) {
            self.state = CacheState::Empty;
        }
    }

    /// Mirror a confirmed write.
    ///
    /// Removing an id that is not cached is a no-op; returns whether the
    /// cache changed.
    pub fn apply(&mut self, transition: CacheTransition) -> Result<bool, CacheError> {
        let CacheState::Loaded(records) = &mut self.state else {
            return Err(CacheError::NotLoaded);
        };

        match transition {
            CacheTransition::Append(record) => {
                records.push(record);
                Ok(true)
            }
            CacheTransition::Remove(id) => {
                let before = records.len();
                records.retain(|r| r.id != id);
                Ok(records.len() != before)
            }
        }
    }
}
