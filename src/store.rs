//! Record Store
//!
//! The authoritative, ordered, in-memory collection behind every dashboard
//! table. Views and table state only ever hold references or ids.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, info, warn};

/// A record owned by a [`RecordStore`].
pub trait Record {
    /// Unique identifier of the record.
    fn id(&self) -> &str;

    /// Keys of child rows (e.g. variant SKUs), unique across the whole store.
    fn child_keys(&self) -> SmallVec<[&str; 4]> {
        SmallVec::new()
    }
}

/// Errors related to record store construction or lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Two records share the same identifier.
    #[error("Duplicate record id {0}")]
    DuplicateId(String),

    /// Two child rows share the same key, within or across records.
    #[error("Duplicate child key {0}")]
    DuplicateChildKey(String),

    /// No record has the given identifier.
    #[error("Record {0} not found")]
    NotFound(String),

    /// An update tried to change a record's id or child keys.
    #[error("Record {0} cannot change its id or child keys")]
    IdentityChanged(String),
}

/// Ordered record collection with id lookups and session edit marks.
#[derive(Debug, Clone)]
pub struct RecordStore<R> {
    records: Vec<R>,
    index: FxHashMap<String, usize>,
    child_keys: FxHashSet<String>,
    edited: FxHashSet<String>,
}

impl<R: Record> Default for RecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> RecordStore<R> {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        RecordStore {
            records: Vec::new(),
            index: FxHashMap::default(),
            child_keys: FxHashSet::default(),
            edited: FxHashSet::default(),
        }
    }

    /// Create a store from records, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if an id or child key is duplicated.
    pub fn with_records(records: impl Into<Vec<R>>) -> Result<Self, StoreError> {
        let records = records.into();
        let mut store = Self::new();

        store.records.reserve(records.len());

        records
            .into_iter()
            .try_for_each(|record| store.insert(record))?;

        debug!(records = store.len(), "record store loaded");

        Ok(store)
    }

    /// Append a record.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the id or any child key is already taken.
    pub fn insert(&mut self, record: R) -> Result<(), StoreError> {
        if self.index.contains_key(record.id()) {
            return Err(StoreError::DuplicateId(record.id().to_string()));
        }

        let keys: SmallVec<[String; 4]> = record
            .child_keys()
            .into_iter()
            .map(str::to_string)
            .collect();

        for (position, key) in keys.iter().enumerate() {
            if self.child_keys.contains(key) || keys.iter().take(position).any(|seen| seen == key) {
                return Err(StoreError::DuplicateChildKey(key.clone()));
            }
        }

        self.child_keys.extend(keys);
        self.index
            .insert(record.id().to_string(), self.records.len());
        self.records.push(record);

        Ok(())
    }

    /// Get a record by id.
    pub fn get(&self, id: &str) -> Option<&R> {
        self.index
            .get(id)
            .and_then(|position| self.records.get(*position))
    }

    /// Whether a record with the id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Mutate a record.
    ///
    /// The closure works on a copy that replaces the stored record only when
    /// it returns `Ok` and leaves the id and child keys as they were.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the id is unknown and
    /// `StoreError::IdentityChanged` if the closure renamed the record or
    /// changed its child keys (both converted into `E`), otherwise whatever
    /// the closure returns. The stored record is unchanged on any error.
    pub fn update<T, E>(
        &mut self,
        id: &str,
        apply: impl FnOnce(&mut R) -> Result<T, E>,
    ) -> Result<T, E>
    where
        R: Clone,
        E: From<StoreError>,
    {
        let record = self
            .index
            .get(id)
            .and_then(|position| self.records.get_mut(*position))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let mut staged = record.clone();
        let output = apply(&mut staged)?;

        if staged.id() != record.id() || staged.child_keys() != record.child_keys() {
            warn!(record_id = id, "update changed record identity; discarded");

            return Err(StoreError::IdentityChanged(id.to_string()).into());
        }

        *record = staged;

        Ok(output)
    }

    /// Remove a record, keeping the order of the rest.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the id is unknown.
    pub fn remove(&mut self, id: &str) -> Result<R, StoreError> {
        let position = self
            .index
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let record = self.records.remove(position);

        for key in record.child_keys() {
            self.child_keys.remove(key);
        }

        self.edited.remove(id);

        for (offset, later) in self.records.iter().enumerate().skip(position) {
            self.index.insert(later.id().to_string(), offset);
        }

        info!(record_id = id, "record removed");

        Ok(record)
    }

    /// Mark a record as edited during this session.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the id is unknown.
    pub fn mark_edited(&mut self, id: &str) -> Result<(), StoreError> {
        if !self.contains(id) {
            return Err(StoreError::NotFound(id.to_string()));
        }

        self.edited.insert(id.to_string());

        Ok(())
    }

    /// Whether a record was edited during this session.
    pub fn is_edited(&self, id: &str) -> bool {
        self.edited.contains(id)
    }

    /// Number of records edited during this session.
    pub fn edited_count(&self) -> usize {
        self.edited.len()
    }

    /// Records in store order.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Iterate over records in store order.
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.records.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'s, R> IntoIterator for &'s RecordStore<R> {
    type Item = &'s R;
    type IntoIter = std::slice::Iter<'s, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
