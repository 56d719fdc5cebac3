//! Table State
//!
//! Transient, per-table UI state layered over a derived view: selection,
//! expanded parent rows, the single inline edit target and the page cursor.
//! Authoritative fields live only in the [`RecordStore`].

use std::fmt;

use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    pagination::Pagination,
    store::{Record, RecordStore, StoreError},
};

/// A record with inline-editable numeric fields.
///
/// Edits are staged on a copy, so the record must be `Clone`.
pub trait Editable: Record + Clone {
    /// Identifies one editable field of a record.
    type Field: Clone + fmt::Debug + fmt::Display + PartialEq;

    /// Write a validated value, recomputing any derived fields.
    ///
    /// # Errors
    ///
    /// Returns an `EditError` if the value breaks a record invariant; the
    /// record must be left unchanged in that case.
    fn apply_edit(&mut self, field: &Self::Field, value: u32) -> Result<(), EditError>;
}

/// Errors raised while committing an inline edit.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    /// The pending text is not a non-negative integer.
    #[error("{0:?} is not a non-negative whole number")]
    InvalidValue(String),

    /// The field is computed from child rows.
    #[error("{0} is derived from variants and cannot be edited directly")]
    DerivedField(String),

    /// Reserved units would exceed units on hand.
    #[error("reserved {reserved} exceeds stock {stock}")]
    ReservedExceedsStock {
        /// Requested reserved units.
        reserved: u32,
        /// Units on hand.
        stock: u32,
    },

    /// No variant has the SKU.
    #[error("Variant {0} not found")]
    UnknownVariant(String),

    /// Store lookup failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What happens to an edit whose value is rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InvalidEditPolicy {
    /// Close the editor without writing and without reporting an error.
    #[default]
    Discard,

    /// Keep the editor open and report the error to the caller.
    Keep,
}

/// The single (record, field) pair open for inline editing.
#[derive(Debug, Clone, PartialEq)]
pub struct EditTarget<F> {
    /// Record being edited.
    pub record_id: String,

    /// Field being edited.
    pub field: F,

    /// Pending text.
    pub buffer: String,
}

/// Result of a commit that did not error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The value was written to the store.
    Committed {
        /// Edited record.
        record_id: String,
        /// Written value.
        value: u32,
    },

    /// The value was rejected and the edit silently dropped.
    Discarded,

    /// Nothing was being edited.
    Idle,
}

/// Keyboard signals understood by the inline editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySignal {
    /// Enter.
    Commit,

    /// Escape.
    Cancel,
}

/// Per-table presentation state.
#[derive(Debug, Clone)]
pub struct TableState<F> {
    selected: FxHashSet<String>,
    expanded: FxHashSet<String>,
    edit: Option<EditTarget<F>>,
    pagination: Pagination,
    policy: InvalidEditPolicy,
}

impl<F> Default for TableState<F> {
    fn default() -> Self {
        Self::new(Pagination::default(), InvalidEditPolicy::default())
    }
}

impl<F> TableState<F> {
    /// Create table state with a page cursor and invalid-edit policy.
    #[must_use]
    pub fn new(pagination: Pagination, policy: InvalidEditPolicy) -> Self {
        TableState {
            selected: FxHashSet::default(),
            expanded: FxHashSet::default(),
            edit: None,
            pagination,
            policy,
        }
    }

    /// Flip a record's selection.
    pub fn toggle_select(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    /// Clear the selection if every visible record is selected, otherwise
    /// select exactly the visible records.
    pub fn toggle_select_all<R: Record>(&mut self, visible: &[&R]) {
        let all_selected = !visible.is_empty()
            && visible
                .iter()
                .all(|record| self.selected.contains(record.id()));

        self.selected.clear();

        if !all_selected {
            self.selected
                .extend(visible.iter().map(|record| record.id().to_string()));
        }
    }

    /// Whether a record is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Selected ids, in no particular order.
    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    /// Number of selected records.
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Flip a parent row's expansion. Records without children never expand.
    ///
    /// Returns whether the row is expanded afterwards.
    pub fn toggle_expand<R: Record>(&mut self, store: &RecordStore<R>, parent_id: &str) -> bool {
        let has_children = store
            .get(parent_id)
            .is_some_and(|record| !record.child_keys().is_empty());

        if !has_children {
            self.expanded.remove(parent_id);
            return false;
        }

        if self.expanded.remove(parent_id) {
            false
        } else {
            self.expanded.insert(parent_id.to_string());
            true
        }
    }

    /// Whether a parent row is expanded.
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Open a field for editing, replacing any previous edit target.
    pub fn begin_edit(&mut self, record_id: &str, field: F, current: impl fmt::Display) {
        self.edit = Some(EditTarget {
            record_id: record_id.to_string(),
            field,
            buffer: current.to_string(),
        });
    }

    /// Replace the pending text. No-op when nothing is being edited.
    pub fn update_edit_buffer(&mut self, text: &str) {
        if let Some(edit) = self.edit.as_mut() {
            edit.buffer.clear();
            edit.buffer.push_str(text);
        }
    }

    /// The active edit target.
    pub fn edit_target(&self) -> Option<&EditTarget<F>> {
        self.edit.as_ref()
    }

    /// Close the editor without writing.
    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Page cursor.
    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Page cursor, mutably.
    pub fn pagination_mut(&mut self) -> &mut Pagination {
        &mut self.pagination
    }

    /// Invalid-edit policy.
    pub fn policy(&self) -> InvalidEditPolicy {
        self.policy
    }

    /// Log a delete request without applying it.
    pub fn request_delete(&self, id: &str) {
        info!(record_id = id, "delete requested; not applied");
    }

    /// Remove every selected record from the store and clear the selection.
    ///
    /// Returns the removed records in store order.
    pub fn remove_selected<R: Record>(&mut self, store: &mut RecordStore<R>) -> Vec<R> {
        let ids: Vec<String> = store
            .iter()
            .filter(|record| self.selected.contains(record.id()))
            .map(|record| record.id().to_string())
            .collect();

        let removed: Vec<R> = ids
            .iter()
            .filter_map(|id| store.remove(id).ok())
            .collect();

        for id in &ids {
            self.expanded.remove(id);
        }

        if self
            .edit
            .as_ref()
            .is_some_and(|edit| ids.contains(&edit.record_id))
        {
            self.edit = None;
        }

        self.selected.clear();

        removed
    }
}

impl<F: Clone + fmt::Debug + fmt::Display + PartialEq> TableState<F> {
    /// Parse and write the pending value.
    ///
    /// Rejected values follow the [`InvalidEditPolicy`]: `Discard` closes the
    /// editor and returns [`EditOutcome::Discarded`], `Keep` leaves it open
    /// and returns the error.
    ///
    /// # Errors
    ///
    /// Returns an `EditError` for rejected values under `Keep`, and
    /// `EditError::Store` when the record no longer exists.
    pub fn commit_edit<R>(&mut self, store: &mut RecordStore<R>) -> Result<EditOutcome, EditError>
    where
        R: Editable<Field = F>,
    {
        let Some(edit) = self.edit.as_ref() else {
            return Ok(EditOutcome::Idle);
        };

        let result = parse_stock(&edit.buffer).and_then(|value| {
            store
                .update(&edit.record_id, |record| record.apply_edit(&edit.field, value))
                .map(|()| value)
        });

        match result {
            Ok(value) => {
                let record_id = edit.record_id.clone();

                store.mark_edited(&record_id)?;

                info!(record_id = %record_id, field = %edit.field, value, "edit committed");

                self.edit = None;

                Ok(EditOutcome::Committed { record_id, value })
            }
            Err(EditError::Store(error)) => {
                self.edit = None;

                Err(EditError::Store(error))
            }
            Err(error) => match self.policy {
                InvalidEditPolicy::Discard => {
                    warn!(
                        record_id = %edit.record_id,
                        field = %edit.field,
                        %error,
                        "edit discarded"
                    );

                    self.edit = None;

                    Ok(EditOutcome::Discarded)
                }
                InvalidEditPolicy::Keep => Err(error),
            },
        }
    }

    /// Dispatch a keyboard signal to the inline editor.
    ///
    /// # Errors
    ///
    /// Returns whatever [`TableState::commit_edit`] returns for `Commit`.
    pub fn handle_key<R>(
        &mut self,
        signal: KeySignal,
        store: &mut RecordStore<R>,
    ) -> Result<EditOutcome, EditError>
    where
        R: Editable<Field = F>,
    {
        match signal {
            KeySignal::Commit => self.commit_edit(store),
            KeySignal::Cancel => {
                let was_editing = self.edit.is_some();

                self.cancel_edit();

                Ok(if was_editing {
                    EditOutcome::Discarded
                } else {
                    EditOutcome::Idle
                })
            }
        }
    }
}

/// Parse inline stock input as a non-negative whole number.
///
/// # Errors
///
/// Returns `EditError::InvalidValue` for anything else.
pub fn parse_stock(text: &str) -> Result<u32, EditError> {
    text.trim()
        .parse::<u32>()
        .map_err(|_err| EditError::InvalidValue(text.to_string()))
}

#[cfg(test)]
mod tests {
    use smallvec::SmallVec;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: String,
        children: Vec<String>,
        stock: u32,
    }

    impl Record for Row {
        fn id(&self) -> &str {
            &self.id
        }

        fn child_keys(&self) -> SmallVec<[&str; 4]> {
            self.children.iter().map(String::as_str).collect()
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Stock;

    impl fmt::Display for Stock {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("stock")
        }
    }

    impl Editable for Row {
        type Field = Stock;

        fn apply_edit(&mut self, _field: &Stock, value: u32) -> Result<(), EditError> {
            self.stock = value;
            Ok(())
        }
    }

    fn store() -> Result<RecordStore<Row>, StoreError> {
        RecordStore::with_records(
            ["a", "b", "c"]
                .into_iter()
                .map(|id| Row {
                    id: id.to_string(),
                    children: if id == "a" {
                        vec!["A-1".to_string()]
                    } else {
                        Vec::new()
                    },
                    stock: 5,
                })
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn toggle_select_flips() {
        let mut state = TableState::<Stock>::default();

        state.toggle_select("a");
        assert!(state.is_selected("a"));

        state.toggle_select("a");
        assert!(!state.is_selected("a"));
    }

    #[test]
    fn toggle_select_all_selects_visible_only() -> TestResult {
        let store = store()?;
        let visible: Vec<&Row> = store.iter().take(2).collect();
        let mut state = TableState::<Stock>::default();

        state.toggle_select("c");
        state.toggle_select_all(&visible);

        assert!(state.is_selected("a"));
        assert!(state.is_selected("b"));
        assert!(!state.is_selected("c"));

        Ok(())
    }

    #[test]
    fn toggle_select_all_twice_restores_selection() -> TestResult {
        let store = store()?;
        let visible: Vec<&Row> = store.iter().collect();
        let mut state = TableState::<Stock>::default();

        state.toggle_select_all(&visible);
        assert_eq!(state.selected_count(), 3);

        state.toggle_select_all(&visible);
        assert_eq!(state.selected_count(), 0);

        Ok(())
    }

    #[test]
    fn toggle_expand_requires_children() -> TestResult {
        let store = store()?;
        let mut state = TableState::<Stock>::default();

        assert!(state.toggle_expand(&store, "a"));
        assert!(state.is_expanded("a"));
        assert!(!state.toggle_expand(&store, "a"));

        assert!(!state.toggle_expand(&store, "b"));
        assert!(!state.is_expanded("b"));
        assert!(!state.toggle_expand(&store, "missing"));

        Ok(())
    }

    #[test]
    fn begin_edit_seeds_buffer_and_replaces_target() {
        let mut state = TableState::<Stock>::default();

        state.begin_edit("a", Stock, 5);
        state.begin_edit("b", Stock, 7);

        let target = state.edit_target();

        assert_eq!(target.map(|edit| edit.record_id.as_str()), Some("b"));
        assert_eq!(target.map(|edit| edit.buffer.as_str()), Some("7"));
    }

    #[test]
    fn update_buffer_without_target_is_noop() {
        let mut state = TableState::<Stock>::default();

        state.update_edit_buffer("12");

        assert!(state.edit_target().is_none());
    }

    #[test]
    fn commit_writes_and_marks_edited() -> TestResult {
        let mut store = store()?;
        let mut state = TableState::<Stock>::default();

        state.begin_edit("b", Stock, 5);
        state.update_edit_buffer("15");

        let outcome = state.handle_key(KeySignal::Commit, &mut store)?;

        assert_eq!(
            outcome,
            EditOutcome::Committed {
                record_id: "b".to_string(),
                value: 15
            }
        );
        assert_eq!(store.get("b").map(|row| row.stock), Some(15));
        assert!(store.is_edited("b"));
        assert!(state.edit_target().is_none());

        Ok(())
    }

    #[test]
    fn invalid_values_are_discarded_by_default() -> TestResult {
        let mut store = store()?;
        let mut state = TableState::<Stock>::default();

        for input in ["-1", "abc", "", "1.5"] {
            state.begin_edit("a", Stock, 5);
            state.update_edit_buffer(input);

            assert_eq!(state.commit_edit(&mut store)?, EditOutcome::Discarded);
            assert!(state.edit_target().is_none());
        }

        assert_eq!(store.get("a").map(|row| row.stock), Some(5));
        assert!(!store.is_edited("a"));

        Ok(())
    }

    #[test]
    fn keep_policy_reports_and_keeps_editor_open() -> TestResult {
        let mut store = store()?;
        let mut state = TableState::<Stock>::new(Pagination::default(), InvalidEditPolicy::Keep);

        state.begin_edit("a", Stock, 5);
        state.update_edit_buffer("-1");

        assert_eq!(
            state.commit_edit(&mut store),
            Err(EditError::InvalidValue("-1".to_string()))
        );
        assert!(state.edit_target().is_some());

        state.update_edit_buffer("3");

        assert!(matches!(
            state.commit_edit(&mut store)?,
            EditOutcome::Committed { value: 3, .. }
        ));

        Ok(())
    }

    #[test]
    fn commit_on_removed_record_clears_target() -> TestResult {
        let mut store = store()?;
        let mut state = TableState::<Stock>::new(Pagination::default(), InvalidEditPolicy::Keep);

        state.begin_edit("c", Stock, 5);
        store.remove("c")?;

        assert_eq!(
            state.commit_edit(&mut store),
            Err(EditError::Store(StoreError::NotFound("c".to_string())))
        );
        assert!(state.edit_target().is_none());

        Ok(())
    }

    #[test]
    fn cancel_key_closes_editor() -> TestResult {
        let mut store = store()?;
        let mut state = TableState::<Stock>::default();

        assert_eq!(
            state.handle_key(KeySignal::Cancel, &mut store)?,
            EditOutcome::Idle
        );

        state.begin_edit("a", Stock, 5);
        state.update_edit_buffer("99");

        assert_eq!(
            state.handle_key(KeySignal::Cancel, &mut store)?,
            EditOutcome::Discarded
        );
        assert_eq!(store.get("a").map(|row| row.stock), Some(5));

        Ok(())
    }

    #[test]
    fn remove_selected_deletes_and_clears() -> TestResult {
        let mut store = store()?;
        let mut state = TableState::<Stock>::default();

        state.toggle_select("a");
        state.toggle_select("c");
        state.toggle_expand(&store, "a");

        let removed = state.remove_selected(&mut store);

        assert_eq!(
            removed.iter().map(|row| row.id.as_str()).collect::<Vec<_>>(),
            vec!["a", "c"]
        );
        assert_eq!(store.len(), 1);
        assert_eq!(state.selected_count(), 0);
        assert!(!state.is_expanded("a"));

        Ok(())
    }

    #[test]
    fn parse_stock_accepts_padded_integers() {
        assert_eq!(parse_stock(" 42 "), Ok(42));
        assert!(parse_stock("-1").is_err());
    }
}
