//! Criteria
//!
//! The combination of search text, categorical filters, ranges and sort
//! applied to a record collection. Unrecognised values never error; they
//! simply impose no constraint.

use std::{cmp::Ordering, fmt, str::FromStr};

use jiff::{SignedDuration, Timestamp};
use thiserror::Error;

use crate::{products::Visibility, stock::InventoryLevel, store::Record};

/// Fields a record exposes to the filter-sort pipeline.
///
/// Every accessor defaults to `None`, meaning the record type has no such
/// field; filters over a missing field impose no constraint.
pub trait Filterable: Record {
    /// Whether any searchable field contains `needle`.
    ///
    /// `needle` is already lowercased and non-empty.
    fn matches_text(&self, needle: &str) -> bool;

    /// Category used by the category filter.
    fn category(&self) -> Option<&str> {
        None
    }

    /// Status label used by the status filter.
    fn status_label(&self) -> Option<&str> {
        None
    }

    /// Aggregate stock used by the inventory-level filter.
    fn aggregate_stock(&self) -> Option<u32> {
        None
    }

    /// Visibility used by the visibility filter.
    fn visibility(&self) -> Option<Visibility> {
        None
    }

    /// Timestamp used by the date-range filter and the `updated` sort.
    fn timestamp(&self) -> Option<Timestamp> {
        None
    }

    /// Display title used by the `title` sort.
    fn title(&self) -> Option<&str> {
        None
    }

    /// Minor-unit value used by the `price` sort.
    fn value_minor(&self) -> Option<i64> {
        None
    }
}

/// Case-insensitive substring check against an already-lowercased needle.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// "All" label of the category dropdown.
pub const CATEGORY_SENTINEL: &str = "All Categories";

/// "All" label of the status dropdown.
pub const STATUS_SENTINEL: &str = "All Statuses";

/// A categorical filter value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Choice {
    /// The "All …" sentinel.
    #[default]
    All,

    /// Exact match on the record's field.
    Only(String),
}

impl Choice {
    /// Parse a filter label. Blank, `"All"` and the field's own `sentinel`
    /// (e.g. `"All Categories"`) mean no constraint; any other label,
    /// including one that merely starts with "All", is an exact match.
    #[must_use]
    pub fn parse(label: &str, sentinel: &str) -> Self {
        let trimmed = label.trim();

        if trimmed.is_empty() || trimmed == "All" || trimmed == sentinel {
            Choice::All
        } else {
            Choice::Only(trimmed.to_string())
        }
    }

    /// Whether the value admits a record field. A missing field is admitted.
    #[must_use]
    pub fn admits(&self, field: Option<&str>) -> bool {
        match (self, field) {
            (Choice::All, _) | (Choice::Only(_), None) => true,
            (Choice::Only(expected), Some(actual)) => expected == actual,
        }
    }
}

/// Inclusive timestamp range. Open ends impose no constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    /// Earliest admitted timestamp.
    pub from: Option<Timestamp>,

    /// Latest admitted timestamp.
    pub to: Option<Timestamp>,
}

impl DateRange {
    /// Range between two optional bounds.
    #[must_use]
    pub fn new(from: Option<Timestamp>, to: Option<Timestamp>) -> Self {
        DateRange { from, to }
    }

    /// The `days` days leading up to and including `now`.
    #[must_use]
    pub fn last_days(now: Timestamp, days: i64) -> Self {
        let from = now
            .checked_sub(SignedDuration::from_hours(days.clamp(0, 36_500) * 24))
            .ok();

        DateRange { from, to: Some(now) }
    }

    /// Whether a timestamp falls inside the range. A missing timestamp is admitted.
    #[must_use]
    pub fn admits(&self, timestamp: Option<Timestamp>) -> bool {
        let Some(timestamp) = timestamp else {
            return true;
        };

        self.from.is_none_or(|from| timestamp >= from) && self.to.is_none_or(|to| timestamp <= to)
    }
}

/// Field to sort a view by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Record identifier.
    Id,

    /// Title or name.
    Title,

    /// Price or amount.
    Price,

    /// Aggregate stock.
    Stock,

    /// Last-updated or placed-at timestamp.
    Updated,
}

/// Error parsing a [`SortKey`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sort key {0}; expected id, title, price, stock or updated")]
pub struct ParseSortKeyError(String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(SortKey::Id),
            "title" | "name" => Ok(SortKey::Title),
            "price" | "amount" | "total" => Ok(SortKey::Price),
            "stock" => Ok(SortKey::Stock),
            "updated" | "date" => Ok(SortKey::Updated),
            other => Err(ParseSortKeyError(other.to_string())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortKey::Id => "id",
            SortKey::Title => "title",
            SortKey::Price => "price",
            SortKey::Stock => "stock",
            SortKey::Updated => "updated",
        })
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,

    /// Largest first.
    Descending,
}

/// An explicit sort criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    /// Field to compare.
    pub key: SortKey,

    /// Direction.
    pub direction: SortDirection,
}

impl Sort {
    /// Compare two records. Keys a record type lacks compare equal.
    pub fn compare<R: Filterable>(&self, left: &R, right: &R) -> Ordering {
        let ordering = match self.key {
            SortKey::Id => left.id().cmp(right.id()),
            SortKey::Title => compare_present(left.title(), right.title()),
            SortKey::Price => compare_present(left.value_minor(), right.value_minor()),
            SortKey::Stock => compare_present(left.aggregate_stock(), right.aggregate_stock()),
            SortKey::Updated => compare_present(left.timestamp(), right.timestamp()),
        };

        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

fn compare_present<T: Ord>(left: Option<T>, right: Option<T>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.cmp(&right),
        _ => Ordering::Equal,
    }
}

/// Active filter and sort criteria for one table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    /// Free-text search.
    pub search: String,

    /// Category filter.
    pub category: Choice,

    /// Status filter.
    pub status: Choice,

    /// Inventory-level filter.
    pub inventory: InventoryLevel,

    /// Visibility filter; `None` is "All".
    pub visibility: Option<Visibility>,

    /// Date-range filter.
    pub date_range: DateRange,

    /// Explicit sort; `None` keeps store order.
    pub sort: Option<Sort>,
}

impl Criteria {
    /// Set the search text.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Set the category filter from a label.
    #[must_use]
    pub fn with_category(mut self, label: &str) -> Self {
        self.category = Choice::parse(label, CATEGORY_SENTINEL);
        self
    }

    /// Set the status filter from a label.
    #[must_use]
    pub fn with_status(mut self, label: &str) -> Self {
        self.status = Choice::parse(label, STATUS_SENTINEL);
        self
    }

    /// Set the inventory-level filter from a label.
    #[must_use]
    pub fn with_inventory(mut self, label: &str) -> Self {
        self.inventory = InventoryLevel::parse(label);
        self
    }

    /// Set the visibility filter from a label.
    #[must_use]
    pub fn with_visibility(mut self, label: &str) -> Self {
        self.visibility = Visibility::parse_filter(label);
        self
    }

    /// Set the date-range filter.
    #[must_use]
    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }

    /// Set an explicit sort.
    #[must_use]
    pub fn sorted_by(mut self, key: SortKey, direction: SortDirection) -> Self {
        self.sort = Some(Sort { key, direction });
        self
    }

    /// Prepare the criteria for filtering, normalising the search text once.
    #[must_use]
    pub fn matcher(&self) -> Matcher<'_> {
        let needle = self.search.trim().to_lowercase();

        Matcher {
            criteria: self,
            needle: (!needle.is_empty()).then_some(needle),
        }
    }
}

/// [`Criteria`] prepared for testing many records.
#[derive(Debug, Clone)]
pub struct Matcher<'c> {
    criteria: &'c Criteria,
    needle: Option<String>,
}

impl Matcher<'_> {
    /// Lowercased, trimmed search text; `None` when the search is blank.
    pub fn needle(&self) -> Option<&str> {
        self.needle.as_deref()
    }

    /// Whether a record satisfies every active filter.
    pub fn admits<R: Filterable>(&self, record: &R) -> bool {
        let criteria = self.criteria;

        self.needle
            .as_deref()
            .is_none_or(|needle| record.matches_text(needle))
            && criteria.category.admits(record.category())
            && criteria.status.admits(record.status_label())
            && record
                .aggregate_stock()
                .is_none_or(|stock| criteria.inventory.admits(stock))
            && criteria.visibility.is_none_or(|expected| {
                record
                    .visibility()
                    .is_none_or(|actual| actual == expected)
            })
            && criteria.date_range.admits(record.timestamp())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn choice_sentinels_parse_as_all() {
        assert_eq!(Choice::parse("All Categories", CATEGORY_SENTINEL), Choice::All);
        assert_eq!(Choice::parse("All", CATEGORY_SENTINEL), Choice::All);
        assert_eq!(Choice::parse("   ", CATEGORY_SENTINEL), Choice::All);
        assert_eq!(
            Choice::parse("Electronics", CATEGORY_SENTINEL),
            Choice::Only("Electronics".to_string())
        );
    }

    #[test]
    fn categories_starting_with_all_are_real_values() {
        assert_eq!(
            Choice::parse("All Weather Gear", CATEGORY_SENTINEL),
            Choice::Only("All Weather Gear".to_string())
        );
        assert_eq!(
            Choice::parse("All Categories", STATUS_SENTINEL),
            Choice::Only("All Categories".to_string())
        );

        let criteria = Criteria::default().with_category("All Weather Gear");

        assert_eq!(
            criteria.category,
            Choice::Only("All Weather Gear".to_string())
        );
    }

    #[test]
    fn matcher_normalises_search_once() {
        let criteria = Criteria::default().with_search("  WH-Blk ");

        assert_eq!(criteria.matcher().needle(), Some("wh-blk"));
        assert_eq!(
            Criteria::default().with_search("   ").matcher().needle(),
            None
        );
    }

    #[test]
    fn choice_only_is_exact() {
        let choice = Choice::parse("Electronics", CATEGORY_SENTINEL);

        assert!(choice.admits(Some("Electronics")));
        assert!(!choice.admits(Some("electronics")));
        assert!(choice.admits(None));
    }

    #[test]
    fn date_range_is_inclusive() -> TestResult {
        let from: Timestamp = "2024-05-01T00:00:00Z".parse()?;
        let to: Timestamp = "2024-05-31T23:59:59Z".parse()?;
        let range = DateRange::new(Some(from), Some(to));

        assert!(range.admits(Some(from)));
        assert!(range.admits(Some(to)));
        assert!(!range.admits(Some("2024-06-01T00:00:00Z".parse()?)));
        assert!(range.admits(None));

        Ok(())
    }

    #[test]
    fn last_days_covers_window() -> TestResult {
        let now: Timestamp = "2024-06-10T12:00:00Z".parse()?;
        let range = DateRange::last_days(now, 7);

        assert!(range.admits(Some("2024-06-03T12:00:00Z".parse()?)));
        assert!(!range.admits(Some("2024-06-03T11:59:59Z".parse()?)));
        assert!(!range.admits(Some("2024-06-10T12:00:01Z".parse()?)));

        Ok(())
    }

    #[test]
    fn sort_key_parses_aliases() {
        assert_eq!("Name".parse::<SortKey>(), Ok(SortKey::Title));
        assert_eq!("amount".parse::<SortKey>(), Ok(SortKey::Price));
        assert!("colour".parse::<SortKey>().is_err());
    }

    #[test]
    fn builder_parses_labels() {
        let criteria = Criteria::default()
            .with_search("wh")
            .with_category("All Categories")
            .with_status("Active")
            .with_inventory("Low Stock")
            .with_visibility("Published")
            .sorted_by(SortKey::Price, SortDirection::Descending);

        assert_eq!(criteria.search, "wh");
        assert_eq!(criteria.category, Choice::All);
        assert_eq!(criteria.status, Choice::Only("Active".to_string()));
        assert_eq!(criteria.inventory, InventoryLevel::LowStock);
        assert_eq!(criteria.visibility, Some(Visibility::Published));
        assert_eq!(
            criteria.sort,
            Some(Sort {
                key: SortKey::Price,
                direction: SortDirection::Descending,
            })
        );
    }
}
