//! Filter-Sort Pipeline
//!
//! Pure functions turning a record collection and a [`Criteria`] set into a
//! derived view. Inputs are never mutated; the output borrows from them.

use tracing::debug;

use crate::criteria::{Criteria, Filterable, Sort};

/// Records satisfying every active filter, in their original relative order.
///
/// Accepts anything yielding record references, so a derived view can be
/// filtered again.
pub fn filter<'r, R, I>(records: I, criteria: &Criteria) -> Vec<&'r R>
where
    R: Filterable + 'r,
    I: IntoIterator<Item = &'r R>,
{
    let matcher = criteria.matcher();

    records
        .into_iter()
        .filter(|record| matcher.admits(*record))
        .collect()
}

/// Stable sort of a view. Records that compare equal keep their order.
pub fn sort<R: Filterable>(view: &mut [&R], sort: Sort) {
    view.sort_by(|left, right| sort.compare(*left, *right));
}

/// Filter, then apply the explicit sort if one is set.
pub fn derive_view<'r, R, I>(records: I, criteria: &Criteria) -> Vec<&'r R>
where
    R: Filterable + 'r,
    I: IntoIterator<Item = &'r R>,
{
    let mut view = filter(records, criteria);

    if let Some(explicit) = criteria.sort {
        sort(&mut view, explicit);
    }

    debug!(
        matched = view.len(),
        search = %criteria.search,
        sorted = criteria.sort.is_some(),
        "derived view"
    );

    view
}
