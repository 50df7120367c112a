//! Chronological merge of measurement collections
//!
//! Combines two collections into one list ordered latest first, with exact
//! duplicates removed.
//!
//! # Ordering
//!
//! Measurements are ordered by [`TimeKey`](crate::storage::TimeKey), most
//! recent first. Measurements taken in the same minute are tied; ties keep
//! insertion order: everything from `new` before anything from `old`, and
//! within one input the original relative order (both sorts are stable).

use crate::storage::types::Measurement;

/// Merge `new` and `old` into one descending, duplicate-free collection
///
/// When both inputs hold an identical record, the copy from `new` is kept.
pub fn merge(new: &[Measurement], old: &[Measurement]) -> Vec<Measurement> {
    let new = sorted_descending(new);
    let old = sorted_descending(old);

    let mut result = Vec::with_capacity(new.len() + old.len());
    let mut skipped = 0usize;
    for item in new.into_iter().chain(old) {
        if !insert_measurement(&mut result, item) {
            skipped += 1;
        }
    }

    if skipped > 0 {
        tracing::debug!(skipped, kept = result.len(), "Dropped duplicate measurements");
    }
    result
}

/// Merge any number of collections pairwise
///
/// Earlier sources count as newer: their copy of a duplicate wins.
pub fn merge_all<I>(sources: I) -> Vec<Measurement>
where
    I: IntoIterator<Item = Vec<Measurement>>,
{
    sources
        .into_iter()
        .fold(Vec::new(), |merged, source| merge(&merged, &source))
}

/// Stable sort, latest first
fn sorted_descending(items: &[Measurement]) -> Vec<Measurement> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| b.time_key().cmp(&a.time_key()));
    sorted
}

/// Insert `item` after every element at least as recent as it
///
/// Returns false when an identical measurement is already present.
fn insert_measurement(result: &mut Vec<Measurement>, item: Measurement) -> bool {
    let pos = result.partition_point(|existing| existing.is_later_or_equal(&item));

    // Identical records share a key, so they can only sit in the tied run
    // directly before the insertion point.
    let key = item.time_key();
    let duplicate = result[..pos]
        .iter()
        .rev()
        .take_while(|existing| existing.time_key() == key)
        .any(|existing| *existing == item);

    if duplicate {
        tracing::trace!(timestamp = %item.timestamp_label(), "Skipping duplicate measurement");
        return false;
    }

    result.insert(pos, item);
    true
}
