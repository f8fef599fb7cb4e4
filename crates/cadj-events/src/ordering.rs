//! Batch normalization: unordered raw records → validated chronological
//! sequence.

use crate::record::{CorporateAction, EventError, RawCorporateAction};

/// Normalize an unordered batch of raw records.
///
/// - Records whose effect fields sum to zero are skipped.
/// - Any remaining invalid record aborts the whole batch.
/// - The result is sorted ascending by ex-date. Same-day ties apply
///   pure-cash events before share-bearing ones (composition is not
///   commutative, so the order must be deterministic); the sort is stable
///   within each class.
pub fn sort_events(raws: &[RawCorporateAction]) -> Result<Vec<CorporateAction>, EventError> {
    let mut events = Vec::with_capacity(raws.len());
    for raw in raws {
        if raw.is_noop() {
            continue;
        }
        events.push(CorporateAction::from_raw(raw)?);
    }
    events.sort_by(|a, b| {
        a.ex_date
            .cmp(&b.ex_date)
            .then_with(|| b.is_pure_cash().cmp(&a.is_pure_cash()))
    });
    Ok(events)
}
