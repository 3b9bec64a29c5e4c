//! Ranking Engine: total order over normalized records.
//!
//! Order, applied lexicographically:
//! 1. redeemed before not redeemed
//! 2. total score, descending
//! 3. original index, ascending
//!
//! `original_index` is unique within a cycle, so the comparator never
//! reports two distinct records as equal and the result does not depend on
//! sort stability.

use std::cmp::Ordering;

use crate::model::NormalizedRecord;

/// Canonical leaderboard comparator.
pub fn compare(a: &NormalizedRecord, b: &NormalizedRecord) -> Ordering {
    b.redeemed
        .cmp(&a.redeemed)
        .then_with(|| b.total_score.cmp(&a.total_score))
        .then_with(|| a.original_index.cmp(&b.original_index))
}

/// Sort records into leaderboard order and assign `rank = position + 1`.
///
/// Any rank from a previous pass is overwritten, so ranking twice yields
/// the same assignment.
pub fn rank(mut records: Vec<NormalizedRecord>) -> Vec<NormalizedRecord> {
    records.sort_unstable_by(compare);
    for (position, record) in records.iter_mut().enumerate() {
        record.rank = Some(position + 1);
    }
    records
}
