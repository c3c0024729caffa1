//! Ordering nodes by score.

/// Node indices ordered by descending score.
///
/// Ties keep ascending index order, so equal scores always rank the same way
/// across runs. `NaN` sorts above every number; scores returned by
/// [`crate::hits::hits`] never contain it.
#[must_use]
pub fn rank_descending(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    order
}
