//! Synchronization relations: sync starts, offsets, greenyellow leads and
//! greenyellow trails.
//!
//! A relation holds when the greenyellow intervals of both signal groups can
//! be paired up by one cyclic re-indexing `i -> (i + k) mod n` such that every
//! pair satisfies the relation.

use sigplan_core::{FixedTimeSchedule, GreenYellowInterval, Intersection, Relation, SwitchEvent};
use tracing::trace;

use crate::error::{MatchError, Result, SafetyViolation};

fn event_time(interval: &GreenYellowInterval, event: SwitchEvent) -> f64 {
    match event {
        SwitchEvent::GreenyellowStart => interval.start(),
        SwitchEvent::GreenyellowEnd => interval.end(),
    }
}

/// `matches[i][j]` is true iff to-interval `j` satisfies the relation with
/// respect to from-interval `i`.
///
/// The gap between the two switch moments is taken on the cycle in the range
/// `[min - tolerance, min - tolerance + period)`, so a negative window (the
/// to-group switching first) is handled the same way as a positive one.
pub fn match_matrix(
    relation: &Relation,
    from: &[GreenYellowInterval],
    to: &[GreenYellowInterval],
    period: f64,
    tolerance: f64,
) -> Vec<Vec<bool>> {
    let event = relation.event();
    let (min, max) = relation.window();
    let lower = min - tolerance;
    from.iter()
        .map(|interval_from| {
            let time_from = event_time(interval_from, event);
            to.iter()
                .map(|interval_to| {
                    let time_to = event_time(interval_to, event);
                    let gap = (time_to - time_from - lower).rem_euclid(period) + lower;
                    lower < gap && gap < max + tolerance
                })
                .collect()
        })
        .collect()
}

/// Smallest shift `k` such that `matches[i][(i + k) mod n]` holds for every
/// row `i`, or `None` if there is no such shift.
pub fn consistent_shift(matches: &[Vec<bool>]) -> std::result::Result<Option<usize>, MatchError> {
    let n = matches.len();
    if let Some((row, r)) = matches.iter().enumerate().find(|(_, r)| r.len() != n) {
        return Err(MatchError {
            row,
            len: r.len(),
            n,
        });
    }
    Ok((0..n).find(|&shift| (0..n).all(|row| matches[row][(row + shift) % n])))
}

/// Shift that pairs the intervals of both signal groups of `relation`.
///
/// Returns `Ok(None)` when one of the signal groups has no intervals in the
/// schedule; that case is left to the completeness check.
pub fn relation_shift(
    relation: &Relation,
    fts: &FixedTimeSchedule,
    tolerance: f64,
) -> Result<Option<usize>> {
    let (Ok(from), Ok(to)) = (
        fts.greenyellow_intervals(relation.from_id()),
        fts.greenyellow_intervals(relation.to_id()),
    ) else {
        return Ok(None);
    };
    if from.is_empty() || to.is_empty() {
        return Ok(None);
    }
    if from.len() != to.len() {
        return Err(SafetyViolation::IntervalCountMismatch {
            kind: relation.kind(),
            from_id: relation.from_id().to_string(),
            to_id: relation.to_id().to_string(),
            from_count: from.len(),
            to_count: to.len(),
        });
    }

    let matches = match_matrix(relation, from, to, fts.period(), tolerance);
    match consistent_shift(&matches)? {
        Some(shift) => {
            trace!(relation = %relation, shift, "relation satisfied");
            Ok(Some(shift))
        }
        None => Err(SafetyViolation::Relation {
            kind: relation.kind(),
            from_id: relation.from_id().to_string(),
            to_id: relation.to_id().to_string(),
        }),
    }
}

/// Check every relation of the intersection.
pub fn validate_relations(
    intersection: &Intersection,
    fts: &FixedTimeSchedule,
    tolerance: f64,
) -> Result<()> {
    for relation in intersection.other_relations() {
        relation_shift(relation, fts, tolerance)?;
    }
    Ok(())
}
