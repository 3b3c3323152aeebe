//! Minimum and maximum durations of greenyellow and red intervals.

use sigplan_core::{FixedTimeSchedule, Intersection};
use tracing::trace;

use crate::error::{Bound, Result, SafetyViolation};
use crate::periodic::wrap_duration;

/// Check every greenyellow interval and the red interval preceding it
/// against the bounds of its signal group.
///
/// Intervals are walked in storage order; the red interval before the
/// first one starts at the end of the last one. Signal groups without
/// intervals are left to the completeness check.
pub fn validate_bounds(
    intersection: &Intersection,
    fts: &FixedTimeSchedule,
    tolerance: f64,
) -> Result<()> {
    let period = fts.period();
    for signalgroup in intersection.signalgroups() {
        let Ok(intervals) = fts.greenyellow_intervals(signalgroup.id()) else {
            continue;
        };
        let Some(last) = intervals.last() else {
            continue;
        };

        let mut prev_end = last.end();
        for (index, interval) in intervals.iter().enumerate() {
            let red = wrap_duration(prev_end, interval.start(), period, tolerance);
            let greenyellow = wrap_duration(interval.start(), interval.end(), period, tolerance);
            trace!(id = signalgroup.id(), index, red, greenyellow, "interval durations");

            let checks = [
                (Bound::MinRed, red, signalgroup.min_red()),
                (Bound::MaxRed, red, signalgroup.max_red()),
                (Bound::MinGreenyellow, greenyellow, signalgroup.min_greenyellow()),
                (Bound::MaxGreenyellow, greenyellow, signalgroup.max_greenyellow()),
            ];
            for (bound, actual, limit) in checks {
                let violated = if bound.is_min() {
                    actual < limit - tolerance
                } else {
                    actual > limit + tolerance
                };
                if violated {
                    return Err(SafetyViolation::Bounds {
                        id: signalgroup.id().to_string(),
                        index,
                        bound,
                        actual,
                        limit,
                    });
                }
            }
            prev_end = interval.end();
        }
    }
    Ok(())
}
