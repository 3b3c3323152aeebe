//! Clearance times between conflicting signal groups.

use sigplan_core::{Conflict, FixedTimeSchedule, GreenYellowInterval, Intersection};
use tracing::trace;

use crate::error::{Result, SafetyViolation};
use crate::periodic::{overlap, wrap_duration, PeriodicInterval};

/// Check every pair of greenyellow intervals of every conflict.
///
/// A greenyellow interval of `id1` forbids `id2` from being greenyellow from
/// `setup21` seconds before its start until `setup12` seconds after its end.
/// `margin` shrinks the forbidden window on both sides.
pub fn validate_conflicts(
    intersection: &Intersection,
    fts: &FixedTimeSchedule,
    margin: f64,
) -> Result<()> {
    for conflict in intersection.conflicts() {
        let (Ok(intervals1), Ok(intervals2)) = (
            fts.greenyellow_intervals(conflict.id1()),
            fts.greenyellow_intervals(conflict.id2()),
        ) else {
            continue;
        };
        for (index1, interval1) in intervals1.iter().enumerate() {
            for (index2, interval2) in intervals2.iter().enumerate() {
                if !conflict_satisfied(interval1, interval2, fts.period(), conflict, margin) {
                    trace!(
                        id1 = conflict.id1(),
                        index1,
                        id2 = conflict.id2(),
                        index2,
                        "clearance violated"
                    );
                    return Err(SafetyViolation::Conflict {
                        id1: conflict.id1().to_string(),
                        index1,
                        id2: conflict.id2().to_string(),
                        index2,
                    });
                }
            }
        }
    }
    Ok(())
}

/// Whether `interval2` of `conflict.id2()` keeps clear of the window that
/// `interval1` of `conflict.id1()` forbids.
pub fn conflict_satisfied(
    interval1: &GreenYellowInterval,
    interval2: &GreenYellowInterval,
    period: f64,
    conflict: &Conflict,
    margin: f64,
) -> bool {
    let greenyellow1 = greenyellow_duration(interval1, period);
    let span = greenyellow1 + conflict.setup12() + conflict.setup21() - 2.0 * margin;
    if span >= period {
        // the window covers the whole cycle
        return false;
    }

    let forbidden = PeriodicInterval::new(
        (interval1.start() - conflict.setup21() + margin).rem_euclid(period),
        (interval1.end() + conflict.setup12() - margin).rem_euclid(period),
    );
    overlap(forbidden, PeriodicInterval::from(interval2), period).is_empty()
}

/// Length of a greenyellow interval; `[0, period]` lasts the whole period.
fn greenyellow_duration(interval: &GreenYellowInterval, period: f64) -> f64 {
    if interval.end() - interval.start() >= period {
        period
    } else {
        wrap_duration(interval.start(), interval.end(), period, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{intersection, loose, schedule, sg, unchecked};
    use crate::periodic::CONFLICT_MARGIN;

    fn pair(setup12: f64, setup21: f64) -> Intersection {
        intersection(
            vec![loose("sg1"), loose("sg2")],
            vec![Conflict::new("sg1", "sg2", setup12, setup21).unwrap()],
            vec![],
            vec![],
        )
    }

    #[test]
    fn clearance_respected() {
        let i = pair(2.0, 3.0);
        let fts = schedule(100.0, &[("sg1", &[(10.0, 40.0)]), ("sg2", &[(42.0, 7.0)])]);
        assert!(validate_conflicts(&i, &fts, CONFLICT_MARGIN).is_ok());
    }

    #[test]
    fn clearance_too_short_after_end() {
        let i = pair(2.0, 3.0);
        let fts = schedule(100.0, &[("sg1", &[(10.0, 40.0)]), ("sg2", &[(41.0, 7.0)])]);
        let err = validate_conflicts(&i, &fts, CONFLICT_MARGIN).unwrap_err();
        assert_eq!(
            err,
            SafetyViolation::Conflict {
                id1: "sg1".into(),
                index1: 0,
                id2: "sg2".into(),
                index2: 0,
            }
        );
    }

    #[test]
    fn clearance_too_short_before_start() {
        let i = pair(2.0, 3.0);
        let fts = schedule(100.0, &[("sg1", &[(10.0, 40.0)]), ("sg2", &[(42.0, 8.0)])]);
        assert!(validate_conflicts(&i, &fts, CONFLICT_MARGIN).is_err());
    }

    #[test]
    fn simultaneous_greenyellow() {
        let i = pair(2.0, 3.0);
        let fts = schedule(100.0, &[("sg1", &[(10.0, 40.0)]), ("sg2", &[(20.0, 30.0)])]);
        assert!(validate_conflicts(&i, &fts, CONFLICT_MARGIN).is_err());
    }

    #[test]
    fn negative_setup_allows_overlap() {
        let i = intersection(
            vec![sg("sg1", (5.0, 100.0), (0.0, 100.0)), loose("sg2")],
            vec![Conflict::new("sg1", "sg2", -2.0, 3.0).unwrap()],
            vec![],
            vec![],
        );
        let fts = schedule(100.0, &[("sg1", &[(10.0, 40.0)]), ("sg2", &[(38.0, 7.0)])]);
        assert!(validate_conflicts(&i, &fts, CONFLICT_MARGIN).is_ok());
    }

    #[test]
    fn every_index_pair_is_checked() {
        let i = pair(2.0, 3.0);
        let fts = schedule(
            100.0,
            &[("sg1", &[(10.0, 20.0), (50.0, 60.0)]), ("sg2", &[(25.0, 45.0), (61.0, 5.0)])],
        );
        let err = validate_conflicts(&i, &fts, CONFLICT_MARGIN).unwrap_err();
        assert!(matches!(err, SafetyViolation::Conflict { index1: 1, index2: 1, .. }));
    }

    #[test]
    fn window_covering_the_cycle() {
        let conflict = Conflict::new("sg1", "sg2", 30.0, 30.0).unwrap();
        let a = GreenYellowInterval::new(0.0, 50.0).unwrap();
        let b = GreenYellowInterval::new(70.0, 75.0).unwrap();
        assert!(!conflict_satisfied(&a, &b, 100.0, &conflict, CONFLICT_MARGIN));
    }

    #[test]
    fn greenyellow_during_whole_period() {
        let i = intersection(
            vec![loose("sg1"), sg("sg2", (5.0, 100.0), (0.0, 100.0))],
            vec![Conflict::new("sg1", "sg2", 1.0, -1.0).unwrap()],
            vec![],
            vec![],
        );
        let fts = schedule(100.0, &[("sg1", &[(0.0, 100.0)]), ("sg2", &[(20.0, 30.0)])]);
        assert!(matches!(
            validate_conflicts(&i, &fts, CONFLICT_MARGIN),
            Err(SafetyViolation::Conflict { index1: 0, index2: 0, .. })
        ));
        assert!(crate::validate_safety_restrictions(&i, &fts, 0.01).is_err());
    }

    #[test]
    fn opposite_setups_shift_the_window() {
        let i = intersection(
            vec![sg("sg1", (5.0, 100.0), (0.0, 100.0)), sg("sg2", (5.0, 100.0), (0.0, 100.0))],
            vec![Conflict::new("sg1", "sg2", 1.0, -1.0).unwrap()],
            vec![],
            vec![],
        );
        let clear = schedule(100.0, &[("sg1", &[(10.0, 40.0)]), ("sg2", &[(41.5, 8.5)])]);
        assert!(validate_conflicts(&i, &clear, CONFLICT_MARGIN).is_ok());
        let overlapping = schedule(100.0, &[("sg1", &[(10.0, 40.0)]), ("sg2", &[(35.0, 8.5)])]);
        assert!(validate_conflicts(&i, &overlapping, CONFLICT_MARGIN).is_err());
    }

    #[test]
    fn missing_group_is_skipped() {
        let i = pair(2.0, 3.0);
        let fts = unchecked(100.0, &[("sg1", &[(10.0, 40.0)])]);
        assert!(validate_conflicts(&i, &fts, CONFLICT_MARGIN).is_ok());
    }
}
