//! Safety validation orchestrator.
//!
//! Runs bounds, conflicts, relations, fixed orders and completeness in that
//! order and stops at the first violation.

use sigplan_core::{FixedTimeSchedule, Intersection};
use tracing::debug;

use crate::bounds::validate_bounds;
use crate::completeness::validate_completeness;
use crate::conflicts::validate_conflicts;
use crate::error::Result;
use crate::fixed_orders::validate_fixed_orders;
use crate::profile::Tolerances;
use crate::relations::validate_relations;
use crate::report::{Check, CheckOutcome, ValidationReport};

/// Validate a fixed-time schedule against all safety restrictions of an
/// intersection.
///
/// `tolerance` (in seconds) applies to the bounds and relation checks; the
/// conflict margin and the order epsilon keep their defaults. Use
/// [`SafetyValidator`] to configure each tolerance separately.
pub fn validate_safety_restrictions(
    intersection: &Intersection,
    fixed_time_schedule: &FixedTimeSchedule,
    tolerance: f64,
) -> Result<()> {
    SafetyValidator::new(Tolerances::uniform(tolerance)).validate(intersection, fixed_time_schedule)
}

/// Runs the safety checks with a fixed set of tolerances.
#[derive(Debug, Clone, Default)]
pub struct SafetyValidator {
    tolerances: Tolerances,
}

impl SafetyValidator {
    pub fn new(tolerances: Tolerances) -> Self {
        Self { tolerances }
    }

    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    fn run(&self, check: Check, intersection: &Intersection, fts: &FixedTimeSchedule) -> Result<()> {
        let t = &self.tolerances;
        match check {
            Check::Bounds => validate_bounds(intersection, fts, t.bounds),
            Check::Conflicts => validate_conflicts(intersection, fts, t.conflict_margin),
            Check::Relations => validate_relations(intersection, fts, t.relations),
            Check::FixedOrders => validate_fixed_orders(intersection, fts, t.order),
            Check::Completeness => validate_completeness(intersection, fts),
        }
    }

    /// Fail on the first violated safety restriction.
    pub fn validate(&self, intersection: &Intersection, fts: &FixedTimeSchedule) -> Result<()> {
        for check in Check::ALL {
            debug!(%check, "running safety check");
            self.run(check, intersection, fts)?;
        }
        Ok(())
    }

    /// Like [`validate`](Self::validate), but records which checks ran.
    pub fn report(&self, intersection: &Intersection, fts: &FixedTimeSchedule) -> ValidationReport {
        let mut checks = Vec::with_capacity(Check::ALL.len());
        let mut violation = None;
        for check in Check::ALL {
            debug!(%check, "running safety check");
            match self.run(check, intersection, fts) {
                Ok(()) => checks.push(CheckOutcome {
                    check,
                    passed: true,
                }),
                Err(v) => {
                    debug!(%check, violation = %v, "safety check failed");
                    checks.push(CheckOutcome {
                        check,
                        passed: false,
                    });
                    violation = Some(v);
                    break;
                }
            }
        }
        ValidationReport {
            profile: self.tolerances.level,
            checks,
            violation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SafetyViolation;
    use crate::fixtures::{intersection, loose, schedule, sg};
    use crate::periodic::SAFETY_EPSILON;
    use sigplan_core::{Conflict, PeriodicOrder, Relation};

    fn three_groups() -> Intersection {
        intersection(
            vec![
                sg("sg1", (5.0, 30.0), (10.0, 100.0)),
                sg("sg2", (5.0, 30.0), (10.0, 100.0)),
                sg("sg3", (5.0, 30.0), (10.0, 100.0)),
                loose("sg4"),
            ],
            vec![
                Conflict::new("sg1", "sg2", 2.0, 2.0).unwrap(),
                Conflict::new("sg2", "sg3", 2.0, 2.0).unwrap(),
                Conflict::new("sg3", "sg1", 2.0, 2.0).unwrap(),
            ],
            vec![Relation::sync_start("sg1", "sg4").unwrap()],
            vec![PeriodicOrder::new(["sg1", "sg2", "sg3"]).unwrap()],
        )
    }

    #[test]
    fn safe_schedule() {
        let fts = schedule(
            60.0,
            &[
                ("sg1", &[(0.0, 15.0)]),
                ("sg2", &[(20.0, 35.0)]),
                ("sg3", &[(40.0, 55.0)]),
                ("sg4", &[(0.0, 10.0)]),
            ],
        );
        let i = three_groups();
        assert!(validate_safety_restrictions(&i, &fts, SAFETY_EPSILON).is_ok());

        let report = SafetyValidator::default().report(&i, &fts);
        assert!(report.is_safe());
        assert_eq!(report.checks.len(), Check::ALL.len());
    }

    #[test]
    fn first_violation_wins() {
        // sg2 is too long and overlaps sg3: the bounds check reports first
        let fts = schedule(
            60.0,
            &[
                ("sg1", &[(0.0, 15.0)]),
                ("sg2", &[(20.0, 52.0)]),
                ("sg3", &[(40.0, 55.0)]),
                ("sg4", &[(0.0, 10.0)]),
            ],
        );
        let err = validate_safety_restrictions(&three_groups(), &fts, SAFETY_EPSILON).unwrap_err();
        assert!(matches!(err, SafetyViolation::Bounds { ref id, .. } if id == "sg2"));

        let report = SafetyValidator::default().report(&three_groups(), &fts);
        assert_eq!(report.failed_check(), Some(Check::Bounds));
        assert_eq!(report.checks.len(), 1);
    }

    #[test]
    fn missing_group_reported_by_completeness() {
        let fts = schedule(
            60.0,
            &[("sg1", &[(0.0, 15.0)]), ("sg2", &[(20.0, 35.0)]), ("sg3", &[(40.0, 55.0)])],
        );
        let err = validate_safety_restrictions(&three_groups(), &fts, SAFETY_EPSILON).unwrap_err();
        assert_eq!(err, SafetyViolation::Incomplete { id: "sg4".into() });
    }

    #[test]
    fn order_checked_before_completeness() {
        let i = intersection(
            vec![loose("sg1"), loose("sg2"), loose("sg3")],
            vec![
                Conflict::new("sg1", "sg2", 1.0, 1.0).unwrap(),
                Conflict::new("sg2", "sg3", 1.0, 1.0).unwrap(),
                Conflict::new("sg3", "sg1", 1.0, 1.0).unwrap(),
            ],
            vec![],
            vec![PeriodicOrder::new(["sg1", "sg3", "sg2"]).unwrap()],
        );
        let fts = schedule(
            40.0,
            &[("sg1", &[(2.0, 10.0)]), ("sg2", &[(12.0, 20.0)]), ("sg3", &[(22.0, 30.0)])],
        );
        let report = SafetyValidator::default().report(&i, &fts);
        assert_eq!(report.failed_check(), Some(Check::FixedOrders));
    }

    #[test]
    fn validation_is_idempotent() {
        let fts = schedule(
            60.0,
            &[("sg1", &[(0.0, 15.0)]), ("sg2", &[(20.0, 35.0)]), ("sg3", &[(40.0, 55.0)])],
        );
        let i = three_groups();
        let validator = SafetyValidator::new(Tolerances::strict());
        assert_eq!(validator.validate(&i, &fts), validator.validate(&i, &fts));
    }
}
