use sigplan_core::{FixedTimeSchedule, Intersection};

use crate::error::{Result, SafetyViolation};

/// Every signal group of the intersection needs at least one greenyellow
/// interval in the schedule.
pub fn validate_completeness(intersection: &Intersection, fts: &FixedTimeSchedule) -> Result<()> {
    for signalgroup in intersection.signalgroups() {
        let scheduled = fts
            .greenyellow_intervals(signalgroup.id())
            .is_ok_and(|intervals| !intervals.is_empty());
        if !scheduled {
            return Err(SafetyViolation::Incomplete {
                id: signalgroup.id().to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{intersection, loose, schedule};

    #[test]
    fn all_groups_scheduled() {
        let i = intersection(vec![loose("sg1"), loose("sg2")], vec![], vec![], vec![]);
        let fts = schedule(100.0, &[("sg1", &[(10.0, 30.0)]), ("sg2", &[(40.0, 60.0)])]);
        assert!(validate_completeness(&i, &fts).is_ok());
    }

    #[test]
    fn missing_group() {
        let i = intersection(vec![loose("sg1"), loose("sg2")], vec![], vec![], vec![]);
        let fts = schedule(100.0, &[("sg1", &[(10.0, 30.0)])]);
        assert_eq!(
            validate_completeness(&i, &fts),
            Err(SafetyViolation::Incomplete { id: "sg2".into() })
        );
    }

    #[test]
    fn empty_interval_list() {
        let i = intersection(vec![loose("sg1")], vec![], vec![], vec![]);
        let fts = schedule(100.0, &[("sg1", &[])]);
        assert!(validate_completeness(&i, &fts).is_err());
    }

    #[test]
    fn extra_groups_in_schedule_are_ignored() {
        let i = intersection(vec![loose("sg1")], vec![], vec![], vec![]);
        let fts = schedule(100.0, &[("sg1", &[(10.0, 30.0)]), ("sg9", &[(40.0, 60.0)])]);
        assert!(validate_completeness(&i, &fts).is_ok());
    }
}
