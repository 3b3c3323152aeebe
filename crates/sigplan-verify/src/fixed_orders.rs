//! Fixed periodic orders of greenyellow intervals.

use sigplan_core::{FixedTimeSchedule, Intersection, PeriodicOrder};

use crate::error::{Result, SafetyViolation};
use crate::periodic::wrap_duration;

/// Check every periodic order of the intersection.
pub fn validate_fixed_orders(
    intersection: &Intersection,
    fts: &FixedTimeSchedule,
    epsilon: f64,
) -> Result<()> {
    for order in intersection.periodic_orders() {
        validate_fixed_order(order, fts, epsilon)?;
    }
    Ok(())
}

/// Check that the greenyellow intervals start in the given order.
///
/// Times are measured from the start of the first interval of the first
/// signal group of the order; walking the order, and within each signal
/// group its intervals, these times must never decrease.
pub fn validate_fixed_order(
    order: &PeriodicOrder,
    fts: &FixedTimeSchedule,
    epsilon: f64,
) -> Result<()> {
    let Ok(anchor) = fts.greenyellow_interval(order.first(), 0) else {
        return Ok(());
    };
    let anchor = anchor.start();

    let mut prev_switch = 0.0;
    for id in order.iter() {
        let Ok(intervals) = fts.greenyellow_intervals(id) else {
            continue;
        };
        for interval in intervals {
            let switch = wrap_duration(anchor, interval.start(), fts.period(), epsilon);
            if switch < prev_switch {
                return Err(SafetyViolation::FixedOrder {
                    order: order.ids().to_vec(),
                });
            }
            prev_switch = switch;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::schedule;
    use crate::periodic::ORDER_EPSILON;

    fn order(ids: &[&str]) -> PeriodicOrder {
        PeriodicOrder::new(ids.iter().copied()).unwrap()
    }

    #[test]
    fn order_respected() {
        let fts = schedule(
            40.0,
            &[("sg1", &[(2.0, 10.0)]), ("sg2", &[(12.0, 20.0)]), ("sg3", &[(22.0, 30.0)])],
        );
        assert!(validate_fixed_order(&order(&["sg1", "sg2", "sg3"]), &fts, ORDER_EPSILON).is_ok());
        // any rotation of the order is the same periodic order
        assert!(validate_fixed_order(&order(&["sg2", "sg3", "sg1"]), &fts, ORDER_EPSILON).is_ok());
    }

    #[test]
    fn order_violated() {
        let fts = schedule(
            40.0,
            &[("sg1", &[(2.0, 10.0)]), ("sg2", &[(12.0, 20.0)]), ("sg3", &[(22.0, 30.0)])],
        );
        let err = validate_fixed_order(&order(&["sg1", "sg3", "sg2"]), &fts, ORDER_EPSILON).unwrap_err();
        assert_eq!(
            err,
            SafetyViolation::FixedOrder {
                order: vec!["sg1".into(), "sg3".into(), "sg2".into()]
            }
        );
    }

    #[test]
    fn multiple_intervals_must_fit_in_slot() {
        let fts = schedule(
            60.0,
            &[("sg1", &[(0.0, 5.0), (10.0, 15.0)]), ("sg2", &[(20.0, 25.0), (40.0, 45.0)])],
        );
        assert!(validate_fixed_order(&order(&["sg1", "sg2"]), &fts, ORDER_EPSILON).is_ok());

        let fts = schedule(
            60.0,
            &[("sg1", &[(0.0, 5.0), (30.0, 35.0)]), ("sg2", &[(20.0, 25.0), (40.0, 45.0)])],
        );
        assert!(validate_fixed_order(&order(&["sg1", "sg2"]), &fts, ORDER_EPSILON).is_err());
    }

    #[test]
    fn missing_anchor_is_skipped() {
        let fts = schedule(40.0, &[("sg2", &[(12.0, 20.0)])]);
        assert!(validate_fixed_order(&order(&["sg1", "sg2"]), &fts, ORDER_EPSILON).is_ok());
    }
}
