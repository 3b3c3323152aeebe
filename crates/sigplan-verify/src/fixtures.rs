//! Builders shared by the unit tests of the safety checks.

use std::collections::BTreeMap;

use sigplan_core::{
    Conflict, DurationBounds, FixedTimeSchedule, GreenYellowInterval, Intersection,
    PeriodicOrder, Relation, SignalGroup, TrafficLight,
};

pub(crate) fn sg(id: &str, greenyellow: (f64, f64), red: (f64, f64)) -> SignalGroup {
    SignalGroup::new(
        id,
        vec![TrafficLight::new(1800.0, 0.0).unwrap()],
        DurationBounds::new(greenyellow.0, greenyellow.1),
        DurationBounds::new(red.0, red.1),
        1,
        3,
    )
    .unwrap()
}

/// Signal group with loose bounds that never trigger a bounds violation.
pub(crate) fn loose(id: &str) -> SignalGroup {
    sg(id, (0.0, 100.0), (0.0, 100.0))
}

pub(crate) fn intersection(
    signalgroups: Vec<SignalGroup>,
    conflicts: Vec<Conflict>,
    relations: Vec<Relation>,
    orders: Vec<PeriodicOrder>,
) -> Intersection {
    Intersection::new(signalgroups, conflicts, relations, orders).unwrap()
}

fn intervals(entries: &[(&str, &[(f64, f64)])]) -> BTreeMap<String, Vec<GreenYellowInterval>> {
    entries
        .iter()
        .map(|(id, list)| {
            let list = list
                .iter()
                .map(|&(s, e)| GreenYellowInterval::new(s, e).unwrap())
                .collect();
            (id.to_string(), list)
        })
        .collect()
}

pub(crate) fn schedule(period: f64, entries: &[(&str, &[(f64, f64)])]) -> FixedTimeSchedule {
    FixedTimeSchedule::new(intervals(entries), period).unwrap()
}

/// Schedule that skips construction checks, for probing the validators.
pub(crate) fn unchecked(period: f64, entries: &[(&str, &[(f64, f64)])]) -> FixedTimeSchedule {
    FixedTimeSchedule::from_parts_unchecked(intervals(entries), period)
}
