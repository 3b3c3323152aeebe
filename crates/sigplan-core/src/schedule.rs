//! Fixed-time schedules: periodically repeating greenyellow intervals.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{require_above, require_at_least, ModelError, Result};

/// Sort key used for human-readable output: shorter ids first, so that
/// `sg2` is listed before `sg10`.
pub fn by_name(id: &str) -> (usize, &str) {
    (id.len(), id)
}

/// A greenyellow interval `[start, end]` within one period.
///
/// This covers the green signal state and every other non-red state around
/// it (yellow, red-yellow). `start > end` means the interval wraps through
/// time 0 of the period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(f64, f64)", into = "(f64, f64)")]
pub struct GreenYellowInterval {
    start: f64,
    end: f64,
}

impl GreenYellowInterval {
    pub fn new(start: f64, end: f64) -> Result<Self> {
        require_at_least("greenyellow interval", "start", start, 0.0)?;
        require_at_least("greenyellow interval", "end", end, 0.0)?;
        Ok(Self { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    /// Whether the interval passes through time 0 of the period.
    pub fn wraps(&self) -> bool {
        self.start > self.end
    }
}

impl TryFrom<(f64, f64)> for GreenYellowInterval {
    type Error = ModelError;

    fn try_from((start, end): (f64, f64)) -> Result<Self> {
        GreenYellowInterval::new(start, end)
    }
}

impl From<GreenYellowInterval> for (f64, f64) {
    fn from(interval: GreenYellowInterval) -> Self {
        (interval.start, interval.end)
    }
}

impl fmt::Display for GreenYellowInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.2}, {:.2}]", self.start, self.end)
    }
}

/// A periodically repeating schedule of greenyellow intervals per signal
/// group.
///
/// Per signal group the intervals are listed in periodic order: once the
/// list is rotated so that the earliest-starting interval comes first, the
/// starts are strictly increasing and the intervals do not overlap. Only
/// the last interval of that rotation may wrap through time 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScheduleRecord", into = "ScheduleRecord")]
pub struct FixedTimeSchedule {
    period: f64,
    greenyellow_intervals: BTreeMap<String, Vec<GreenYellowInterval>>,
}

#[derive(Clone, Serialize, Deserialize)]
struct ScheduleRecord {
    greenyellow_intervals: BTreeMap<String, Vec<GreenYellowInterval>>,
    period: f64,
}

impl TryFrom<ScheduleRecord> for FixedTimeSchedule {
    type Error = ModelError;

    fn try_from(r: ScheduleRecord) -> Result<Self> {
        FixedTimeSchedule::new(r.greenyellow_intervals, r.period)
    }
}

impl From<FixedTimeSchedule> for ScheduleRecord {
    fn from(s: FixedTimeSchedule) -> Self {
        Self {
            greenyellow_intervals: s.greenyellow_intervals,
            period: s.period,
        }
    }
}

impl FixedTimeSchedule {
    pub fn new(
        greenyellow_intervals: BTreeMap<String, Vec<GreenYellowInterval>>,
        period: f64,
    ) -> Result<Self> {
        require_above("fixed-time schedule", "period", period, 0.0)?;
        for (id, intervals) in &greenyellow_intervals {
            for interval in intervals {
                if interval.start > period || interval.end > period {
                    return Err(ModelError::IntervalOutsidePeriod {
                        id: id.clone(),
                        start: interval.start,
                        end: interval.end,
                        period,
                    });
                }
            }
            validate_sorted_and_disjoint(id, intervals)?;
        }
        Ok(Self {
            period,
            greenyellow_intervals,
        })
    }

    /// Assemble a schedule without checking any construction invariant.
    ///
    /// Intended for tooling that needs to hand deliberately malformed
    /// schedules to the safety checks.
    pub fn from_parts_unchecked(
        greenyellow_intervals: BTreeMap<String, Vec<GreenYellowInterval>>,
        period: f64,
    ) -> Self {
        Self {
            period,
            greenyellow_intervals,
        }
    }

    /// Period duration in seconds.
    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn includes_signalgroup(&self, id: &str) -> bool {
        self.greenyellow_intervals.contains_key(id)
    }

    pub fn greenyellow_intervals(&self, id: &str) -> Result<&[GreenYellowInterval]> {
        self.greenyellow_intervals
            .get(id)
            .map(Vec::as_slice)
            .ok_or_else(|| ModelError::NotScheduled(id.to_string()))
    }

    /// The `k`-th greenyellow interval of a signal group (0-based).
    pub fn greenyellow_interval(&self, id: &str, k: usize) -> Result<GreenYellowInterval> {
        let intervals = self.greenyellow_intervals(id)?;
        intervals
            .get(k)
            .copied()
            .ok_or_else(|| ModelError::IntervalIndex {
                id: id.to_string(),
                index: k,
                count: intervals.len(),
            })
    }

    /// All signal groups with their intervals, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[GreenYellowInterval])> + '_ {
        self.greenyellow_intervals
            .iter()
            .map(|(id, intervals)| (id.as_str(), intervals.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.greenyellow_intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.greenyellow_intervals.is_empty()
    }
}

fn validate_sorted_and_disjoint(id: &str, intervals: &[GreenYellowInterval]) -> Result<()> {
    let Some(first) = intervals
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.start.total_cmp(&b.start))
        .map(|(i, _)| i)
    else {
        return Ok(());
    };
    let mut rotated = intervals.to_vec();
    rotated.rotate_left(first);

    if rotated.windows(2).any(|w| w[1].start <= w[0].start) {
        return Err(ModelError::UnorderedIntervals(id.to_string()));
    }

    let earliest_start = rotated[0].start;
    let last = rotated.len() - 1;
    let mut prev_time = 0.0;
    for (k, interval) in rotated.iter().enumerate() {
        if interval.start < prev_time {
            return Err(ModelError::OverlappingIntervals(id.to_string()));
        }
        prev_time = interval.start;
        // a wrapping last interval must end before the first one starts
        let must_follow = k < last || interval.end >= earliest_start;
        if must_follow && interval.end < prev_time {
            return Err(ModelError::OverlappingIntervals(id.to_string()));
        }
        prev_time = interval.end;
    }
    Ok(())
}

impl fmt::Display for FixedTimeSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "fixed time schedule:")?;
        writeln!(f, "\tperiod: {}", self.period)?;
        write!(f, "\tgreenyellow intervals:")?;
        let width = self.greenyellow_intervals.keys().map(String::len).max().unwrap_or(0) + 2;
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|(a, _), (b, _)| by_name(a).cmp(&by_name(b)));
        for (id, intervals) in entries {
            write!(f, "\n\t\t{:<width$}", format!("{id}:"))?;
            let n = intervals.len();
            for (k, interval) in intervals.iter().enumerate() {
                if k > 0 && k + 1 < n {
                    write!(f, ", ")?;
                } else if k > 0 {
                    write!(f, " and ")?;
                }
                write!(f, "{interval}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gy(start: f64, end: f64) -> GreenYellowInterval {
        GreenYellowInterval::new(start, end).unwrap()
    }

    fn schedule(intervals: Vec<GreenYellowInterval>, period: f64) -> Result<FixedTimeSchedule> {
        FixedTimeSchedule::new(BTreeMap::from([("sg1".to_string(), intervals)]), period)
    }

    #[test]
    fn interval_rejects_negative() {
        assert!(GreenYellowInterval::new(-1.0, 10.0).is_err());
        assert!(GreenYellowInterval::new(1.0, f64::NAN).is_err());
        assert!(gy(50.0, 10.0).wraps());
    }

    #[test]
    fn accepts_sorted_disjoint() {
        assert!(schedule(vec![gy(10.0, 40.0), gy(50.0, 80.0), gy(80.0, 100.0)], 100.0).is_ok());
        // rotated storage order is fine
        assert!(schedule(vec![gy(50.0, 80.0), gy(90.0, 5.0), gy(10.0, 40.0)], 100.0).is_ok());
        assert!(schedule(vec![], 100.0).is_ok());
    }

    #[test]
    fn rejects_unordered() {
        let err = schedule(vec![gy(10.0, 40.0), gy(80.0, 100.0), gy(50.0, 80.0)], 100.0).unwrap_err();
        assert_eq!(err, ModelError::UnorderedIntervals("sg1".into()));
    }

    #[test]
    fn rejects_overlap() {
        let err = schedule(vec![gy(10.0, 40.0), gy(30.0, 60.0)], 100.0).unwrap_err();
        assert_eq!(err, ModelError::OverlappingIntervals("sg1".into()));
        // wrapping last interval running into the first one
        let err = schedule(vec![gy(10.0, 40.0), gy(60.0, 20.0)], 100.0).unwrap_err();
        assert_eq!(err, ModelError::OverlappingIntervals("sg1".into()));
    }

    #[test]
    fn rejects_outside_period() {
        let err = schedule(vec![gy(10.0, 140.0)], 100.0).unwrap_err();
        assert!(matches!(err, ModelError::IntervalOutsidePeriod { .. }));
        assert!(schedule(vec![gy(10.0, 40.0)], 0.0).is_err());
    }

    #[test]
    fn accessors() {
        let fts = schedule(vec![gy(10.0, 40.0), gy(50.0, 80.0)], 100.0).unwrap();
        assert_eq!(fts.period(), 100.0);
        assert!(fts.includes_signalgroup("sg1"));
        assert_eq!(fts.greenyellow_interval("sg1", 1).unwrap(), gy(50.0, 80.0));
        assert!(matches!(
            fts.greenyellow_interval("sg1", 2),
            Err(ModelError::IntervalIndex { count: 2, .. })
        ));
        assert_eq!(fts.greenyellow_intervals("sg2"), Err(ModelError::NotScheduled("sg2".into())));
    }

    #[test]
    fn json_round_trip() {
        let json = r#"{"greenyellow_intervals": {"sg1": [[10, 40], [50, 80]], "sg2": [[85, 5]]},
                       "period": 100}"#;
        let fts: FixedTimeSchedule = serde_json::from_str(json).unwrap();
        assert_eq!(fts.greenyellow_intervals("sg2").unwrap(), &[gy(85.0, 5.0)]);
        let value = serde_json::to_value(&fts).unwrap();
        assert_eq!(value["greenyellow_intervals"]["sg1"][1], serde_json::json!([50.0, 80.0]));
        let back: FixedTimeSchedule = serde_json::from_value(value).unwrap();
        assert_eq!(back, fts);
    }

    #[test]
    fn json_rejects_overlap() {
        let json = r#"{"greenyellow_intervals": {"sg1": [[10, 40], [30, 80]]}, "period": 100}"#;
        assert!(serde_json::from_str::<FixedTimeSchedule>(json).is_err());
    }

    #[test]
    fn display_sorts_by_name_length() {
        let fts = FixedTimeSchedule::new(
            BTreeMap::from([
                ("sg10".to_string(), vec![gy(0.0, 10.0)]),
                ("sg2".to_string(), vec![gy(10.0, 20.0), gy(30.0, 40.0), gy(50.0, 60.0)]),
            ]),
            100.0,
        )
        .unwrap();
        let text = fts.to_string();
        let sg2 = text.find("sg2:").unwrap();
        let sg10 = text.find("sg10:").unwrap();
        assert!(sg2 < sg10);
        assert!(text.contains("[10.00, 20.00], [30.00, 40.00] and [50.00, 60.00]"));
    }
}
