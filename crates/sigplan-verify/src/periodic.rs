//! Arithmetic on a cyclic time axis `[0, period)`.

use sigplan_core::GreenYellowInterval;

/// Default tolerance in seconds for checks over externally produced
/// schedules.
pub const SAFETY_EPSILON: f64 = 1e-2;

/// Margin by which a forbidden conflict window is shrunk on both sides.
pub const CONFLICT_MARGIN: f64 = 1e-3;

/// Tolerance for comparisons of switch moments in ordering checks.
pub const ORDER_EPSILON: f64 = 1e-6;

/// Time from `from` to `to` going forward on the cycle, in `[-ε, period - ε)`.
///
/// The `ε` shift keeps durations that should be exactly zero from being
/// pushed to `period` by rounding.
pub fn wrap_duration(from: f64, to: f64, period: f64, epsilon: f64) -> f64 {
    (to - from + epsilon).rem_euclid(period) - epsilon
}

/// An interval on the cycle; `start > end` means it contains time 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicInterval {
    pub start: f64,
    pub end: f64,
}

impl PeriodicInterval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn wraps(&self) -> bool {
        self.start > self.end
    }

    /// Both endpoints mapped into `[0, period)`.
    pub fn normalized(&self, period: f64) -> Self {
        Self {
            start: self.start.rem_euclid(period),
            end: self.end.rem_euclid(period),
        }
    }
}

impl From<GreenYellowInterval> for PeriodicInterval {
    fn from(interval: GreenYellowInterval) -> Self {
        Self::new(interval.start(), interval.end())
    }
}

impl From<&GreenYellowInterval> for PeriodicInterval {
    fn from(interval: &GreenYellowInterval) -> Self {
        Self::new(interval.start(), interval.end())
    }
}

/// Intersection of two periodic intervals with endpoints in `[0, period]`.
///
/// The result has zero, one or two pieces; two pieces occur when a wrapping
/// interval covers both ends of a non-wrapping one. Touching intervals do not
/// overlap.
pub fn overlap(a: PeriodicInterval, b: PeriodicInterval, period: f64) -> Vec<PeriodicInterval> {
    if a.wraps() && b.wraps() {
        // both contain time 0
        return vec![PeriodicInterval::new(a.start.max(b.start), a.end.min(b.end))];
    }

    let (a, b) = if a.wraps() { (b, a) } else { (a, b) };
    let pieces = if b.wraps() {
        vec![
            PeriodicInterval::new(b.start - period, b.end),
            PeriodicInterval::new(b.start, b.end + period),
        ]
    } else {
        vec![b]
    };

    pieces
        .into_iter()
        .filter_map(|piece| {
            let start = a.start.max(piece.start);
            let end = a.end.min(piece.end);
            (start < end).then(|| PeriodicInterval::new(start, end).normalized(period))
        })
        .collect()
}
