//! Safety violation types.

use std::fmt;

/// The bound on a signal group duration that a schedule exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    MinRed,
    MaxRed,
    MinGreenyellow,
    MaxGreenyellow,
}

impl Bound {
    /// Name of the signal state the bound applies to.
    pub fn state(&self) -> &'static str {
        match self {
            Bound::MinRed | Bound::MaxRed => "Red",
            Bound::MinGreenyellow | Bound::MaxGreenyellow => "Greenyellow",
        }
    }

    pub fn is_min(&self) -> bool {
        matches!(self, Bound::MinRed | Bound::MinGreenyellow)
    }

    fn excess(&self) -> &'static str {
        if self.is_min() {
            "short"
        } else {
            "long"
        }
    }

    fn limit_name(&self) -> &'static str {
        if self.is_min() {
            "min"
        } else {
            "max"
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::MinRed => write!(f, "min_red"),
            Bound::MaxRed => write!(f, "max_red"),
            Bound::MinGreenyellow => write!(f, "min_greenyellow"),
            Bound::MaxGreenyellow => write!(f, "max_greenyellow"),
        }
    }
}

/// A match matrix that is not `n x n`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("match matrix should be an n x n matrix; row {row} has {len} entries while n = {n}")]
pub struct MatchError {
    pub row: usize,
    pub len: usize,
    pub n: usize,
}

/// A fixed-time schedule that does not satisfy the safety restrictions of
/// an intersection.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SafetyViolation {
    /// A red or greenyellow interval is shorter or longer than allowed.
    #[error(
        "{} time of sg '{id}' too {} ({actual:.1} seconds while {}={limit:.1}; interval {index})",
        bound.state(),
        bound.excess(),
        bound.limit_name()
    )]
    Bounds {
        id: String,
        index: usize,
        bound: Bound,
        actual: f64,
        limit: f64,
    },

    /// Greenyellow intervals of conflicting signal groups are too close.
    #[error("conflict not satisfied for interval {index1} of '{id1}' and interval {index2} of '{id2}'")]
    Conflict {
        id1: String,
        index1: usize,
        id2: String,
        index2: usize,
    },

    /// Related signal groups have a different number of greenyellow intervals.
    #[error(
        "signal groups of a {kind} should have the same number of greenyellow intervals; \
         '{from_id}' has {from_count} and '{to_id}' has {to_count}"
    )]
    IntervalCountMismatch {
        kind: &'static str,
        from_id: String,
        to_id: String,
        from_count: usize,
        to_count: usize,
    },

    /// No consistent pairing of intervals satisfies a relation.
    #[error("{kind} between '{from_id}' and '{to_id}' is not satisfied")]
    Relation {
        kind: &'static str,
        from_id: String,
        to_id: String,
    },

    /// Greenyellow intervals are not served in the fixed periodic order.
    #[error("periodic order {order:?} is violated")]
    FixedOrder { order: Vec<String> },

    /// A signal group has no greenyellow interval in the schedule.
    #[error("no greenyellow intervals specified for signal group '{id}'")]
    Incomplete { id: String },

    #[error(transparent)]
    Match(#[from] MatchError),
}

/// Result type alias for safety checks.
pub type Result<T> = std::result::Result<T, SafetyViolation>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_message() {
        let v = SafetyViolation::Bounds {
            id: "sg1".into(),
            index: 0,
            bound: Bound::MinRed,
            actual: 4.0,
            limit: 10.0,
        };
        assert_eq!(
            v.to_string(),
            "Red time of sg 'sg1' too short (4.0 seconds while min=10.0; interval 0)"
        );

        let v = SafetyViolation::Bounds {
            id: "sg2".into(),
            index: 1,
            bound: Bound::MaxGreenyellow,
            actual: 65.0,
            limit: 60.0,
        };
        assert!(v.to_string().starts_with("Greenyellow time of sg 'sg2' too long"));
    }

    #[test]
    fn match_error_converts() {
        let v: SafetyViolation = MatchError { row: 1, len: 2, n: 3 }.into();
        assert!(v.to_string().contains("n x n"));
    }
}
