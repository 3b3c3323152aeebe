//! Validation report listing the checks that ran and the first violation.

use std::fmt;

use crate::error::SafetyViolation;
use crate::profile::ProfileLevel;

/// One of the safety checks, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
    Bounds,
    Conflicts,
    Relations,
    FixedOrders,
    Completeness,
}

impl Check {
    pub const ALL: [Check; 5] = [
        Check::Bounds,
        Check::Conflicts,
        Check::Relations,
        Check::FixedOrders,
        Check::Completeness,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Check::Bounds => "bounds",
            Check::Conflicts => "conflicts",
            Check::Relations => "relations",
            Check::FixedOrders => "fixed orders",
            Check::Completeness => "completeness",
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOutcome {
    pub check: Check,
    pub passed: bool,
}

/// The result of a fail-fast validation run.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub profile: ProfileLevel,
    /// Checks that ran, in order; only the last one can have failed.
    pub checks: Vec<CheckOutcome>,
    pub violation: Option<SafetyViolation>,
}

impl ValidationReport {
    pub fn is_safe(&self) -> bool {
        self.violation.is_none()
    }

    /// Checks that did not run because an earlier one failed.
    pub fn skipped(&self) -> impl Iterator<Item = Check> + '_ {
        Check::ALL
            .into_iter()
            .filter(move |c| !self.checks.iter().any(|o| o.check == *c))
    }

    pub fn failed_check(&self) -> Option<Check> {
        self.checks.iter().find(|o| !o.passed).map(|o| o.check)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Safety Validation Report ===")?;
        writeln!(f, "Profile: {}", self.profile)?;
        for outcome in &self.checks {
            let status = if outcome.passed { "ok" } else { "FAILED" };
            writeln!(f, "  {:<14}{status}", outcome.check.name())?;
        }
        for check in self.skipped() {
            writeln!(f, "  {:<14}skipped", check.name())?;
        }
        match &self.violation {
            None => write!(f, "Result: safe"),
            Some(v) => write!(f, "Result: UNSAFE\n  {v}"),
        }
    }
}
