//! Safety validation of fixed-time schedules.
//!
//! A schedule is checked against the intersection it was made for without
//! trusting whoever produced it. The checks reason on a cyclic time axis
//! (see [`periodic`]) with small numeric tolerances, so that safe schedules
//! are not rejected because of rounding while unsafe ones are never
//! accepted.

pub mod bounds;
pub mod completeness;
pub mod conflicts;
pub mod engine;
pub mod error;
pub mod fixed_orders;
pub mod periodic;
pub mod profile;
pub mod relations;
pub mod report;

#[cfg(test)]
mod fixtures;

pub use engine::{validate_safety_restrictions, SafetyValidator};
pub use error::{Bound, MatchError, SafetyViolation};
pub use periodic::{overlap, wrap_duration, PeriodicInterval};
pub use profile::{ProfileLevel, Tolerances};
pub use relations::{consistent_shift, match_matrix};
pub use report::{Check, CheckOutcome, ValidationReport};
