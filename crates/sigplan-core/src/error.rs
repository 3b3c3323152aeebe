//! Error types for the intersection and schedule model.

/// Structural errors raised while constructing or decoding model values.
///
/// These indicate a malformed configuration or schedule, never a safety
/// problem of an otherwise well-formed schedule.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// A numeric field is out of its allowed range.
    #[error("invalid {field} for {entity}: {detail}")]
    InvalidValue {
        entity: String,
        field: &'static str,
        detail: String,
    },

    /// Two signal groups share the same id.
    #[error("signal group ids should be unique; '{0}' occurs more than once")]
    DuplicateSignalGroup(String),

    /// A conflict, relation or order refers to an id that does not exist.
    #[error("unknown signal group id '{id}' used in {context}")]
    UnknownSignalGroup { id: String, context: String },

    /// A relation ties a signal group to itself.
    #[error("ids of {kind} must be different, got '{id}' on both sides")]
    SelfRelation { kind: &'static str, id: String },

    /// More than one conflict or relation between the same pair.
    #[error("multiple relations given between signal groups '{id1}' and '{id2}'")]
    DuplicateRelation { id1: String, id2: String },

    /// `min_greenyellow + setup` is not strictly positive.
    #[error(
        "setup time {setup} plus min_greenyellow {min_greenyellow} of '{id}' must be strictly \
         positive (conflict between '{id1}' and '{id2}')"
    )]
    InfeasibleSetup {
        id: String,
        id1: String,
        id2: String,
        setup: f64,
        min_greenyellow: f64,
    },

    /// A periodic order without entries.
    #[error("periodic order must contain at least one signal group")]
    EmptyOrder,

    /// A periodic order lists the same id twice.
    #[error("items of periodic order {order:?} should be unique; '{id}' repeats")]
    DuplicateInOrder { order: Vec<String>, id: String },

    /// Consecutive ids of a periodic order are not in conflict.
    #[error(
        "each two subsequent signal groups in a periodic order should be conflicting; \
         this does not hold for '{from}' and '{to}' in order {order:?}"
    )]
    OrderWithoutConflict {
        order: Vec<String>,
        from: String,
        to: String,
    },

    /// A relation record that does not map onto a supported relation kind.
    #[error("unsupported relation encoding: {0}")]
    UnsupportedRelation(String),

    /// A greenyellow interval endpoint lies beyond the period.
    #[error("greenyellow interval [{start}, {end}] of '{id}' exceeds the period {period}")]
    IntervalOutsidePeriod {
        id: String,
        start: f64,
        end: f64,
        period: f64,
    },

    /// Greenyellow intervals are not listed in periodic start order.
    #[error(
        "greenyellow intervals of '{0}' must be provided in periodic order, e.g. \
         [[10, 40], [50, 80], [80, 100]] and not [[10, 40], [80, 100], [50, 80]]"
    )]
    UnorderedIntervals(String),

    /// Greenyellow intervals of one signal group overlap.
    #[error("greenyellow intervals of '{0}' must be non-overlapping")]
    OverlappingIntervals(String),

    /// The schedule has no entry for a signal group.
    #[error("no greenyellow intervals specified for '{0}'")]
    NotScheduled(String),

    /// Interval index beyond the intervals of a signal group.
    #[error("greenyellow interval {index} of '{id}' requested, but only {count} exist")]
    IntervalIndex { id: String, index: usize, count: usize },

    /// Operands of a rate/queue aggregate do not fit together.
    #[error("arithmetic violation: {0}")]
    Arithmetic(String),
}

/// Result type alias for model construction.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Require `value` to be finite and at least `min`.
pub(crate) fn require_at_least(
    entity: &str,
    field: &'static str,
    value: f64,
    min: f64,
) -> Result<()> {
    if !value.is_finite() || value < min {
        return Err(ModelError::InvalidValue {
            entity: entity.to_string(),
            field,
            detail: format!("{value} should be a finite number >= {min}"),
        });
    }
    Ok(())
}

/// Require `value` to be finite and strictly greater than `min`.
pub(crate) fn require_above(entity: &str, field: &'static str, value: f64, min: f64) -> Result<()> {
    if !value.is_finite() || value <= min {
        return Err(ModelError::InvalidValue {
            entity: entity.to_string(),
            field,
            detail: format!("{value} should be a finite number > {min}"),
        });
    }
    Ok(())
}
