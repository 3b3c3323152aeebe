//! Tolerance profiles controlling how strictly schedules are checked.

use std::fmt;
use std::str::FromStr;

use crate::periodic::{CONFLICT_MARGIN, ORDER_EPSILON, SAFETY_EPSILON};

/// Named tolerance presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileLevel {
    /// Tolerances matching the remote optimizer's own rounding.
    #[default]
    Default,
    /// Tight tolerances for schedules produced by exact arithmetic.
    Strict,
    /// Loose tolerances for hand-edited schedules rounded to 0.05 s.
    Lenient,
    /// Individually configured tolerances.
    Custom,
}

impl fmt::Display for ProfileLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileLevel::Default => write!(f, "default"),
            ProfileLevel::Strict => write!(f, "strict"),
            ProfileLevel::Lenient => write!(f, "lenient"),
            ProfileLevel::Custom => write!(f, "custom"),
        }
    }
}

impl FromStr for ProfileLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(ProfileLevel::Default),
            "strict" => Ok(ProfileLevel::Strict),
            "lenient" => Ok(ProfileLevel::Lenient),
            other => Err(format!(
                "unknown validation profile '{other}'; expected default, strict or lenient"
            )),
        }
    }
}

/// Numeric tolerances in seconds, one per kind of check.
#[derive(Debug, Clone, PartialEq)]
pub struct Tolerances {
    pub level: ProfileLevel,
    /// Slack on minimum and maximum greenyellow and red durations.
    pub bounds: f64,
    /// Amount by which forbidden conflict windows shrink on each side.
    pub conflict_margin: f64,
    /// Slack on relation windows.
    pub relations: f64,
    /// Slack when comparing switch moments in periodic orders.
    pub order: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            level: ProfileLevel::Default,
            bounds: SAFETY_EPSILON,
            conflict_margin: CONFLICT_MARGIN,
            relations: SAFETY_EPSILON,
            order: ORDER_EPSILON,
        }
    }
}

impl Tolerances {
    pub fn strict() -> Self {
        Self {
            level: ProfileLevel::Strict,
            bounds: 1e-3,
            conflict_margin: 1e-4,
            relations: 1e-3,
            order: 1e-9,
        }
    }

    pub fn lenient() -> Self {
        Self {
            level: ProfileLevel::Lenient,
            bounds: 5e-2,
            conflict_margin: 1e-2,
            relations: 5e-2,
            order: ORDER_EPSILON,
        }
    }

    pub fn for_level(level: ProfileLevel) -> Self {
        match level {
            ProfileLevel::Strict => Self::strict(),
            ProfileLevel::Lenient => Self::lenient(),
            ProfileLevel::Default | ProfileLevel::Custom => Self::default(),
        }
    }

    /// Default profile with one tolerance for bounds and relations.
    pub fn uniform(tolerance: f64) -> Self {
        let defaults = Self::default();
        if tolerance == defaults.bounds {
            return defaults;
        }
        Self {
            level: ProfileLevel::Custom,
            bounds: tolerance,
            relations: tolerance,
            ..defaults
        }
    }
}
