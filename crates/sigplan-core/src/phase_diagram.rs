//! Phase diagrams: the sequence of phases a fixed-time schedule cycles
//! through.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schedule::by_name;

/// Reference to the `interval_index`-th greenyellow interval (0-based) of a
/// signal group. Serialized as `[id, index]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(String, usize)", into = "(String, usize)")]
pub struct GreenYellowPhase {
    pub signalgroup_id: String,
    pub interval_index: usize,
}

impl From<(String, usize)> for GreenYellowPhase {
    fn from((signalgroup_id, interval_index): (String, usize)) -> Self {
        Self {
            signalgroup_id,
            interval_index,
        }
    }
}

impl From<GreenYellowPhase> for (String, usize) {
    fn from(p: GreenYellowPhase) -> Self {
        (p.signalgroup_id, p.interval_index)
    }
}

impl fmt::Display for GreenYellowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(id={}, k={})", self.signalgroup_id, self.interval_index)
    }
}

/// Greenyellow intervals that are active together.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Phase {
    pub greenyellow_phases: Vec<GreenYellowPhase>,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut phases: Vec<_> = self.greenyellow_phases.iter().collect();
        phases.sort_by(|a, b| by_name(&a.signalgroup_id).cmp(&by_name(&b.signalgroup_id)));
        write!(f, "[")?;
        for (i, phase) in phases.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{phase}")?;
        }
        write!(f, "]")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhaseDiagram {
    pub phases: Vec<Phase>,
}

impl fmt::Display for PhaseDiagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "phase diagram:")?;
        for phase in &self.phases {
            write!(f, "\n\t{phase}")?;
        }
        Ok(())
    }
}
