//! Optimization objectives of the remote optimizer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What the remote optimizer minimizes or maximizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Objective {
    #[default]
    #[serde(rename = "min delay")]
    MinDelay,
    #[serde(rename = "min period duration")]
    MinPeriod,
    #[serde(rename = "max capacity")]
    MaxCapacity,
}

impl Objective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Objective::MinDelay => "min delay",
            Objective::MinPeriod => "min period duration",
            Objective::MaxCapacity => "max capacity",
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Objective {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace(['-', '_'], " ").as_str() {
            "min delay" => Ok(Objective::MinDelay),
            "min period" | "min period duration" => Ok(Objective::MinPeriod),
            "max capacity" => Ok(Objective::MaxCapacity),
            _ => Err(format!(
                "unknown objective '{s}'; expected one of: min-delay, min-period, max-capacity"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn objective_wire_names() {
        assert_eq!(serde_json::to_string(&Objective::MinPeriod).unwrap(), r#""min period duration""#);
        let o: Objective = serde_json::from_str(r#""max capacity""#).unwrap();
        assert_eq!(o, Objective::MaxCapacity);
    }

    #[test]
    fn objective_from_cli_names() {
        assert_eq!("min-delay".parse::<Objective>().unwrap(), Objective::MinDelay);
        assert_eq!("min_period".parse::<Objective>().unwrap(), Objective::MinPeriod);
        assert!("fastest".parse::<Objective>().is_err());
    }
}
