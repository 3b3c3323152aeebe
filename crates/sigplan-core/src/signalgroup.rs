//! Signal groups: traffic lights that always show the same state.

use serde::{Deserialize, Serialize};

use crate::error::{require_above, require_at_least, ModelError, Result};
use crate::traffic_light::TrafficLight;

/// A closed range `[min, max]` of durations in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationBounds {
    pub min: f64,
    pub max: f64,
}

impl DurationBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn validate(&self, entity: &str, min_field: &'static str, max_field: &'static str) -> Result<()> {
        require_at_least(entity, min_field, self.min, 0.0)?;
        require_above(entity, max_field, self.max, 0.0)?;
        if self.max < self.min {
            return Err(ModelError::InvalidValue {
                entity: entity.to_string(),
                field: max_field,
                detail: format!("{} should be at least {min_field}={}", self.max, self.min),
            });
        }
        Ok(())
    }
}

/// A group of traffic lights sharing one signal state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SignalGroupRecord", into = "SignalGroupRecord")]
pub struct SignalGroup {
    id: String,
    traffic_lights: Vec<TrafficLight>,
    greenyellow: DurationBounds,
    red: DurationBounds,
    min_nr: u32,
    max_nr: u32,
}

/// Flat JSON layout of a signal group.
#[derive(Clone, Serialize, Deserialize)]
struct SignalGroupRecord {
    id: String,
    traffic_lights: Vec<TrafficLight>,
    min_greenyellow: f64,
    max_greenyellow: f64,
    min_red: f64,
    max_red: f64,
    min_nr: u32,
    max_nr: u32,
}

impl TryFrom<SignalGroupRecord> for SignalGroup {
    type Error = ModelError;

    fn try_from(r: SignalGroupRecord) -> Result<Self> {
        SignalGroup::new(
            r.id,
            r.traffic_lights,
            DurationBounds::new(r.min_greenyellow, r.max_greenyellow),
            DurationBounds::new(r.min_red, r.max_red),
            r.min_nr,
            r.max_nr,
        )
    }
}

impl From<SignalGroup> for SignalGroupRecord {
    fn from(sg: SignalGroup) -> Self {
        Self {
            id: sg.id,
            traffic_lights: sg.traffic_lights,
            min_greenyellow: sg.greenyellow.min,
            max_greenyellow: sg.greenyellow.max,
            min_red: sg.red.min,
            max_red: sg.red.max,
            min_nr: sg.min_nr,
            max_nr: sg.max_nr,
        }
    }
}

impl SignalGroup {
    /// Create a signal group.
    ///
    /// `greenyellow` and `red` bound the duration of every greenyellow and
    /// red interval; `min_nr..=max_nr` bounds the number of greenyellow
    /// intervals per period.
    pub fn new(
        id: impl Into<String>,
        traffic_lights: Vec<TrafficLight>,
        greenyellow: DurationBounds,
        red: DurationBounds,
        min_nr: u32,
        max_nr: u32,
    ) -> Result<Self> {
        let id = id.into();
        let entity = format!("signal group '{id}'");
        greenyellow.validate(&entity, "min_greenyellow", "max_greenyellow")?;
        red.validate(&entity, "min_red", "max_red")?;
        if min_nr < 1 {
            return Err(ModelError::InvalidValue {
                entity,
                field: "min_nr",
                detail: "at least one greenyellow interval per period is required".into(),
            });
        }
        if max_nr < min_nr {
            return Err(ModelError::InvalidValue {
                entity,
                field: "max_nr",
                detail: format!("{max_nr} should be at least min_nr={min_nr}"),
            });
        }
        Ok(Self {
            id,
            traffic_lights,
            greenyellow,
            red,
            min_nr,
            max_nr,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn traffic_lights(&self) -> &[TrafficLight] {
        &self.traffic_lights
    }

    pub fn min_greenyellow(&self) -> f64 {
        self.greenyellow.min
    }

    pub fn max_greenyellow(&self) -> f64 {
        self.greenyellow.max
    }

    pub fn min_red(&self) -> f64 {
        self.red.min
    }

    pub fn max_red(&self) -> f64 {
        self.red.max
    }

    pub fn min_nr(&self) -> u32 {
        self.min_nr
    }

    pub fn max_nr(&self) -> u32 {
        self.max_nr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light() -> TrafficLight {
        TrafficLight::new(1800.0, 0.0).unwrap()
    }

    fn sg(min_gy: f64, max_gy: f64, min_nr: u32, max_nr: u32) -> Result<SignalGroup> {
        SignalGroup::new(
            "sg1",
            vec![light()],
            DurationBounds::new(min_gy, max_gy),
            DurationBounds::new(10.0, 80.0),
            min_nr,
            max_nr,
        )
    }

    #[test]
    fn valid_signal_group() {
        let group = sg(6.0, 40.0, 1, 2).unwrap();
        assert_eq!(group.id(), "sg1");
        assert_eq!(group.min_greenyellow(), 6.0);
        assert_eq!(group.max_red(), 80.0);
        assert_eq!(group.traffic_lights().len(), 1);
    }

    #[test]
    fn reject_inverted_bounds() {
        let err = sg(50.0, 40.0, 1, 1).unwrap_err();
        assert!(matches!(err, ModelError::InvalidValue { field: "max_greenyellow", .. }));
    }

    #[test]
    fn reject_zero_max() {
        assert!(sg(0.0, 0.0, 1, 1).is_err());
    }

    #[test]
    fn reject_interval_counts() {
        assert!(sg(6.0, 40.0, 0, 1).is_err());
        assert!(sg(6.0, 40.0, 3, 2).is_err());
    }

    #[test]
    fn json_uses_flat_keys() {
        let group = sg(6.0, 40.0, 1, 2).unwrap();
        let json = serde_json::to_value(&group).unwrap();
        assert_eq!(json["min_greenyellow"], 6.0);
        assert_eq!(json["max_nr"], 2);
        assert_eq!(json["traffic_lights"][0]["capacity"], 1800.0);
        let back: SignalGroup = serde_json::from_value(json).unwrap();
        assert_eq!(back, group);
    }

    #[test]
    fn json_rejects_invalid_bounds() {
        let json = r#"{"id": "sg1", "traffic_lights": [], "min_greenyellow": 10,
            "max_greenyellow": 5, "min_red": 0, "max_red": 10, "min_nr": 1, "max_nr": 1}"#;
        assert!(serde_json::from_str::<SignalGroup>(json).is_err());
    }
}
