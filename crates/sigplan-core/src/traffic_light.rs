//! Traffic lights: the individual streams controlled by a signal group.

use serde::{Deserialize, Serialize};

use crate::error::{require_above, require_at_least, Result};

fn default_weight() -> f64 {
    1.0
}

/// A single traffic light.
///
/// The amount of traffic (in PCE) expected to depart during a greenyellow
/// interval of `gy` seconds is `(gy - lost_time) * capacity / 3600`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TrafficLightRecord")]
pub struct TrafficLight {
    capacity: f64,
    lost_time: f64,
    weight: f64,
    max_saturation: Option<f64>,
}

#[derive(Deserialize)]
struct TrafficLightRecord {
    capacity: f64,
    lost_time: f64,
    #[serde(default = "default_weight")]
    weight: f64,
    #[serde(default)]
    max_saturation: Option<f64>,
}

impl TryFrom<TrafficLightRecord> for TrafficLight {
    type Error = crate::error::ModelError;

    fn try_from(r: TrafficLightRecord) -> Result<Self> {
        let light = TrafficLight::new(r.capacity, r.lost_time)?.with_weight(r.weight)?;
        match r.max_saturation {
            Some(s) => light.with_max_saturation(s),
            None => Ok(light),
        }
    }
}

impl TrafficLight {
    /// Create a traffic light with capacity in PCE/h and lost time in seconds.
    pub fn new(capacity: f64, lost_time: f64) -> Result<Self> {
        require_above("traffic light", "capacity", capacity, 0.0)?;
        require_at_least("traffic light", "lost_time", lost_time, 0.0)?;
        Ok(Self {
            capacity,
            lost_time,
            weight: default_weight(),
            max_saturation: None,
        })
    }

    /// Set the importance of this light when minimizing delay.
    pub fn with_weight(mut self, weight: f64) -> Result<Self> {
        require_at_least("traffic light", "weight", weight, 0.0)?;
        self.weight = weight;
        Ok(self)
    }

    /// Set the maximum allowed saturation (1.0 is the verge of oversaturation).
    pub fn with_max_saturation(mut self, max_saturation: f64) -> Result<Self> {
        require_at_least("traffic light", "max_saturation", max_saturation, 0.0)?;
        self.max_saturation = Some(max_saturation);
        Ok(self)
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn lost_time(&self) -> f64 {
        self.lost_time
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn max_saturation(&self) -> Option<f64> {
        self.max_saturation
    }
}
