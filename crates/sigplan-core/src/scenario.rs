//! Traffic scenarios: arrival rates and initial queue lengths per traffic
//! light.
//!
//! Both map a signal group id to one value per traffic light of that signal
//! group, in the order of [`SignalGroup::traffic_lights`].
//!
//! [`SignalGroup::traffic_lights`]: crate::SignalGroup::traffic_lights

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::intersection::Intersection;

/// Arrival rates in PCE/h.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArrivalRates {
    pub id_to_arrival_rates: BTreeMap<String, Vec<f64>>,
}

/// Initially waiting traffic in PCE.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueueLengths {
    pub id_to_queue_lengths: BTreeMap<String, Vec<f64>>,
}

fn zeros(intersection: &Intersection) -> BTreeMap<String, Vec<f64>> {
    intersection
        .signalgroups()
        .iter()
        .map(|sg| (sg.id().to_string(), vec![0.0; sg.traffic_lights().len()]))
        .collect()
}

/// Check that `values` holds exactly one finite value per traffic light for
/// every signal group of the intersection.
fn covers(
    what: &str,
    values: &BTreeMap<String, Vec<f64>>,
    intersection: &Intersection,
) -> Result<()> {
    for sg in intersection.signalgroups() {
        let entity = format!("{what} of signal group '{}'", sg.id());
        let Some(row) = values.get(sg.id()) else {
            return Err(ModelError::InvalidValue {
                entity,
                field: "id",
                detail: "missing".into(),
            });
        };
        if row.len() != sg.traffic_lights().len() {
            return Err(ModelError::InvalidValue {
                entity,
                field: "traffic_lights",
                detail: format!(
                    "expected {} values (one per traffic light), got {}",
                    sg.traffic_lights().len(),
                    row.len()
                ),
            });
        }
        if let Some(bad) = row.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(ModelError::InvalidValue {
                entity,
                field: "value",
                detail: format!("{bad} should be a finite non-negative number"),
            });
        }
    }
    Ok(())
}

impl ArrivalRates {
    pub fn new(id_to_arrival_rates: BTreeMap<String, Vec<f64>>) -> Self {
        Self {
            id_to_arrival_rates,
        }
    }

    /// All-zero arrival rates for every traffic light of the intersection.
    pub fn zeros_for(intersection: &Intersection) -> Self {
        Self::new(zeros(intersection))
    }

    /// Parse arrival rates from JSON, either a bare `{id: [rates]}` map or a
    /// desktop export holding that map under `"arrival_rates"`.
    pub fn from_json_value(value: serde_json::Value) -> std::result::Result<Self, serde_json::Error> {
        match value {
            serde_json::Value::Object(mut map)
                if map.get("arrival_rates").is_some_and(|v| v.is_object()) =>
            {
                let inner = map.remove("arrival_rates").unwrap_or(serde_json::Value::Null);
                serde_json::from_value(inner)
            }
            other => serde_json::from_value(other),
        }
    }

    pub fn get(&self, id: &str) -> Option<&[f64]> {
        self.id_to_arrival_rates.get(id).map(Vec::as_slice)
    }

    /// Element-wise sum; both operands must have the same ids and the same
    /// number of rates per id.
    pub fn checked_add(&self, other: &ArrivalRates) -> Result<ArrivalRates> {
        if !self.id_to_arrival_rates.keys().eq(other.id_to_arrival_rates.keys()) {
            return Err(ModelError::Arithmetic(
                "when adding two ArrivalRates they should have the same ids".into(),
            ));
        }
        let mut sum = BTreeMap::new();
        for ((id, rates), other_rates) in self
            .id_to_arrival_rates
            .iter()
            .zip(other.id_to_arrival_rates.values())
        {
            if rates.len() != other_rates.len() {
                return Err(ModelError::Arithmetic(format!(
                    "when adding two ArrivalRates all rates should have equal length ('{id}')"
                )));
            }
            let row = rates.iter().zip(other_rates).map(|(a, b)| a + b).collect();
            sum.insert(id.clone(), row);
        }
        Ok(ArrivalRates::new(sum))
    }

    pub fn scale(&self, factor: f64) -> ArrivalRates {
        ArrivalRates::new(
            self.id_to_arrival_rates
                .iter()
                .map(|(id, rates)| (id.clone(), rates.iter().map(|r| r * factor).collect()))
                .collect(),
        )
    }

    /// Require one non-negative rate per traffic light of every signal group.
    pub fn check_covers(&self, intersection: &Intersection) -> Result<()> {
        covers("arrival rates", &self.id_to_arrival_rates, intersection)
    }
}

impl QueueLengths {
    pub fn new(id_to_queue_lengths: BTreeMap<String, Vec<f64>>) -> Self {
        Self {
            id_to_queue_lengths,
        }
    }

    pub fn zeros_for(intersection: &Intersection) -> Self {
        Self::new(zeros(intersection))
    }

    /// Model the waiting traffic as extra arrivals spread evenly over
    /// `horizon` hours.
    pub fn spread_over(&self, horizon: f64) -> Result<ArrivalRates> {
        if !horizon.is_finite() || horizon <= 0.0 {
            return Err(ModelError::Arithmetic(format!(
                "queue lengths can only be spread over a positive horizon, got {horizon}"
            )));
        }
        Ok(ArrivalRates::new(
            self.id_to_queue_lengths
                .iter()
                .map(|(id, queues)| (id.clone(), queues.iter().map(|q| q / horizon).collect()))
                .collect(),
        ))
    }

    /// Require one non-negative queue length per traffic light of every
    /// signal group.
    pub fn check_covers(&self, intersection: &Intersection) -> Result<()> {
        covers("queue lengths", &self.id_to_queue_lengths, intersection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rates(entries: &[(&str, &[f64])]) -> ArrivalRates {
        ArrivalRates::new(
            entries
                .iter()
                .map(|(id, r)| (id.to_string(), r.to_vec()))
                .collect(),
        )
    }

    #[test]
    fn add_and_scale() {
        let a = rates(&[("sg1", &[100.0, 200.0]), ("sg2", &[300.0])]);
        let b = rates(&[("sg1", &[1.0, 2.0]), ("sg2", &[3.0])]);
        let sum = a.checked_add(&b).unwrap();
        assert_eq!(sum.get("sg1"), Some(&[101.0, 202.0][..]));
        let scaled = sum.scale(0.5);
        assert_relative_eq!(scaled.get("sg2").unwrap()[0], 151.5);
    }

    #[test]
    fn add_rejects_mismatched_operands() {
        let a = rates(&[("sg1", &[100.0, 200.0])]);
        let other_ids = rates(&[("sg2", &[1.0, 2.0])]);
        let other_len = rates(&[("sg1", &[1.0])]);
        assert!(matches!(a.checked_add(&other_ids), Err(ModelError::Arithmetic(_))));
        assert!(matches!(a.checked_add(&other_len), Err(ModelError::Arithmetic(_))));
    }

    #[test]
    fn spread_queues_over_horizon() {
        let queues = QueueLengths::new(BTreeMap::from([("sg1".to_string(), vec![10.0, 4.0])]));
        let extra = queues.spread_over(2.0).unwrap();
        assert_eq!(extra.get("sg1"), Some(&[5.0, 2.0][..]));
        assert!(queues.spread_over(0.0).is_err());
    }

    #[test]
    fn json_is_a_plain_map() {
        let r = rates(&[("sg1", &[100.0])]);
        assert_eq!(serde_json::to_string(&r).unwrap(), r#"{"sg1":[100.0]}"#);
    }

    #[test]
    fn desktop_export_is_unwrapped() {
        let export = serde_json::json!({
            "intersection": {"signalgroups": []},
            "arrival_rates": {"sg1": [100.0, 50.0]},
        });
        let r = ArrivalRates::from_json_value(export).unwrap();
        assert_eq!(r.get("sg1"), Some(&[100.0, 50.0][..]));

        let bare = ArrivalRates::from_json_value(serde_json::json!({"sg2": [1.0]})).unwrap();
        assert_eq!(bare.get("sg2"), Some(&[1.0][..]));
    }
}
