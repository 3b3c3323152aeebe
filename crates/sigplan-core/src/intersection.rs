//! The intersection: signal groups plus the relations between them.
//!
//! An [`Intersection`] is validated completely when it is built, so every
//! value of this type satisfies:
//! - signal group ids are unique,
//! - every id used by a conflict, relation or periodic order exists,
//! - at most one conflict or relation exists per unordered pair of ids,
//! - `min_greenyellow + setup > 0` on both sides of every conflict,
//! - cyclically consecutive ids of every periodic order are conflicting.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::periodic_order::PeriodicOrder;
use crate::relations::{Conflict, Relation};
use crate::signalgroup::SignalGroup;

/// Unordered pair of signal group ids.
fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IntersectionRecord", into = "IntersectionRecord")]
pub struct Intersection {
    signalgroups: Vec<SignalGroup>,
    conflicts: Vec<Conflict>,
    other_relations: Vec<Relation>,
    periodic_orders: Vec<PeriodicOrder>,
    index: HashMap<String, usize>,
}

#[derive(Clone, Serialize, Deserialize)]
struct IntersectionRecord {
    signalgroups: Vec<SignalGroup>,
    conflicts: Vec<Conflict>,
    #[serde(default)]
    other_relations: Vec<Relation>,
    #[serde(default)]
    periodic_orders: Vec<PeriodicOrder>,
}

impl TryFrom<IntersectionRecord> for Intersection {
    type Error = ModelError;

    fn try_from(r: IntersectionRecord) -> Result<Self> {
        Intersection::new(r.signalgroups, r.conflicts, r.other_relations, r.periodic_orders)
    }
}

impl From<Intersection> for IntersectionRecord {
    fn from(i: Intersection) -> Self {
        Self {
            signalgroups: i.signalgroups,
            conflicts: i.conflicts,
            other_relations: i.other_relations,
            periodic_orders: i.periodic_orders,
        }
    }
}

impl Intersection {
    /// Build and validate an intersection.
    ///
    /// Two intersections controlled by a single controller are modelled as
    /// one intersection containing the signal groups of both.
    pub fn new(
        signalgroups: Vec<SignalGroup>,
        conflicts: Vec<Conflict>,
        other_relations: Vec<Relation>,
        periodic_orders: Vec<PeriodicOrder>,
    ) -> Result<Self> {
        let mut index = HashMap::with_capacity(signalgroups.len());
        for (i, sg) in signalgroups.iter().enumerate() {
            if index.insert(sg.id().to_string(), i).is_some() {
                return Err(ModelError::DuplicateSignalGroup(sg.id().to_string()));
            }
        }

        let intersection = Self {
            signalgroups,
            conflicts,
            other_relations,
            periodic_orders,
            index,
        };
        intersection.validate_references()?;
        intersection.validate_relations_per_pair()?;
        intersection.validate_setup_times()?;
        intersection.validate_periodic_orders()?;
        Ok(intersection)
    }

    /// Parse an intersection from JSON.
    ///
    /// Accepts both a bare intersection object and a desktop export of the
    /// form `{"intersection": {...}, ...}`; additional keys are ignored.
    pub fn from_json_value(value: serde_json::Value) -> std::result::Result<Self, serde_json::Error> {
        match value {
            serde_json::Value::Object(mut map) if !map.contains_key("signalgroups") => {
                let inner = map.remove("intersection").unwrap_or(serde_json::Value::Null);
                serde_json::from_value(inner)
            }
            other => serde_json::from_value(other),
        }
    }

    pub fn signalgroups(&self) -> &[SignalGroup] {
        &self.signalgroups
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn other_relations(&self) -> &[Relation] {
        &self.other_relations
    }

    pub fn periodic_orders(&self) -> &[PeriodicOrder] {
        &self.periodic_orders
    }

    /// Look up a signal group by id.
    pub fn signalgroup(&self, id: &str) -> Result<&SignalGroup> {
        self.index
            .get(id)
            .map(|&i| &self.signalgroups[i])
            .ok_or_else(|| ModelError::UnknownSignalGroup {
                id: id.to_string(),
                context: "lookup".into(),
            })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Whether a conflict exists between the two signal groups.
    pub fn are_conflicting(&self, a: &str, b: &str) -> bool {
        self.conflicts
            .iter()
            .any(|c| (c.id1() == a && c.id2() == b) || (c.id1() == b && c.id2() == a))
    }

    fn require_known(&self, id: &str, context: impl FnOnce() -> String) -> Result<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(ModelError::UnknownSignalGroup {
                id: id.to_string(),
                context: context(),
            })
        }
    }

    fn validate_references(&self) -> Result<()> {
        for c in &self.conflicts {
            for id in [c.id1(), c.id2()] {
                self.require_known(id, || format!("conflict '{}'-'{}'", c.id1(), c.id2()))?;
            }
        }
        for r in &self.other_relations {
            for id in [r.from_id(), r.to_id()] {
                self.require_known(id, || r.to_string())?;
            }
        }
        for order in &self.periodic_orders {
            for id in order.iter() {
                self.require_known(id, || format!("periodic order {order}"))?;
            }
        }
        Ok(())
    }

    fn validate_relations_per_pair(&self) -> Result<()> {
        let mut encountered: BTreeSet<(String, String)> = BTreeSet::new();
        let pairs = self
            .conflicts
            .iter()
            .map(|c| (c.id1(), c.id2()))
            .chain(self.other_relations.iter().map(|r| (r.from_id(), r.to_id())));
        for (a, b) in pairs {
            let key = pair_key(a, b);
            if !encountered.insert(key.clone()) {
                return Err(ModelError::DuplicateRelation {
                    id1: key.0,
                    id2: key.1,
                });
            }
        }
        Ok(())
    }

    fn validate_setup_times(&self) -> Result<()> {
        for c in &self.conflicts {
            let sides = [(c.id1(), c.setup12()), (c.id2(), c.setup21())];
            for (id, setup) in sides {
                let min_greenyellow = self.signalgroup(id)?.min_greenyellow();
                if min_greenyellow + setup <= 0.0 {
                    return Err(ModelError::InfeasibleSetup {
                        id: id.to_string(),
                        id1: c.id1().to_string(),
                        id2: c.id2().to_string(),
                        setup,
                        min_greenyellow,
                    });
                }
            }
        }
        Ok(())
    }

    fn validate_periodic_orders(&self) -> Result<()> {
        let conflict_pairs: HashSet<(String, String)> = self
            .conflicts
            .iter()
            .map(|c| pair_key(c.id1(), c.id2()))
            .collect();
        for order in &self.periodic_orders {
            // a single id pairs with itself, which is never a conflict
            for (prev, next) in order.cyclic_pairs() {
                if !conflict_pairs.contains(&pair_key(prev, next)) {
                    return Err(ModelError::OrderWithoutConflict {
                        order: order.ids().to_vec(),
                        from: prev.to_string(),
                        to: next.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
