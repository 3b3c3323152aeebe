//! Fixed periodic serving orders.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Order in which signal groups must receive their greenyellow interval
/// every period.
///
/// If a signal group has several greenyellow intervals, all of them must
/// fit in the slot implied by the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PeriodicOrderRecord")]
pub struct PeriodicOrder {
    order: Vec<String>,
}

#[derive(Deserialize)]
struct PeriodicOrderRecord {
    order: Vec<String>,
}

impl TryFrom<PeriodicOrderRecord> for PeriodicOrder {
    type Error = ModelError;

    fn try_from(r: PeriodicOrderRecord) -> Result<Self> {
        PeriodicOrder::new(r.order)
    }
}

impl PeriodicOrder {
    pub fn new<I, S>(order: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let order: Vec<String> = order.into_iter().map(Into::into).collect();
        if order.is_empty() {
            return Err(ModelError::EmptyOrder);
        }
        let mut seen = HashSet::new();
        for id in &order {
            if !seen.insert(id.as_str()) {
                return Err(ModelError::DuplicateInOrder {
                    order: order.clone(),
                    id: id.clone(),
                });
            }
        }
        Ok(Self { order })
    }

    pub fn ids(&self) -> &[String] {
        &self.order
    }

    /// The first signal group of the order, used as phase anchor.
    pub fn first(&self) -> &str {
        &self.order[0]
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Cyclically consecutive pairs, including `(last, first)`.
    pub fn cyclic_pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        let n = self.order.len();
        (0..n).map(move |i| {
            let prev = &self.order[(i + n - 1) % n];
            (prev.as_str(), self.order[i].as_str())
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(String::as_str)
    }
}

impl fmt::Display for PeriodicOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.order.join(", "))
    }
}
