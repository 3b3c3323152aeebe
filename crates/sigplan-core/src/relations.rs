//! Relations between pairs of signal groups.
//!
//! A [`Conflict`] forbids simultaneous greenyellow intervals and imposes
//! clearance times. A [`Relation`] ties the greenyellow switches of two
//! signal groups together with a fixed gap or a window of allowed gaps.
//!
//! On the wire both kinds of [`Relation`] share one record layout
//! (`from_start_gy`, `to_start_gy`, `min_time`, `max_time`); the record is
//! decoded into the sum type once, here, and nowhere else.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{require_at_least, ModelError, Result};

/// A conflict between two signal groups.
///
/// `setup12` is the minimum time from the end of a greenyellow interval of
/// `id1` to the start of a greenyellow interval of `id2`; `setup21` the
/// reverse. Either may be negative (overlap tolerance) as long as their sum
/// is non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConflictRecord")]
pub struct Conflict {
    id1: String,
    id2: String,
    setup12: f64,
    setup21: f64,
}

#[derive(Deserialize)]
struct ConflictRecord {
    id1: String,
    id2: String,
    setup12: f64,
    setup21: f64,
}

impl TryFrom<ConflictRecord> for Conflict {
    type Error = ModelError;

    fn try_from(r: ConflictRecord) -> Result<Self> {
        Conflict::new(r.id1, r.id2, r.setup12, r.setup21)
    }
}

impl Conflict {
    pub fn new(
        id1: impl Into<String>,
        id2: impl Into<String>,
        setup12: f64,
        setup21: f64,
    ) -> Result<Self> {
        let (id1, id2) = (id1.into(), id2.into());
        if id1 == id2 {
            return Err(ModelError::SelfRelation {
                kind: "conflict",
                id: id1,
            });
        }
        let entity = format!("conflict '{id1}'-'{id2}'");
        for (field, value) in [("setup12", setup12), ("setup21", setup21)] {
            if !value.is_finite() {
                return Err(ModelError::InvalidValue {
                    entity,
                    field,
                    detail: format!("{value} is not a finite number"),
                });
            }
        }
        if setup12 + setup21 < 0.0 {
            return Err(ModelError::InvalidValue {
                entity,
                field: "setup12",
                detail: format!("setup12+setup21 must be non-negative, got {}", setup12 + setup21),
            });
        }
        Ok(Self {
            id1,
            id2,
            setup12,
            setup21,
        })
    }

    pub fn id1(&self) -> &str {
        &self.id1
    }

    pub fn id2(&self) -> &str {
        &self.id2
    }

    pub fn setup12(&self) -> f64 {
        self.setup12
    }

    pub fn setup21(&self) -> f64 {
        self.setup21
    }
}

/// Which switch of a greenyellow interval a relation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwitchEvent {
    GreenyellowStart,
    GreenyellowEnd,
}

/// A synchronization relation between two signal groups.
///
/// Every variant forces both signal groups to have the same number of
/// greenyellow intervals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RelationRecord", into = "RelationRecord")]
pub enum Relation {
    /// Both greenyellow intervals start at the same time.
    SyncStart { from_id: String, to_id: String },
    /// `to_id` starts exactly `seconds` after `from_id`.
    Offset {
        from_id: String,
        to_id: String,
        seconds: f64,
    },
    /// `to_id` starts between `min_seconds` and `max_seconds` after
    /// `from_id` (also known as a prestart).
    GreenyellowLead {
        from_id: String,
        to_id: String,
        min_seconds: f64,
        max_seconds: f64,
    },
    /// `to_id` ends between `min_seconds` and `max_seconds` after `from_id`.
    GreenyellowTrail {
        from_id: String,
        to_id: String,
        min_seconds: f64,
        max_seconds: f64,
    },
}

impl Relation {
    /// Synchronous start; the pair is stored in sorted order since the
    /// relation is symmetric.
    pub fn sync_start(id_a: impl Into<String>, id_b: impl Into<String>) -> Result<Self> {
        let (a, b) = (id_a.into(), id_b.into());
        distinct("sync start", &a, &b)?;
        let (from_id, to_id) = if a <= b { (a, b) } else { (b, a) };
        Ok(Relation::SyncStart { from_id, to_id })
    }

    pub fn offset(from_id: impl Into<String>, to_id: impl Into<String>, seconds: f64) -> Result<Self> {
        let (from_id, to_id) = (from_id.into(), to_id.into());
        distinct("offset", &from_id, &to_id)?;
        if !seconds.is_finite() {
            return Err(ModelError::InvalidValue {
                entity: format!("offset '{from_id}'-'{to_id}'"),
                field: "seconds",
                detail: format!("{seconds} is not a finite number"),
            });
        }
        Ok(Relation::Offset {
            from_id,
            to_id,
            seconds,
        })
    }

    pub fn greenyellow_lead(
        from_id: impl Into<String>,
        to_id: impl Into<String>,
        min_seconds: f64,
        max_seconds: f64,
    ) -> Result<Self> {
        let (from_id, to_id) = (from_id.into(), to_id.into());
        distinct("greenyellow lead", &from_id, &to_id)?;
        window("greenyellow lead", &from_id, &to_id, min_seconds, max_seconds)?;
        Ok(Relation::GreenyellowLead {
            from_id,
            to_id,
            min_seconds,
            max_seconds,
        })
    }

    pub fn greenyellow_trail(
        from_id: impl Into<String>,
        to_id: impl Into<String>,
        min_seconds: f64,
        max_seconds: f64,
    ) -> Result<Self> {
        let (from_id, to_id) = (from_id.into(), to_id.into());
        distinct("greenyellow trail", &from_id, &to_id)?;
        window("greenyellow trail", &from_id, &to_id, min_seconds, max_seconds)?;
        Ok(Relation::GreenyellowTrail {
            from_id,
            to_id,
            min_seconds,
            max_seconds,
        })
    }

    pub fn from_id(&self) -> &str {
        match self {
            Relation::SyncStart { from_id, .. }
            | Relation::Offset { from_id, .. }
            | Relation::GreenyellowLead { from_id, .. }
            | Relation::GreenyellowTrail { from_id, .. } => from_id,
        }
    }

    pub fn to_id(&self) -> &str {
        match self {
            Relation::SyncStart { to_id, .. }
            | Relation::Offset { to_id, .. }
            | Relation::GreenyellowLead { to_id, .. }
            | Relation::GreenyellowTrail { to_id, .. } => to_id,
        }
    }

    /// The allowed range `(min, max)` of the gap between the two events.
    pub fn window(&self) -> (f64, f64) {
        match self {
            Relation::SyncStart { .. } => (0.0, 0.0),
            Relation::Offset { seconds, .. } => (*seconds, *seconds),
            Relation::GreenyellowLead {
                min_seconds,
                max_seconds,
                ..
            }
            | Relation::GreenyellowTrail {
                min_seconds,
                max_seconds,
                ..
            } => (*min_seconds, *max_seconds),
        }
    }

    /// The switch of both greenyellow intervals this relation ties together.
    pub fn event(&self) -> SwitchEvent {
        match self {
            Relation::GreenyellowTrail { .. } => SwitchEvent::GreenyellowEnd,
            _ => SwitchEvent::GreenyellowStart,
        }
    }

    /// Human-readable name of the relation kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Relation::SyncStart { .. } => "sync start",
            Relation::Offset { .. } => "offset",
            Relation::GreenyellowLead { .. } => "greenyellow lead",
            Relation::GreenyellowTrail { .. } => "greenyellow trail",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (min, max) = self.window();
        write!(
            f,
            "{} '{}' -> '{}' [{min}, {max}]",
            self.kind(),
            self.from_id(),
            self.to_id()
        )
    }
}

fn distinct(kind: &'static str, from_id: &str, to_id: &str) -> Result<()> {
    if from_id == to_id {
        return Err(ModelError::SelfRelation {
            kind,
            id: from_id.to_string(),
        });
    }
    Ok(())
}

fn window(kind: &str, from_id: &str, to_id: &str, min: f64, max: f64) -> Result<()> {
    let entity = format!("{kind} '{from_id}'-'{to_id}'");
    require_at_least(&entity, "min_time", min, f64::MIN)?;
    require_at_least(&entity, "max_time", max, min)
}

/// Wire layout shared by all relation kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RelationRecord {
    from_id: String,
    from_start_gy: bool,
    to_id: String,
    to_start_gy: bool,
    min_time: f64,
    max_time: f64,
    #[serde(default)]
    same_start_phase: bool,
}

impl TryFrom<RelationRecord> for Relation {
    type Error = ModelError;

    fn try_from(r: RelationRecord) -> Result<Self> {
        match (r.from_start_gy, r.to_start_gy) {
            (true, true) if r.min_time == r.max_time && r.min_time == 0.0 => {
                Relation::sync_start(r.from_id, r.to_id)
            }
            (true, true) if r.min_time == r.max_time => {
                Relation::offset(r.from_id, r.to_id, r.min_time)
            }
            (true, true) => Relation::greenyellow_lead(r.from_id, r.to_id, r.min_time, r.max_time),
            (false, false) => {
                Relation::greenyellow_trail(r.from_id, r.to_id, r.min_time, r.max_time)
            }
            _ => Err(ModelError::UnsupportedRelation(format!(
                "relation between '{}' and '{}' mixes the start and the end of greenyellow \
                 intervals; only sync starts, offsets, greenyellow leads and greenyellow trails \
                 are supported",
                r.from_id, r.to_id
            ))),
        }
    }
}

impl From<Relation> for RelationRecord {
    fn from(relation: Relation) -> Self {
        let (min_time, max_time) = relation.window();
        let start = relation.event() == SwitchEvent::GreenyellowStart;
        let same_start_phase = !matches!(relation, Relation::Offset { .. });
        let (from_id, to_id) = match relation {
            Relation::SyncStart { from_id, to_id }
            | Relation::Offset { from_id, to_id, .. }
            | Relation::GreenyellowLead { from_id, to_id, .. }
            | Relation::GreenyellowTrail { from_id, to_id, .. } => (from_id, to_id),
        };
        Self {
            from_id,
            from_start_gy: start,
            to_id,
            to_start_gy: start,
            min_time,
            max_time,
            same_start_phase,
        }
    }
}
