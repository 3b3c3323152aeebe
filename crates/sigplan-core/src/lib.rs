//! Data model for traffic-signal intersections and fixed-time schedules.
//!
//! An [`Intersection`] describes the static configuration: signal groups,
//! the conflicts between them, synchronization relations and fixed serving
//! orders. A [`FixedTimeSchedule`] is a candidate signal plan that repeats
//! every period. Every value is validated when it is built or decoded from
//! JSON, so structurally invalid configurations are rejected with a
//! [`ModelError`] before any safety check runs.

pub mod error;
pub mod intersection;
pub mod kpis;
pub mod periodic_order;
pub mod phase_diagram;
pub mod relations;
pub mod scenario;
pub mod schedule;
pub mod signalgroup;
pub mod traffic_light;

pub use error::{ModelError, Result};
pub use intersection::Intersection;
pub use kpis::Objective;
pub use periodic_order::PeriodicOrder;
pub use phase_diagram::{GreenYellowPhase, Phase, PhaseDiagram};
pub use relations::{Conflict, Relation, SwitchEvent};
pub use scenario::{ArrivalRates, QueueLengths};
pub use schedule::{by_name, FixedTimeSchedule, GreenYellowInterval};
pub use signalgroup::{DurationBounds, SignalGroup};
pub use traffic_light::TrafficLight;
