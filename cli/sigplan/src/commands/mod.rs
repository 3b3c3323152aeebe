pub mod init;
pub mod inspect;
pub mod optimize;
pub mod validate;

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use sigplan_core::{ArrivalRates, FixedTimeSchedule, Intersection};
use tracing::debug;

fn read_json(path: &Path) -> Result<serde_json::Value> {
    if !path.is_file() {
        bail!("file not found: {}", path.display());
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    debug!(path = %path.display(), bytes = content.len(), "loaded input file");
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

/// Load an intersection from a bare JSON object or a desktop export.
pub(crate) fn load_intersection(path: &Path) -> Result<Intersection> {
    let value = read_json(path)?;
    let intersection = Intersection::from_json_value(value)
        .with_context(|| format!("reading intersection from {}", path.display()))?;
    debug!(
        signalgroups = intersection.signalgroups().len(),
        conflicts = intersection.conflicts().len(),
        "intersection loaded"
    );
    Ok(intersection)
}

/// Load a schedule, either bare or as written by `sigplan optimize`.
pub(crate) fn load_schedule(path: &Path) -> Result<FixedTimeSchedule> {
    let value = match read_json(path)? {
        serde_json::Value::Object(mut map) if map.contains_key("fixed_time_schedule") => map
            .remove("fixed_time_schedule")
            .unwrap_or(serde_json::Value::Null),
        other => other,
    };
    let fts: FixedTimeSchedule = serde_json::from_value(value)
        .with_context(|| format!("reading fixed-time schedule from {}", path.display()))?;
    debug!(period = fts.period(), "schedule loaded");
    Ok(fts)
}

pub(crate) fn load_arrival_rates(path: &Path) -> Result<ArrivalRates> {
    let value = read_json(path)?;
    ArrivalRates::from_json_value(value)
        .with_context(|| format!("reading arrival rates from {}", path.display()))
}
