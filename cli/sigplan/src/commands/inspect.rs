//! `sigplan inspect`: summarize an intersection and optionally a schedule.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;
use sigplan_core::{FixedTimeSchedule, Intersection};

use crate::commands::{load_intersection, load_schedule};

pub fn run(intersection: &Path, schedule: Option<&Path>) -> Result<()> {
    let intersection = load_intersection(intersection)?;
    let fts = schedule.map(load_schedule).transpose()?;
    print!("{}", summary(&intersection, fts.as_ref()));
    Ok(())
}

fn summary(intersection: &Intersection, fts: Option<&FixedTimeSchedule>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "--- Intersection ---");
    let _ = writeln!(out, "  Signal groups: {}", intersection.signalgroups().len());
    for sg in intersection.signalgroups() {
        let _ = writeln!(
            out,
            "    {:<8} lights={} greenyellow=[{}, {}] red=[{}, {}] intervals={}..={}",
            sg.id(),
            sg.traffic_lights().len(),
            sg.min_greenyellow(),
            sg.max_greenyellow(),
            sg.min_red(),
            sg.max_red(),
            sg.min_nr(),
            sg.max_nr(),
        );
    }
    let _ = writeln!(out, "  Conflicts: {}", intersection.conflicts().len());
    for c in intersection.conflicts() {
        let _ = writeln!(
            out,
            "    {} <-> {} setup12={} setup21={}",
            c.id1(),
            c.id2(),
            c.setup12(),
            c.setup21()
        );
    }
    let _ = writeln!(out, "  Other relations: {}", intersection.other_relations().len());
    for r in intersection.other_relations() {
        let _ = writeln!(out, "    {r}");
    }
    let _ = writeln!(out, "  Periodic orders: {}", intersection.periodic_orders().len());
    for order in intersection.periodic_orders() {
        let _ = writeln!(out, "    {order}");
    }

    if let Some(fts) = fts {
        let _ = writeln!(out);
        let _ = writeln!(out, "--- Schedule (period {}) ---", fts.period());
        let _ = write!(out, "{fts}");
        let missing: Vec<&str> = intersection
            .signalgroups()
            .iter()
            .map(|sg| sg.id())
            .filter(|id| !fts.includes_signalgroup(id))
            .collect();
        if !missing.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "  Not scheduled: {}", missing.join(", "));
        }
    }
    out
}
