//! `sigplan validate`: check a schedule against an intersection.

use std::path::Path;

use anyhow::{bail, Result};
use sigplan_verify::{ProfileLevel, SafetyValidator, Tolerances, ValidationReport};

use crate::commands::{load_intersection, load_schedule};
use crate::config::SigplanConfig;

/// Validate a fixed-time schedule and print the report.
pub fn run(
    config: Option<&SigplanConfig>,
    intersection: &Path,
    schedule: &Path,
    tolerance: Option<f64>,
    profile: Option<&str>,
    report_format: Option<&str>,
) -> Result<()> {
    let intersection = load_intersection(intersection)?;
    let fts = load_schedule(schedule)?;
    let tolerances = resolve_tolerances(config, profile, tolerance)?;

    let report = SafetyValidator::new(tolerances).report(&intersection, &fts);

    match report_format {
        Some("json") => {
            println!("{}", serde_json::to_string_pretty(&report_json(&report))?);
        }
        Some("human") | None => println!("{report}"),
        Some(other) => bail!("unknown report format '{other}'. Choose: human, json"),
    }

    if let Some(violation) = &report.violation {
        bail!("schedule is unsafe: {violation}");
    }
    Ok(())
}

/// Tolerances from flags, then the config file, then the default profile.
/// `--tolerance` replaces the bounds and relation tolerances.
fn resolve_tolerances(
    config: Option<&SigplanConfig>,
    profile: Option<&str>,
    tolerance: Option<f64>,
) -> Result<Tolerances> {
    let mut tolerances = match config {
        Some(c) => c.tolerances(profile)?,
        None => SigplanConfig::default().tolerances(profile)?,
    };
    if let Some(t) = tolerance {
        if !(t.is_finite() && t >= 0.0) {
            bail!("--tolerance should be a non-negative number, got {t}");
        }
        tolerances.bounds = t;
        tolerances.relations = t;
        tolerances.level = ProfileLevel::Custom;
    }
    Ok(tolerances)
}

fn report_json(report: &ValidationReport) -> serde_json::Value {
    serde_json::json!({
        "profile": report.profile.to_string(),
        "safe": report.is_safe(),
        "checks": report.checks.iter().map(|o| {
            serde_json::json!({
                "check": o.check.name(),
                "passed": o.passed,
            })
        }).collect::<Vec<_>>(),
        "skipped": report.skipped().map(|c| c.name()).collect::<Vec<_>>(),
        "violation": report.violation.as_ref().map(ToString::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::*;

    #[test]
    fn resolve_flag_tolerance() {
        let t = resolve_tolerances(None, None, None).unwrap();
        assert_eq!(t, Tolerances::default());

        let t = resolve_tolerances(None, Some("strict"), Some(0.5)).unwrap();
        assert_eq!(t.level, ProfileLevel::Custom);
        assert_eq!(t.bounds, 0.5);
        assert_eq!(t.conflict_margin, Tolerances::strict().conflict_margin);

        assert!(resolve_tolerances(None, None, Some(-1.0)).is_err());
        assert!(resolve_tolerances(None, Some("unknown"), None).is_err());
    }

    #[test]
    fn validate_safe_schedule() {
        let dir = tempfile::tempdir().unwrap();
        let i = write(dir.path(), "intersection.json", INTERSECTION);
        let s = write(dir.path(), "fts.json", SAFE_SCHEDULE);
        run(None, &i, &s, None, None, None).unwrap();
        run(None, &i, &s, None, Some("strict"), Some("json")).unwrap();
    }

    #[test]
    fn validate_unsafe_schedule_fails() {
        let dir = tempfile::tempdir().unwrap();
        let i = write(dir.path(), "intersection.json", INTERSECTION);
        let s = write(dir.path(), "fts.json", UNSAFE_SCHEDULE);
        let err = run(None, &i, &s, None, None, None).unwrap_err();
        assert!(err.to_string().starts_with("schedule is unsafe"));
    }

    #[test]
    fn unknown_report_format() {
        let dir = tempfile::tempdir().unwrap();
        let i = write(dir.path(), "intersection.json", INTERSECTION);
        let s = write(dir.path(), "fts.json", SAFE_SCHEDULE);
        assert!(run(None, &i, &s, None, None, Some("xml")).is_err());
    }

    #[test]
    fn json_report_lists_skipped_checks() {
        let report = ValidationReport {
            profile: ProfileLevel::Default,
            checks: vec![],
            violation: None,
        };
        let json = report_json(&report);
        assert_eq!(json["skipped"].as_array().unwrap().len(), 5);
        assert_eq!(json["profile"], "default");
    }
}
