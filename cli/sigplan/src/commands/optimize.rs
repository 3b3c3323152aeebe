//! `sigplan optimize`: request a schedule from the remote optimizer.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use sigplan_cloud::{OptimizationInput, OptimizationOutcome};
use sigplan_core::Objective;

use crate::commands::{load_arrival_rates, load_intersection};
use crate::config::SigplanConfig;

/// Command-line options of `sigplan optimize`.
pub struct OptimizeOptions<'a> {
    pub intersection: &'a Path,
    pub arrival_rates: &'a Path,
    pub objective: Option<&'a str>,
    pub min_period: Option<f64>,
    pub max_period: Option<f64>,
    pub horizon: Option<f64>,
    pub output: Option<&'a Path>,
}

pub fn run(config: Option<&SigplanConfig>, options: &OptimizeOptions<'_>) -> Result<()> {
    let input = build_input(options)?;
    let config = config.cloned().unwrap_or_default();
    let outcome = request(&config, &input)?;

    println!("{}", outcome.fixed_time_schedule);
    println!("{}", outcome.phase_diagram);
    println!("objective value ({}): {}", input.objective, outcome.objective_value);

    if let Some(path) = options.output {
        write_outcome(path, &outcome)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn build_input(options: &OptimizeOptions<'_>) -> Result<OptimizationInput> {
    let intersection = load_intersection(options.intersection)?;
    let arrival_rates = load_arrival_rates(options.arrival_rates)?;
    let mut input = OptimizationInput::new(intersection, arrival_rates);
    if let Some(objective) = options.objective {
        input.objective = objective.parse::<Objective>().map_err(anyhow::Error::msg)?;
    }
    if let Some(min) = options.min_period {
        input.min_period_duration = min;
    }
    if let Some(max) = options.max_period {
        input.max_period_duration = max;
    }
    if let Some(horizon) = options.horizon {
        input.horizon = horizon;
    }
    // surface input errors before any network traffic
    input.corrected_arrival_rates()?;
    Ok(input)
}

#[cfg(feature = "http")]
fn request(config: &SigplanConfig, input: &OptimizationInput) -> Result<OptimizationOutcome> {
    use std::time::Duration;

    use sigplan_cloud::{CloudClient, Credentials, HttpTransport};

    let (access_var, secret_var) = config.credential_vars();
    let credentials = Credentials::from_env(access_var, secret_var)?;
    let tolerances = config.tolerances(None)?;
    let transport = HttpTransport::new(Duration::from_secs(600))?;
    let mut client =
        CloudClient::new(transport, credentials, config.cloud_config()).with_tolerances(tolerances);
    client.optimize(input).context("remote optimization failed")
}

#[cfg(not(feature = "http"))]
fn request(_config: &SigplanConfig, _input: &OptimizationInput) -> Result<OptimizationOutcome> {
    anyhow::bail!("this build of sigplan has no HTTP support; rebuild with `--features http`")
}

fn write_outcome(path: &Path, outcome: &OptimizationOutcome) -> Result<()> {
    let json = serde_json::json!({
        "fixed_time_schedule": outcome.fixed_time_schedule,
        "phase_diagram": outcome.phase_diagram,
        "objective_value": outcome.objective_value,
    });
    let content = serde_json::to_string_pretty(&json)?;
    fs::write(path, content).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::*;
    use crate::commands::load_schedule;

    fn options<'a>(intersection: &'a Path, rates: &'a Path) -> OptimizeOptions<'a> {
        OptimizeOptions {
            intersection,
            arrival_rates: rates,
            objective: None,
            min_period: None,
            max_period: None,
            horizon: None,
            output: None,
        }
    }

    #[test]
    fn build_input_applies_flags() {
        let dir = tempfile::tempdir().unwrap();
        let i = write(dir.path(), "intersection.json", INTERSECTION);
        let r = write(dir.path(), "rates.json", r#"{"sg1": [300], "sg2": [200]}"#);

        let mut opts = options(&i, &r);
        opts.objective = Some("min-period");
        opts.max_period = Some(90.0);
        opts.horizon = Some(1.5);
        let input = build_input(&opts).unwrap();
        assert_eq!(input.objective, Objective::MinPeriod);
        assert_eq!(input.max_period_duration, 90.0);
        assert_eq!(input.min_period_duration, 0.0);
        assert_eq!(input.horizon, 1.5);
    }

    #[test]
    fn build_input_rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let i = write(dir.path(), "intersection.json", INTERSECTION);
        let r = write(dir.path(), "rates.json", r#"{"sg1": [300]}"#);
        assert!(build_input(&options(&i, &r)).is_err());

        let r = write(dir.path(), "rates.json", r#"{"sg1": [300], "sg2": [200]}"#);
        let mut opts = options(&i, &r);
        opts.objective = Some("fastest");
        assert!(build_input(&opts).is_err());

        let mut opts = options(&i, &r);
        opts.horizon = Some(0.25);
        assert!(build_input(&opts).is_err());
    }

    #[test]
    fn written_outcome_loads_as_schedule() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = OptimizationOutcome {
            fixed_time_schedule: serde_json::from_str(SAFE_SCHEDULE).unwrap(),
            phase_diagram: serde_json::from_str(r#"[[["sg1", 0]], [["sg2", 0]]]"#).unwrap(),
            objective_value: 3.5,
        };
        let path = dir.path().join("out.json");
        write_outcome(&path, &outcome).unwrap();

        let fts = load_schedule(&path).unwrap();
        assert_eq!(fts, outcome.fixed_time_schedule);
    }

    #[cfg(not(feature = "http"))]
    #[test]
    fn optimize_without_http_support() {
        let dir = tempfile::tempdir().unwrap();
        let i = write(dir.path(), "intersection.json", INTERSECTION);
        let r = write(dir.path(), "rates.json", r#"{"sg1": [300], "sg2": [200]}"#);
        let err = run(None, &options(&i, &r)).unwrap_err();
        assert!(err.to_string().contains("--features http"));
    }
}
