//! Client for the remote schedule optimizer.
//!
//! The client builds requests, maps HTTP status codes onto [`CloudError`]
//! and decodes responses. Schedules returned by the optimizer are validated
//! locally against the intersection before they are handed to the caller.

use serde::{Deserialize, Serialize};
use serde_json::json;
use sigplan_core::{
    ArrivalRates, FixedTimeSchedule, Intersection, Objective, PhaseDiagram, QueueLengths,
};
use sigplan_verify::{SafetyValidator, Tolerances};
use tracing::{debug, warn};

use crate::auth::{ensure_fresh, unix_now, AuthSession, Credentials, AUTHENTICATION_URL};
use crate::error::{CloudError, Result};
use crate::transport::{HttpReply, Transport};

pub const CLOUD_API_URL: &str = "https://cloud-api.swiftmobility.eu";

/// Environment variable that overrides the API base URL.
pub const API_URL_ENV: &str = "smc_api_url";

/// Endpoints of the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudConfig {
    pub api_url: String,
    pub auth_url: String,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            api_url: CLOUD_API_URL.to_string(),
            auth_url: AUTHENTICATION_URL.to_string(),
        }
    }
}

impl CloudConfig {
    /// Apply the `smc_api_url` environment variable, if set.
    pub fn with_env_override(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            self.api_url = url;
        }
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.api_url.trim_end_matches('/'))
    }
}

/// Map an HTTP status code onto the matching error.
pub fn check_status(status: u16, body: &str) -> Result<()> {
    match status {
        200 => Ok(()),
        400 => Err(CloudError::BadRequest(body.to_string())),
        401 => Err(CloudError::Unauthorized(
            "JWT validation failed: missing or invalid credentials".into(),
        )),
        402 => Err(CloudError::Unauthorized(
            "insufficient credits (cpu seconds) left".into(),
        )),
        403 => Err(CloudError::Unauthorized("forbidden".into())),
        426 => {
            let msg = serde_json::from_str::<serde_json::Value>(body)
                .ok()
                .and_then(|v| v["msg"].as_str().map(str::to_string))
                .unwrap_or_else(|| body.to_string());
            Err(CloudError::Unauthorized(format!(
                "the cloud api is still in its beta phase and might change; message from cloud: {msg}"
            )))
        }
        504 => Err(CloudError::Timeout),
        status => Err(CloudError::Unknown { status }),
    }
}

/// Everything the optimizer needs to compute a fixed-time schedule.
#[derive(Debug, Clone)]
pub struct OptimizationInput {
    pub intersection: Intersection,
    /// Arrival rates in PCE/h per traffic light.
    pub arrival_rates: ArrivalRates,
    /// Time period of interest in hours.
    pub horizon: f64,
    pub min_period_duration: f64,
    pub max_period_duration: f64,
    pub objective: Objective,
    /// Traffic waiting at the start of the horizon; zero when absent.
    pub initial_queue_lengths: Option<QueueLengths>,
}

impl OptimizationInput {
    pub fn new(intersection: Intersection, arrival_rates: ArrivalRates) -> Self {
        Self {
            intersection,
            arrival_rates,
            horizon: 2.0,
            min_period_duration: 0.0,
            max_period_duration: 180.0,
            objective: Objective::MinDelay,
            initial_queue_lengths: None,
        }
    }

    /// Arrival rates with the initial queues spread evenly over the horizon.
    pub fn corrected_arrival_rates(&self) -> Result<ArrivalRates> {
        let invalid = |e: sigplan_core::ModelError| CloudError::InvalidRequest(e.to_string());
        if !(self.horizon >= 1.0) {
            return Err(CloudError::InvalidRequest(format!(
                "horizon should be at least one hour, got {}",
                self.horizon
            )));
        }
        let periods_ok = self.min_period_duration.is_finite()
            && self.max_period_duration.is_finite()
            && 0.0 <= self.min_period_duration
            && self.min_period_duration <= self.max_period_duration;
        if !periods_ok {
            return Err(CloudError::InvalidRequest(format!(
                "period bounds [{}, {}] are not a valid range",
                self.min_period_duration, self.max_period_duration
            )));
        }

        self.arrival_rates.check_covers(&self.intersection).map_err(invalid)?;
        let queues = match &self.initial_queue_lengths {
            Some(q) => {
                q.check_covers(&self.intersection).map_err(invalid)?;
                q.clone()
            }
            None => QueueLengths::zeros_for(&self.intersection),
        };
        let extra = queues.spread_over(self.horizon).map_err(invalid)?;
        self.arrival_rates.checked_add(&extra).map_err(invalid)
    }
}

/// A validated schedule returned by the optimizer.
#[derive(Debug, Clone)]
pub struct OptimizationOutcome {
    pub fixed_time_schedule: FixedTimeSchedule,
    pub phase_diagram: PhaseDiagram,
    pub objective_value: f64,
}

#[derive(Serialize)]
struct OptimizationRequest<'a> {
    intersection: &'a Intersection,
    arrival_rates: &'a ArrivalRates,
    min_period_duration: f64,
    max_period_duration: f64,
    objective: Objective,
}

#[derive(Deserialize)]
struct OptimizationReply {
    fixed_time_schedule: FixedTimeSchedule,
    phase_diagram: PhaseDiagram,
    obj_value: f64,
}

#[derive(Deserialize)]
struct PhaseDiagramReply {
    phase_diagram: PhaseDiagram,
}

/// Client for the remote optimizer, generic over the transport.
pub struct CloudClient<T: Transport> {
    transport: T,
    credentials: Credentials,
    config: CloudConfig,
    session: Option<AuthSession>,
    validator: SafetyValidator,
    clock: fn() -> u64,
}

impl<T: Transport> CloudClient<T> {
    pub fn new(transport: T, credentials: Credentials, config: CloudConfig) -> Self {
        Self {
            transport,
            credentials,
            config,
            session: None,
            validator: SafetyValidator::default(),
            clock: unix_now,
        }
    }

    /// Tolerances used when re-validating returned schedules.
    pub fn with_tolerances(mut self, tolerances: Tolerances) -> Self {
        self.validator = SafetyValidator::new(tolerances);
        self
    }

    /// Replace the clock used to decide when the token needs renewal.
    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    pub fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    fn post(&mut self, path: &str, body: &serde_json::Value) -> Result<HttpReply> {
        if !self.transport.has_connection() {
            return Err(CloudError::NoConnection);
        }
        let session = ensure_fresh(
            self.session.as_ref(),
            &self.transport,
            &self.credentials,
            &self.config.auth_url,
            (self.clock)(),
        )?;
        let endpoint = self.config.endpoint(path);
        debug!(%endpoint, "calling endpoint");
        let reply = self
            .transport
            .post_json(&endpoint, Some(session.token()), body)?;
        self.session = Some(session);
        debug!(%endpoint, status = reply.status, "finished calling endpoint");
        check_status(reply.status, &reply.body)?;
        Ok(reply)
    }

    /// Request an optimized fixed-time schedule.
    ///
    /// The returned schedule is checked against all safety restrictions of
    /// the intersection; an unsafe schedule is reported as
    /// [`CloudError::Unsafe`].
    pub fn optimize(&mut self, input: &OptimizationInput) -> Result<OptimizationOutcome> {
        let arrival_rates = input.corrected_arrival_rates()?;
        let request = OptimizationRequest {
            intersection: &input.intersection,
            arrival_rates: &arrival_rates,
            min_period_duration: input.min_period_duration,
            max_period_duration: input.max_period_duration,
            objective: input.objective,
        };
        let body = serde_json::to_value(&request)?;
        let reply: OptimizationReply = self.post("fts-optimization", &body)?.json()?;

        self.validator
            .validate(&input.intersection, &reply.fixed_time_schedule)
            .map_err(|violation| {
                warn!(%violation, "optimizer returned a schedule that fails local validation");
                CloudError::Unsafe(violation)
            })?;

        Ok(OptimizationOutcome {
            fixed_time_schedule: reply.fixed_time_schedule,
            phase_diagram: reply.phase_diagram,
            objective_value: reply.obj_value,
        })
    }

    /// Compute the phase diagram of a fixed-time schedule.
    pub fn phase_diagram(
        &mut self,
        intersection: &Intersection,
        fts: &FixedTimeSchedule,
    ) -> Result<PhaseDiagram> {
        let schedule = serde_json::to_value(fts)?;
        let body = json!({
            "intersection": intersection,
            "greenyellow_intervals": schedule["greenyellow_intervals"],
            "period": fts.period(),
        });
        let reply: PhaseDiagramReply = self.post("phase-diagram-computation", &body)?.json()?;
        Ok(reply.phase_diagram)
    }
}
