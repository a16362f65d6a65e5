//! AWS Lambda handler for running cash projections
//!
//! Accepts one or more encoded states (the query strings of shared links) and
//! returns the projected ledgers with summaries. Unreadable states fall back to
//! the default plan, as in the interactive app.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::info;
use serde::{Deserialize, Serialize};

use saas_forecast::{
    codec,
    projection::{ProjectionPeriod, ProjectionSummary},
    AssumptionSet, ScenarioRunner, YearMonth,
};

/// Input for the projection
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionRequest {
    /// Encoded state; the default plan when absent
    #[serde(default)]
    pub state: Option<String>,

    /// Additional encoded states projected alongside `state`
    #[serde(default)]
    pub scenarios: Vec<String>,

    /// First projected month, used when a state carries none
    #[serde(default)]
    pub start_month: Option<YearMonth>,

    /// Whether to include month labels
    #[serde(default = "default_labels")]
    pub labels: bool,
}

fn default_labels() -> bool { true }

/// Output for one projected state
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioOutput {
    /// Canonical re-encoding of the state that was projected
    pub state: String,
    pub start_month: YearMonth,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    pub summary: ProjectionSummary,
    pub periods: Vec<ProjectionPeriod>,
}

/// Output from the projection
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResponse {
    pub results: Vec<ScenarioOutput>,
    pub execution_time_ms: u64,
}

/// Lambda handler function
async fn handler(event: LambdaEvent<ProjectionRequest>) -> Result<ProjectionResponse, Error> {
    let start = std::time::Instant::now();
    let request = event.payload;
    let defaults = AssumptionSet::default_plan();

    let states: Vec<Option<&str>> = std::iter::once(request.state.as_deref())
        .chain(request.scenarios.iter().map(|s| Some(s.as_str())))
        .collect();

    let fallback_start = request.start_month.unwrap_or_else(YearMonth::current);
    let assumptions: Vec<AssumptionSet> = states
        .iter()
        .map(|state| {
            let mut set = match state {
                Some(state) => codec::decode_or_default(state, &defaults),
                None => defaults.clone(),
            };
            set.forecast_start.get_or_insert(fallback_start);
            set
        })
        .collect();

    // Scenarios are independent and projected in parallel
    let results = ScenarioRunner::new().run_batch(&assumptions);

    let outputs = assumptions
        .iter()
        .zip(results)
        .map(|(set, result)| {
            let start_month = set.resolved_start();
            ScenarioOutput {
                state: codec::encode(set),
                start_month,
                labels: if request.labels {
                    start_month.labels(set.number_of_months)
                } else {
                    Vec::new()
                },
                summary: result.summary(),
                periods: result.periods,
            }
        })
        .collect::<Vec<_>>();

    info!("projected {} scenarios in {:?}", outputs.len(), start.elapsed());

    Ok(ProjectionResponse {
        results: outputs,
        execution_time_ms: start.elapsed().as_millis() as u64,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
