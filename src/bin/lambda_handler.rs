//! AWS Lambda handler for running the risk pipeline
//!
//! Accepts pipeline configuration via JSON and returns per-scenario expected
//! loss summaries with the PD model diagnostics. Runs against a seeded
//! synthetic portfolio, so the function is self-contained for demos and load
//! tests.
//!
//! Supports Lambda Function URLs for direct HTTP access (API Gateway v2
//! payloads).

use aws_lambda_events::encodings::Body;
use aws_lambda_events::event::apigw::{ApiGatewayV2httpRequest, ApiGatewayV2httpResponse};
use aws_lambda_events::http::header::CONTENT_TYPE;
use aws_lambda_events::http::{HeaderMap, HeaderValue};
use credit_risk_system::loan::generate_portfolio;
use credit_risk_system::loss::SegmentRow;
use credit_risk_system::pipeline::ScenarioSummary;
use credit_risk_system::RiskPipeline;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Input configuration for one pipeline run
#[derive(Debug, Deserialize)]
pub struct RiskRequest {
    /// Size of the synthetic portfolio (default: 10,000 loans)
    #[serde(default = "default_n_loans")]
    pub n_loans: usize,

    /// Generator and train/split seed (default: 42)
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Include the baseline segment breakdown in the response
    #[serde(default)]
    pub include_segments: bool,
}

fn default_n_loans() -> usize {
    10_000
}
fn default_seed() -> u64 {
    42
}

impl Default for RiskRequest {
    fn default() -> Self {
        Self {
            n_loans: default_n_loans(),
            seed: default_seed(),
            include_segments: false,
        }
    }
}

/// Output from one pipeline run
#[derive(Debug, Serialize)]
pub struct RiskResponse {
    pub loan_count: usize,
    pub seed: u64,
    pub auc: f64,
    pub scenarios: Vec<ScenarioSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<SegmentRow>>,
    pub execution_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn json_response(status: i64, body: String) -> ApiGatewayV2httpResponse {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    ApiGatewayV2httpResponse {
        status_code: status,
        headers,
        body: Some(Body::Text(body)),
        ..Default::default()
    }
}

async fn handler(
    event: LambdaEvent<ApiGatewayV2httpRequest>,
) -> Result<ApiGatewayV2httpResponse, Error> {
    let start = Instant::now();

    let request: RiskRequest = match event.payload.body.as_deref() {
        None | Some("") => RiskRequest::default(),
        Some(body) => match serde_json::from_str(body) {
            Ok(req) => req,
            Err(err) => {
                let response = RiskResponse {
                    loan_count: 0,
                    seed: 0,
                    auc: 0.0,
                    scenarios: Vec::new(),
                    segments: None,
                    execution_time_ms: 0,
                    error: Some(format!("invalid request body: {}", err)),
                };
                return Ok(json_response(400, serde_json::to_string(&response)?));
            }
        },
    };

    log::info!(
        "running pipeline: {} loans, seed {}",
        request.n_loans,
        request.seed
    );
    let loans = generate_portfolio(request.n_loans, request.seed);

    match RiskPipeline::with_seed(request.seed).run(&loans) {
        Ok(outcome) => {
            let response = RiskResponse {
                loan_count: loans.len(),
                seed: request.seed,
                auc: outcome.diagnostics.auc,
                scenarios: outcome.scenarios,
                segments: request.include_segments.then_some(outcome.segments),
                execution_time_ms: start.elapsed().as_millis() as u64,
                error: None,
            };
            Ok(json_response(200, serde_json::to_string(&response)?))
        }
        Err(err) => {
            let response = RiskResponse {
                loan_count: loans.len(),
                seed: request.seed,
                auc: 0.0,
                scenarios: Vec::new(),
                segments: None,
                execution_time_ms: start.elapsed().as_millis() as u64,
                error: Some(err.to_string()),
            };
            Ok(json_response(422, serde_json::to_string(&response)?))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
