//! AWS Lambda handler for running one financial simulation
//!
//! Accepts parameter overrides as JSON through a Lambda Function URL and
//! returns the full simulation result.

use aws_lambda_events::event::lambda_function_urls::{
    LambdaFunctionUrlRequest, LambdaFunctionUrlResponse,
};
use financial_simulator::{SimulationResult, Simulator};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Request body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SimulationRequest {
    /// Overrides by wire name, e.g. {"marketDemand": 120}
    #[serde(default)]
    parameters: BTreeMap<String, f64>,

    /// Free-text context carried into the narrative and echoed back
    #[serde(default)]
    scenario_note: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulationResponse {
    #[serde(flatten)]
    result: SimulationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    scenario_note: Option<String>,
    execution_time_ms: u64,
}

fn response(status_code: i64, body: String) -> LambdaFunctionUrlResponse {
    LambdaFunctionUrlResponse {
        status_code,
        headers: Default::default(),
        body: Some(body),
        is_base64_encoded: false,
        cookies: Vec::new(),
    }
}

fn error_response(status_code: i64, message: &str) -> LambdaFunctionUrlResponse {
    response(status_code, serde_json::json!({ "error": message }).to_string())
}

fn respond(
    simulator: &Simulator,
    request: &LambdaFunctionUrlRequest,
) -> LambdaFunctionUrlResponse {
    let start = std::time::Instant::now();

    if request.is_base64_encoded {
        return error_response(400, "Base64-encoded bodies are not supported");
    }

    let request: SimulationRequest = match request.body.as_deref() {
        None | Some("") => SimulationRequest::default(),
        Some(body) => match serde_json::from_str(body) {
            Ok(r) => r,
            Err(e) => return error_response(400, &format!("Invalid JSON: {}", e)),
        },
    };

    let note = request.scenario_note.as_deref();
    let result = match simulator.run_overrides_with_note(&request.parameters, note) {
        Ok(r) => r,
        Err(e) => return error_response(400, &e.to_string()),
    };

    let body = SimulationResponse {
        result,
        scenario_note: request.scenario_note,
        execution_time_ms: start.elapsed().as_millis() as u64,
    };
    match serde_json::to_string(&body) {
        Ok(json) => response(200, json),
        Err(e) => error_response(500, &format!("Failed to serialize result: {}", e)),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let simulator = match Simulator::from_csv() {
        Ok(s) => s,
        Err(e) => {
            log::warn!("baseline files unavailable ({}), using reference baseline", e);
            Simulator::reference()
        }
    };
    let simulator = &simulator;

    run(service_fn(
        move |event: LambdaEvent<LambdaFunctionUrlRequest>| async move {
            Ok::<_, Error>(respond(simulator, &event.payload))
        },
    ))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(body: Option<&str>) -> LambdaFunctionUrlRequest {
        LambdaFunctionUrlRequest {
            body: body.map(str::to_string),
            version: Default::default(),
            raw_path: Default::default(),
            raw_query_string: Default::default(),
            cookies: Default::default(),
            headers: Default::default(),
            query_string_parameters: Default::default(),
            request_context: aws_lambda_events::lambda_function_urls::LambdaFunctionUrlRequestContext {
                account_id: Default::default(),
                request_id: Default::default(),
                authorizer: Default::default(),
                apiid: Default::default(),
                domain_name: Default::default(),
                domain_prefix: Default::default(),
                time: Default::default(),
                time_epoch: Default::default(),
                http: aws_lambda_events::lambda_function_urls::LambdaFunctionUrlRequestContextHttpDescription {
                    method: Default::default(),
                    path: Default::default(),
                    protocol: Default::default(),
                    source_ip: Default::default(),
                    user_agent: Default::default(),
                },
            },
            is_base64_encoded: Default::default(),
        }
    }

    fn parse(response: &LambdaFunctionUrlResponse) -> serde_json::Value {
        serde_json::from_str(response.body.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn test_overrides_are_applied() {
        let simulator = Simulator::reference();
        let body = r#"{"parameters": {"marketDemand": 120}, "scenarioNote": "upside case"}"#;
        let response = respond(&simulator, &request(Some(body)));

        assert_eq!(response.status_code, 200);
        let json = parse(&response);
        assert_eq!(json["parameterSummary"], "Market Demand: 100 → 120");
        assert_eq!(json["scenarioNote"], "upside case");
        assert_eq!(json["keyMetrics"].as_array().unwrap().len(), 8);
    }

    #[test]
    fn test_note_reaches_fallback_narrative() {
        let simulator = Simulator::reference();
        let body = r#"{"parameters": {"discount": 10}, "scenarioNote": "clearance sale"}"#;
        let json = parse(&respond(&simulator, &request(Some(body))));

        let analysis = json["narrative"]["analysis"].as_str().unwrap();
        assert!(analysis.contains("Scenario note: clearance sale"));
        assert_eq!(json["narrative"]["source"], "fallback");
    }

    #[test]
    fn test_empty_body_runs_baseline() {
        let simulator = Simulator::reference();
        let response = respond(&simulator, &request(None));
        assert_eq!(response.status_code, 200);
        assert_eq!(parse(&response)["parameterSummary"], "All parameters at baseline");
    }

    #[test]
    fn test_bad_requests_are_rejected() {
        let simulator = Simulator::reference();

        let invalid = respond(&simulator, &request(Some("{not json")));
        assert_eq!(invalid.status_code, 400);

        let unknown = respond(&simulator, &request(Some(r#"{"parameters": {"weather": 3}}"#)));
        assert_eq!(unknown.status_code, 400);
        assert!(parse(&unknown)["error"].as_str().unwrap().contains("weather"));
    }
}
