//! AWS Lambda handler for IRR/APR calculations
//!
//! Accepts `POST /calculate` with a loan request body
//! (`{ principal, upfrontFee: { value }, schedule: [{ principal, interestFee }] }`)
//! and returns `{ irr, apr }`.
//!
//! Supports Lambda Function URLs for direct HTTP access. Search settings and
//! failure mode are read once at cold start from RATE_SEARCH_* and
//! RATE_FAILURE_MODE.

use aws_lambda_events::event::lambda_function_urls::{LambdaFunctionUrlRequest, LambdaFunctionUrlResponse};
use aws_lambda_events::http::{header, HeaderMap, HeaderValue};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use loan_rates::{FailureMode, LoanRequest, RateCalculator};
use log::{info, warn};

const CALCULATE_PATH: &str = "/calculate";

/// Status code and JSON body, before wrapping in the Function URL response
#[derive(Debug, PartialEq)]
struct Reply {
    status: i64,
    body: Option<String>,
}

impl Reply {
    fn error(status: i64, message: &str) -> Self {
        Self {
            status,
            body: Some(serde_json::json!({ "error": message }).to_string()),
        }
    }
}

/// Route one request. Kept free of Lambda types so it can be tested directly.
fn respond(calculator: &RateCalculator, method: &str, path: &str, body: Option<&str>) -> Reply {
    // Handle CORS preflight
    if method == "OPTIONS" {
        return Reply { status: 200, body: None };
    }

    if path.trim_end_matches('/') != CALCULATE_PATH {
        return Reply::error(404, &format!("Unknown path: {}", path));
    }
    if method != "POST" {
        return Reply::error(405, &format!("Method not allowed: {}", method));
    }

    let request: LoanRequest = match serde_json::from_str(body.unwrap_or("{}")) {
        Ok(r) => r,
        Err(e) => return Reply::error(400, &format!("Invalid JSON: {}", e)),
    };

    if calculator.failure_mode() == FailureMode::Explicit {
        if let Err(e) = request.validate() {
            return Reply::error(422, &e.to_string());
        }
    }

    let summary = request.evaluate(calculator);
    if !summary.errors.is_empty() {
        warn!("Rates not found: {}", summary.errors.join("; "));
    }

    match serde_json::to_string(&summary) {
        Ok(json) => Reply { status: 200, body: Some(json) },
        Err(e) => Reply::error(500, &format!("Failed to encode response: {}", e)),
    }
}

fn response_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("POST, OPTIONS"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type"));
    headers
}

/// Lambda handler function
async fn handler(
    calculator: RateCalculator,
    event: LambdaEvent<LambdaFunctionUrlRequest>,
) -> Result<LambdaFunctionUrlResponse, Error> {
    let (request, _context) = event.into_parts();

    let method = request.request_context.http.method.as_deref().unwrap_or("GET");
    let path = request.raw_path.as_deref().unwrap_or("/");

    let reply = if request.is_base64_encoded {
        Reply::error(400, "Binary request bodies are not supported")
    } else {
        respond(&calculator, method, path, request.body.as_deref())
    };

    Ok(LambdaFunctionUrlResponse {
        status_code: reply.status,
        headers: response_headers(),
        body: reply.body,
        is_base64_encoded: false,
        cookies: Vec::new(),
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let calculator = RateCalculator::from_env();
    info!("Starting with {:?}", calculator);

    run(service_fn(move |event| handler(calculator, event))).await
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "principal": 300,
        "upfrontFee": { "value": 5 },
        "schedule": [
            { "principal": 100, "interestFee": 6 },
            { "principal": 100, "interestFee": 4 },
            { "principal": 100, "interestFee": 2 }
        ]
    }"#;

    #[test]
    fn test_calculate() {
        let reply = respond(&RateCalculator::default(), "POST", "/calculate", Some(BODY));
        assert_eq!(reply.status, 200);

        let json: serde_json::Value = serde_json::from_str(&reply.body.unwrap()).unwrap();
        assert_eq!(json["apr"], 40.5);
        assert!(json["irr"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn test_preflight_and_routing() {
        let calculator = RateCalculator::default();
        assert_eq!(respond(&calculator, "OPTIONS", "/calculate", None), Reply { status: 200, body: None });
        assert_eq!(respond(&calculator, "GET", "/calculate", None).status, 405);
        assert_eq!(respond(&calculator, "POST", "/other", Some(BODY)).status, 404);
        assert_eq!(respond(&calculator, "POST", "/calculate", Some("{ nope")).status, 400);
    }

    #[test]
    fn test_strict_mode_validates_and_reports_nulls() {
        let calculator = RateCalculator::default().with_failure_mode(FailureMode::Explicit);

        let reply = respond(&calculator, "POST", "/calculate", Some(r#"{ "principal": -5 }"#));
        assert_eq!(reply.status, 422);

        let reply = respond(&calculator, "POST", "/calculate", Some(r#"{ "principal": 500 }"#));
        assert_eq!(reply.status, 200);
        let json: serde_json::Value = serde_json::from_str(&reply.body.unwrap()).unwrap();
        assert!(json["irr"].is_null());
        assert_eq!(json["errors"].as_array().map(Vec::len), Some(2));
    }
}
