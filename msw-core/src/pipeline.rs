//! Request execution and outcome classification.
//!
//! Exactly one outcome is produced per request. The checks run in a fixed
//! order: transport failure, non-2xx status, undecodable body, embedded
//! `error_response`, unexpected document shape. Anything else is a forecast.

use serde_json::Value;

use crate::{
    error::RequestError,
    model::{Forecast, ForecastEntry},
    transport::{RawResponse, Transport, TransportError},
};

/// Issue one GET to `endpoint` and classify the result.
pub async fn execute(transport: &dyn Transport, endpoint: &str) -> Result<Forecast, RequestError> {
    tracing::debug!(endpoint = %redact(endpoint), "Requesting forecast");

    let outcome = transport.get(endpoint).await;
    let result = classify(outcome);

    if let Err(err) = &result {
        tracing::error!(error = ?err, "{}", err);
    }

    result
}

pub fn classify(outcome: Result<RawResponse, TransportError>) -> Result<Forecast, RequestError> {
    let response = outcome.map_err(|e| RequestError::Transport {
        status: None,
        detail: e.to_string(),
    })?;

    if !response.is_success() {
        return Err(RequestError::Transport {
            status: Some(response.status),
            detail: truncate_body(&response.body),
        });
    }

    let document: Value = serde_json::from_str(&response.body).map_err(|e| RequestError::Parse {
        detail: e.to_string(),
    })?;

    if let Some(embedded) = document.get("error_response").filter(|v| is_truthy(v)) {
        return Err(RequestError::Api {
            code: embedded.get("code").and_then(Value::as_i64),
            detail: embedded
                .get("error_msg")
                .and_then(Value::as_str)
                .map(str::to_string),
        });
    }

    into_forecast(document)
}

/// `null`, `false`, zero and `""` mean "no error"; anything else, including
/// an empty object or array, marks the response as rejected.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn into_forecast(document: Value) -> Result<Forecast, RequestError> {
    let Value::Array(items) = document else {
        return Err(RequestError::Parse {
            detail: format!("expected a JSON array, got {}", kind(&document)),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(entry) => Ok::<ForecastEntry, RequestError>(entry),
            other => Err(RequestError::Parse {
                detail: format!("entry {i} is {}, expected an object", kind(&other)),
            }),
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Hide the API key path segment that follows the base `/api/` prefix.
fn redact(endpoint: &str) -> String {
    match endpoint.split_once("/forecast?") {
        Some((head, query)) => match head.rsplit_once('/') {
            Some((base, _key)) => format!("{base}/***/forecast?{query}"),
            None => endpoint.to_string(),
        },
        None => endpoint.to_string(),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
