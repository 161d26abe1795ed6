//! Error types for the forecast client.
//!
//! Configuration problems are reported synchronously through [`ConfigError`]
//! at the call that caused them. Everything that can go wrong once a request
//! is in flight is reported through [`RequestError`], on the same channel as
//! a successful forecast.

use std::convert::Infallible;

use serde::Serialize;

use crate::model::VALID_UNITS;

/// Raised by constructors, setters and config parsing when an argument is invalid.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("An apikey is required to create a client")]
    MissingApiKey,

    #[error("A spot_id is required to create a client")]
    MissingSpotId,

    #[error("Spot Id should be an integer value, got '{0}'")]
    InvalidSpotId(String),

    #[error("Unit '{0}' is invalid, units should be a lowercase String value and one of these valid units: {}", VALID_UNITS.join(","))]
    InvalidUnits(String),

    #[error("Field must be a non-empty token without separators, got '{0}'")]
    InvalidField(String),

    #[error("Malformed client configuration: {0}")]
    Malformed(String),
}

impl From<Infallible> for ConfigError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Outcome of a failed `request()`.
///
/// The displayed message of each variant is fixed; the extra fields carry
/// diagnostics for logs and `Debug` output only.
#[derive(thiserror::Error, Debug)]
pub enum RequestError {
    /// The transport failed or the server rejected the request (non-2xx).
    #[error("Invalid API key or request may have failed")]
    Transport { status: Option<u16>, detail: String },

    /// The body was not the expected JSON document.
    #[error("Failed to Parse JSON response")]
    Parse { detail: String },

    /// The body parsed, but carried an `error_response` object.
    #[error("Invalid parameters provided")]
    Api {
        code: Option<i64>,
        detail: Option<String>,
    },
}

impl RequestError {
    /// The fixed, caller-facing message for this error kind.
    pub fn msg(&self) -> &'static str {
        match self {
            RequestError::Transport { .. } => "Invalid API key or request may have failed",
            RequestError::Parse { .. } => "Failed to Parse JSON response",
            RequestError::Api { .. } => "Invalid parameters provided",
        }
    }

    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload {
            status: "Error",
            msg: self.msg(),
        }
    }
}

/// Serializable `{ "status": "Error", "msg": ... }` shape surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    pub status: &'static str,
    pub msg: &'static str,
}
