//! Core library for the `msw` forecast client.
//!
//! This crate defines:
//! - Client configuration and its validation (`ClientConfig`, `ClientState`)
//! - Deterministic endpoint rendering
//! - One-shot request execution with typed outcome classification
//!
//! It is used by `msw-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod state;
pub mod transport;

pub use client::MswClient;
pub use config::ClientConfig;
pub use error::{ConfigError, ErrorPayload, RequestError};
pub use model::{Forecast, ForecastEntry, SpotId, Units};
pub use state::ClientState;
pub use transport::{HttpTransport, RawResponse, Transport, TransportError};
