// ABOUTME: Runtime error types with SNAFU pattern.
// ABOUTME: Covers endpoint parsing and engine connection failures.

use snafu::Snafu;

/// Failure to reach the container engine at all.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RuntimeError {
    #[snafu(display("invalid engine endpoint '{endpoint}': {reason}"))]
    Endpoint { endpoint: String, reason: String },

    #[snafu(display("engine connection to {endpoint} failed: {source}"))]
    Connection {
        endpoint: String,
        source: bollard::errors::Error,
    },
}
