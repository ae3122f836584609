//! Error types for scenario configuration.
//!
//! Configuration errors are fatal and detected at startup, before any
//! traffic is generated. Per-request failures (bad status codes, transport
//! errors) are never surfaced as errors; they are recorded in the metrics
//! collector and the run continues.

use thiserror::Error;

/// Fatal configuration errors, raised while compiling the user roster.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A user type was declared with no operations
    #[error("user type '{user_type}' has no operations configured")]
    EmptyOperationSet { user_type: &'static str },

    /// All operation weights of a user type sum to zero
    #[error("user type '{user_type}' has zero total operation weight")]
    ZeroTotalWeight { user_type: &'static str },

    /// No user types declared at all
    #[error("no user types configured")]
    EmptyRoster,

    /// All population weights sum to zero
    #[error("all user type population weights are zero")]
    ZeroPopulationWeight,

    /// A path template references a parameter slot the pool does not provide
    #[error("operation '{operation}' references unknown parameter slot '{slot}'")]
    UnknownSlot {
        operation: &'static str,
        slot: String,
    },

    /// A path template contains an unterminated `{placeholder}`
    #[error("operation '{operation}' has a malformed path template '{template}'")]
    MalformedTemplate {
        operation: &'static str,
        template: &'static str,
    },

    /// The target host URL could not be parsed
    #[error("invalid target host '{host}': {source}")]
    InvalidHost {
        host: String,
        #[source]
        source: url::ParseError,
    },
}
