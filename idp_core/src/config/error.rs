//! Configuration-loading errors.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial ConfigError, mirrored after the
//!   workspace's existing environment-driven config error pattern.

/// Errors raised while assembling an `IdpConfig` from the process environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(String),

    #[error("invalid value for environment variable {name}: {value}")]
    InvalidValue { name: String, value: String },
}
