//! Environment-driven runtime configuration.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial IdpConfig, covering the artifact store
//!   bucket/region, LLM call timeouts, retry budget, and template location.

pub mod error;

pub use error::ConfigError;

/// Runtime configuration assembled once at process start and threaded into
/// every adapter via constructor injection.
///
/// All fields have sane defaults for local development; production
/// deployments override them through environment variables. Reading this
/// struct never fails on missing optional variables, only on malformed ones.
#[derive(Debug, Clone)]
pub struct IdpConfig {
    /// AWS region for the Bedrock Runtime and S3 clients.
    pub aws_region: String,
    /// Primary artifact store bucket; all writes and most reads target this
    /// namespace.
    pub primary_bucket: String,
    /// Directory containing the system/user prompt templates consumed by the
    /// prompt composer.
    pub template_dir: std::path::PathBuf,
    /// TCP connect timeout for LLM provider calls, in seconds.
    pub llm_connect_timeout_secs: u64,
    /// Read timeout for LLM provider calls, in seconds.
    pub llm_read_timeout_secs: u64,
    /// Per-document deadline enforced by the orchestrator, in seconds.
    pub orchestrator_document_timeout_secs: u64,
    /// Maximum throttling retry attempts in the LLM client's backoff policy.
    pub llm_max_retry_attempts: u32,
    /// Bind address for the HTTP facade (`idp_cli serve`).
    pub server_bind_addr: String,
}

impl IdpConfig {
    /// Assembles configuration from environment variables, falling back to
    /// development-friendly defaults for anything unset.
    ///
    /// # Examples
    ///
    /// ```
    /// let config = idp_core::config::IdpConfig::from_env().unwrap();
    /// assert!(config.llm_max_retry_attempts > 0);
    /// ```
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        std::result::Result::Ok(Self {
            aws_region: env_or("IDP_AWS_REGION", "us-east-1"),
            primary_bucket: env_or("IDP_PRIMARY_BUCKET", "idp-artifacts-dev"),
            template_dir: std::path::PathBuf::from(env_or("IDP_TEMPLATE_DIR", "templates")),
            llm_connect_timeout_secs: env_parse_or("IDP_LLM_CONNECT_TIMEOUT_SECS", 120)?,
            llm_read_timeout_secs: env_parse_or("IDP_LLM_READ_TIMEOUT_SECS", 120)?,
            orchestrator_document_timeout_secs: env_parse_or(
                "IDP_ORCHESTRATOR_DOCUMENT_TIMEOUT_SECS",
                900,
            )?,
            llm_max_retry_attempts: env_parse_or("IDP_LLM_MAX_RETRY_ATTEMPTS", 5)?,
            server_bind_addr: env_or("IDP_SERVER_BIND_ADDR", "0.0.0.0:8080"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse_or<T>(key: &str, default: T) -> std::result::Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        std::result::Result::Err(_) => std::result::Result::Ok(default),
        std::result::Result::Ok(value) => value.parse::<T>().map_err(|_| ConfigError::InvalidValue {
            name: key.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial]
    fn test_from_env_defaults() {
        for key in [
            "IDP_AWS_REGION",
            "IDP_PRIMARY_BUCKET",
            "IDP_TEMPLATE_DIR",
            "IDP_LLM_CONNECT_TIMEOUT_SECS",
            "IDP_LLM_READ_TIMEOUT_SECS",
            "IDP_ORCHESTRATOR_DOCUMENT_TIMEOUT_SECS",
            "IDP_LLM_MAX_RETRY_ATTEMPTS",
            "IDP_SERVER_BIND_ADDR",
        ] {
            std::env::remove_var(key);
        }
        let config = IdpConfig::from_env().unwrap();
        assert_eq!(config.aws_region, "us-east-1");
        assert_eq!(config.llm_max_retry_attempts, 5);
        assert_eq!(config.orchestrator_document_timeout_secs, 900);
    }

    #[test]
    #[serial_test::serial]
    fn test_from_env_invalid_value() {
        std::env::set_var("IDP_LLM_MAX_RETRY_ATTEMPTS", "not-a-number");
        let result = IdpConfig::from_env();
        std::env::remove_var("IDP_LLM_MAX_RETRY_ATTEMPTS");
        assert!(result.is_err());
    }
}
