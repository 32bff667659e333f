//! idp_cli library surface, exposed so integration tests can drive the
//! router and wiring without going through a spawned process.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial library, mirroring rigger_cli's
//!   commands-exposed-for-testing pattern.

pub mod commands;
pub mod server;
pub mod wiring;

/// Returns the crate semantic version at compile time.
pub fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_crate_version_non_empty() {
        assert!(!super::crate_version().is_empty());
    }
}
