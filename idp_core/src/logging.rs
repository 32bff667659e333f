//! Shared tracing initialization.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial tracing-subscriber bootstrap, reused by
//!   every binary in the workspace (`idp_cli`) and available to integration
//!   tests that want readable output.

/// Initializes the global tracing subscriber from `RUST_LOG`, defaulting to
/// `info` for this workspace's crates and `warn` for everything else.
///
/// Safe to call more than once; subsequent calls are no-ops because
/// `tracing_subscriber` only allows one global default subscriber per process.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,idp_core=info,idp_orchestrator=info,idp_extract=info,idp_llm=info,idp_store=info,idp_cli=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
