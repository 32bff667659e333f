//! Implementation of the 'idp serve' command.
//!
//! Starts the HTTP facade over the production wiring (Bedrock + S3) and
//! serves until the process receives a shutdown signal.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial serve command, replacing rigger_cli's
//!   stdio MCP server with an axum HTTP listener.

/// Executes the 'idp serve' command.
///
/// # Errors
///
/// Returns an error if the configured bind address cannot be parsed or
/// bound, or if the server exits with an I/O error.
pub async fn execute() -> anyhow::Result<()> {
    let config = idp_core::IdpConfig::from_env()?;
    tracing::info!(bind_addr = %config.server_bind_addr, "starting idp HTTP facade");

    let state = std::sync::Arc::new(crate::wiring::production(config.clone()).await);
    let router = crate::server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server_bind_addr).await?;
    tracing::info!(bind_addr = %config.server_bind_addr, "listening");
    axum::serve(listener, router).await?;

    std::result::Result::Ok(())
}
