//! idp CLI - HTTP facade and local runner for the document attribute
//! extraction pipeline.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Repurpose from rigger_cli (TUI/gRPC project
//!   management CLI) into the extraction service's entrypoint: Serve/Extract
//!   subcommands only.

mod commands;
mod server;
mod wiring;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    idp_core::logging::init_tracing();
    let cli = commands::Cli::parse();

    match cli.command {
        commands::Commands::Serve => {
            commands::serve::execute().await?;
        }
        commands::Commands::Extract { request_file, root, out } => {
            commands::extract::execute(&request_file, &root, out.as_deref()).await?;
        }
    }

    std::result::Result::Ok(())
}
