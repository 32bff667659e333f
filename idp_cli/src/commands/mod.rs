//! Command modules for idp CLI.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Repurpose from rigger_cli's Init/Parse/List/Do/
//!   Server/Grpc/Tui command set into Serve/Extract for the extraction
//!   pipeline.

pub mod extract;
pub mod serve;

/// idp CLI - HTTP facade and local runner for the document attribute
/// extraction pipeline.
#[derive(clap::Parser)]
#[command(name = "idp")]
#[command(about = "Document attribute extraction pipeline", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as clap::Parser>::parse()
    }
}

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Start the HTTP facade: POST /extract, POST /url, GET /healthz, GET /schema.
    Serve,

    /// Run a single batch against the local filesystem, without a server.
    Extract {
        /// Path to a JSON file holding the inbound ExtractionRequest (`§6.1`).
        request_file: std::path::PathBuf,

        /// Directory documents/templates/outputs are resolved against.
        #[arg(long, default_value = ".")]
        root: std::path::PathBuf,

        /// Where to write the resulting BatchResult JSON; stdout if omitted.
        #[arg(long)]
        out: std::option::Option<std::path::PathBuf>,
    },
}
