//! Implementation of the 'idp extract' command.
//!
//! Runs one batch against a local filesystem root instead of S3, useful for
//! development and for driving the pipeline without standing up the HTTP
//! facade.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial extract command.

/// Executes the 'idp extract' command.
///
/// # Errors
///
/// Returns an error if `request_file` cannot be read/parsed, or if the
/// orchestrator reports a pre-fan-out failure (a malformed request or an
/// internal error). Per-document failures are not errors here: they come
/// back embedded in the written `BatchResult`, same as the HTTP facade.
pub async fn execute(
    request_file: &std::path::Path,
    root: &std::path::Path,
    out: std::option::Option<&std::path::Path>,
) -> anyhow::Result<()> {
    let config = idp_core::IdpConfig::from_env()?;
    let request_json = std::fs::read_to_string(request_file)
        .map_err(|err| anyhow::anyhow!("failed to read {}: {err}", request_file.display()))?;
    let request: idp_core::domain::ExtractionRequest = serde_json::from_str(&request_json)
        .map_err(|err| anyhow::anyhow!("failed to parse {} as an extraction request: {err}", request_file.display()))?;

    let state = crate::wiring::local(config, root).await;
    let batch_result = state.orchestrator.run_batch(request).await.map_err(anyhow::Error::from)?;

    let rendered = serde_json::to_string_pretty(&batch_result)?;
    match out {
        std::option::Option::Some(path) => {
            std::fs::write(path, &rendered)?;
            println!("wrote {} document result(s) to {}", batch_result.len(), path.display());
        }
        std::option::Option::None => println!("{rendered}"),
    }

    std::result::Result::Ok(())
}

#[cfg(test)]
mod tests {
    #[tokio::test]
    #[serial_test::serial]
    async fn test_execute_rejects_unparseable_request_file() {
        let dir = tempfile::tempdir().unwrap();
        let request_path = dir.path().join("request.json");
        std::fs::write(&request_path, "not json").unwrap();
        let result = super::execute(&request_path, dir.path(), None).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn test_execute_rejects_missing_request_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = super::execute(&dir.path().join("missing.json"), dir.path(), None).await;
        assert!(result.is_err());
    }
}
