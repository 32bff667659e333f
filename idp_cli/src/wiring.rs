//! Assembles concrete adapters behind the orchestrator's collaborator ports.
//!
//! Two wirings are offered: [`production`] builds the Bedrock/S3 stack from
//! `IdpConfig`, and [`local`] builds the same graph over a filesystem root
//! for the `extract` subcommand and local development. Both leave the
//! OCR/managed-IDP collaborators on [`idp_orchestrator::adapters::unconfigured`]
//! since no concrete Textract/BDA adapter is in scope (`§1`).
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial production + local wiring.

use idp_orchestrator::Orchestrator;
use idp_store::ArtifactStorePort;

/// Everything an HTTP handler or a local run needs: the assembled
/// orchestrator plus a handle on the store for the upload-grant endpoint.
pub struct AppState {
    pub orchestrator: Orchestrator,
    pub store: std::sync::Arc<dyn ArtifactStorePort>,
    pub config: idp_core::IdpConfig,
}

/// Builds the production wiring: Bedrock LLM client, S3 artifact store,
/// filesystem template loader, unconfigured OCR/managed-IDP collaborators.
pub async fn production(config: idp_core::IdpConfig) -> AppState {
    let retry_policy = idp_llm::RetryPolicy::new(config.llm_max_retry_attempts);
    let llm: std::sync::Arc<dyn idp_llm::LlmClientPort> = std::sync::Arc::new(
        idp_llm::adapters::bedrock::BedrockLlmClient::from_env(retry_policy).await,
    );
    let store: std::sync::Arc<dyn ArtifactStorePort> = std::sync::Arc::new(
        idp_store::adapters::s3_store::S3ArtifactStore::from_env(config.primary_bucket.clone()).await,
    );
    build(config, llm, store)
}

/// Builds the local wiring: same Bedrock LLM client (this is still the one
/// real LLM adapter in the workspace) but a filesystem-rooted artifact
/// store, for the `extract` subcommand and for development against a local
/// document directory instead of S3.
pub async fn local(config: idp_core::IdpConfig, root: impl Into<std::path::PathBuf>) -> AppState {
    let retry_policy = idp_llm::RetryPolicy::new(config.llm_max_retry_attempts);
    let llm: std::sync::Arc<dyn idp_llm::LlmClientPort> = std::sync::Arc::new(
        idp_llm::adapters::bedrock::BedrockLlmClient::from_env(retry_policy).await,
    );
    let store: std::sync::Arc<dyn ArtifactStorePort> =
        std::sync::Arc::new(idp_store::adapters::fs_store::FsArtifactStore::new(root.into()));
    build(config, llm, store)
}

fn build(
    config: idp_core::IdpConfig,
    llm: std::sync::Arc<dyn idp_llm::LlmClientPort>,
    store: std::sync::Arc<dyn ArtifactStorePort>,
) -> AppState {
    let templates: std::sync::Arc<dyn idp_prompting::composer::ports::TemplateLoaderPort> =
        std::sync::Arc::new(idp_prompting::composer::adapters::FsTemplateLoader::new(
            config.template_dir.clone(),
        ));

    let text_extractor = std::sync::Arc::new(idp_extract::TextExtractor::new(
        llm.clone(),
        store.clone(),
        templates.clone(),
    ));
    let image_extractor = std::sync::Arc::new(idp_extract::ImageExtractor::new(llm, store.clone(), templates));

    let ocr: std::sync::Arc<dyn idp_orchestrator::OcrPort> =
        std::sync::Arc::new(idp_orchestrator::adapters::unconfigured::UnconfiguredOcr);
    let managed_idp: std::sync::Arc<dyn idp_orchestrator::ManagedIdpPort> =
        std::sync::Arc::new(idp_orchestrator::adapters::unconfigured::UnconfiguredManagedIdp);

    let orchestrator = Orchestrator::new(
        text_extractor,
        image_extractor,
        store.clone(),
        ocr,
        managed_idp,
        std::time::Duration::from_secs(config.orchestrator_document_timeout_secs),
    );

    AppState { orchestrator, store, config }
}
