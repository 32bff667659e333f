//! Single-shot text extraction (C6).
//!
//! Grounded on `extract_attributes.py`: load document text, render the
//! attribute list, budget-check against `0.75 * max_input_tokens` with the
//! prompt overhead subtracted, truncate only if necessary, invoke the LLM
//! once, parse leniently, persist under the deterministic output key.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial text extractor.

use idp_core::domain::ExtractionRequest;
use idp_core::IdpError;
use idp_llm::{InferenceConfig, Message, ModelExtras};

use crate::util::{basename as original_file_name, textual_few_shot_values};

/// Fraction of a model's context window reserved for the prompt; the
/// remainder is headroom for output tokens (`§4.6` step 4).
const PROMPT_TOKEN_BUDGET_FACTOR: f64 = 0.75;

/// The single-shot text extractor. Stateless beyond its three collaborators;
/// safe to share across concurrent document tasks.
pub struct TextExtractor {
    llm: std::sync::Arc<dyn idp_llm::LlmClientPort>,
    store: std::sync::Arc<dyn idp_store::ArtifactStorePort>,
    templates: std::sync::Arc<dyn idp_prompting::composer::ports::TemplateLoaderPort>,
}

impl TextExtractor {
    pub fn new(
        llm: std::sync::Arc<dyn idp_llm::LlmClientPort>,
        store: std::sync::Arc<dyn idp_store::ArtifactStorePort>,
        templates: std::sync::Arc<dyn idp_prompting::composer::ports::TemplateLoaderPort>,
    ) -> Self {
        Self { llm, store, templates }
    }

    /// Runs the full C6 contract for one document reference and returns the
    /// populated, already-persisted `DocumentResult`.
    pub async fn extract(
        &self,
        request: &ExtractionRequest,
        document_ref: &str,
    ) -> idp_core::domain::DocumentResult {
        match self.extract_inner(request, document_ref).await {
            std::result::Result::Ok(result) => result,
            std::result::Result::Err(err) => idp_core::domain::DocumentResult::failure(
                document_ref,
                original_file_name(document_ref),
                err.into_error_info(),
            ),
        }
    }

    async fn extract_inner(
        &self,
        request: &ExtractionRequest,
        document_ref: &str,
    ) -> std::result::Result<idp_core::domain::DocumentResult, IdpError> {
        let resolved_key = self.store.resolve(document_ref).await?;
        let bytes = self.store.get(&resolved_key).await?;
        let document_text = std::string::String::from_utf8_lossy(&bytes).into_owned();

        let system_prompt = self.templates.load_system_prompt()?;
        let user_template = self.templates.load_user_template()?;
        let composed = idp_prompting::composer::build(
            &user_template,
            request.attributes.as_slice(),
            &request.few_shots,
            request.instructions.as_deref(),
        )?;
        let few_shot_values = textual_few_shot_values(&request.few_shots);
        let model_id = &request.model_params.model_id;

        let full_prompt = idp_prompting::composer::fill(&composed.template, &document_text, &few_shot_values);
        let total_tokens = idp_prompting::tokenizer::count(&full_prompt, model_id);
        let document_tokens = idp_prompting::tokenizer::count(&document_text, model_id);
        let prompt_overhead = total_tokens.saturating_sub(document_tokens);
        let max_tokens = idp_prompting::tokenizer::max_input_tokens(model_id);
        let budget = (max_tokens as f64 * PROMPT_TOKEN_BUDGET_FACTOR) as usize;

        let final_user_message = if total_tokens as f64 > max_tokens as f64 * PROMPT_TOKEN_BUDGET_FACTOR {
            let truncated = idp_prompting::tokenizer::truncate(&document_text, prompt_overhead, budget, model_id);
            idp_prompting::composer::fill(&composed.template, &truncated, &few_shot_values)
        } else {
            full_prompt
        };

        let inference_cfg = InferenceConfig {
            temperature: request.model_params.temperature,
            top_p: request.model_params.top_p,
            stop_sequences: std::vec::Vec::new(),
            max_tokens: request.model_params.max_output_tokens,
        };
        let extras = ModelExtras {
            top_k: request.model_params.top_k,
            thinking_budget_tokens: if request.model_params.wants_thinking() {
                request.model_params.thinking_budget
            } else {
                std::option::Option::None
            },
        };

        let raw_answer = self
            .llm
            .converse(
                model_id,
                &system_prompt,
                &[Message::user_text(final_user_message)],
                &inference_cfg,
                &extras,
            )
            .await?;

        let answer = idp_prompting::parser::parse_answer(&raw_answer);
        let result = idp_core::domain::DocumentResult::success(
            resolved_key,
            original_file_name(document_ref),
            answer,
            raw_answer,
            std::option::Option::None,
        );

        self.persist(&result).await;
        std::result::Result::Ok(result)
    }

    /// Persists the result under its deterministic output key. A storage
    /// failure here does not discard a successful extraction; it is logged
    /// and the result is still returned (the orchestrator's own persistence
    /// pass, `§4.8` point 4, gets a second chance at the same idempotent
    /// key).
    async fn persist(&self, result: &idp_core::domain::DocumentResult) {
        let body = match serde_json::to_vec_pretty(result) {
            std::result::Result::Ok(bytes) => bytes,
            std::result::Result::Err(err) => {
                tracing::warn!(error = %err, "failed to serialize DocumentResult for persistence");
                return;
            }
        };
        if let std::result::Result::Err(err) = self.store.put(&result.output_key(), body, "application/json").await {
            tracing::warn!(error = %err, key = %result.output_key(), "failed to persist DocumentResult");
        }
    }
}
