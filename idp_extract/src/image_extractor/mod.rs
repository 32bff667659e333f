//! Chunked, bounded-parallel image extraction (C7) — the hardest part of the
//! pipeline: rasterize, page-chunk, optionally prime every chunk with a
//! multimodal few-shot, dispatch chunks with a worker cap of `min(10,
//! chunk_count)`, parse each chunk independently, and fold the per-chunk
//! answers into one document answer in page order regardless of completion
//! order (`§4.7`).
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial image extractor: rasterize + chunk +
//!   few-shot + bounded-parallel dispatch + merge.

pub mod chunk;
pub mod few_shot;
pub mod merge;
pub mod rasterize;

use idp_core::domain::{DocumentResult, ExtractionRequest, FewShotExample};
use idp_core::IdpError;
use idp_llm::{ContentBlock, InferenceConfig, Message, ModelExtras};

use crate::util::{basename, textual_few_shot_values};

/// Outcome of one chunk's dispatch: its parsed answer (empty on failure) and
/// its raw text (an `"Error: ..."` message on failure). Chunk index is
/// carried alongside so results can be reassembled in page order regardless
/// of completion order.
struct ChunkOutcome {
    index: usize,
    answer: serde_json::Map<std::string::String, serde_json::Value>,
    raw: std::string::String,
}

/// The chunked image extractor. Stateless beyond its three collaborators;
/// safe to share across concurrent document tasks.
pub struct ImageExtractor {
    llm: std::sync::Arc<dyn idp_llm::LlmClientPort>,
    store: std::sync::Arc<dyn idp_store::ArtifactStorePort>,
    templates: std::sync::Arc<dyn idp_prompting::composer::ports::TemplateLoaderPort>,
}

impl ImageExtractor {
    pub fn new(
        llm: std::sync::Arc<dyn idp_llm::LlmClientPort>,
        store: std::sync::Arc<dyn idp_store::ArtifactStorePort>,
        templates: std::sync::Arc<dyn idp_prompting::composer::ports::TemplateLoaderPort>,
    ) -> Self {
        Self { llm, store, templates }
    }

    /// Runs the full C7 contract for one document reference and returns the
    /// populated, already-persisted `DocumentResult`.
    pub async fn extract(&self, request: &ExtractionRequest, document_ref: &str) -> DocumentResult {
        match self.extract_inner(request, document_ref).await {
            std::result::Result::Ok(result) => result,
            std::result::Result::Err(err) => {
                DocumentResult::failure(document_ref, basename(document_ref), err.into_error_info())
            }
        }
    }

    async fn extract_inner(
        &self,
        request: &ExtractionRequest,
        document_ref: &str,
    ) -> std::result::Result<DocumentResult, IdpError> {
        let resolved_key = self.store.resolve(document_ref).await?;
        let bytes = self.store.get(&resolved_key).await?;
        let file_name = basename(&resolved_key).to_string();
        let pages = rasterize::rasterize(&file_name, &bytes)?;

        let chunk_size = request.effective_chunk_size() as usize;
        let chunks = chunk::partition(pages, chunk_size);
        let total_chunks = chunks.len();

        let few_shot_pair = self.materialize_few_shot(&request.few_shots).await?;

        let system_prompt = self.templates.load_system_prompt()?;
        let user_template = self.templates.load_user_template()?;
        let composed = idp_prompting::composer::build(
            &user_template,
            request.attributes.as_slice(),
            &request.few_shots,
            request.instructions.as_deref(),
        )?;
        let few_shot_values = textual_few_shot_values(&request.few_shots);
        // Images carry the document content; the `{document}` placeholder has
        // nothing textual to substitute.
        let base_user_text = idp_prompting::composer::fill(&composed.template, "", &few_shot_values);

        let model_id = request.model_params.model_id.clone();
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

        let mut tasks: std::vec::Vec<std::pin::Pin<std::boxed::Box<dyn std::future::Future<Output = ChunkOutcome> + Send>>> =
            std::vec::Vec::with_capacity(total_chunks);
        for (index, chunk) in chunks.into_iter().enumerate() {
            let prefix = chunk::page_range_prefix(&chunk, total_chunks);
            let chunk_text = match prefix {
                std::option::Option::Some(prefix) => std::format!("{prefix}\n{base_user_text}"),
                std::option::Option::None => base_user_text.clone(),
            };

            let mut messages: std::vec::Vec<Message> = std::vec::Vec::new();
            if let std::option::Option::Some((user, assistant)) = &few_shot_pair {
                messages.push(user.clone());
                messages.push(assistant.clone());
            }
            let mut content: std::vec::Vec<ContentBlock> = chunk
                .pages
                .into_iter()
                .map(|page| ContentBlock::Image {
                    format: page.format,
                    bytes: page.bytes,
                })
                .collect();
            content.push(ContentBlock::Text(chunk_text));
            messages.push(Message::user(content));

            let llm = self.llm.clone();
            let model_id = model_id.clone();
            let system_prompt = system_prompt.clone();
            let inference_cfg = inference_cfg.clone();
            let extras = extras.clone();
            tasks.push(std::boxed::Box::pin(async move {
                run_chunk(index, llm, model_id, system_prompt, messages, inference_cfg, extras).await
            }));
        }

        let worker_cap = std::cmp::min(10, std::cmp::max(total_chunks, 1));
        let outcomes = if request.effective_parallel_chunks() && total_chunks > 1 {
            dispatch_bounded(tasks, worker_cap).await
        } else {
            let mut outcomes = std::vec::Vec::with_capacity(tasks.len());
            for task in tasks {
                outcomes.push(task.await);
            }
            outcomes
        };

        let mut ordered: std::vec::Vec<std::option::Option<ChunkOutcome>> =
            (0..total_chunks).map(|_| std::option::Option::None).collect();
        for outcome in outcomes {
            let index = outcome.index;
            ordered[index] = std::option::Option::Some(outcome);
        }
        let ordered: std::vec::Vec<ChunkOutcome> = ordered.into_iter().flatten().collect();

        let answers: std::vec::Vec<serde_json::Map<std::string::String, serde_json::Value>> =
            ordered.iter().map(|o| o.answer.clone()).collect();
        let raws: std::vec::Vec<std::string::String> = ordered.iter().map(|o| o.raw.clone()).collect();

        let merged_answer = merge::merge_chunks(&answers);
        let raw_answer = merge::join_raw_answers(&raws);

        let result = DocumentResult::success(
            resolved_key,
            basename(document_ref),
            merged_answer,
            raw_answer,
            std::option::Option::Some(total_chunks as u32),
        );

        self.persist(&result).await;
        std::result::Result::Ok(result)
    }

    /// Materializes the first multimodal few-shot example found, if any.
    /// Multiple multimodal examples are not supported; only the first is used
    /// (documented open-question decision, see DESIGN.md).
    async fn materialize_few_shot(
        &self,
        few_shots: &[FewShotExample],
    ) -> std::result::Result<std::option::Option<(Message, Message)>, IdpError> {
        for example in few_shots {
            if let FewShotExample::Multimodal { documents, markings } = example {
                let pair = few_shot::build_few_shot_pair(documents, markings, self.store.as_ref()).await?;
                return std::result::Result::Ok(std::option::Option::Some(pair));
            }
        }
        std::result::Result::Ok(std::option::Option::None)
    }

    async fn persist(&self, result: &DocumentResult) {
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

/// Runs one chunk: `QUEUED` (implicit, by being constructed) → `RUNNING` →
/// `(PARSED | MALFORMED)` on success or `ERROR` on failure → `DONE`. A
/// failing chunk never cancels its siblings; its contribution is `({},
/// "Error: <message>")` so the merge step sees the correct cardinality
/// (`§4.7`).
async fn run_chunk(
    index: usize,
    llm: std::sync::Arc<dyn idp_llm::LlmClientPort>,
    model_id: std::string::String,
    system_prompt: std::string::String,
    messages: std::vec::Vec<Message>,
    inference_cfg: InferenceConfig,
    extras: ModelExtras,
) -> ChunkOutcome {
    match llm.converse(&model_id, &system_prompt, &messages, &inference_cfg, &extras).await {
        std::result::Result::Ok(raw) => {
            let answer = idp_prompting::parser::parse_answer(&raw);
            ChunkOutcome { index, answer, raw }
        }
        std::result::Result::Err(err) => ChunkOutcome {
            index,
            answer: serde_json::Map::new(),
            raw: std::format!("Error: {err}"),
        },
    }
}

/// Runs `tasks` with at most `worker_cap` concurrently in flight.
async fn dispatch_bounded(
    tasks: std::vec::Vec<std::pin::Pin<std::boxed::Box<dyn std::future::Future<Output = ChunkOutcome> + Send>>>,
    worker_cap: usize,
) -> std::vec::Vec<ChunkOutcome> {
    use futures::stream::StreamExt;
    futures::stream::iter(tasks)
        .buffer_unordered(worker_cap)
        .collect()
        .await
}
