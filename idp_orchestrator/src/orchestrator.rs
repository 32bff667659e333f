//! The per-batch state machine (C8): parsing-mode routing, per-document
//! error isolation, and output aggregation (`§4.8`).
//!
//! This is the unit of durability the rest of the pipeline hides behind: a
//! caller hands it one `ExtractionRequest` and gets back a `BatchResult` of
//! the same length and order, with every per-document failure already
//! converted into an `ErrorInfo` rather than aborting the batch. `run_batch`
//! is a pure function over `(request, collaborators)` — nothing here reads
//! global state, which is what lets a test treat the orchestrator as a pure
//! function (`§4.8`, final paragraph).
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial orchestrator: routing, bounded
//!   per-document fan-out, per-document timeout, persistence.

use idp_core::domain::{BatchResult, DocumentResult, ExtractionRequest, ParsingMode};
use idp_core::{ErrorInfo, ErrorKind, IdpError};

use crate::ports::{ManagedIdpPort, OcrPort};

/// Worker cap for per-batch document fan-out when the caller doesn't
/// override it. Mirrors the image extractor's `min(10, chunk_count)` chunk
/// cap (`§5`); the spec names a "bounded" fan-out without a fixed number, so
/// 10 is this implementation's documented open-question decision (see
/// DESIGN.md).
pub const DEFAULT_MAX_CONCURRENT_DOCUMENTS: usize = 10;

/// The per-batch state machine. Cheap to clone: every field is an `Arc` or
/// `Copy`, so cloning one handle per in-flight document task is the idiom
/// used to fan out without borrowing `self` across an `await` boundary
/// (matching `idp_extract::image_extractor`'s chunk dispatch).
#[derive(Clone)]
pub struct Orchestrator {
    text_extractor: std::sync::Arc<idp_extract::TextExtractor>,
    image_extractor: std::sync::Arc<idp_extract::ImageExtractor>,
    store: std::sync::Arc<dyn idp_store::ArtifactStorePort>,
    ocr: std::sync::Arc<dyn OcrPort>,
    managed_idp: std::sync::Arc<dyn ManagedIdpPort>,
    document_timeout: std::time::Duration,
    max_concurrent_documents: usize,
}

impl Orchestrator {
    pub fn new(
        text_extractor: std::sync::Arc<idp_extract::TextExtractor>,
        image_extractor: std::sync::Arc<idp_extract::ImageExtractor>,
        store: std::sync::Arc<dyn idp_store::ArtifactStorePort>,
        ocr: std::sync::Arc<dyn OcrPort>,
        managed_idp: std::sync::Arc<dyn ManagedIdpPort>,
        document_timeout: std::time::Duration,
    ) -> Self {
        Self {
            text_extractor,
            image_extractor,
            store,
            ocr,
            managed_idp,
            document_timeout,
            max_concurrent_documents: DEFAULT_MAX_CONCURRENT_DOCUMENTS,
        }
    }

    /// Overrides the default per-batch document concurrency cap.
    pub fn with_max_concurrent_documents(mut self, max_concurrent_documents: usize) -> Self {
        self.max_concurrent_documents = std::cmp::max(max_concurrent_documents, 1);
        self
    }

    /// Runs the full batch: validates the request (a `MalformedRequest`
    /// here propagates to the caller — it is the one failure class that
    /// precedes fan-out, `§4.8` final paragraph), then fans out one task per
    /// document with a bounded worker pool, isolating every per-document
    /// failure into that document's own `DocumentResult`.
    pub async fn run_batch(&self, request: ExtractionRequest) -> std::result::Result<BatchResult, IdpError> {
        request.validate().map_err(IdpError::MalformedRequest)?;

        let documents = request.documents.clone();
        let total = documents.len();
        let worker_cap = std::cmp::min(self.max_concurrent_documents, std::cmp::max(total, 1));
        let request = std::sync::Arc::new(request);

        let mut tasks: std::vec::Vec<
            std::pin::Pin<std::boxed::Box<dyn std::future::Future<Output = (usize, DocumentResult)> + Send>>,
        > = std::vec::Vec::with_capacity(total);
        for (index, document_ref) in documents.into_iter().enumerate() {
            let orchestrator = self.clone();
            let request = request.clone();
            tasks.push(std::boxed::Box::pin(async move {
                let result = orchestrator.process_one_with_deadline(&request, &document_ref).await;
                orchestrator.persist(&result).await;
                (index, result)
            }));
        }

        let mut outcomes = dispatch_bounded(tasks, worker_cap).await;
        outcomes.sort_by_key(|(index, _)| *index);
        std::result::Result::Ok(outcomes.into_iter().map(|(_, result)| result).collect())
    }

    /// Enforces the per-document deadline (`§5`, default 900s) around
    /// routing. A timeout here never cancels sibling documents; it only
    /// converts this one document's outcome into an `InternalTimeout`
    /// failure.
    async fn process_one_with_deadline(&self, request: &ExtractionRequest, document_ref: &str) -> DocumentResult {
        match tokio::time::timeout(self.document_timeout, self.process_one(request, document_ref)).await {
            std::result::Result::Ok(result) => result,
            std::result::Result::Err(_) => DocumentResult::failure(
                document_ref,
                basename(document_ref),
                ErrorInfo::new(
                    ErrorKind::InternalTimeout,
                    std::format!("exceeded {:?} per-document deadline", self.document_timeout),
                ),
            ),
        }
    }

    /// Routes one document by `parsing_mode` (`§4.8` point 1) and catches
    /// every exception at this boundary, converting it into an
    /// error-populated `DocumentResult` rather than letting it escape and
    /// abort the batch (`§4.8` point 2).
    async fn process_one(&self, request: &ExtractionRequest, document_ref: &str) -> DocumentResult {
        match request.parsing_mode {
            ParsingMode::TextLlm => self.text_extractor.extract(request, document_ref).await,
            ParsingMode::ImageLlm => self.image_extractor.extract(request, document_ref).await,
            ParsingMode::OcrThenTextLlm => self.run_ocr_then_text(request, document_ref).await,
            ParsingMode::ManagedIdp => self.run_managed_idp(request, document_ref).await,
        }
    }

    /// `OCR_THEN_TEXT_LLM`: resolve the input, hand it to the OCR
    /// collaborator, then run the text extractor against the normalized
    /// `processed/<name>.txt` artifact it produces (`§4.8` point 1, second
    /// bullet). `file_key` on the returned result is corrected back to the
    /// original input reference: the text extractor only ever sees the
    /// processed key, but audiences reading the result still expect it to
    /// name the document they submitted.
    async fn run_ocr_then_text(&self, request: &ExtractionRequest, document_ref: &str) -> DocumentResult {
        match self.ocr_then_text_inner(request, document_ref).await {
            std::result::Result::Ok(result) => result,
            std::result::Result::Err(err) => {
                DocumentResult::failure(document_ref, basename(document_ref), err.into_error_info())
            }
        }
    }

    async fn ocr_then_text_inner(
        &self,
        request: &ExtractionRequest,
        document_ref: &str,
    ) -> std::result::Result<DocumentResult, IdpError> {
        let resolved_key = self.store.resolve(document_ref).await?;
        let processed_key = self.ocr.run(&resolved_key).await?;
        let mut result = self.text_extractor.extract(request, &processed_key).await;
        result.file_key = resolved_key;
        std::result::Result::Ok(result)
    }

    /// `MANAGED_IDP`: delegate to the managed service collaborator and adapt
    /// its schema onto `DocumentResult` — `answer` becomes the service's
    /// `inference_result`, `raw_answer` becomes a synthetic
    /// `<thinking>...</thinking><json>...</json>` string so downstream audit
    /// surfaces that expect that shape keep working (`§4.8` point 1, fourth
    /// bullet).
    async fn run_managed_idp(&self, request: &ExtractionRequest, document_ref: &str) -> DocumentResult {
        match self.managed_idp_inner(request, document_ref).await {
            std::result::Result::Ok(result) => result,
            std::result::Result::Err(err) => {
                DocumentResult::failure(document_ref, basename(document_ref), err.into_error_info())
            }
        }
    }

    async fn managed_idp_inner(
        &self,
        request: &ExtractionRequest,
        document_ref: &str,
    ) -> std::result::Result<DocumentResult, IdpError> {
        let resolved_key = self.store.resolve(document_ref).await?;
        let outcome = self.managed_idp.run(&resolved_key, request).await?;
        let raw_answer = std::format!(
            "<thinking>Delegated to the managed extraction service.</thinking><json>{}</json>",
            serde_json::to_string(&outcome.inference_result).unwrap_or_default()
        );
        std::result::Result::Ok(DocumentResult::success(
            resolved_key,
            basename(document_ref),
            outcome.inference_result,
            raw_answer,
            std::option::Option::None,
        ))
    }

    /// Persists one result individually, in addition to its place in the
    /// returned `BatchResult` (`§4.8` point 4). Idempotent: the output key
    /// is deterministic from `file_key`, so this is a safe overwrite even
    /// when the extractor that produced `result` already persisted it once.
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

fn basename(reference: &str) -> &str {
    reference.rsplit(['/', '\\']).next().unwrap_or(reference)
}

/// Runs `tasks` with at most `worker_cap` concurrently in flight, matching
/// `idp_extract::image_extractor`'s chunk dispatch so document-level and
/// chunk-level fan-out share the same bounded-parallelism idiom.
async fn dispatch_bounded<T: std::marker::Send>(
    tasks: std::vec::Vec<std::pin::Pin<std::boxed::Box<dyn std::future::Future<Output = T> + Send>>>,
    worker_cap: usize,
) -> std::vec::Vec<T> {
    use futures::stream::StreamExt;
    futures::stream::iter(tasks).buffer_unordered(worker_cap).collect().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use idp_core::domain::{AttributeSet, AttributeSpec, ModelParams};

    struct ScriptedLlm {
        replies: std::sync::Mutex<std::collections::HashMap<std::string::String, std::string::String>>,
    }

    #[async_trait::async_trait]
    impl idp_llm::LlmClientPort for ScriptedLlm {
        async fn converse(
            &self,
            _model_id: &str,
            _system_prompt: &str,
            messages: &[idp_llm::Message],
            _inference_cfg: &idp_llm::InferenceConfig,
            _extras: &idp_llm::ModelExtras,
        ) -> std::result::Result<std::string::String, IdpError> {
            let text = messages
                .iter()
                .flat_map(|m| m.content.iter())
                .find_map(|block| match block {
                    idp_llm::ContentBlock::Text(text) => std::option::Option::Some(text.clone()),
                    _ => std::option::Option::None,
                })
                .unwrap_or_default();
            for (needle, reply) in self.replies.lock().unwrap().iter() {
                if text.contains(needle.as_str()) {
                    return std::result::Result::Ok(reply.clone());
                }
            }
            std::result::Result::Ok("<json>{}</json>".to_string())
        }
    }

    struct InMemoryStore {
        objects: std::sync::Mutex<std::collections::HashMap<std::string::String, std::vec::Vec<u8>>>,
    }

    impl InMemoryStore {
        fn with(entries: &[(&str, &str)]) -> Self {
            let mut map = std::collections::HashMap::new();
            for (key, contents) in entries {
                map.insert(key.to_string(), contents.as_bytes().to_vec());
            }
            Self {
                objects: std::sync::Mutex::new(map),
            }
        }
    }

    #[async_trait::async_trait]
    impl idp_store::ArtifactStorePort for InMemoryStore {
        async fn head(&self, key: &str) -> std::result::Result<bool, IdpError> {
            std::result::Result::Ok(self.objects.lock().unwrap().contains_key(key))
        }

        async fn get(&self, key: &str) -> std::result::Result<std::vec::Vec<u8>, IdpError> {
            self.objects
                .lock()
                .unwrap()
                .get(key)
                .cloned()
                .ok_or_else(|| IdpError::ArtifactUnavailable(key.to_string()))
        }

        async fn put(&self, key: &str, bytes: std::vec::Vec<u8>, _content_type: &str) -> std::result::Result<(), IdpError> {
            self.objects.lock().unwrap().insert(key.to_string(), bytes);
            std::result::Result::Ok(())
        }

        async fn copy(&self, src: &str, dst: &str) -> std::result::Result<(), IdpError> {
            let bytes = self.get(src).await?;
            self.put(dst, bytes, "application/octet-stream").await
        }

        async fn issue_upload_grant(
            &self,
            key: &str,
            _ttl: std::time::Duration,
        ) -> std::result::Result<idp_store::UploadGrant, IdpError> {
            let mut fields = std::collections::BTreeMap::new();
            fields.insert("key".to_string(), key.to_string());
            std::result::Result::Ok(idp_store::UploadGrant {
                url: "https://example.invalid/".to_string(),
                fields,
            })
        }

        async fn resolve(&self, reference: &str) -> std::result::Result<std::string::String, IdpError> {
            if self.objects.lock().unwrap().contains_key(reference) {
                std::result::Result::Ok(reference.to_string())
            } else {
                std::result::Result::Err(IdpError::ArtifactUnavailable(reference.to_string()))
            }
        }
    }

    struct StaticTemplates;

    impl idp_prompting::composer::ports::TemplateLoaderPort for StaticTemplates {
        fn load_system_prompt(&self) -> std::result::Result<std::string::String, IdpError> {
            std::result::Result::Ok("Extract the requested attributes.".to_string())
        }

        fn load_user_template(&self) -> std::result::Result<std::string::String, IdpError> {
            std::result::Result::Ok(
                "Attributes to be extracted:\n{attributes}\n<document_level_instructions_placeholder>\n\nDocument:\n{document}\n"
                    .to_string(),
            )
        }
    }

    struct StubOcr;

    #[async_trait::async_trait]
    impl OcrPort for StubOcr {
        async fn run(&self, input_key: &str) -> std::result::Result<std::string::String, IdpError> {
            std::result::Result::Ok(std::format!("processed/{}", basename(input_key).replace(".pdf", ".txt")))
        }
    }

    struct StubManagedIdp;

    #[async_trait::async_trait]
    impl ManagedIdpPort for StubManagedIdp {
        async fn run(
            &self,
            _input_key: &str,
            _request: &ExtractionRequest,
        ) -> std::result::Result<crate::ports::ManagedIdpOutcome, IdpError> {
            let mut inference_result = serde_json::Map::new();
            inference_result.insert("name".to_string(), serde_json::json!("Alice"));
            std::result::Result::Ok(crate::ports::ManagedIdpOutcome { inference_result })
        }
    }

    fn sample_request(documents: &[&str], parsing_mode: ParsingMode) -> ExtractionRequest {
        ExtractionRequest {
            documents: documents.iter().map(|d| d.to_string()).collect(),
            attributes: AttributeSet::new(std::vec![AttributeSpec::new("name", "person name")]).unwrap(),
            instructions: std::option::Option::None,
            few_shots: std::vec![],
            parsing_mode,
            model_params: ModelParams::new("anthropic.claude-3-7-sonnet-20250219-v1:0", 0.0),
            chunk_size: std::option::Option::None,
            parallel_chunks: std::option::Option::None,
        }
    }

    fn build_orchestrator(
        store: std::sync::Arc<InMemoryStore>,
        llm: std::sync::Arc<dyn idp_llm::LlmClientPort>,
    ) -> Orchestrator {
        let templates = std::sync::Arc::new(StaticTemplates);
        let text_extractor = std::sync::Arc::new(idp_extract::TextExtractor::new(
            llm.clone(),
            store.clone(),
            templates.clone(),
        ));
        let image_extractor = std::sync::Arc::new(idp_extract::ImageExtractor::new(llm, store.clone(), templates));
        Orchestrator::new(
            text_extractor,
            image_extractor,
            store,
            std::sync::Arc::new(StubOcr),
            std::sync::Arc::new(StubManagedIdp),
            std::time::Duration::from_secs(900),
        )
    }

    #[tokio::test]
    async fn test_s5_batch_with_mixed_outcomes() {
        let store = std::sync::Arc::new(InMemoryStore::with(&[
            ("originals/a.txt", "Hello, my name is Alice."),
            ("originals/c.txt", "Some text the model won't answer about."),
        ]));
        let mut replies = std::collections::HashMap::new();
        replies.insert("Alice".to_string(), "<json>{\"name\":\"Alice\"}</json>".to_string());
        replies.insert(
            "won't answer".to_string(),
            "I could not find the requested attributes.".to_string(),
        );
        let llm = std::sync::Arc::new(ScriptedLlm {
            replies: std::sync::Mutex::new(replies),
        });
        let orchestrator = build_orchestrator(store, llm);

        let request = sample_request(
            &["originals/a.txt", "originals/missing.txt", "originals/c.txt"],
            ParsingMode::TextLlm,
        );
        let batch = orchestrator.run_batch(request).await.unwrap();

        assert_eq!(batch.len(), 3);
        assert!(batch[0].is_success());
        assert_eq!(batch[0].answer.as_ref().unwrap()["name"], serde_json::json!("Alice"));
        assert!(!batch[1].is_success());
        assert_eq!(batch[1].error.as_ref().unwrap().kind, ErrorKind::ArtifactUnavailable);
        assert!(batch[2].is_success());
        assert!(batch[2].answer.as_ref().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_batch_result_preserves_order_regardless_of_completion() {
        let store = std::sync::Arc::new(InMemoryStore::with(&[
            ("originals/a.txt", "doc a"),
            ("originals/b.txt", "doc b"),
            ("originals/c.txt", "doc c"),
        ]));
        let llm = std::sync::Arc::new(ScriptedLlm {
            replies: std::sync::Mutex::new(std::collections::HashMap::new()),
        });
        let orchestrator = build_orchestrator(store, llm);
        let request = sample_request(
            &["originals/a.txt", "originals/b.txt", "originals/c.txt"],
            ParsingMode::TextLlm,
        );

        let batch = orchestrator.run_batch(request).await.unwrap();

        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0].file_key, "originals/a.txt");
        assert_eq!(batch[1].file_key, "originals/b.txt");
        assert_eq!(batch[2].file_key, "originals/c.txt");
    }

    #[tokio::test]
    async fn test_malformed_request_short_circuits_before_fan_out() {
        let store = std::sync::Arc::new(InMemoryStore::with(&[]));
        let llm = std::sync::Arc::new(ScriptedLlm {
            replies: std::sync::Mutex::new(std::collections::HashMap::new()),
        });
        let orchestrator = build_orchestrator(store, llm);
        let mut request = sample_request(&["originals/a.txt"], ParsingMode::TextLlm);
        request.documents.clear();

        let err = orchestrator.run_batch(request).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRequest);
    }

    #[tokio::test]
    async fn test_ocr_then_text_llm_routes_through_processed_artifact() {
        let store = std::sync::Arc::new(InMemoryStore::with(&[
            ("originals/scan.pdf", "%PDF-raw-bytes"),
            ("processed/scan.txt", "Hello, my name is Alice."),
        ]));
        let mut replies = std::collections::HashMap::new();
        replies.insert("Alice".to_string(), "<json>{\"name\":\"Alice\"}</json>".to_string());
        let llm = std::sync::Arc::new(ScriptedLlm {
            replies: std::sync::Mutex::new(replies),
        });
        let orchestrator = build_orchestrator(store, llm);
        let request = sample_request(&["originals/scan.pdf"], ParsingMode::OcrThenTextLlm);

        let batch = orchestrator.run_batch(request).await.unwrap();

        assert_eq!(batch.len(), 1);
        assert!(batch[0].is_success());
        assert_eq!(batch[0].file_key, "originals/scan.pdf");
        assert_eq!(batch[0].answer.as_ref().unwrap()["name"], serde_json::json!("Alice"));
    }

    #[tokio::test]
    async fn test_managed_idp_adapts_schema_onto_document_result() {
        let store = std::sync::Arc::new(InMemoryStore::with(&[("originals/form.pdf", "bytes")]));
        let llm = std::sync::Arc::new(ScriptedLlm {
            replies: std::sync::Mutex::new(std::collections::HashMap::new()),
        });
        let orchestrator = build_orchestrator(store, llm);
        let request = sample_request(&["originals/form.pdf"], ParsingMode::ManagedIdp);

        let batch = orchestrator.run_batch(request).await.unwrap();

        assert!(batch[0].is_success());
        assert_eq!(batch[0].answer.as_ref().unwrap()["name"], serde_json::json!("Alice"));
        assert!(batch[0].raw_answer.as_ref().unwrap().contains("<thinking>"));
        assert!(batch[0].raw_answer.as_ref().unwrap().contains("<json>"));
    }

    #[tokio::test]
    async fn test_unconfigured_managed_idp_is_isolated_per_document() {
        let store = std::sync::Arc::new(InMemoryStore::with(&[("originals/form.pdf", "bytes")]));
        let llm = std::sync::Arc::new(ScriptedLlm {
            replies: std::sync::Mutex::new(std::collections::HashMap::new()),
        });
        let templates = std::sync::Arc::new(StaticTemplates);
        let text_extractor = std::sync::Arc::new(idp_extract::TextExtractor::new(
            llm.clone(),
            store.clone(),
            templates.clone(),
        ));
        let image_extractor = std::sync::Arc::new(idp_extract::ImageExtractor::new(llm, store.clone(), templates));
        let orchestrator = Orchestrator::new(
            text_extractor,
            image_extractor,
            store,
            std::sync::Arc::new(crate::adapters::unconfigured::UnconfiguredOcr),
            std::sync::Arc::new(crate::adapters::unconfigured::UnconfiguredManagedIdp),
            std::time::Duration::from_secs(900),
        );
        let request = sample_request(&["originals/form.pdf"], ParsingMode::ManagedIdp);

        let batch = orchestrator.run_batch(request).await.unwrap();

        assert_eq!(batch.len(), 1);
        assert!(!batch[0].is_success());
        assert_eq!(batch[0].error.as_ref().unwrap().kind, ErrorKind::ParsingStageFailed);
    }

    #[tokio::test]
    async fn test_per_document_timeout_does_not_fail_siblings() {
        struct SlowLlm;

        #[async_trait::async_trait]
        impl idp_llm::LlmClientPort for SlowLlm {
            async fn converse(
                &self,
                _model_id: &str,
                _system_prompt: &str,
                _messages: &[idp_llm::Message],
                _inference_cfg: &idp_llm::InferenceConfig,
                _extras: &idp_llm::ModelExtras,
            ) -> std::result::Result<std::string::String, IdpError> {
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                std::result::Result::Ok("<json>{\"name\":\"Alice\"}</json>".to_string())
            }
        }

        let store = std::sync::Arc::new(InMemoryStore::with(&[
            ("originals/a.txt", "doc a"),
            ("originals/b.txt", "doc b"),
        ]));
        let templates = std::sync::Arc::new(StaticTemplates);
        let llm: std::sync::Arc<dyn idp_llm::LlmClientPort> = std::sync::Arc::new(SlowLlm);
        let text_extractor = std::sync::Arc::new(idp_extract::TextExtractor::new(
            llm.clone(),
            store.clone(),
            templates.clone(),
        ));
        let image_extractor = std::sync::Arc::new(idp_extract::ImageExtractor::new(llm, store.clone(), templates));
        let orchestrator = Orchestrator::new(
            text_extractor,
            image_extractor,
            store,
            std::sync::Arc::new(StubOcr),
            std::sync::Arc::new(StubManagedIdp),
            std::time::Duration::from_millis(5),
        );
        let request = sample_request(&["originals/a.txt", "originals/b.txt"], ParsingMode::TextLlm);

        let batch = orchestrator.run_batch(request).await.unwrap();

        assert_eq!(batch.len(), 2);
        for result in &batch {
            assert!(!result.is_success());
            assert_eq!(result.error.as_ref().unwrap().kind, ErrorKind::InternalTimeout);
        }
    }
}
