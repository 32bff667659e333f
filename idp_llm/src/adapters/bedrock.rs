//! AWS Bedrock Runtime adapter: the only place in the workspace that speaks
//! the Converse API wire format.
//!
//! Grounded on the original `generate_conversation`/`call_bedrock` helpers:
//! universal inference fields (`temperature`, `topP`, `stopSequences`,
//! `maxTokens`), a `top_k` extra for any Claude family model, and the
//! Claude-3.7 thinking-budget override that forces `temperature = 1.0` and
//! drops `top_p`.
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial Bedrock adapter: message translation,
//!   model-family extras, retry-policy integration, content-block selection.

use aws_sdk_bedrockruntime::types as bedrock;

use crate::message::{Content, ContentBlock, ImageFormat, InferenceConfig, Message, ModelExtras, Role};
use crate::ports::LlmClientPort;
use crate::retry::RetryPolicy;

/// Bedrock-backed LLM client. One instance per process; cheap to clone
/// (the underlying SDK client is reference-counted internally).
#[derive(Clone)]
pub struct BedrockLlmClient {
    client: aws_sdk_bedrockruntime::Client,
    retry_policy: RetryPolicy,
}

impl BedrockLlmClient {
    pub fn new(client: aws_sdk_bedrockruntime::Client, retry_policy: RetryPolicy) -> Self {
        Self { client, retry_policy }
    }

    /// Builds a client from the default AWS credential/region chain.
    pub async fn from_env(retry_policy: RetryPolicy) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(aws_sdk_bedrockruntime::Client::new(&config), retry_policy)
    }

    /// The last attempt count observed by [`crate::retry::RetryPolicy::run`],
    /// exposed for tests that assert on `S6`'s instrumentation hook.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }
}

#[async_trait::async_trait]
impl LlmClientPort for BedrockLlmClient {
    async fn converse(
        &self,
        model_id: &str,
        system_prompt: &str,
        messages: &[Message],
        inference_cfg: &InferenceConfig,
        extras: &ModelExtras,
    ) -> std::result::Result<std::string::String, idp_core::IdpError> {
        let (effective_cfg, effective_extras) = apply_model_family_overrides(model_id, inference_cfg, extras);
        let bedrock_messages: std::vec::Vec<bedrock::Message> = messages
            .iter()
            .map(to_bedrock_message)
            .collect::<std::result::Result<_, _>>()?;

        let (result, _attempts) = self
            .retry_policy
            .run(|| {
                let messages = bedrock_messages.clone();
                let system_prompt = system_prompt.to_string();
                let model_id = model_id.to_string();
                let cfg = effective_cfg.clone();
                let extras = effective_extras.clone();
                async move { self.call_once(&model_id, &system_prompt, messages, &cfg, &extras).await }
            })
            .await;

        match result {
            std::result::Result::Ok(text) => std::result::Result::Ok(text),
            std::result::Result::Err(err) => std::result::Result::Err(err),
        }
    }
}

impl BedrockLlmClient {
    async fn call_once(
        &self,
        model_id: &str,
        system_prompt: &str,
        messages: std::vec::Vec<bedrock::Message>,
        cfg: &InferenceConfig,
        extras: &ModelExtras,
    ) -> std::result::Result<std::string::String, idp_core::IdpError> {
        let mut inference_builder = bedrock::InferenceConfiguration::builder()
            .temperature(cfg.temperature)
            .max_tokens(cfg.max_tokens as i32);
        if let std::option::Option::Some(top_p) = cfg.top_p {
            inference_builder = inference_builder.top_p(top_p);
        }
        for stop in &cfg.stop_sequences {
            inference_builder = inference_builder.stop_sequences(stop.clone());
        }

        let mut request = self
            .client
            .converse()
            .model_id(model_id)
            .system(bedrock::SystemContentBlock::Text(system_prompt.to_string()))
            .inference_config(inference_builder.build());

        for message in messages {
            request = request.messages(message);
        }

        if !extras.is_empty() {
            request = request.additional_model_request_fields(extras_to_document(extras));
        }

        let response = request.send().await.map_err(classify_converse_error)?;

        let output = response
            .output()
            .ok_or_else(|| idp_core::IdpError::LlmInvocationFailed("no output in Bedrock response".to_string()))?;
        let message = output
            .as_message()
            .map_err(|_| idp_core::IdpError::LlmInvocationFailed("Bedrock output is not a message".to_string()))?;

        select_text_block(message.content())
    }
}

/// Applies the Claude-3.7 thinking-budget override described in `§4.4`: when
/// the caller asks for a non-zero thinking budget, force `temperature = 1.0`
/// and drop `top_p` (both are required by that variant).
fn apply_model_family_overrides(
    model_id: &str,
    cfg: &InferenceConfig,
    extras: &ModelExtras,
) -> (InferenceConfig, ModelExtras) {
    let family = idp_core::domain::model_params::strip_region_prefix(model_id);
    let mut cfg = cfg.clone();
    let mut extras = extras.clone();

    if family.contains("claude") && extras.top_k.is_none() {
        extras.top_k = std::option::Option::Some(200);
    }

    if family.contains("claude-3-7-sonnet") && extras.thinking_budget_tokens.is_some_and(|b| b > 0) {
        cfg.temperature = 1.0;
        cfg.top_p = std::option::Option::None;
    } else {
        extras.thinking_budget_tokens = std::option::Option::None;
    }

    (cfg, extras)
}

fn extras_to_document(extras: &ModelExtras) -> aws_smithy_types::Document {
    use aws_smithy_types::Document;
    let mut map = std::collections::HashMap::new();
    if let std::option::Option::Some(top_k) = extras.top_k {
        map.insert("top_k".to_string(), Document::Number(aws_smithy_types::Number::PosInt(top_k as u64)));
    }
    if let std::option::Option::Some(budget) = extras.thinking_budget_tokens {
        let mut thinking = std::collections::HashMap::new();
        thinking.insert("type".to_string(), Document::String("enabled".to_string()));
        thinking.insert(
            "budget_tokens".to_string(),
            Document::Number(aws_smithy_types::Number::PosInt(budget as u64)),
        );
        map.insert("thinking".to_string(), Document::Object(thinking));
    }
    Document::Object(map)
}

fn to_bedrock_message(message: &Message) -> std::result::Result<bedrock::Message, idp_core::IdpError> {
    let role = match message.role {
        Role::User => bedrock::ConversationRole::User,
        Role::Assistant => bedrock::ConversationRole::Assistant,
    };
    let mut builder = bedrock::Message::builder().role(role);
    for block in &message.content {
        builder = builder.content(to_bedrock_content_block(block)?);
    }
    builder
        .build()
        .map_err(|err| idp_core::IdpError::LlmInvocationFailed(std::format!("failed to build message: {err}")))
}

fn to_bedrock_content_block(block: &ContentBlock) -> std::result::Result<bedrock::ContentBlock, idp_core::IdpError> {
    match block {
        ContentBlock::Text(text) => std::result::Result::Ok(bedrock::ContentBlock::Text(text.clone())),
        ContentBlock::Image { format, bytes } => {
            let format = match format {
                ImageFormat::Jpeg => bedrock::ImageFormat::Jpeg,
                ImageFormat::Png => bedrock::ImageFormat::Png,
            };
            let image = bedrock::ImageBlock::builder()
                .format(format)
                .source(bedrock::ImageSource::Bytes(aws_smithy_types::Blob::new(bytes.clone())))
                .build()
                .map_err(|err| idp_core::IdpError::LlmInvocationFailed(std::format!("failed to build image block: {err}")))?;
            std::result::Result::Ok(bedrock::ContentBlock::Image(image))
        }
    }
}

/// Selects the text of the first text-bearing content block, per `§4.4`'s
/// content-block selection rule. A response with more than one remaining
/// text block after this selection is a provider contract violation
/// (`MultipleTextBlocks`); a response with none returns an empty string.
fn select_text_block(content: &[bedrock::ContentBlock]) -> std::result::Result<std::string::String, idp_core::IdpError> {
    let text_blocks: std::vec::Vec<&std::string::String> = content
        .iter()
        .filter_map(|block| match block {
            bedrock::ContentBlock::Text(text) => std::option::Option::Some(text),
            _ => std::option::Option::None,
        })
        .collect();

    match text_blocks.len() {
        0 => std::result::Result::Ok(std::string::String::new()),
        1 => std::result::Result::Ok(text_blocks[0].clone()),
        _ => std::result::Result::Err(idp_core::IdpError::MultipleTextBlocks),
    }
}

/// Maps a Bedrock SDK error onto the workspace error vocabulary, recognizing
/// `ThrottlingException` so [`RetryPolicy`] knows to retry it.
fn classify_converse_error<E, R>(err: aws_sdk_bedrockruntime::error::SdkError<E, R>) -> idp_core::IdpError
where
    E: std::fmt::Debug,
{
    // The SDK error type is generic over the operation; we only special-case
    // throttling for the Converse operation, which this adapter exclusively
    // calls, so a direct downcast attempt is always meaningful here.
    let message = std::format!("{err:?}");
    if message.contains("ThrottlingException") || message.contains("TooManyRequestsException") {
        idp_core::IdpError::LlmThrottled(message)
    } else {
        idp_core::IdpError::LlmInvocationFailed(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_text_block_single() {
        let content = std::vec![bedrock::ContentBlock::Text("hello".to_string())];
        assert_eq!(select_text_block(&content).unwrap(), "hello");
    }

    #[test]
    fn test_select_text_block_none_is_empty() {
        let content: std::vec::Vec<bedrock::ContentBlock> = std::vec![];
        assert_eq!(select_text_block(&content).unwrap(), "");
    }

    #[test]
    fn test_select_text_block_multiple_is_error() {
        let content = std::vec![
            bedrock::ContentBlock::Text("reasoning".to_string()),
            bedrock::ContentBlock::Text("answer".to_string()),
        ];
        let err = select_text_block(&content).unwrap_err();
        assert_eq!(err.kind(), idp_core::ErrorKind::MultipleTextBlocks);
    }

    #[test]
    fn test_thinking_budget_forces_temperature_and_drops_top_p() {
        let cfg = InferenceConfig {
            temperature: 0.0,
            top_p: std::option::Option::Some(0.9),
            stop_sequences: std::vec::Vec::new(),
            max_tokens: 4096,
        };
        let extras = ModelExtras {
            top_k: std::option::Option::None,
            thinking_budget_tokens: std::option::Option::Some(1024),
        };
        let (effective_cfg, effective_extras) =
            apply_model_family_overrides("anthropic.claude-3-7-sonnet-20250219-v1:0", &cfg, &extras);
        assert_eq!(effective_cfg.temperature, 1.0);
        assert!(effective_cfg.top_p.is_none());
        assert_eq!(effective_extras.thinking_budget_tokens, std::option::Option::Some(1024));
    }

    #[test]
    fn test_non_claude_3_7_drops_thinking_budget() {
        let cfg = InferenceConfig::new(0.0, 4096);
        let extras = ModelExtras {
            top_k: std::option::Option::None,
            thinking_budget_tokens: std::option::Option::Some(1024),
        };
        let (_, effective_extras) = apply_model_family_overrides("amazon.nova-pro-v1:0", &cfg, &extras);
        assert!(effective_extras.thinking_budget_tokens.is_none());
    }

    #[test]
    fn test_claude_family_defaults_top_k() {
        let cfg = InferenceConfig::new(0.0, 4096);
        let extras = ModelExtras::default();
        let (_, effective_extras) =
            apply_model_family_overrides("anthropic.claude-3-5-sonnet-20241022-v2:0", &cfg, &extras);
        assert_eq!(effective_extras.top_k, std::option::Option::Some(200));
    }
}
