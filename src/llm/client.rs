use super::types::*;
use crate::{Error, Result, config::LlmConfig};
use async_openai::{Client, config::OpenAIConfig, types as openai_types};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

#[async_trait]
pub trait VisionClient: Send + Sync {
    async fn complete(&self, request: VisionRequest) -> Result<VisionResponse>;
}

pub struct OpenAiVisionClient {
    client: Client<OpenAIConfig>,
}

impl OpenAiVisionClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let mut openai_config = OpenAIConfig::new().with_api_key(config.api_key.clone());

        if !config.base_url.is_empty() {
            openai_config = openai_config.with_api_base(config.base_url.clone());
        }

        let mut client = Client::with_config(openai_config);

        if let Some(secs) = config.timeout_secs {
            let http_client = reqwest::Client::builder()
                .timeout(Duration::from_secs(secs))
                .build()?;
            client = client.with_http_client(http_client);
        }

        Ok(Self { client })
    }
}

#[async_trait]
impl VisionClient for OpenAiVisionClient {
    async fn complete(&self, request: VisionRequest) -> Result<VisionResponse> {
        debug!(
            "Creating vision completion with {} images on {}",
            request.images.len(),
            request.model
        );

        let message = request.to_openai_message()?;

        let mut request_builder = openai_types::CreateChatCompletionRequestArgs::default();
        request_builder.model(&request.model).messages(vec![message]);

        if let Some(max_tokens) = request.max_tokens {
            request_builder.max_completion_tokens(max_tokens);
        }

        let openai_request = request_builder.build()?;

        let response = self.client.chat().create(openai_request).await?;

        debug!(
            "Received vision completion with {} choices",
            response.choices.len()
        );

        let content = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::llm("Completion contained no choices"))?
            .message
            .content
            .ok_or_else(|| Error::llm("First choice has no text content"))?;

        Ok(VisionResponse {
            model: response.model,
            content,
        })
    }
}
