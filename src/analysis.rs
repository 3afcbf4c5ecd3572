use crate::{
    Error, Result,
    config::{LlmConfig, PromptConfig},
    extract,
    llm::{ImageReference, VisionClient, VisionRequest},
    upload::UploadedFile,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Description {
    pub image_url: String,
    pub description: String,
}

/// Runs uploaded images through the vision model: encode, call, extract.
pub struct ImageAnalyzer {
    client: Arc<dyn VisionClient>,
    model: String,
    max_tokens: Option<u32>,
    prompts: PromptConfig,
}

impl ImageAnalyzer {
    pub fn new(client: Arc<dyn VisionClient>, llm: &LlmConfig, prompts: PromptConfig) -> Self {
        Self {
            client,
            model: llm.model.clone(),
            max_tokens: llm.max_tokens,
            prompts,
        }
    }

    /// Asks for JSON about every file and parses the fenced block in the reply.
    pub async fn analyze_structured(&self, files: &[UploadedFile]) -> Result<Value> {
        let mut images = Vec::with_capacity(files.len());
        for file in files {
            images.push(encode(file).await?);
        }

        let text = self.ask(&self.prompts.structured, images).await?;

        extract::fenced_json(&text).map_err(|e| {
            error!("Failed to parse JSON from model response: {}", e);
            Error::from(e)
        })
    }

    /// Asks for a free-form description of one file.
    pub async fn describe(&self, file: &UploadedFile) -> Result<Description> {
        let image = encode(file).await?;
        let image_url = image.to_url();

        let description = self.ask(&self.prompts.describe, vec![image]).await?;

        Ok(Description {
            image_url,
            description,
        })
    }

    async fn ask(&self, prompt: &str, images: Vec<ImageReference>) -> Result<String> {
        let request = VisionRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            images,
            max_tokens: self.max_tokens,
        };

        let response = self.client.complete(request).await?;
        debug!(
            "Model {} answered with {} characters",
            response.model,
            response.content.len()
        );
        Ok(response.content)
    }
}

async fn encode(file: &UploadedFile) -> Result<ImageReference> {
    let bytes = file.read().await?;
    Ok(ImageReference::inline(&bytes, file.mime_type()))
}
