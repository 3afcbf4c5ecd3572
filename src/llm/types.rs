use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImageArgs,
    ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionRequestUserMessageContentPart, ImageDetail, ImageUrlArgs,
};
use base64::{Engine, engine::general_purpose::STANDARD};

/// An image handed to the model, either embedded or by address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageReference {
    /// Base64 payload, sent as a `data:` URL.
    Inline { mime_type: String, data: String },
    /// A URL the remote API can fetch on its own.
    Url(String),
}

impl ImageReference {
    pub fn inline(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self::Inline {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// The URL string placed in the `image_url` content part.
    pub fn to_url(&self) -> String {
        match self {
            Self::Inline { mime_type, data } => format!("data:{mime_type};base64,{data}"),
            Self::Url(url) => url.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VisionRequest {
    pub model: String,
    pub prompt: String,
    pub images: Vec<ImageReference>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisionResponse {
    pub model: String,
    pub content: String,
}

impl VisionRequest {
    /// Builds the single user message: the prompt followed by every image.
    pub fn to_openai_message(&self) -> Result<ChatCompletionRequestMessage, crate::Error> {
        let mut parts: Vec<ChatCompletionRequestUserMessageContentPart> =
            Vec::with_capacity(self.images.len() + 1);

        parts.push(
            ChatCompletionRequestMessageContentPartTextArgs::default()
                .text(self.prompt.clone())
                .build()
                .map_err(|e| crate::Error::llm(format!("Failed to build text part: {}", e)))?
                .into(),
        );

        for image in &self.images {
            let image_url = ImageUrlArgs::default()
                .url(image.to_url())
                .detail(ImageDetail::Auto)
                .build()
                .map_err(|e| crate::Error::llm(format!("Failed to build image url: {}", e)))?;
            parts.push(
                ChatCompletionRequestMessageContentPartImageArgs::default()
                    .image_url(image_url)
                    .build()
                    .map_err(|e| crate::Error::llm(format!("Failed to build image part: {}", e)))?
                    .into(),
            );
        }

        let msg = ChatCompletionRequestUserMessageArgs::default()
            .content(parts)
            .build()
            .map_err(|e| crate::Error::llm(format!("Failed to build user message: {}", e)))?;
        Ok(msg.into())
    }
}
