use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use std::sync::{Arc, Mutex};
use vision_relay::{
    Error, Result,
    llm::{ImageReference, VisionClient, VisionRequest, VisionResponse},
};

type Responder = Box<dyn Fn(&VisionRequest) -> Result<String> + Send + Sync>;

/// Mock vision client that answers through a closure and records every request
pub struct MockVisionClient {
    pub requests: Arc<Mutex<Vec<VisionRequest>>>,
    responder: Responder,
}

impl MockVisionClient {
    pub fn new(responder: impl Fn(&VisionRequest) -> Result<String> + Send + Sync + 'static) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            responder: Box::new(responder),
        }
    }

    /// Always answers with the same text
    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Ok(text.clone()))
    }

    /// Always fails as if the upstream API had errored
    pub fn failing(error: &str) -> Self {
        let error = error.to_string();
        Self::new(move |_| Err(Error::llm(error.clone())))
    }

    pub fn get_requests(&self) -> Vec<VisionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl VisionClient for MockVisionClient {
    async fn complete(&self, request: VisionRequest) -> Result<VisionResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let content = (self.responder)(&request)?;
        Ok(VisionResponse {
            model: request.model,
            content,
        })
    }
}

/// Decodes the bytes of an inline image reference
pub fn inline_bytes(image: &ImageReference) -> Vec<u8> {
    match image {
        ImageReference::Inline { data, .. } => STANDARD.decode(data).unwrap(),
        ImageReference::Url(url) => panic!("expected inline image, got url {url}"),
    }
}
