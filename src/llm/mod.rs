mod client;
mod types;

pub use client::{OpenAiVisionClient, VisionClient};
pub use types::{ImageReference, VisionRequest, VisionResponse};
