use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, StatusCode},
};
use serde_json::Value;
use std::{path::Path, sync::Arc};
use tempfile::TempDir;
use vision_relay::{
    analysis::ImageAnalyzer,
    config::{Config, LlmConfig, LogsConfig, PromptConfig, ServerConfig},
    llm::VisionClient,
    server::{self, handlers::AppState},
    upload::UploadStore,
};

pub const BOUNDARY: &str = "relay-test-boundary";

/// Create a test configuration with sensible defaults
pub fn create_test_config(upload_dir: &Path) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
            logs: LogsConfig {
                level: "debug".to_string(),
            },
            upload_dir: upload_dir.to_string_lossy().to_string(),
            max_files: 10,
            max_body_bytes: 5 * 1024 * 1024,
        },
        llm: LlmConfig {
            base_url: String::new(),
            api_key: "test-api-key".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: None,
            timeout_secs: None,
        },
        prompts: PromptConfig::default(),
    }
}

/// Build the application router around a given vision client, storing uploads
/// in a fresh temporary directory
pub async fn create_test_app(client: Arc<dyn VisionClient>) -> (Router, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let upload_dir = temp_dir.path().join("uploads");
    let config = create_test_config(&upload_dir);

    let uploads = UploadStore::new(&upload_dir, config.server.max_files);
    uploads.prepare().await.unwrap();

    let state = AppState {
        analyzer: Arc::new(ImageAnalyzer::new(
            client,
            &config.llm,
            config.prompts.clone(),
        )),
        uploads: Arc::new(uploads),
    };

    (server::router(state, &config.server), temp_dir)
}

/// One part of a multipart/form-data body
pub struct FormPart<'a> {
    pub field: &'a str,
    pub file_name: Option<&'a str>,
    pub content_type: &'a str,
    pub data: &'a [u8],
}

impl<'a> FormPart<'a> {
    pub fn file(field: &'a str, file_name: &'a str, content_type: &'a str, data: &'a [u8]) -> Self {
        Self {
            field,
            file_name: Some(file_name),
            content_type,
            data,
        }
    }

    pub fn text(field: &'a str, value: &'a str) -> Self {
        Self {
            field,
            file_name: None,
            content_type: "text/plain",
            data: value.as_bytes(),
        }
    }
}

/// Encode parts as a multipart/form-data body using [`BOUNDARY`]
pub fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part.file_name {
            Some(file_name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    part.field, file_name
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.field).as_bytes(),
            ),
        }
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", part.content_type).as_bytes());
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Build a multipart POST request
pub fn multipart_request(uri: &str, parts: &[FormPart<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

/// Read a response into its status and JSON body
pub async fn json_response(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Number of entries left in the upload directory
pub fn upload_count(temp_dir: &TempDir) -> usize {
    std::fs::read_dir(temp_dir.path().join("uploads"))
        .unwrap()
        .count()
}
