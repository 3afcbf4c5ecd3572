use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

const FALLBACK_MIME_TYPE: &str = "image/jpeg";

/// One received file on local disk. The file is deleted when the value is
/// removed or dropped, whichever comes first.
#[derive(Debug)]
pub struct UploadedFile {
    path: PathBuf,
    original_name: Option<String>,
    mime_type: String,
    removed: bool,
}

impl UploadedFile {
    pub fn new(path: PathBuf, original_name: Option<String>, content_type: Option<&str>) -> Self {
        let mime_type = match content_type {
            Some(ct) if ct.starts_with("image/") => ct.to_string(),
            _ => FALLBACK_MIME_TYPE.to_string(),
        };

        Self {
            path,
            original_name,
            mime_type,
            removed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn original_name(&self) -> Option<&str> {
        self.original_name.as_deref()
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }

    pub async fn remove(mut self) {
        self.removed = true;
        log_removal(&self.path, tokio::fs::remove_file(&self.path).await);
    }
}

// Fallback for error and cancellation paths; handlers call `remove`.
impl Drop for UploadedFile {
    fn drop(&mut self) {
        if !self.removed {
            log_removal(&self.path, std::fs::remove_file(&self.path));
        }
    }
}

fn log_removal(path: &Path, result: std::io::Result<()>) {
    match result {
        Ok(()) => debug!("Removed upload {}", path.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove upload {}: {}", path.display(), e),
    }
}

/// The files received by a single request.
#[derive(Debug, Default)]
pub struct UploadBatch {
    files: Vec<UploadedFile>,
}

impl UploadBatch {
    pub fn push(&mut self, file: UploadedFile) {
        self.files.push(file);
    }

    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub async fn cleanup(self) {
        for file in self.files {
            file.remove().await;
        }
    }
}
