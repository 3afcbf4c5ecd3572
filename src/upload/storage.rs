use super::{UploadBatch, UploadedFile};
use crate::{Error, Result};
use axum::extract::Multipart;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct UploadStore {
    dir: PathBuf,
    max_files: usize,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, max_files: usize) -> Self {
        Self {
            dir: dir.into(),
            max_files,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_files(&self) -> usize {
        self.max_files
    }

    /// Creates the upload directory if it does not exist yet.
    pub async fn prepare(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        info!("Upload directory ready: {}", self.dir.display());
        Ok(())
    }

    /// Writes every file part named `field` to disk, accepting at most `limit`
    /// of them. Parts under other names and plain text fields are skipped.
    ///
    /// On error the files already written for this request are deleted when
    /// the partial batch is dropped.
    pub async fn receive(
        &self,
        mut multipart: Multipart,
        field: &str,
        limit: usize,
    ) -> Result<UploadBatch> {
        let limit = limit.min(self.max_files);
        let mut batch = UploadBatch::default();

        while let Some(mut part) = multipart.next_field().await? {
            if part.name() != Some(field) {
                debug!("Skipping multipart field {:?}", part.name());
                continue;
            }
            let Some(original_name) = part.file_name().map(str::to_string) else {
                debug!("Skipping text field {}", field);
                continue;
            };

            if batch.len() >= limit {
                warn!("More than {} files sent in '{}'", limit, field);
                return Err(Error::upload("Too many files uploaded"));
            }

            let path = self.dir.join(Uuid::new_v4().simple().to_string());
            let upload = UploadedFile::new(path, Some(original_name), part.content_type());

            let mut file = tokio::fs::File::create(upload.path()).await?;
            batch.push(upload);

            while let Some(chunk) = part.chunk().await? {
                file.write_all(&chunk).await?;
            }
            file.flush().await?;
        }

        Ok(batch)
    }
}
