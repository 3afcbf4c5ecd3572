mod storage;
mod types;

pub use storage::UploadStore;
pub use types::{UploadBatch, UploadedFile};
