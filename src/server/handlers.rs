use super::types::{AnalysisResponse, ErrorResponse};
use crate::{
    Error,
    analysis::{Description, ImageAnalyzer},
    upload::UploadStore,
};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::{error, info, warn};

pub const IMAGES_FIELD: &str = "images";
pub const IMAGE_FIELD: &str = "image";

type HandlerError = (StatusCode, Json<ErrorResponse>);

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<ImageAnalyzer>,
    pub uploads: Arc<UploadStore>,
}

fn reject(status: StatusCode, message: &str) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

fn intake_failure(e: Error, failure_message: &str) -> HandlerError {
    match e {
        Error::Upload(message) => {
            warn!("Rejected upload: {}", message);
            reject(StatusCode::BAD_REQUEST, &message)
        }
        Error::Multipart(e) => {
            warn!("Invalid multipart body: {}", e);
            reject(e.status(), "Invalid upload")
        }
        e => {
            error!("Failed to store upload: {}", e);
            reject(StatusCode::INTERNAL_SERVER_ERROR, failure_message)
        }
    }
}

pub async fn upload_images(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResponse>, HandlerError> {
    let batch = state
        .uploads
        .receive(multipart, IMAGES_FIELD, state.uploads.max_files())
        .await
        .map_err(|e| intake_failure(e, "Failed to process images"))?;

    if batch.is_empty() {
        return Err(reject(StatusCode::BAD_REQUEST, "No files uploaded"));
    }

    info!("Received {} images for analysis", batch.len());

    let result = state.analyzer.analyze_structured(batch.files()).await;
    batch.cleanup().await;

    match result {
        Ok(data) => Ok(Json(AnalysisResponse { data })),
        Err(e) => {
            error!("Error processing images: {}", e);
            Err(reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process images",
            ))
        }
    }
}

pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Description>, HandlerError> {
    let batch = state
        .uploads
        .receive(multipart, IMAGE_FIELD, 1)
        .await
        .map_err(|e| intake_failure(e, "Failed to process image"))?;

    let Some(file) = batch.files().first() else {
        return Err(reject(StatusCode::BAD_REQUEST, "No file uploaded"));
    };

    info!(
        "Received image {} for description",
        file.original_name().unwrap_or("<unnamed>")
    );

    let result = state.analyzer.describe(file).await;
    batch.cleanup().await;

    match result {
        Ok(description) => Ok(Json(description)),
        Err(e) => {
            error!("Error processing image: {}", e);
            Err(reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process image",
            ))
        }
    }
}
