pub mod handlers;
mod types;

pub use types::{AnalysisResponse, ErrorResponse};

use crate::{
    Result,
    analysis::ImageAnalyzer,
    config::{Config, ServerConfig},
    llm::{OpenAiVisionClient, VisionClient},
    upload::UploadStore,
};
use axum::{Router, extract::DefaultBodyLimit, routing::post};
use handlers::AppState;
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn router(state: AppState, server: &ServerConfig) -> Router {
    Router::new()
        .route("/upload", post(handlers::upload_images))
        .route("/upload-image", post(handlers::upload_image))
        .layer(DefaultBodyLimit::max(server.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    let uploads = UploadStore::new(&config.server.upload_dir, config.server.max_files);
    uploads.prepare().await?;

    let client: Arc<dyn VisionClient> = Arc::new(OpenAiVisionClient::new(&config.llm)?);
    let analyzer = ImageAnalyzer::new(client, &config.llm, config.prompts.clone());

    let app_state = AppState {
        analyzer: Arc::new(analyzer),
        uploads: Arc::new(uploads),
    };

    let app = router(app_state, &config.server);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
