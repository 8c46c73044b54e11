// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};
use anyhow::Context;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::ClientDashboardService;
use crate::application::mock_data::SeedSequence;
use crate::application::photo_service::PhotoService;
use crate::application::property_service::PropertyService;
use crate::application::recognition::{ImageClassifier, RecognitionService};
use crate::application::report_repository::ReportRepository;
use crate::application::report_service::ReportService;
use crate::infrastructure::config::{load_app_config, ClassifierSettings, PeerSettings};
use crate::infrastructure::labels::load_labels;
use crate::infrastructure::report_api::HttpReportRepository;
use crate::infrastructure::resnet::ResNetClassifier;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

async fn load_recognition(settings: &ClassifierSettings) -> RecognitionService {
    if !settings.enabled {
        tracing::info!("Image classifier disabled, serving fallback recognitions");
        return RecognitionService::new(None, Vec::new());
    }

    let labels = match load_labels(&settings.labels_path, &settings.labels_url).await {
        Ok(labels) => labels,
        Err(e) => {
            tracing::error!("Failed to load class labels: {:#}", e);
            Vec::new()
        }
    };

    let classifier = match ResNetClassifier::load(
        settings.weights_path.clone(),
        &settings.model_repo,
        &settings.weights_file,
    )
    .await
    {
        Ok(model) => Some(Arc::new(model) as Arc<dyn ImageClassifier>),
        Err(e) => {
            tracing::error!("Failed to load classifier, serving fallback recognitions: {:#}", e);
            None
        }
    };

    RecognitionService::new(classifier, labels)
}

fn report_repository(settings: &PeerSettings) -> anyhow::Result<Option<Arc<dyn ReportRepository>>> {
    let Some(url) = &settings.report_api_url else {
        tracing::info!("No report API configured, serving simulated reports");
        return Ok(None);
    };

    let repository = HttpReportRepository::new(
        url.clone(),
        settings.report_api_token.clone(),
        Duration::from_secs(settings.timeout_secs),
    )?;
    Ok(Some(Arc::new(repository)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_app_config().context("Failed to load configuration")?;
    let seeds = Arc::new(SeedSequence::new(config.mock.seed));

    // Create adapters (infrastructure layer)
    let recognition = load_recognition(&config.classifier).await;
    let reports = report_repository(&config.peers)?;

    // Create services (application layer)
    let photo_service = PhotoService::new(recognition, seeds.clone(), config.debug.dump_dir.clone());
    let report_service = ReportService::new(reports, seeds.clone(), config.mock.report_count);
    let property_service = PropertyService::new(seeds.clone());
    let dashboard_service =
        ClientDashboardService::new(seeds, Duration::from_secs(config.cache.ttl_secs));

    // Create application state
    let state = Arc::new(AppState {
        photo_service,
        report_service,
        property_service,
        dashboard_service,
    });

    // Build router (presentation layer)
    let router = build_router(state, config.server.max_upload_bytes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!("Starting property-insights service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
