// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::*;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    let uploads = Router::new()
        .route("/api/photos/analyze", post(analyze_photo))
        .route("/api/places/analyze", post(analyze_place))
        .route("/api/places/batch-analyze", post(batch_analyze))
        .layer(DefaultBodyLimit::max(max_upload_bytes));

    Router::new()
        .route("/", get(root))
        .route("/healthz", get(health_check))
        .route("/health", get(health))
        .route("/api/places/health", get(places_health))
        .route("/api/places/sample-data", get(sample_data))
        .route("/api/reports", get(list_reports))
        .route("/api/reports/summary", get(report_summary))
        .route("/api/reports/scheduled", get(scheduled_reports))
        .route("/api/reports/generate", post(generate_report))
        .route("/api/properties", get(list_properties))
        .route("/api/properties/market", get(property_market))
        .route("/api/dashboard/metrics", post(dashboard_metrics))
        .route("/api/dashboard/insights", post(dashboard_insights))
        .route("/api/dashboard/activities", post(dashboard_activities))
        .route("/api/dashboard/recommendations", post(dashboard_recommendations))
        .route("/api/dashboard/predictive-analytics", post(dashboard_predictive))
        .route("/api/dashboard/summary", post(dashboard_summary))
        .route("/api/dashboard/cache/clear", post(clear_dashboard_cache))
        .route("/api/dashboard/cache/status", get(dashboard_cache_status))
        .merge(uploads)
        .with_state(state)
}
