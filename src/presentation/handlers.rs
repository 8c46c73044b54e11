// HTTP request handlers
use crate::application::dashboard_service::DEFAULT_ACTIVITY_LIMIT;
use crate::application::photo_service::Upload;
use crate::application::property_service::{sample_places, PropertyQuery};
use crate::application::report_service::{GenerateReportRequest, ReportFilter};
use crate::infrastructure::http_response::ApiError;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{
        multipart::MultipartError,
        rejection::{JsonRejection, QueryRejection},
        Multipart, Query, State,
    },
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

const SERVICE_NAME: &str = "property-insights";

#[derive(Debug, Deserialize)]
pub struct ClientRequest {
    pub client_id: String,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

/// File parts plus the optional `location_data` text part of a form.
#[derive(Debug, Default)]
struct UploadForm {
    files: Vec<(String, Upload)>,
    location_data: Option<String>,
}

impl UploadForm {
    fn take(&mut self, names: &[&str]) -> Option<Upload> {
        let index = self.files.iter().position(|(name, _)| names.contains(&name.as_str()))?;
        Some(self.files.remove(index).1)
    }
}

fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::Multipart(err.body_text())
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "location_data" {
            form.location_data = Some(field.text().await.map_err(multipart_error)?);
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;
        form.files.push((name, Upload { filename, bytes }));
    }

    Ok(form)
}

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "Property Insights ML API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": SERVICE_NAME,
    }))
}

pub async fn analyze_photo(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut form = read_form(multipart).await?;
    let upload = form
        .take(&["file", "photo"])
        .ok_or(ApiError::MissingField("file"))?;

    let report = state.photo_service.analyze_photo(upload).await?;
    Ok(Json(report))
}

pub async fn analyze_place(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut form = read_form(multipart).await?;
    let upload = form
        .take(&["photo", "file"])
        .ok_or(ApiError::MissingField("photo"))?;

    let report = state
        .photo_service
        .analyze_place(upload, form.location_data.as_deref())
        .await?;
    Ok(Json(report))
}

pub async fn batch_analyze(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = read_form(multipart).await?;
    let uploads: Vec<Upload> = form
        .files
        .into_iter()
        .filter(|(name, _)| name == "photos")
        .map(|(_, upload)| upload)
        .collect();
    if uploads.is_empty() {
        return Err(ApiError::MissingField("photos"));
    }

    let report = state
        .photo_service
        .batch_analyze(uploads, form.location_data.as_deref())
        .await;
    Ok(Json(report))
}

pub async fn places_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let recognition = state.photo_service.recognition();
    Json(json!({
        "status": "healthy",
        "model_loaded": recognition.model_loaded(),
        "labels_loaded": recognition.labels_loaded(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

pub async fn sample_data() -> impl IntoResponse {
    let places = sample_places();
    Json(json!({
        "success": true,
        "total": places.len(),
        "places": places,
    }))
}

pub async fn list_reports(
    State(state): State<Arc<AppState>>,
    filter: Result<Query<ReportFilter>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(filter) = filter.map_err(|e| ApiError::Validation(e.body_text()))?;
    Ok(Json(state.report_service.list_reports(&filter).await))
}

pub async fn report_summary(
    State(state): State<Arc<AppState>>,
    filter: Result<Query<ReportFilter>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(filter) = filter.map_err(|e| ApiError::Validation(e.body_text()))?;
    Ok(Json(state.report_service.summary(&filter).await))
}

pub async fn scheduled_reports(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.report_service.list_scheduled_reports().await)
}

pub async fn generate_report(
    State(state): State<Arc<AppState>>,
    request: Result<Json<GenerateReportRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = request.map_err(|e| ApiError::Validation(e.body_text()))?;
    let report = state
        .report_service
        .generate_report(&request)
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    Ok(Json(report))
}

pub async fn list_properties(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PropertyQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::Validation(e.body_text()))?;
    Ok(Json(state.property_service.list_properties(&query)))
}

pub async fn property_market(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.property_service.market_summary())
}

fn client_request(
    request: Result<Json<ClientRequest>, JsonRejection>,
) -> Result<ClientRequest, ApiError> {
    let Json(request) = request.map_err(|e| ApiError::Validation(e.body_text()))?;
    Ok(request)
}

pub async fn dashboard_metrics(
    State(state): State<Arc<AppState>>,
    request: Result<Json<ClientRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = client_request(request)?;
    Ok(Json(state.dashboard_service.metrics(&request.client_id).await))
}

pub async fn dashboard_insights(
    State(state): State<Arc<AppState>>,
    request: Result<Json<ClientRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = client_request(request)?;
    Ok(Json(state.dashboard_service.insights(&request.client_id).await))
}

pub async fn dashboard_activities(
    State(state): State<Arc<AppState>>,
    query: Result<Query<LimitQuery>, QueryRejection>,
    request: Result<Json<ClientRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::Validation(e.body_text()))?;
    let request = client_request(request)?;
    let limit = query.limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT);
    Ok(Json(state.dashboard_service.activities(&request.client_id, limit).await))
}

pub async fn dashboard_recommendations(
    State(state): State<Arc<AppState>>,
    request: Result<Json<ClientRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = client_request(request)?;
    Ok(Json(state.dashboard_service.recommendations(&request.client_id).await))
}

pub async fn dashboard_predictive(
    State(state): State<Arc<AppState>>,
    request: Result<Json<ClientRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = client_request(request)?;
    Ok(Json(state.dashboard_service.predictive_analytics(&request.client_id).await))
}

pub async fn dashboard_summary(
    State(state): State<Arc<AppState>>,
    request: Result<Json<ClientRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = client_request(request)?;
    Ok(Json(state.dashboard_service.summary(&request.client_id).await))
}

pub async fn clear_dashboard_cache(
    State(state): State<Arc<AppState>>,
    request: Result<Json<ClientRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = client_request(request)?;
    let cleared = state.dashboard_service.clear_cache(&request.client_id).await;
    Ok(Json(json!({
        "message": "Cache cleared",
        "client_id": cleared.client_id,
        "removed": cleared.removed,
    })))
}

pub async fn dashboard_cache_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.dashboard_service.cache_status().await)
}
