// Application state for HTTP handlers
use crate::application::dashboard_service::ClientDashboardService;
use crate::application::photo_service::PhotoService;
use crate::application::property_service::PropertyService;
use crate::application::report_service::ReportService;

#[derive(Clone)]
pub struct AppState {
    pub photo_service: PhotoService,
    pub report_service: ReportService,
    pub property_service: PropertyService,
    pub dashboard_service: ClientDashboardService,
}
