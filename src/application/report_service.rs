// Report service - Browsing, summaries and ML report generation
use crate::application::insights::{generate_insights, ReportInsights};
use crate::application::mock_data::{MockGenerator, SeedSequence};
use crate::application::report_repository::ReportRepository;
use crate::domain::report::{EntityType, Report, ReportStatus, ReportType, ScheduledReport};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Longest window a generated report may cover.
pub const MAX_REPORT_DAYS: i64 = 731;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Simulated,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportFilter {
    pub report_type: Option<ReportType>,
    pub status: Option<ReportStatus>,
    pub entity_type: Option<EntityType>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ReportFilter {
    pub fn matches(&self, report: &Report) -> bool {
        self.report_type.is_none_or(|t| report.report_type == t)
            && self.status.is_none_or(|s| report.status == s)
            && self
                .entity_type
                .is_none_or(|e| report.entity_type == Some(e))
            && self
                .from
                .is_none_or(|from| report.start_date.date_naive() >= from)
            && self.to.is_none_or(|to| report.end_date.date_naive() <= to)
    }
}

#[derive(Debug, Serialize)]
pub struct ReportList {
    pub source: DataSource,
    pub total: usize,
    pub reports: Vec<Report>,
}

#[derive(Debug, Serialize)]
pub struct ScheduledList {
    pub source: DataSource,
    pub schedules: Vec<ScheduledReport>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ReportSummary {
    pub source: DataSource,
    pub count: usize,
    pub total_revenue: f64,
    pub average_occupancy: f64,
    pub by_status: BTreeMap<String, usize>,
    pub by_type: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateReportRequest {
    pub report_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub entity_id: Option<String>,
    pub entity_type: Option<EntityType>,
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct GeneratedReport {
    pub id: String,
    pub title: String,
    pub description: String,
    pub report_type: ReportType,
    pub status: ReportStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub entity_id: Option<String>,
    pub entity_type: Option<EntityType>,
    pub days: usize,
    pub total_revenue: f64,
    pub average_occupancy: f64,
    pub insights: ReportInsights,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GenerateError {
    #[error("unknown report type: {0}")]
    UnknownType(String),
    #[error("start_date {start} is after end_date {end}")]
    InvertedWindow { start: NaiveDate, end: NaiveDate },
    #[error("report window of {0} days exceeds the {max} day limit", max = MAX_REPORT_DAYS)]
    WindowTooLong(i64),
}

#[derive(Clone)]
pub struct ReportService {
    repository: Option<Arc<dyn ReportRepository>>,
    seeds: Arc<SeedSequence>,
    mock_count: usize,
}

impl ReportService {
    pub fn new(
        repository: Option<Arc<dyn ReportRepository>>,
        seeds: Arc<SeedSequence>,
        mock_count: usize,
    ) -> Self {
        Self {
            repository,
            seeds,
            mock_count,
        }
    }

    fn mock_reports(&self) -> Vec<Report> {
        // Anchored at midnight so one seed yields identical dates all day.
        let anchor = Utc::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or_else(Utc::now);
        MockGenerator::new(self.seeds.base()).reports(self.mock_count, anchor)
    }

    async fn all_reports(&self) -> (DataSource, Vec<Report>) {
        if let Some(repository) = &self.repository {
            match repository.list_reports().await {
                Ok(reports) => return (DataSource::Live, reports),
                Err(e) => tracing::warn!("Report backend unavailable, using simulated data: {:#}", e),
            }
        }
        (DataSource::Simulated, self.mock_reports())
    }

    pub async fn list_reports(&self, filter: &ReportFilter) -> ReportList {
        let (source, reports) = self.all_reports().await;
        let reports: Vec<Report> = reports.into_iter().filter(|r| filter.matches(r)).collect();

        tracing::debug!("Listing {} {:?} reports", reports.len(), source);
        ReportList {
            source,
            total: reports.len(),
            reports,
        }
    }

    pub async fn list_scheduled_reports(&self) -> ScheduledList {
        if let Some(repository) = &self.repository {
            match repository.list_scheduled_reports().await {
                Ok(schedules) => {
                    return ScheduledList {
                        source: DataSource::Live,
                        schedules,
                    }
                }
                Err(e) => tracing::warn!("Failed to fetch scheduled reports: {:#}", e),
            }
        }

        ScheduledList {
            source: DataSource::Simulated,
            schedules: MockGenerator::scheduled_reports(),
        }
    }

    pub async fn summary(&self, filter: &ReportFilter) -> ReportSummary {
        let list = self.list_reports(filter).await;
        summarize(list.source, &list.reports)
    }

    pub fn generate_report(
        &self,
        request: &GenerateReportRequest,
    ) -> Result<GeneratedReport, GenerateError> {
        let report_type: ReportType = request
            .report_type
            .parse()
            .map_err(|_| GenerateError::UnknownType(request.report_type.clone()))?;

        if request.start_date > request.end_date {
            return Err(GenerateError::InvertedWindow {
                start: request.start_date,
                end: request.end_date,
            });
        }
        let span = (request.end_date - request.start_date).num_days() + 1;
        if span > MAX_REPORT_DAYS {
            return Err(GenerateError::WindowTooLong(span));
        }

        let mut generator = match request.seed {
            Some(seed) => MockGenerator::new(seed),
            None => self.seeds.generator(),
        };
        let rows = generator.daily_metrics(request.start_date, request.end_date);
        let insights = generate_insights(&rows, report_type);

        let total_revenue: f64 = rows.iter().map(|r| r.total_revenue).sum();
        let average_occupancy =
            rows.iter().map(|r| r.occupancy_rate).sum::<f64>() / rows.len().max(1) as f64;

        let report = GeneratedReport {
            id: uuid::Uuid::new_v4().to_string(),
            title: format!(
                "ML-Powered {} - {}",
                report_type.display_name(),
                request.start_date.format("%B %Y")
            ),
            description: format!(
                "AI-generated insights and analytics for {}",
                report_type.display_name().to_lowercase()
            ),
            report_type,
            status: ReportStatus::Generated,
            start_date: request.start_date,
            end_date: request.end_date,
            entity_id: request.entity_id.clone(),
            entity_type: request.entity_type,
            days: rows.len(),
            total_revenue,
            average_occupancy,
            insights,
            generated_at: Utc::now(),
        };

        tracing::info!("Generated report {} ({} days)", report.id, report.days);
        Ok(report)
    }
}

fn summarize(source: DataSource, reports: &[Report]) -> ReportSummary {
    let mut by_status = BTreeMap::new();
    let mut by_type = BTreeMap::new();
    for report in reports {
        *by_status.entry(report.status.as_str().to_string()).or_insert(0) += 1;
        *by_type.entry(report.report_type.as_str().to_string()).or_insert(0) += 1;
    }

    let average_occupancy = if reports.is_empty() {
        0.0
    } else {
        reports.iter().map(|r| r.occupancy_rate).sum::<f64>() / reports.len() as f64
    };

    ReportSummary {
        source,
        count: reports.len(),
        total_revenue: reports.iter().map(|r| r.total_revenue).sum(),
        average_occupancy,
        by_status,
        by_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct DownRepository;

    #[async_trait]
    impl ReportRepository for DownRepository {
        async fn list_reports(&self) -> anyhow::Result<Vec<Report>> {
            anyhow::bail!("connection refused")
        }

        async fn list_scheduled_reports(&self) -> anyhow::Result<Vec<ScheduledReport>> {
            anyhow::bail!("connection refused")
        }
    }

    struct StaticRepository(Vec<Report>);

    #[async_trait]
    impl ReportRepository for StaticRepository {
        async fn list_reports(&self) -> anyhow::Result<Vec<Report>> {
            Ok(self.0.clone())
        }

        async fn list_scheduled_reports(&self) -> anyhow::Result<Vec<ScheduledReport>> {
            Ok(Vec::new())
        }
    }

    fn service(repository: Option<Arc<dyn ReportRepository>>) -> ReportService {
        ReportService::new(repository, Arc::new(SeedSequence::new(42)), 50)
    }

    fn request(report_type: &str, start: (i32, u32, u32), end: (i32, u32, u32)) -> GenerateReportRequest {
        GenerateReportRequest {
            report_type: report_type.to_string(),
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
            entity_id: None,
            entity_type: None,
            seed: Some(7),
        }
    }

    #[tokio::test]
    async fn test_falls_back_to_simulated_reports() {
        let list = service(Some(Arc::new(DownRepository)))
            .list_reports(&ReportFilter::default())
            .await;
        assert_eq!(list.source, DataSource::Simulated);
        assert_eq!(list.total, 50);

        let schedules = service(Some(Arc::new(DownRepository)))
            .list_scheduled_reports()
            .await;
        assert_eq!(schedules.source, DataSource::Simulated);
        assert_eq!(schedules.schedules.len(), 3);
    }

    #[tokio::test]
    async fn test_live_reports_are_filtered() {
        let mocks = MockGenerator::new(1).reports(20, Utc::now());
        let expected = mocks
            .iter()
            .filter(|r| r.status == ReportStatus::Failed)
            .count();

        let filter = ReportFilter {
            status: Some(ReportStatus::Failed),
            ..Default::default()
        };
        let list = service(Some(Arc::new(StaticRepository(mocks))))
            .list_reports(&filter)
            .await;

        assert_eq!(list.source, DataSource::Live);
        assert_eq!(list.total, expected);
        assert!(list.reports.iter().all(|r| r.status == ReportStatus::Failed));
    }

    #[tokio::test]
    async fn test_summary_counts_add_up() {
        let summary = service(None).summary(&ReportFilter::default()).await;
        assert_eq!(summary.count, 50);
        assert_eq!(summary.by_status.values().sum::<usize>(), 50);
        assert_eq!(summary.by_type.values().sum::<usize>(), 50);
        assert!(summary.average_occupancy >= 60.0 && summary.average_occupancy <= 95.0);
    }

    #[test]
    fn test_summary_of_nothing() {
        let summary = summarize(DataSource::Simulated, &[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.average_occupancy, 0.0);
    }

    #[test]
    fn test_generate_report() {
        let report = service(None)
            .generate_report(&request("financial", (2024, 1, 1), (2024, 1, 31)))
            .unwrap();

        assert_eq!(report.title, "ML-Powered Financial Reports - January 2024");
        assert_eq!(
            report.description,
            "AI-generated insights and analytics for financial reports"
        );
        assert_eq!(report.status, ReportStatus::Generated);
        assert_eq!(report.days, 31);
        assert!(matches!(report.insights, ReportInsights::Financial(_)));
        assert!(uuid::Uuid::parse_str(&report.id).is_ok());
    }

    #[test]
    fn test_generate_report_on_last_representable_day() {
        let mut request = request("analytics", (2024, 1, 1), (2024, 1, 1));
        request.start_date = NaiveDate::MAX;
        request.end_date = NaiveDate::MAX;

        let report = service(None).generate_report(&request).unwrap();
        assert_eq!(report.days, 1);
        assert_eq!(report.end_date, NaiveDate::MAX);
    }

    #[test]
    fn test_generate_report_is_seed_stable() {
        let service = service(None);
        let a = service
            .generate_report(&request("OCCUPANCY", (2024, 3, 1), (2024, 3, 10)))
            .unwrap();
        let b = service
            .generate_report(&request("OCCUPANCY", (2024, 3, 1), (2024, 3, 10)))
            .unwrap();
        assert_eq!(a.total_revenue, b.total_revenue);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_generate_report_validation() {
        let service = service(None);
        assert_eq!(
            service
                .generate_report(&request("weekly", (2024, 1, 1), (2024, 1, 2)))
                .unwrap_err(),
            GenerateError::UnknownType("weekly".to_string())
        );
        assert!(matches!(
            service
                .generate_report(&request("financial", (2024, 2, 1), (2024, 1, 1)))
                .unwrap_err(),
            GenerateError::InvertedWindow { .. }
        ));
        assert!(matches!(
            service
                .generate_report(&request("financial", (2020, 1, 1), (2024, 1, 1)))
                .unwrap_err(),
            GenerateError::WindowTooLong(_)
        ));
    }
}
