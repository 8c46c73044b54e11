// Repository trait for the peer report backend
use crate::domain::report::{Report, ScheduledReport};
use async_trait::async_trait;

#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// All reports known to the backend
    async fn list_reports(&self) -> anyhow::Result<Vec<Report>>;

    /// Report schedules (recurring generation jobs)
    async fn list_scheduled_reports(&self) -> anyhow::Result<Vec<ScheduledReport>>;
}
