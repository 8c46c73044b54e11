// Report domain models
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportType {
    Financial,
    Occupancy,
    Performance,
    Analytics,
    Custom,
}

impl ReportType {
    pub const ALL: [ReportType; 5] = [
        ReportType::Financial,
        ReportType::Occupancy,
        ReportType::Performance,
        ReportType::Analytics,
        ReportType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Financial => "FINANCIAL",
            ReportType::Occupancy => "OCCUPANCY",
            ReportType::Performance => "PERFORMANCE",
            ReportType::Analytics => "ANALYTICS",
            ReportType::Custom => "CUSTOM",
        }
    }

    /// Category name, as used in generated report titles.
    pub fn display_name(&self) -> &'static str {
        match self {
            ReportType::Financial => "Financial Reports",
            ReportType::Occupancy => "Occupancy Reports",
            ReportType::Performance => "Performance Reports",
            ReportType::Analytics => "Analytics Reports",
            ReportType::Custom => "Custom Reports",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown report type: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    Generated,
    Pending,
    Failed,
    Processing,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 4] = [
        ReportStatus::Generated,
        ReportStatus::Pending,
        ReportStatus::Failed,
        ReportStatus::Processing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Generated => "GENERATED",
            ReportStatus::Pending => "PENDING",
            ReportStatus::Failed => "FAILED",
            ReportStatus::Processing => "PROCESSING",
        }
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportStatus::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown report status: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Agency,
    Property,
    Facility,
    Tenant,
    Agent,
}

impl EntityType {
    pub const ALL: [EntityType; 5] = [
        EntityType::Agency,
        EntityType::Property,
        EntityType::Facility,
        EntityType::Tenant,
        EntityType::Agent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Agency => "Agency",
            EntityType::Property => "Property",
            EntityType::Facility => "Facility",
            EntityType::Tenant => "Tenant",
            EntityType::Agent => "Agent",
        }
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown entity type: {}", s))
    }
}

/// A report as served by the report API (camelCase on the wire).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub title: String,
    pub report_type: ReportType,
    pub status: ReportStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub entity_id: Option<String>,
    pub entity_type: Option<EntityType>,
    pub total_revenue: f64,
    pub total_bookings: u32,
    pub average_price: f64,
    pub occupancy_rate: f64,
    pub file_url: Option<String>,
    pub description: String,
    pub total_reservations: u32,
    pub cancelled_reservations: u32,
    pub completed_reservations: u32,
    pub average_reservation_length: f64,
    pub total_paid_reservations: u32,
    pub total_unpaid_reservations: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub generated_by_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included_service_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_charge_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledReport {
    pub id: String,
    pub title: String,
    pub report_type: ReportType,
    pub frequency: String,
    pub next_run: NaiveDate,
    pub is_active: bool,
}

/// One day of booking activity; the row type the insight helpers work over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMetrics {
    pub date: NaiveDate,
    pub total_revenue: f64,
    pub total_bookings: u32,
    /// Percent, 0-100.
    pub occupancy_rate: f64,
    pub total_reservations: u32,
    pub cancelled_reservations: u32,
    pub completed_reservations: u32,
    pub average_price: f64,
    pub average_reservation_length: f64,
    pub total_paid_reservations: u32,
    pub total_unpaid_reservations: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_type_parse() {
        assert_eq!("financial".parse::<ReportType>(), Ok(ReportType::Financial));
        assert_eq!("OCCUPANCY".parse::<ReportType>(), Ok(ReportType::Occupancy));
        assert!("weekly".parse::<ReportType>().is_err());
    }

    #[test]
    fn test_report_type_wire_format() {
        let json = serde_json::to_string(&ReportType::Performance).unwrap();
        assert_eq!(json, "\"PERFORMANCE\"");
        let status: ReportStatus = serde_json::from_str("\"PROCESSING\"").unwrap();
        assert_eq!(status, ReportStatus::Processing);
    }
}
