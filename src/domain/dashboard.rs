// Client dashboard domain models
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub total_users: u32,
    pub active_properties: u32,
    pub revenue: f64,
    pub system_health: f64,
    pub user_growth_rate: f64,
    pub property_growth_rate: f64,
    pub revenue_growth_rate: f64,
    pub system_uptime: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiInsight {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    pub confidence: f64,
    pub action_items: Vec<String>,
    pub impact_score: f64,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityItem {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub time: String,
    pub icon: String,
    pub color: String,
    pub bg_color: String,
    pub status: String,
    pub priority: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub impact_score: f64,
    pub action_items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictiveAnalytics {
    pub revenue_forecast: Value,
    pub user_growth_forecast: Value,
    pub property_growth_forecast: Value,
    pub risk_assessment: Value,
    pub opportunity_analysis: Value,
    pub recommendations: Vec<Recommendation>,
}
