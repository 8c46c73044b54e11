// Dashboard service - Per-client cached metrics, insights and forecasts
use crate::application::mock_data::{round_to, SeedSequence};
use crate::application::statistics::{linear_trend, mean, std_dev};
use crate::domain::dashboard::{
    ActivityItem, AiInsight, DashboardMetrics, PredictiveAnalytics, Recommendation,
};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

pub const DEFAULT_ACTIVITY_LIMIT: usize = 10;
const SUMMARY_ACTIVITY_LIMIT: usize = 5;
const HISTORY_DAYS: usize = 90;
const FORECAST_DAYS: usize = 30;

struct Cached<T> {
    value: T,
    stored_at: Instant,
}

#[derive(Default)]
struct DashboardCache {
    metrics: HashMap<String, Cached<DashboardMetrics>>,
    insights: HashMap<String, Cached<Vec<AiInsight>>>,
    activities: HashMap<(String, usize), Cached<Vec<ActivityItem>>>,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub client_id: String,
    pub metrics: DashboardMetrics,
    pub insights: Vec<AiInsight>,
    pub activities: Vec<ActivityItem>,
    pub recommendations: Vec<Recommendation>,
    pub predictive_analytics: PredictiveAnalytics,
    pub timestamp: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct CacheStatus {
    pub metrics_cache_size: usize,
    pub insights_cache_size: usize,
    pub activity_cache_size: usize,
    pub cache_duration: u64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct CacheCleared {
    pub client_id: String,
    pub removed: usize,
}

#[derive(Clone)]
pub struct ClientDashboardService {
    seeds: Arc<SeedSequence>,
    ttl: Duration,
    cache: Arc<RwLock<DashboardCache>>,
}

impl ClientDashboardService {
    pub fn new(seeds: Arc<SeedSequence>, ttl: Duration) -> Self {
        Self {
            seeds,
            ttl,
            cache: Arc::new(RwLock::new(DashboardCache::default())),
        }
    }

    fn fresh<T: Clone>(&self, entry: Option<&Cached<T>>) -> Option<T> {
        entry
            .filter(|e| e.stored_at.elapsed() < self.ttl)
            .map(|e| e.value.clone())
    }

    pub async fn metrics(&self, client_id: &str) -> DashboardMetrics {
        if let Some(hit) = self.fresh(self.cache.read().await.metrics.get(client_id)) {
            return hit;
        }

        // Another request may have filled the slot while we waited for the write lock.
        let mut cache = self.cache.write().await;
        if let Some(hit) = self.fresh(cache.metrics.get(client_id)) {
            return hit;
        }

        let metrics = self.seeds.generator().dashboard_metrics();
        tracing::debug!("Computed dashboard metrics for client {}", client_id);
        cache.metrics.insert(
            client_id.to_string(),
            Cached {
                value: metrics.clone(),
                stored_at: Instant::now(),
            },
        );
        metrics
    }

    pub async fn insights(&self, client_id: &str) -> Vec<AiInsight> {
        if let Some(hit) = self.fresh(self.cache.read().await.insights.get(client_id)) {
            return hit;
        }

        let metrics = self.metrics(client_id).await;
        let mut cache = self.cache.write().await;
        if let Some(hit) = self.fresh(cache.insights.get(client_id)) {
            return hit;
        }

        let insights = insights_for(&metrics);
        cache.insights.insert(
            client_id.to_string(),
            Cached {
                value: insights.clone(),
                stored_at: Instant::now(),
            },
        );
        insights
    }

    pub async fn activities(&self, client_id: &str, limit: usize) -> Vec<ActivityItem> {
        let key = (client_id.to_string(), limit);
        if let Some(hit) = self.fresh(self.cache.read().await.activities.get(&key)) {
            return hit;
        }

        let mut cache = self.cache.write().await;
        if let Some(hit) = self.fresh(cache.activities.get(&key)) {
            return hit;
        }

        let mut activities = prioritized_activities();
        activities.truncate(limit);
        cache.activities.insert(
            key,
            Cached {
                value: activities.clone(),
                stored_at: Instant::now(),
            },
        );
        activities
    }

    pub async fn recommendations(&self, client_id: &str) -> Vec<Recommendation> {
        recommendations_for(&self.metrics(client_id).await)
    }

    pub async fn predictive_analytics(&self, client_id: &str) -> PredictiveAnalytics {
        let history = self.seeds.generator().dashboard_history(HISTORY_DAYS);
        let recommendations = self.recommendations(client_id).await;
        forecast(&history, recommendations)
    }

    pub async fn summary(&self, client_id: &str) -> DashboardSummary {
        let (metrics, insights, activities, recommendations, predictive_analytics) = tokio::join!(
            self.metrics(client_id),
            self.insights(client_id),
            self.activities(client_id, SUMMARY_ACTIVITY_LIMIT),
            self.recommendations(client_id),
            self.predictive_analytics(client_id),
        );

        DashboardSummary {
            client_id: client_id.to_string(),
            metrics,
            insights,
            activities,
            recommendations,
            predictive_analytics,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Drop every cached entry belonging to `client_id`.
    pub async fn clear_cache(&self, client_id: &str) -> CacheCleared {
        let mut cache = self.cache.write().await;
        let before = cache.metrics.len() + cache.insights.len() + cache.activities.len();

        cache.metrics.remove(client_id);
        cache.insights.remove(client_id);
        cache.activities.retain(|(id, _), _| id != client_id);

        let removed = before - (cache.metrics.len() + cache.insights.len() + cache.activities.len());
        tracing::info!("Cleared {} cache entries for client {}", removed, client_id);
        CacheCleared {
            client_id: client_id.to_string(),
            removed,
        }
    }

    pub async fn cache_status(&self) -> CacheStatus {
        let cache = self.cache.read().await;
        CacheStatus {
            metrics_cache_size: cache.metrics.len(),
            insights_cache_size: cache.insights.len(),
            activity_cache_size: cache.activities.len(),
            cache_duration: self.ttl.as_secs(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn insights_for(metrics: &DashboardMetrics) -> Vec<AiInsight> {
    let mut insights = Vec::new();

    if metrics.revenue_growth_rate > 0.15 {
        insights.push(AiInsight {
            kind: "positive".to_string(),
            title: "Strong Revenue Growth".to_string(),
            description: format!(
                "Revenue is growing at {:.1}% rate",
                metrics.revenue_growth_rate * 100.0
            ),
            confidence: 0.85,
            action_items: strings(&["Maintain current strategies", "Consider expansion"]),
            impact_score: 0.8,
            category: "revenue".to_string(),
        });
    }

    if metrics.user_growth_rate < 0.05 {
        insights.push(AiInsight {
            kind: "warning".to_string(),
            title: "User Growth Needs Attention".to_string(),
            description: "User growth rate is below optimal levels".to_string(),
            confidence: 0.75,
            action_items: strings(&["Review marketing strategies", "Improve user onboarding"]),
            impact_score: 0.7,
            category: "users".to_string(),
        });
    }

    if metrics.system_health < 0.97 {
        insights.push(AiInsight {
            kind: "alert".to_string(),
            title: "System Health Alert".to_string(),
            description: "System health is below optimal threshold".to_string(),
            confidence: 0.9,
            action_items: strings(&["Monitor system metrics", "Check for issues"]),
            impact_score: 0.9,
            category: "system".to_string(),
        });
    }

    insights
}

pub fn recommendations_for(metrics: &DashboardMetrics) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if metrics.revenue_growth_rate < 0.1 {
        recommendations.push(Recommendation {
            category: "revenue_optimization".to_string(),
            title: "Revenue Growth Opportunity".to_string(),
            description: "Consider implementing dynamic pricing strategies".to_string(),
            priority: "high".to_string(),
            impact_score: 0.8,
            action_items: strings(&[
                "Implement dynamic pricing",
                "Optimize property listings",
                "Enhance marketing campaigns",
            ]),
        });
    }

    if metrics.user_growth_rate < 0.05 {
        recommendations.push(Recommendation {
            category: "user_engagement".to_string(),
            title: "User Engagement Boost".to_string(),
            description: "Focus on user retention and acquisition".to_string(),
            priority: "medium".to_string(),
            impact_score: 0.6,
            action_items: strings(&[
                "Improve user onboarding",
                "Add loyalty programs",
                "Enhance customer support",
            ]),
        });
    }

    if metrics.system_health < 0.95 {
        recommendations.push(Recommendation {
            category: "system_optimization".to_string(),
            title: "System Health Improvement".to_string(),
            description: "Address system performance issues".to_string(),
            priority: "high".to_string(),
            impact_score: 0.9,
            action_items: strings(&[
                "Optimize database queries",
                "Scale infrastructure",
                "Monitor system metrics",
            ]),
        });
    }

    recommendations
}

fn priority_score(kind: &str, status: &str) -> f64 {
    let mut score: f64 = 0.5;
    score += match kind {
        "payment_received" => 0.3,
        "system_alert" => 0.4,
        "user_registered" => 0.2,
        _ => 0.0,
    };
    if status == "warning" {
        score += 0.2;
    }
    score.min(1.0)
}

/// The activity feed, high-priority items first.
pub fn prioritized_activities() -> Vec<ActivityItem> {
    let raw = [
        (1, "user_registered", "New user registered: John Doe", "2 minutes ago", "Users", "blue", "success"),
        (2, "property_added", "New property added: Downtown Apartment", "5 minutes ago", "Building2", "green", "success"),
        (3, "payment_received", "Payment received: $1,250.00", "10 minutes ago", "CreditCard", "purple", "success"),
        (4, "system_alert", "System maintenance scheduled", "15 minutes ago", "AlertCircle", "orange", "warning"),
    ];

    let mut activities: Vec<ActivityItem> = raw
        .into_iter()
        .map(|(id, kind, message, time, icon, color, status)| ActivityItem {
            id,
            kind: kind.to_string(),
            message: message.to_string(),
            time: time.to_string(),
            icon: icon.to_string(),
            color: format!("text-{}-500", color),
            bg_color: format!("bg-{}-100", color),
            status: status.to_string(),
            priority: if priority_score(kind, status) > 0.7 {
                "high".to_string()
            } else {
                "normal".to_string()
            },
        })
        .collect();

    // Stable, so equal priorities keep feed order.
    activities.sort_by_key(|a| a.priority != "high");
    activities
}

fn series_forecast(values: &[f64], confidence: f64) -> serde_json::Value {
    let (slope, intercept) = linear_trend(values);
    let n = values.len() as f64;
    let forecast: Vec<f64> = (0..FORECAST_DAYS)
        .map(|i| round_to(intercept + slope * (n + i as f64), 2))
        .collect();
    let trend = if slope > 0.0 {
        "increasing"
    } else if slope < 0.0 {
        "decreasing"
    } else {
        "stable"
    };

    json!({
        "forecast": forecast,
        "confidence": confidence,
        "trend": trend,
    })
}

/// Linear forecasts over (users, properties, revenue) history.
pub fn forecast(
    history: &[(f64, f64, f64)],
    recommendations: Vec<Recommendation>,
) -> PredictiveAnalytics {
    let users: Vec<f64> = history.iter().map(|h| h.0).collect();
    let properties: Vec<f64> = history.iter().map(|h| h.1).collect();
    let revenue: Vec<f64> = history.iter().map(|h| h.2).collect();

    let avg_revenue = mean(&revenue);
    let volatility = if avg_revenue > 0.0 {
        std_dev(&revenue) / avg_revenue
    } else {
        0.0
    };
    let level = if volatility > 0.2 {
        "high"
    } else if volatility > 0.1 {
        "medium"
    } else {
        "low"
    };

    let opportunities: Vec<&str> = recommendations.iter().map(|r| r.title.as_str()).collect();
    let opportunity_analysis = json!({ "opportunities": opportunities });

    PredictiveAnalytics {
        revenue_forecast: series_forecast(&revenue, 0.85),
        user_growth_forecast: series_forecast(&users, 0.8),
        property_growth_forecast: series_forecast(&properties, 0.8),
        risk_assessment: json!({
            "level": level,
            "revenue_volatility": round_to(volatility, 4),
            "confidence": 0.75,
        }),
        opportunity_analysis,
        recommendations,
    }
}
