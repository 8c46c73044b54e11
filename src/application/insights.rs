// Report insights - Per report type bundles of statistics
use crate::application::statistics::{
    self, Anomaly, EfficiencyMetrics, KpiTrends, OptimalPricing, Period, Seasonality,
};
use crate::domain::report::{DailyMetrics, ReportType};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialInsights {
    pub revenue_trend: f64,
    pub revenue_volatility: f64,
    pub revenue_forecast: f64,
    pub anomalies: Vec<Anomaly>,
    pub seasonality: Seasonality,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupancyInsights {
    pub occupancy_trend: f64,
    pub peak_periods: Vec<Period>,
    pub low_periods: Vec<Period>,
    pub optimal_pricing: OptimalPricing,
    pub capacity_utilization: f64,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceInsights {
    pub performance_score: f64,
    pub kpi_trends: KpiTrends,
    pub efficiency_metrics: EfficiencyMetrics,
    pub bottlenecks: Vec<String>,
    pub optimization_opportunities: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportInsights {
    Financial(FinancialInsights),
    Occupancy(OccupancyInsights),
    Performance(PerformanceInsights),
    /// Analytics and custom reports carry no computed insights.
    Empty {},
}

pub fn generate_insights(rows: &[DailyMetrics], report_type: ReportType) -> ReportInsights {
    match report_type {
        ReportType::Financial => ReportInsights::Financial(financial(rows)),
        ReportType::Occupancy => ReportInsights::Occupancy(occupancy(rows)),
        ReportType::Performance => ReportInsights::Performance(performance(rows)),
        ReportType::Analytics | ReportType::Custom => ReportInsights::Empty {},
    }
}

fn financial(rows: &[DailyMetrics]) -> FinancialInsights {
    let revenue: Vec<f64> = rows.iter().map(|r| r.total_revenue).collect();
    let dated: Vec<(NaiveDate, f64)> = rows.iter().map(|r| (r.date, r.total_revenue)).collect();

    let revenue_trend = statistics::mean_pct_change(&revenue);
    let last = revenue.last().copied().unwrap_or(0.0);

    FinancialInsights {
        revenue_trend,
        revenue_volatility: statistics::std_dev(&revenue),
        revenue_forecast: last * (1.0 + revenue_trend),
        anomalies: statistics::detect_anomalies(&dated),
        seasonality: statistics::detect_seasonality(&dated),
        recommendations: statistics::financial_recommendations(rows),
    }
}

fn occupancy(rows: &[DailyMetrics]) -> OccupancyInsights {
    let occupancy: Vec<f64> = rows.iter().map(|r| r.occupancy_rate).collect();

    OccupancyInsights {
        occupancy_trend: statistics::mean_pct_change(&occupancy),
        peak_periods: statistics::peak_periods(rows),
        low_periods: statistics::low_periods(rows),
        optimal_pricing: statistics::optimal_pricing(rows),
        capacity_utilization: statistics::capacity_utilization(rows),
        recommendations: statistics::occupancy_recommendations(rows),
    }
}

fn performance(rows: &[DailyMetrics]) -> PerformanceInsights {
    PerformanceInsights {
        performance_score: statistics::performance_score(rows),
        kpi_trends: statistics::kpi_trends(rows),
        efficiency_metrics: statistics::efficiency_metrics(rows),
        bottlenecks: statistics::bottlenecks(rows),
        optimization_opportunities: statistics::optimization_opportunities(rows),
        recommendations: statistics::performance_recommendations(rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::statistics::tests::row;

    #[test]
    fn test_financial_forecast_uses_mean_trend() {
        // +10% then +10%
        let rows = vec![
            row(0, 1000.0, 10, 80.0),
            row(1, 1100.0, 10, 80.0),
            row(2, 1210.0, 10, 80.0),
        ];
        match generate_insights(&rows, ReportType::Financial) {
            ReportInsights::Financial(insights) => {
                assert!((insights.revenue_trend - 0.1).abs() < 1e-9);
                assert!((insights.revenue_forecast - 1331.0).abs() < 1e-6);
                assert!(!insights.seasonality.has_seasonality);
                assert!(insights.anomalies.is_empty());
            }
            other => panic!("expected financial insights, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_rows_do_not_panic() {
        for report_type in ReportType::ALL {
            let _ = generate_insights(&[], report_type);
        }
    }

    #[test]
    fn test_analytics_has_no_insights() {
        let rows = vec![row(0, 1000.0, 10, 80.0)];
        assert_eq!(
            generate_insights(&rows, ReportType::Analytics),
            ReportInsights::Empty {}
        );
        let json = serde_json::to_value(generate_insights(&rows, ReportType::Custom)).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn test_performance_bundle() {
        let rows: Vec<_> = (0..4).map(|i| row(i, 500.0, 1, 80.0)).collect();
        match generate_insights(&rows, ReportType::Performance) {
            ReportInsights::Performance(insights) => {
                assert!((insights.performance_score - 74.0).abs() < 1e-9);
                assert_eq!(insights.kpi_trends.revenue_trend, 0.0);
                assert!(insights.bottlenecks.is_empty());
            }
            other => panic!("expected performance insights, got {:?}", other),
        }
    }
}
