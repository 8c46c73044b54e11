// Statistics helpers over daily report metrics
//
// Conventions follow the data-frame semantics the reports were designed
// against: sample standard deviation, percent change that skips undefined
// steps, and linear-interpolated quantiles. Every ratio guards a zero
// denominator and returns 0 instead of inf/NaN.
use crate::domain::report::DailyMetrics;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Values further than this many standard deviations from the mean are anomalies.
const ANOMALY_Z: f64 = 2.0;
const MIN_SEASONAL_POINTS: usize = 12;
const SATISFACTION_PLACEHOLDER: f64 = 0.85;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anomaly {
    pub index: usize,
    pub value: f64,
    pub deviation: f64,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Seasonality {
    pub has_seasonality: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub seasonal_pattern: BTreeMap<u32, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_month: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Period {
    pub date: NaiveDate,
    pub occupancy_rate: f64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimalPricing {
    pub optimal_high_season_price: f64,
    pub optimal_low_season_price: f64,
    pub price_elasticity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiTrends {
    pub revenue_trend: f64,
    pub occupancy_trend: f64,
    pub booking_trend: f64,
    pub completion_trend: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencyMetrics {
    pub revenue_per_booking: f64,
    pub occupancy_efficiency: f64,
    pub booking_efficiency: f64,
    pub revenue_per_occupancy: f64,
}

pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Sample standard deviation (n-1).
pub fn std_dev(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    let m = mean(xs);
    let var = xs.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / (xs.len() - 1) as f64;
    var.sqrt()
}

/// Step-wise percent change. Steps from a zero value are undefined and skipped.
pub fn pct_change(xs: &[f64]) -> Vec<f64> {
    xs.windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

pub fn mean_pct_change(xs: &[f64]) -> f64 {
    mean(&pct_change(xs))
}

/// Quantile with linear interpolation between closest ranks. Empty input yields 0.
pub fn quantile(xs: &[f64], q: f64) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

fn column(rows: &[DailyMetrics], f: impl Fn(&DailyMetrics) -> f64) -> Vec<f64> {
    rows.iter().map(f).collect()
}

fn sum(rows: &[DailyMetrics], f: impl Fn(&DailyMetrics) -> f64) -> f64 {
    rows.iter().map(f).sum()
}

/// Flag points beyond two standard deviations of the mean.
pub fn detect_anomalies(series: &[(NaiveDate, f64)]) -> Vec<Anomaly> {
    let values: Vec<f64> = series.iter().map(|(_, v)| *v).collect();
    let m = mean(&values);
    let std = std_dev(&values);

    if std <= f64::EPSILON {
        return Vec::new();
    }

    series
        .iter()
        .enumerate()
        .filter(|(_, (_, v))| (v - m).abs() > ANOMALY_Z * std)
        .map(|(index, (date, value))| Anomaly {
            index,
            value: *value,
            deviation: (value - m) / std,
            date: date.to_string(),
        })
        .collect()
}

/// Average by calendar month once there are at least twelve points.
pub fn detect_seasonality(series: &[(NaiveDate, f64)]) -> Seasonality {
    if series.len() < MIN_SEASONAL_POINTS {
        return Seasonality {
            has_seasonality: false,
            seasonal_pattern: BTreeMap::new(),
            peak_month: None,
            low_month: None,
        };
    }

    let mut buckets: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for (date, value) in series {
        buckets.entry(date.month()).or_default().push(*value);
    }
    let pattern: BTreeMap<u32, f64> = buckets
        .into_iter()
        .map(|(month, values)| (month, mean(&values)))
        .collect();

    // First extreme wins on ties.
    let mut peak: Option<(u32, f64)> = None;
    let mut low: Option<(u32, f64)> = None;
    for (&month, &avg) in &pattern {
        if peak.is_none_or(|(_, p)| avg > p) {
            peak = Some((month, avg));
        }
        if low.is_none_or(|(_, l)| avg < l) {
            low = Some((month, avg));
        }
    }

    Seasonality {
        has_seasonality: true,
        seasonal_pattern: pattern,
        peak_month: peak.map(|(m, _)| m),
        low_month: low.map(|(m, _)| m),
    }
}

pub fn peak_periods(rows: &[DailyMetrics]) -> Vec<Period> {
    let threshold = quantile(&column(rows, |r| r.occupancy_rate), 0.8);
    rows.iter()
        .filter(|r| r.occupancy_rate >= threshold)
        .map(to_period)
        .collect()
}

pub fn low_periods(rows: &[DailyMetrics]) -> Vec<Period> {
    let threshold = quantile(&column(rows, |r| r.occupancy_rate), 0.2);
    rows.iter()
        .filter(|r| r.occupancy_rate <= threshold)
        .map(to_period)
        .collect()
}

fn to_period(row: &DailyMetrics) -> Period {
    Period {
        date: row.date,
        occupancy_rate: row.occupancy_rate,
        revenue: row.total_revenue,
    }
}

pub fn optimal_pricing(rows: &[DailyMetrics]) -> OptimalPricing {
    let occupancy = column(rows, |r| r.occupancy_rate);
    let high_threshold = quantile(&occupancy, 0.7);
    let low_threshold = quantile(&occupancy, 0.3);

    let high: Vec<f64> = rows
        .iter()
        .filter(|r| r.occupancy_rate >= high_threshold)
        .map(|r| r.average_price)
        .collect();
    let low: Vec<f64> = rows
        .iter()
        .filter(|r| r.occupancy_rate <= low_threshold)
        .map(|r| r.average_price)
        .collect();

    OptimalPricing {
        optimal_high_season_price: mean(&high) * 1.1,
        optimal_low_season_price: mean(&low) * 0.9,
        price_elasticity: price_elasticity(rows),
    }
}

/// Mean ratio of demand change to price change over consecutive days.
///
/// Steps where either change is undefined, or where the price did not move,
/// are skipped. With nothing left the elasticity is 0.
pub fn price_elasticity(rows: &[DailyMetrics]) -> f64 {
    if rows.len() < 2 {
        return 0.0;
    }

    let ratios: Vec<f64> = rows
        .windows(2)
        .filter_map(|w| {
            let (prev, cur) = (&w[0], &w[1]);
            if prev.average_price == 0.0 || prev.total_bookings == 0 {
                return None;
            }
            let price_change = (cur.average_price - prev.average_price) / prev.average_price;
            let demand_change = (cur.total_bookings as f64 - prev.total_bookings as f64)
                / prev.total_bookings as f64;
            if price_change == 0.0 {
                return None;
            }
            Some(demand_change / price_change)
        })
        .collect();

    mean(&ratios)
}

/// Ordinary least squares fit of `xs` against its index: (slope, intercept).
pub fn linear_trend(xs: &[f64]) -> (f64, f64) {
    if xs.len() < 2 {
        return (0.0, xs.first().copied().unwrap_or(0.0));
    }
    let n = xs.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = mean(xs);

    let (mut cov, mut var) = (0.0, 0.0);
    for (i, y) in xs.iter().enumerate() {
        let dx = i as f64 - x_mean;
        cov += dx * (y - y_mean);
        var += dx * dx;
    }
    let slope = cov / var;
    (slope, y_mean - slope * x_mean)
}

pub fn capacity_utilization(rows: &[DailyMetrics]) -> f64 {
    mean(&column(rows, |r| r.occupancy_rate))
}

/// Fixed-weight blend of occupancy, revenue per booking, completion and a
/// satisfaction placeholder, scaled to 0-100.
pub fn performance_score(rows: &[DailyMetrics]) -> f64 {
    let occupancy_score = capacity_utilization(rows) / 100.0;
    let revenue_efficiency = ratio(
        sum(rows, |r| r.total_revenue),
        sum(rows, |r| r.total_bookings as f64),
    );
    let revenue_score = (revenue_efficiency / 1000.0).min(1.0);
    let completion_score = ratio(
        sum(rows, |r| r.completed_reservations as f64),
        sum(rows, |r| r.total_reservations as f64),
    );

    let score = occupancy_score * 0.3
        + revenue_score * 0.3
        + completion_score * 0.2
        + SATISFACTION_PLACEHOLDER * 0.2;

    score * 100.0
}

pub fn kpi_trends(rows: &[DailyMetrics]) -> KpiTrends {
    let completion: Vec<f64> = rows
        .iter()
        .filter(|r| r.total_reservations > 0)
        .map(|r| r.completed_reservations as f64 / r.total_reservations as f64)
        .collect();

    KpiTrends {
        revenue_trend: mean_pct_change(&column(rows, |r| r.total_revenue)),
        occupancy_trend: mean_pct_change(&column(rows, |r| r.occupancy_rate)),
        booking_trend: mean_pct_change(&column(rows, |r| r.total_bookings as f64)),
        completion_trend: mean_pct_change(&completion),
    }
}

pub fn efficiency_metrics(rows: &[DailyMetrics]) -> EfficiencyMetrics {
    let revenue = sum(rows, |r| r.total_revenue);
    EfficiencyMetrics {
        revenue_per_booking: ratio(revenue, sum(rows, |r| r.total_bookings as f64)),
        occupancy_efficiency: capacity_utilization(rows),
        booking_efficiency: ratio(
            sum(rows, |r| r.completed_reservations as f64),
            sum(rows, |r| r.total_reservations as f64),
        ),
        revenue_per_occupancy: ratio(revenue, sum(rows, |r| r.occupancy_rate)),
    }
}

pub fn bottlenecks(rows: &[DailyMetrics]) -> Vec<String> {
    let mut found = Vec::new();
    let reservations = sum(rows, |r| r.total_reservations as f64);

    if capacity_utilization(rows) < 70.0 {
        found.push("Low occupancy rates".to_string());
    }
    if ratio(sum(rows, |r| r.cancelled_reservations as f64), reservations) > 0.1 {
        found.push("High cancellation rates".to_string());
    }
    if ratio(sum(rows, |r| r.total_unpaid_reservations as f64), reservations) > 0.05 {
        found.push("Payment collection issues".to_string());
    }

    found
}

pub fn optimization_opportunities(rows: &[DailyMetrics]) -> Vec<String> {
    let mut found = Vec::new();

    if std_dev(&column(rows, |r| r.occupancy_rate)) > 20.0 {
        found.push("Seasonal pricing optimization".to_string());
    }
    if mean(&column(rows, |r| r.average_reservation_length)) < 3.0 {
        found.push("Extended stay promotions".to_string());
    }
    if mean_pct_change(&column(rows, |r| r.total_revenue)) < 0.05 {
        found.push("Revenue growth strategies".to_string());
    }

    found
}

pub fn financial_recommendations(rows: &[DailyMetrics]) -> Vec<String> {
    let mut recs = Vec::new();

    if mean_pct_change(&column(rows, |r| r.total_revenue)) < 0.05 {
        recs.push("Implement dynamic pricing strategies".to_string());
        recs.push("Focus on high-value customer segments".to_string());
    }

    let prices = column(rows, |r| r.average_price);
    if ratio(std_dev(&prices), mean(&prices)) > 0.3 {
        recs.push("Standardize pricing across properties".to_string());
    }

    if rows.iter().any(|r| r.total_unpaid_reservations > 0) {
        recs.push("Improve payment collection processes".to_string());
    }

    recs
}

pub fn occupancy_recommendations(rows: &[DailyMetrics]) -> Vec<String> {
    let mut recs = Vec::new();
    let occupancy = column(rows, |r| r.occupancy_rate);

    if mean(&occupancy) < 75.0 {
        recs.push("Implement targeted marketing campaigns".to_string());
        recs.push("Offer seasonal promotions".to_string());
    }
    if std_dev(&occupancy) > 15.0 {
        recs.push("Develop demand forecasting models".to_string());
        recs.push("Implement flexible pricing strategies".to_string());
    }

    recs
}

pub fn performance_recommendations(rows: &[DailyMetrics]) -> Vec<String> {
    let mut recs = Vec::new();

    let completion = ratio(
        sum(rows, |r| r.completed_reservations as f64),
        sum(rows, |r| r.total_reservations as f64),
    );
    if completion < 0.9 {
        recs.push("Improve booking confirmation processes".to_string());
        recs.push("Enhance customer communication".to_string());
    }
    if mean(&column(rows, |r| r.average_reservation_length)) < 3.0 {
        recs.push("Develop extended stay packages".to_string());
        recs.push("Offer loyalty programs".to_string());
    }

    recs
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(offset)
    }

    pub(crate) fn row(offset: i64, revenue: f64, bookings: u32, occupancy: f64) -> DailyMetrics {
        DailyMetrics {
            date: day(offset),
            total_revenue: revenue,
            total_bookings: bookings,
            occupancy_rate: occupancy,
            total_reservations: 10,
            cancelled_reservations: 1,
            completed_reservations: 9,
            average_price: if bookings > 0 { revenue / bookings as f64 } else { 0.0 },
            average_reservation_length: 4.0,
            total_paid_reservations: 9,
            total_unpaid_reservations: 0,
        }
    }

    #[test]
    fn test_std_dev_is_sample() {
        let xs = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&xs) - 5.0).abs() < 1e-12);
        assert!((std_dev(&xs) - 2.138089935299395).abs() < 1e-12);
        assert_eq!(std_dev(&[3.0]), 0.0);
    }

    #[test]
    fn test_pct_change_skips_zero_base() {
        assert_eq!(pct_change(&[100.0, 110.0, 0.0, 50.0]), vec![0.1, -1.0]);
        assert_eq!(mean_pct_change(&[5.0]), 0.0);
    }

    #[test]
    fn test_quantile_interpolates() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile(&xs, 0.5), 3.0);
        assert!((quantile(&xs, 0.8) - 4.2).abs() < 1e-12);
        assert_eq!(quantile(&[], 0.5), 0.0);
    }

    #[test]
    fn test_linear_trend() {
        let (slope, intercept) = linear_trend(&[1.0, 3.0, 5.0, 7.0]);
        assert!((slope - 2.0).abs() < 1e-12);
        assert!((intercept - 1.0).abs() < 1e-12);
        assert_eq!(linear_trend(&[4.0]), (0.0, 4.0));
        assert_eq!(linear_trend(&[]), (0.0, 0.0));
    }

    #[test]
    fn test_detect_anomalies() {
        let mut series: Vec<(NaiveDate, f64)> = (0..20).map(|i| (day(i), 100.0)).collect();
        series[7].1 = 1000.0;

        let anomalies = detect_anomalies(&series);
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].index, 7);
        assert_eq!(anomalies[0].value, 1000.0);
        assert!(anomalies[0].deviation > 2.0);
        assert_eq!(anomalies[0].date, "2024-01-08");
    }

    #[test]
    fn test_constant_series_has_no_anomalies() {
        let series: Vec<(NaiveDate, f64)> = (0..10).map(|i| (day(i), 42.0)).collect();
        assert!(detect_anomalies(&series).is_empty());
    }

    #[test]
    fn test_seasonality_needs_twelve_points() {
        let short: Vec<(NaiveDate, f64)> = (0..11).map(|i| (day(i), 1.0)).collect();
        assert!(!detect_seasonality(&short).has_seasonality);

        // January at 10, February at 30
        let series: Vec<(NaiveDate, f64)> = (0..45)
            .map(|i| {
                let d = day(i);
                (d, if d.month() == 1 { 10.0 } else { 30.0 })
            })
            .collect();
        let seasonality = detect_seasonality(&series);
        assert!(seasonality.has_seasonality);
        assert_eq!(seasonality.seasonal_pattern.get(&1), Some(&10.0));
        assert_eq!(seasonality.seasonal_pattern.get(&2), Some(&30.0));
        assert_eq!(seasonality.peak_month, Some(2));
        assert_eq!(seasonality.low_month, Some(1));
    }

    #[test]
    fn test_elasticity_constant_price_is_zero() {
        let rows: Vec<DailyMetrics> = (0..5).map(|i| row(i, 1000.0, 10, 80.0)).collect();
        assert_eq!(price_elasticity(&rows), 0.0);
        assert_eq!(price_elasticity(&rows[..1]), 0.0);
        assert_eq!(price_elasticity(&[]), 0.0);
    }

    #[test]
    fn test_elasticity_ratio() {
        // Price 100 -> 110 (+10%), bookings 10 -> 9 (-10%)
        let mut a = row(0, 1000.0, 10, 80.0);
        a.average_price = 100.0;
        let mut b = row(1, 990.0, 9, 80.0);
        b.average_price = 110.0;
        assert!((price_elasticity(&[a, b]) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_performance_score() {
        // occupancy 0.8, revenue per booking 500 -> 0.5, completion 0.9
        let rows: Vec<DailyMetrics> = (0..3).map(|i| row(i, 500.0, 1, 80.0)).collect();
        assert!((performance_score(&rows) - 74.0).abs() < 1e-9);
    }

    #[test]
    fn test_performance_score_guards_empty_input() {
        assert!((performance_score(&[]) - 17.0).abs() < 1e-9);
    }

    #[test]
    fn test_peak_and_low_periods() {
        let rows: Vec<DailyMetrics> = (0..5)
            .map(|i| row(i, 1000.0, 10, 60.0 + 5.0 * i as f64))
            .collect();
        let peaks = peak_periods(&rows);
        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].occupancy_rate, 80.0);

        let lows = low_periods(&rows);
        assert_eq!(lows.len(), 1);
        assert_eq!(lows[0].occupancy_rate, 60.0);
    }

    #[test]
    fn test_bottlenecks() {
        let mut rows: Vec<DailyMetrics> = (0..3).map(|i| row(i, 1000.0, 10, 50.0)).collect();
        for r in &mut rows {
            r.cancelled_reservations = 3;
            r.total_unpaid_reservations = 2;
        }
        assert_eq!(
            bottlenecks(&rows),
            vec![
                "Low occupancy rates".to_string(),
                "High cancellation rates".to_string(),
                "Payment collection issues".to_string(),
            ]
        );
        assert!(bottlenecks(&[]).contains(&"Low occupancy rates".to_string()));
    }

    #[test]
    fn test_efficiency_metrics_guard_zero_bookings() {
        let rows = vec![row(0, 0.0, 0, 0.0)];
        let metrics = efficiency_metrics(&rows);
        assert_eq!(metrics.revenue_per_booking, 0.0);
        assert_eq!(metrics.revenue_per_occupancy, 0.0);
        assert!((metrics.booking_efficiency - 0.9).abs() < 1e-12);
    }
}
