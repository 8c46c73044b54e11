// Mock data generators - Seeded stand-ins for backend responses
//
// Every generator draws from one seeded StdRng, so a given seed and call
// sequence always produces the same records.
use crate::domain::dashboard::DashboardMetrics;
use crate::domain::photo::{LocationInsights, PhotoAnalysis, PhotoFeatures, PlaceAnalysis};
use crate::domain::property::{ListingStatus, Property};
use crate::domain::report::{
    DailyMetrics, EntityType, Report, ReportStatus, ReportType, ScheduledReport,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

pub const DEFAULT_SEED: u64 = 42;

const PHOTO_TAGS: [&str; 10] = [
    "interior",
    "exterior",
    "kitchen",
    "bedroom",
    "bathroom",
    "living room",
    "dining room",
    "office",
    "garden",
    "balcony",
];

const PLACE_TYPES: [(&str, f64); 6] = [
    ("apartment", 0.3),
    ("house", 0.25),
    ("condo", 0.2),
    ("villa", 0.1),
    ("studio", 0.1),
    ("townhouse", 0.05),
];

const PLACE_ROOMS: [&str; 8] = [
    "bedroom",
    "kitchen",
    "bathroom",
    "living_room",
    "dining_room",
    "office",
    "garden",
    "balcony",
];

const PLACE_AMENITIES: [&str; 8] = [
    "parking",
    "elevator",
    "gym",
    "pool",
    "garden",
    "balcony",
    "fireplace",
    "central_heating",
];

const PROPERTY_FEATURES: [&str; 10] = [
    "Pool",
    "Garden",
    "Parking",
    "Gym",
    "Security",
    "Balcony",
    "Fireplace",
    "Hardwood Floors",
    "Central AC",
    "Walk-in Closet",
];

const PROPERTIES_PER_TYPE: usize = 15;

struct PropertyTypeSpec {
    name: &'static str,
    base_price: f64,
    size_range: (u32, u32),
    rooms: (u32, u32),
    popularity: f64,
}

const PROPERTY_TYPES: [PropertyTypeSpec; 8] = [
    PropertyTypeSpec { name: "Apartment", base_price: 300_000.0, size_range: (800, 1500), rooms: (1, 3), popularity: 0.8 },
    PropertyTypeSpec { name: "House", base_price: 500_000.0, size_range: (1500, 3000), rooms: (2, 5), popularity: 0.9 },
    PropertyTypeSpec { name: "Condo", base_price: 400_000.0, size_range: (1000, 2000), rooms: (1, 4), popularity: 0.7 },
    PropertyTypeSpec { name: "Villa", base_price: 800_000.0, size_range: (2500, 5000), rooms: (3, 6), popularity: 0.6 },
    PropertyTypeSpec { name: "Penthouse", base_price: 1_200_000.0, size_range: (2000, 4000), rooms: (2, 5), popularity: 0.5 },
    PropertyTypeSpec { name: "Townhouse", base_price: 600_000.0, size_range: (1800, 2800), rooms: (2, 4), popularity: 0.75 },
    PropertyTypeSpec { name: "Studio", base_price: 200_000.0, size_range: (400, 800), rooms: (1, 1), popularity: 0.6 },
    PropertyTypeSpec { name: "Loft", base_price: 450_000.0, size_range: (1200, 2000), rooms: (1, 2), popularity: 0.65 },
];

struct CitySpec {
    name: &'static str,
    price_multiplier: f64,
    demand: f64,
    inventory: f64,
}

const CITIES: [CitySpec; 8] = [
    CitySpec { name: "New York", price_multiplier: 1.5, demand: 0.9, inventory: 0.3 },
    CitySpec { name: "Los Angeles", price_multiplier: 1.3, demand: 0.8, inventory: 0.4 },
    CitySpec { name: "Chicago", price_multiplier: 1.0, demand: 0.7, inventory: 0.6 },
    CitySpec { name: "Miami", price_multiplier: 1.2, demand: 0.75, inventory: 0.5 },
    CitySpec { name: "San Francisco", price_multiplier: 1.8, demand: 0.85, inventory: 0.2 },
    CitySpec { name: "Austin", price_multiplier: 1.1, demand: 0.8, inventory: 0.7 },
    CitySpec { name: "Seattle", price_multiplier: 1.4, demand: 0.8, inventory: 0.4 },
    CitySpec { name: "Denver", price_multiplier: 1.15, demand: 0.75, inventory: 0.5 },
];

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Hands out generators seeded `base`, `base + 1`, ... so concurrent
/// requests each get their own reproducible stream.
#[derive(Debug)]
pub struct SeedSequence {
    base: u64,
    next: AtomicU64,
}

impl SeedSequence {
    pub fn new(base: u64) -> Self {
        Self {
            base,
            next: AtomicU64::new(0),
        }
    }

    pub fn base(&self) -> u64 {
        self.base
    }

    pub fn generator(&self) -> MockGenerator {
        let offset = self.next.fetch_add(1, Ordering::Relaxed);
        MockGenerator::new(self.base.wrapping_add(offset))
    }
}

pub struct MockGenerator {
    rng: StdRng,
}

impl MockGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        self.rng.gen_range(low..high)
    }

    fn weighted<'a, T>(&mut self, choices: &'a [(T, f64)]) -> &'a T {
        // Weights are compile-time constants, all positive.
        let index = WeightedIndex::new(choices.iter().map(|(_, w)| *w))
            .map(|dist| dist.sample(&mut self.rng))
            .unwrap_or(0);
        &choices[index].0
    }

    fn sample_strings(&mut self, pool: &[&str], min: usize, max_exclusive: usize) -> Vec<String> {
        let count = self.rng.gen_range(min..max_exclusive).min(pool.len());
        pool.choose_multiple(&mut self.rng, count)
            .map(|s| s.to_string())
            .collect()
    }

    fn maybe_id(&mut self, prefix: &str, max: u32, keep_above: f64) -> Option<String> {
        let id = self.rng.gen_range(1..=max);
        (self.uniform(0.0, 1.0) > keep_above).then(|| format!("{}_{}", prefix, id))
    }

    /// One row per day from `start` to `end` inclusive.
    pub fn daily_metrics(&mut self, start: NaiveDate, end: NaiveDate) -> Vec<DailyMetrics> {
        let mut rows = Vec::new();

        for date in start.iter_days().take_while(|date| *date <= end) {
            let total_revenue = self.uniform(1000.0, 10000.0);
            let total_bookings: u32 = self.rng.gen_range(5..=50);
            let occupancy_rate = self.uniform(0.6, 0.95);
            let total_reservations: u32 = self.rng.gen_range(10..=100);
            let cancelled_reservations =
                self.rng.gen_range(0..=(total_reservations as f64 * 0.2) as u32);
            let completed_reservations = total_reservations - cancelled_reservations;
            let average_reservation_length = self.uniform(2.0, 14.0);
            let total_paid_reservations =
                (completed_reservations as f64 * self.uniform(0.8, 0.98)) as u32;

            rows.push(DailyMetrics {
                date,
                total_revenue,
                total_bookings,
                occupancy_rate: occupancy_rate * 100.0,
                total_reservations,
                cancelled_reservations,
                completed_reservations,
                average_price: total_revenue / total_bookings as f64,
                average_reservation_length,
                total_paid_reservations,
                total_unpaid_reservations: completed_reservations - total_paid_reservations,
            });
        }

        rows
    }

    pub fn reports(&mut self, count: usize, now: DateTime<Utc>) -> Vec<Report> {
        (1..=count).map(|i| self.report(i, now)).collect()
    }

    fn report(&mut self, index: usize, now: DateTime<Utc>) -> Report {
        let start_date = now - Duration::days(self.rng.gen_range(0..=365));
        let end_date = start_date + Duration::days(self.rng.gen_range(1..=30));
        let report_type = *ReportType::ALL.choose(&mut self.rng).unwrap_or(&ReportType::Analytics);
        let status = *ReportStatus::ALL.choose(&mut self.rng).unwrap_or(&ReportStatus::Pending);

        let total_revenue = self.uniform(10_000.0, 1_000_000.0);
        let total_bookings: u32 = self.rng.gen_range(10..=500);
        let occupancy_rate = self.uniform(0.6, 0.95);
        let total_reservations: u32 = self.rng.gen_range(50..=1000);
        let cancelled_reservations =
            self.rng.gen_range(0..=(total_reservations as f64 * 0.2) as u32);
        let completed_reservations = total_reservations - cancelled_reservations;
        let average_reservation_length = self.uniform(2.0, 14.0);
        let total_paid_reservations =
            (completed_reservations as f64 * self.uniform(0.8, 0.98)) as u32;

        let entity_type = *EntityType::ALL.choose(&mut self.rng).unwrap_or(&EntityType::Property);
        let entity_id = format!(
            "{}_{}",
            entity_type.as_str().to_lowercase(),
            self.rng.gen_range(1..=100)
        );
        let file_number: u32 = self.rng.gen_range(1000..=9999);
        let file_url = (status == ReportStatus::Generated)
            .then(|| format!("https://reports.example.com/reports/{}.pdf", file_number));
        let month = start_date.format("%B %Y").to_string();
        let created_at = start_date - Duration::days(self.rng.gen_range(1..=30));
        let generated_by_id = format!("user_{}", self.rng.gen_range(1..=50));

        Report {
            id: format!("report_{}", index),
            title: format!("{} - {}", report_type, month),
            report_type,
            status,
            start_date,
            end_date,
            entity_id: Some(entity_id),
            entity_type: Some(entity_type),
            total_revenue: round_to(total_revenue, 2),
            total_bookings,
            average_price: round_to(total_revenue / total_bookings as f64, 2),
            occupancy_rate: round_to(occupancy_rate * 100.0, 1),
            file_url,
            description: format!(
                "Comprehensive {} for {}",
                report_type.as_str().to_lowercase(),
                month
            ),
            total_reservations,
            cancelled_reservations,
            completed_reservations,
            average_reservation_length: round_to(average_reservation_length, 1),
            total_paid_reservations,
            total_unpaid_reservations: completed_reservations - total_paid_reservations,
            created_at,
            updated_at: start_date,
            generated_by_id,
            agency_id: self.maybe_id("agency", 20, 0.3),
            property_id: self.maybe_id("property", 100, 0.4),
            tenant_id: self.maybe_id("tenant", 200, 0.5),
            agent_id: self.maybe_id("agent", 50, 0.6),
            facility_id: self.maybe_id("facility", 30, 0.7),
            included_service_id: self.maybe_id("service", 40, 0.8),
            extra_charge_id: self.maybe_id("charge", 25, 0.8),
            provider_id: self.maybe_id("provider", 15, 0.8),
        }
    }

    pub fn scheduled_reports() -> Vec<ScheduledReport> {
        let schedule = |id: &str, title: &str, report_type, frequency: &str, next_run: (i32, u32, u32), is_active| {
            ScheduledReport {
                id: id.to_string(),
                title: title.to_string(),
                report_type,
                frequency: frequency.to_string(),
                next_run: NaiveDate::from_ymd_opt(next_run.0, next_run.1, next_run.2)
                    .unwrap_or_default(),
                is_active,
            }
        };

        vec![
            schedule("schedule_1", "Monthly Financial Report", ReportType::Financial, "monthly", (2024, 2, 1), true),
            schedule("schedule_2", "Weekly Occupancy Report", ReportType::Occupancy, "weekly", (2024, 1, 29), true),
            schedule("schedule_3", "Quarterly Performance Report", ReportType::Performance, "quarterly", (2024, 4, 1), false),
        ]
    }

    /// Fifteen listings for each property type, spread over the city table.
    pub fn properties(&mut self, today: NaiveDate) -> Vec<Property> {
        let mut properties = Vec::with_capacity(PROPERTY_TYPES.len() * PROPERTIES_PER_TYPE);
        let statuses = [
            (ListingStatus::Available, 0.6),
            (ListingStatus::UnderContract, 0.25),
            (ListingStatus::Sold, 0.15),
        ];

        for spec in &PROPERTY_TYPES {
            for i in 0..PROPERTIES_PER_TYPE {
                let city = &CITIES[self.rng.gen_range(0..CITIES.len())];
                let size = self.rng.gen_range(spec.size_range.0..=spec.size_range.1);
                let rooms = self.rng.gen_range(spec.rooms.0..=spec.rooms.1);
                let price = spec.base_price * city.price_multiplier * self.uniform(0.8, 1.4);
                let ml_score = spec.popularity * 0.3
                    + city.demand * 0.3
                    + self.uniform(0.6, 0.95) * 0.4;
                let features = self.sample_strings(&PROPERTY_FEATURES, 2, 7);
                let status = *self.weighted(&statuses);
                let days_ago: u32 = self.rng.gen_range(1..=365);

                properties.push(Property {
                    id: format!("{}_{}", spec.name, i + 1),
                    property_type: spec.name.to_string(),
                    price: round_to(price, 2),
                    size,
                    rooms,
                    ml_score: round_to(ml_score, 3),
                    city: city.name.to_string(),
                    status,
                    features,
                    date_added: today - Duration::days(days_ago as i64),
                    days_on_market: days_ago,
                    price_per_sqft: round_to(price / size as f64, 2),
                    demand_score: round_to(city.demand, 2),
                    inventory_level: round_to(city.inventory, 2),
                });
            }
        }

        properties
    }

    pub fn photo_analysis(&mut self, analysis_time: f64) -> PhotoAnalysis {
        let score = round_to(self.uniform(0.7, 1.0), 2);
        let tags = self.sample_strings(&PHOTO_TAGS, 2, 5);

        let condition = self
            .weighted(&[("excellent", 0.3), ("good", 0.4), ("fair", 0.2), ("needs work", 0.1)])
            .to_string();
        let style = self
            .weighted(&[("modern", 0.4), ("traditional", 0.3), ("contemporary", 0.2), ("vintage", 0.1)])
            .to_string();
        let lighting = self
            .weighted(&[("bright", 0.5), ("moderate", 0.3), ("dim", 0.2)])
            .to_string();

        PhotoAnalysis {
            tags,
            score,
            features: PhotoFeatures {
                condition,
                style,
                lighting,
                cleanliness: self.uniform(0.6, 1.0),
                space_utilization: self.uniform(0.5, 1.0),
            },
            analysis_time,
        }
    }

    pub fn place_analysis(&mut self, has_location: bool, timestamp: String) -> PlaceAnalysis {
        let mut features = BTreeMap::new();
        for (name, low) in [
            ("interior_quality", 0.6),
            ("exterior_condition", 0.5),
            ("modernity_score", 0.3),
            ("space_utilization", 0.4),
            ("lighting_quality", 0.5),
            ("cleanliness", 0.6),
            ("maintenance_level", 0.4),
            ("aesthetic_appeal", 0.5),
        ] {
            let value = self.uniform(low, 1.0);
            features.insert(name.to_string(), value);
        }

        let property_type = self.weighted(&PLACE_TYPES).to_string();
        let detected_rooms = self.sample_strings(&PLACE_ROOMS, 3, 6);
        let detected_amenities = self.sample_strings(&PLACE_AMENITIES, 2, 5);

        let location_insights = has_location.then(|| LocationInsights {
            neighborhood_quality: self.uniform(0.6, 1.0),
            accessibility_score: self.uniform(0.5, 1.0),
            transportation_rating: self.uniform(0.4, 1.0),
            safety_score: self.uniform(0.7, 1.0),
            noise_level: ["low", "medium", "high"]
                .choose(&mut self.rng)
                .unwrap_or(&"medium")
                .to_string(),
            walkability: self.uniform(0.3, 1.0),
        });

        let feature = |name: &str| features.get(name).copied().unwrap_or(0.0);
        let neighborhood = location_insights
            .as_ref()
            .map(|l| l.neighborhood_quality)
            .unwrap_or(0.8);
        let multiplier = feature("interior_quality") * 0.2
            + feature("modernity_score") * 0.3
            + feature("space_utilization") * 0.2
            + neighborhood * 0.3;
        let overall_score = features.values().sum::<f64>() / features.len() as f64;
        let estimated_price = (500_000.0 * multiplier) as u64;

        PlaceAnalysis {
            property_type,
            detected_rooms,
            detected_amenities,
            property_features: features,
            location_insights,
            estimated_price,
            overall_score: round_to(overall_score, 3),
            confidence_level: round_to(self.uniform(0.7, 0.95), 2),
            analysis_timestamp: timestamp,
        }
    }

    pub fn dashboard_metrics(&mut self) -> DashboardMetrics {
        let total_users: u32 = self.rng.gen_range(2000..3000);
        let active_properties: u32 = self.rng.gen_range(1000..1500);
        let revenue = self.uniform(40_000.0, 50_000.0);
        let system_health = self.uniform(0.95, 0.99);
        let user_growth_rate = self.uniform(0.05, 0.15);
        let property_growth_rate = self.uniform(0.08, 0.12);
        let revenue_growth_rate = self.uniform(0.10, 0.20);
        let system_uptime = self.uniform(0.98, 0.999);
        let trend_factor = 1.0 + self.uniform(-0.1, 0.1);

        DashboardMetrics {
            total_users: (total_users as f64 * trend_factor) as u32,
            active_properties: (active_properties as f64 * trend_factor) as u32,
            revenue: revenue * trend_factor,
            system_health,
            user_growth_rate,
            property_growth_rate,
            revenue_growth_rate,
            system_uptime,
        }
    }

    /// Daily history of (users, properties, revenue) for forecasting.
    pub fn dashboard_history(&mut self, days: usize) -> Vec<(f64, f64, f64)> {
        (0..days)
            .map(|_| {
                (
                    self.rng.gen_range(2000..3000) as f64,
                    self.rng.gen_range(1000..1500) as f64,
                    self.uniform(40_000.0, 50_000.0),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_same_seed_reproduces() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();

        let a = MockGenerator::new(7).daily_metrics(start, end);
        let b = MockGenerator::new(7).daily_metrics(start, end);
        assert_eq!(a, b);

        let c = MockGenerator::new(8).daily_metrics(start, end);
        assert_ne!(a, c);

        let now = Utc::now();
        assert_eq!(
            MockGenerator::new(DEFAULT_SEED).reports(20, now),
            MockGenerator::new(DEFAULT_SEED).reports(20, now)
        );
        assert_eq!(
            MockGenerator::new(DEFAULT_SEED).properties(today()),
            MockGenerator::new(DEFAULT_SEED).properties(today())
        );
    }

    #[test]
    fn test_seed_sequence_replays() {
        let a = SeedSequence::new(10);
        let b = SeedSequence::new(10);
        for _ in 0..3 {
            assert_eq!(a.generator().photo_analysis(0.0), b.generator().photo_analysis(0.0));
        }
        assert_eq!(
            SeedSequence::new(10).generator().dashboard_metrics(),
            MockGenerator::new(10).dashboard_metrics()
        );
    }

    #[test]
    fn test_daily_metrics_ranges() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let rows = MockGenerator::new(1).daily_metrics(start, end);

        assert_eq!(rows.len(), 91);
        assert_eq!(rows.first().unwrap().date, start);
        assert_eq!(rows.last().unwrap().date, end);
        for r in &rows {
            assert!((1000.0..10000.0).contains(&r.total_revenue));
            assert!((5..=50).contains(&r.total_bookings));
            assert!((60.0..95.0).contains(&r.occupancy_rate));
            assert!(r.cancelled_reservations as f64 <= r.total_reservations as f64 * 0.2);
            assert_eq!(
                r.completed_reservations,
                r.total_reservations - r.cancelled_reservations
            );
            assert_eq!(
                r.total_paid_reservations + r.total_unpaid_reservations,
                r.completed_reservations
            );
        }
    }

    #[test]
    fn test_reversed_range_is_empty() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(MockGenerator::new(1).daily_metrics(start, end).is_empty());
    }

    #[test]
    fn test_range_ending_at_last_date() {
        let rows = MockGenerator::new(1).daily_metrics(NaiveDate::MAX, NaiveDate::MAX);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, NaiveDate::MAX);

        let start = NaiveDate::MAX - Duration::days(2);
        let dates: Vec<NaiveDate> = MockGenerator::new(1)
            .daily_metrics(start, NaiveDate::MAX)
            .iter()
            .map(|row| row.date)
            .collect();
        assert_eq!(dates.len(), 3);
        assert_eq!(dates.last(), Some(&NaiveDate::MAX));
    }

    #[test]
    fn test_reports_file_url_only_when_generated() {
        for report in MockGenerator::new(3).reports(100, Utc::now()) {
            assert_eq!(report.file_url.is_some(), report.status == ReportStatus::Generated);
            assert!(report.end_date > report.start_date);
            assert!(report.created_at < report.start_date);
        }
    }

    #[test]
    fn test_properties_layout() {
        let properties = MockGenerator::new(DEFAULT_SEED).properties(today());
        assert_eq!(properties.len(), 120);
        assert_eq!(properties[0].id, "Apartment_1");
        for p in &properties {
            assert!((0.0..=1.0).contains(&p.ml_score));
            assert!((2..=6).contains(&p.features.len()));
            assert_eq!(p.date_added, today() - Duration::days(p.days_on_market as i64));
        }
    }

    #[test]
    fn test_photo_analysis_shape() {
        let analysis = MockGenerator::new(5).photo_analysis(0.0);
        assert!((2..=4).contains(&analysis.tags.len()));
        assert!((0.7..=1.0).contains(&analysis.score));
        let mut unique = analysis.tags.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), analysis.tags.len());
    }

    #[test]
    fn test_place_analysis_location_insights() {
        let without = MockGenerator::new(9).place_analysis(false, "t".to_string());
        assert!(without.location_insights.is_none());
        assert_eq!(without.property_features.len(), 8);
        assert!((3..=5).contains(&without.detected_rooms.len()));

        let with = MockGenerator::new(9).place_analysis(true, "t".to_string());
        assert!(with.location_insights.is_some());
        assert!(with.estimated_price > 0 && with.estimated_price <= 500_000);
    }
}
