// Property service - Listing search and market summaries over mock inventory
use crate::application::mock_data::{round_to, MockGenerator, SeedSequence};
use crate::domain::property::{GeoPoint, ListingStatus, Property, SamplePlace};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

const DEFAULT_LIMIT: usize = 50;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyQuery {
    pub city: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub status: Option<ListingStatus>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_score: Option<f64>,
    pub search: Option<String>,
    pub limit: Option<usize>,
}

impl PropertyQuery {
    fn matches(&self, property: &Property) -> bool {
        let eq = |want: &Option<String>, have: &str| {
            want.as_deref()
                .is_none_or(|w| w.trim().is_empty() || w.eq_ignore_ascii_case(have))
        };

        eq(&self.city, &property.city)
            && eq(&self.property_type, &property.property_type)
            && self.status.is_none_or(|s| property.status == s)
            && self.min_price.is_none_or(|p| property.price >= p)
            && self.max_price.is_none_or(|p| property.price <= p)
            && self.min_score.is_none_or(|s| property.ml_score >= s)
            && self.search.as_deref().is_none_or(|term| property.matches(term))
    }
}

#[derive(Debug, Serialize)]
pub struct PropertyList {
    pub total_matches: usize,
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CityMarket {
    pub city: String,
    pub count: usize,
    pub average_price: f64,
    pub average_ml_score: f64,
    pub available: usize,
}

#[derive(Clone)]
pub struct PropertyService {
    seeds: Arc<SeedSequence>,
}

impl PropertyService {
    pub fn new(seeds: Arc<SeedSequence>) -> Self {
        Self { seeds }
    }

    fn inventory(&self) -> Vec<Property> {
        MockGenerator::new(self.seeds.base()).properties(chrono::Utc::now().date_naive())
    }

    pub fn list_properties(&self, query: &PropertyQuery) -> PropertyList {
        let mut matches: Vec<Property> = self
            .inventory()
            .into_iter()
            .filter(|p| query.matches(p))
            .collect();
        matches.sort_by(|a, b| b.ml_score.total_cmp(&a.ml_score));

        let total_matches = matches.len();
        matches.truncate(query.limit.unwrap_or(DEFAULT_LIMIT));

        PropertyList {
            total_matches,
            properties: matches,
        }
    }

    pub fn market_summary(&self) -> Vec<CityMarket> {
        market_summary(&self.inventory())
    }
}

/// Per-city count, mean price and mean score, ordered by city name.
pub fn market_summary(properties: &[Property]) -> Vec<CityMarket> {
    let mut by_city: BTreeMap<&str, Vec<&Property>> = BTreeMap::new();
    for property in properties {
        by_city.entry(property.city.as_str()).or_default().push(property);
    }

    by_city
        .into_iter()
        .map(|(city, listings)| {
            let n = listings.len() as f64;
            CityMarket {
                city: city.to_string(),
                count: listings.len(),
                average_price: round_to(listings.iter().map(|p| p.price).sum::<f64>() / n, 2),
                average_ml_score: round_to(listings.iter().map(|p| p.ml_score).sum::<f64>() / n, 3),
                available: listings
                    .iter()
                    .filter(|p| p.status == ListingStatus::Available)
                    .count(),
            }
        })
        .collect()
}

pub fn sample_places() -> Vec<SamplePlace> {
    let place = |id: &str, name: &str, kind: &str, description: &str, address: &str, lat, lng, price: &str, rating| {
        SamplePlace {
            id: id.to_string(),
            name: name.to_string(),
            place_type: kind.to_string(),
            description: description.to_string(),
            address: address.to_string(),
            location: GeoPoint { lat, lng },
            price: price.to_string(),
            rating,
        }
    };

    vec![
        place("1", "Luxury Downtown Apartment", "apartment", "Modern apartment with city views", "123 Main St, San Francisco, CA", 37.7749, -122.4194, "$2,500/month", 4.8),
        place("2", "Cozy Studio in Mission", "studio", "Charming studio in vibrant neighborhood", "456 Mission St, San Francisco, CA", 37.7597, -122.4128, "$1,800/month", 4.5),
        place("3", "Family House in Pacific Heights", "house", "Spacious family home with garden", "789 Pacific Ave, San Francisco, CA", 37.7913, -122.4087, "$5,200/month", 4.9),
    ]
}
