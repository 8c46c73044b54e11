// Property domain models
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingStatus {
    Available,
    #[serde(rename = "Under Contract")]
    UnderContract,
    Sold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub price: f64,
    pub size: u32,
    pub rooms: u32,
    /// Synthetic relevance score in [0, 1].
    pub ml_score: f64,
    pub city: String,
    pub status: ListingStatus,
    pub features: Vec<String>,
    pub date_added: NaiveDate,
    pub days_on_market: u32,
    pub price_per_sqft: f64,
    pub demand_score: f64,
    pub inventory_level: f64,
}

impl Property {
    /// Case-insensitive match against type, city and features.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.property_type.to_lowercase().contains(&term)
            || self.city.to_lowercase().contains(&term)
            || self
                .features
                .iter()
                .any(|f| f.to_lowercase().contains(&term))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplePlace {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub place_type: String,
    pub description: String,
    pub address: String,
    pub location: GeoPoint,
    pub price: String,
    pub rating: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property() -> Property {
        Property {
            id: "Loft_1".to_string(),
            property_type: "Loft".to_string(),
            price: 450000.0,
            size: 1500,
            rooms: 2,
            ml_score: 0.75,
            city: "Austin".to_string(),
            status: ListingStatus::Available,
            features: vec!["Hardwood Floors".to_string(), "Gym".to_string()],
            date_added: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            days_on_market: 10,
            price_per_sqft: 300.0,
            demand_score: 0.8,
            inventory_level: 0.7,
        }
    }

    #[test]
    fn test_matches() {
        let p = property();
        assert!(p.matches("loft"));
        assert!(p.matches("AUSTIN"));
        assert!(p.matches("hardwood"));
        assert!(p.matches("  "));
        assert!(!p.matches("pool"));
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&ListingStatus::UnderContract).unwrap();
        assert_eq!(json, "\"Under Contract\"");
    }
}
