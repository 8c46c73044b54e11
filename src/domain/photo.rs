// Photo analysis domain models
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One of the classifier's top predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recognition {
    pub label: String,
    pub confidence: f32,
}

impl Recognition {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoFeatures {
    pub condition: String,
    pub style: String,
    pub lighting: String,
    pub cleanliness: f64,
    pub space_utilization: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoAnalysis {
    pub tags: Vec<String>,
    pub score: f64,
    pub features: PhotoFeatures,
    /// Seconds since the Unix epoch.
    pub analysis_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationInsights {
    pub neighborhood_quality: f64,
    pub accessibility_score: f64,
    pub transportation_rating: f64,
    pub safety_score: f64,
    pub noise_level: String,
    pub walkability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceAnalysis {
    pub property_type: String,
    pub detected_rooms: Vec<String>,
    pub detected_amenities: Vec<String>,
    pub property_features: BTreeMap<String, f64>,
    pub location_insights: Option<LocationInsights>,
    pub estimated_price: u64,
    pub overall_score: f64,
    pub confidence_level: f64,
    pub analysis_timestamp: String,
}
