use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::services::trip_planner_service::{AiInsights, DynamicPricing, SustainabilityScore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Planning,
    Booked,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Trip {
    pub id: i64,
    pub user_id: i64,
    pub destination: String,
    pub duration: u32,
    pub total_cost: f64,
    pub status: TripStatus,
    pub created_at: DateTime<Utc>,
}

/// One planned activity of a trip, keyed by 1-based day.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItineraryItem {
    pub id: i64,
    pub trip_id: i64,
    pub day: u32,
    pub activity: String,
    pub location: String,
    pub cost: f64,
}

#[derive(Debug, Deserialize)]
pub struct TripInput {
    pub destination: String,
    pub duration: i64,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub preferences: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeneratedTrip {
    pub id: i64,
    pub destination: String,
    pub duration: u32,
    pub total_cost: f64,
    pub status: TripStatus,
    pub ai_insights: AiInsights,
    pub dynamic_pricing: DynamicPricing,
    pub sustainability_score: SustainabilityScore,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TripItinerary {
    pub trip: Trip,
    pub itinerary: Vec<ItineraryItem>,
}
