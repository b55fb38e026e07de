//! Canned "AI insight" payloads served by the hackathon endpoints.

use serde::Serialize;
use serde_json::{json, Value};

pub fn trip_insights(trip_id: i64) -> Value {
    json!({
        "trip_id": trip_id,
        "ai_analysis": {
            "personalization_match": "94%",
            "budget_efficiency": "Excellent",
            "experience_quality": "Premium",
            "local_authenticity": "High"
        },
        "predictive_insights": {
            "weather_forecast": "Sunny for next 3 days",
            "crowd_predictions": ["Low crowds at museums", "High crowds at landmarks"],
            "price_trends": "Stable pricing expected",
            "optimal_booking_window": "Next 24 hours"
        },
        "smart_recommendations": [
            "Book Louvre tickets now - 30% less crowded tomorrow morning",
            "Restaurant 'Le Comptoir' has availability at 7 PM - perfect for your food preferences",
            "Weather is perfect for Seine river cruise - added to your itinerary",
            "Local jazz festival tonight - would you like tickets?"
        ],
        "risk_assessment": {
            "overall_risk": "Low",
            "weather_risk": "Minimal",
            "safety_score": "Excellent",
            "backup_plans": 2
        }
    })
}

pub fn market_intelligence(destination: &str) -> Value {
    json!({
        "destination": destination,
        "market_analysis": {
            "demand_level": "High",
            "price_trend": "Increasing",
            "best_booking_time": "Next 48 hours",
            "seasonal_factor": "Peak season approaching"
        },
        "competitive_analysis": {
            "our_price_advantage": "15% below market average",
            "unique_experiences": 8,
            "ai_optimization_benefit": "25% better value"
        },
        "demand_prediction": {
            "next_week": "High demand expected",
            "price_surge_probability": "30%",
            "availability_forecast": "Limited availability for premium experiences"
        },
        "ai_recommendations": [
            "Book now to secure current pricing",
            "Consider alternative dates for 20% savings",
            "Premium experiences selling fast - reserve immediately"
        ]
    })
}

pub fn sustainability_report(trip_id: i64) -> Value {
    json!({
        "trip_id": trip_id,
        "sustainability_score": 78,
        "carbon_footprint": {
            "total_co2": "145 kg",
            "breakdown": {
                "transport": "85 kg",
                "accommodation": "35 kg",
                "activities": "25 kg"
            },
            "comparison": "23% lower than average trip"
        },
        "eco_improvements": [
            "Switch to train transport: Save 40 kg CO2",
            "Choose eco-certified hotel: Save 15 kg CO2",
            "Local food experiences: Save 8 kg CO2"
        ],
        "green_alternatives": {
            "transport": "High-speed rail available",
            "accommodation": "3 eco-certified options found",
            "activities": "5 sustainable tour operators identified"
        },
        "impact_prediction": {
            "with_improvements": "Carbon footprint reduced to 97 kg (-33%)",
            "cost_impact": "Minimal increase (+$25)",
            "experience_quality": "Enhanced local authenticity"
        }
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct Alternative {
    pub option: String,
    pub theme: &'static str,
    pub cost_difference: &'static str,
    pub duration_adjustment: &'static str,
    pub ai_score: u32,
    pub unique_features: [&'static str; 3],
    pub why_recommended: &'static str,
}

struct AlternativeTemplate {
    theme: &'static str,
    cost_difference: &'static str,
    duration_adjustment: &'static str,
    ai_score: u32,
    unique_features: [&'static str; 3],
    why_recommended: &'static str,
}

const ALTERNATIVES: [AlternativeTemplate; 3] = [
    AlternativeTemplate {
        theme: "Luxury Focus",
        cost_difference: "+$200",
        duration_adjustment: "Same",
        ai_score: 92,
        unique_features: ["Private tours", "5-star dining", "Luxury transport"],
        why_recommended: "Matches your premium preferences and budget flexibility",
    },
    AlternativeTemplate {
        theme: "Adventure Focus",
        cost_difference: "-$150",
        duration_adjustment: "+1 day",
        ai_score: 88,
        unique_features: ["Outdoor activities", "Local guides", "Off-beaten path"],
        why_recommended: "Perfect for your adventurous spirit and active lifestyle",
    },
    AlternativeTemplate {
        theme: "Cultural Immersion",
        cost_difference: "+$50",
        duration_adjustment: "-1 day",
        ai_score: 95,
        unique_features: ["Museum passes", "Local workshops", "Historical tours"],
        why_recommended: "Ideal blend of culture and history based on your interests",
    },
];

pub fn trip_alternatives() -> Vec<Alternative> {
    ALTERNATIVES
        .iter()
        .enumerate()
        .map(|(i, t)| Alternative {
            option: format!("Alternative {}", i + 1),
            theme: t.theme,
            cost_difference: t.cost_difference,
            duration_adjustment: t.duration_adjustment,
            ai_score: t.ai_score,
            unique_features: t.unique_features,
            why_recommended: t.why_recommended,
        })
        .collect()
}

pub fn alternatives_report(original_plan: Value) -> Value {
    json!({
        "original_plan": original_plan,
        "ai_alternatives": trip_alternatives(),
        "recommendation": "Alternative 3 offers the best value-experience ratio for your profile",
        "decision_support": {
            "comparison_matrix": "Available in detailed view",
            "roi_analysis": "Cultural Immersion option provides 40% more unique experiences",
            "risk_comparison": "All alternatives have similar low-risk profiles"
        }
    })
}
