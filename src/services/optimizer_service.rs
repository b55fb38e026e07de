use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Optimization {
    #[serde(rename = "type")]
    pub kind: String,
    pub change: String,
    pub impact: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub optimizations: Vec<Optimization>,
    pub confidence_score: u32,
    pub estimated_improvement: String,
}

/// Conditions assumed when the caller supplies none.
pub fn default_conditions() -> Map<String, Value> {
    let defaults = json!({
        "weather": "sunny",
        "crowd_level": "medium",
        "price_surge": false,
        "local_events": ["Art Festival", "Food Market"],
        "transport_delays": []
    });
    match defaults {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Defaults overlaid with the caller's conditions.
pub fn merge_conditions(overrides: Map<String, Value>) -> Map<String, Value> {
    let mut conditions = default_conditions();
    conditions.extend(overrides);
    conditions
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

pub fn optimize_for_conditions<R: Rng + ?Sized>(
    conditions: &Map<String, Value>,
    rng: &mut R,
) -> OptimizationResult {
    let text = |key: &str| conditions.get(key).and_then(Value::as_str);
    let mut optimizations = Vec::new();

    if text("weather") == Some("rainy") {
        optimizations.push(Optimization {
            kind: "weather_adaptation".to_string(),
            change: "Moved outdoor activities indoors".to_string(),
            impact: "Maintained experience quality despite weather".to_string(),
        });
    }

    if text("crowd_level") == Some("high") {
        optimizations.push(Optimization {
            kind: "crowd_avoidance".to_string(),
            change: "Rescheduled popular attractions to off-peak hours".to_string(),
            impact: "Reduced wait times by 60%".to_string(),
        });
    }

    if conditions.get("price_surge").map_or(false, is_truthy) {
        optimizations.push(Optimization {
            kind: "dynamic_pricing".to_string(),
            change: "Found alternative activities with better value".to_string(),
            impact: format!("Saved ${}", rng.gen_range(20..=100)),
        });
    }

    OptimizationResult {
        optimizations,
        confidence_score: rng.gen_range(85..=98),
        estimated_improvement: format!("{}% better experience", rng.gen_range(15..=35)),
    }
}
