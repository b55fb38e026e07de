use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::{Mutex, PoisonError};

const EXPERT_TRIP_THRESHOLD: u64 = 5;
const DEFAULT_ACTIVITY_COST: f64 = 30.0;
const DISCOUNT_THRESHOLD: f64 = 50.0;
const DISCOUNT_FACTOR: f64 = 0.85;
const MAX_EVENTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Heritage,
    Food,
    Adventure,
}

impl Category {
    /// Visiting order when filling a day.
    pub const ALL: [Category; 3] = [Category::Heritage, Category::Food, Category::Adventure];

    pub fn key(&self) -> &'static str {
        match self {
            Category::Heritage => "heritage",
            Category::Food => "food",
            Category::Adventure => "adventure",
        }
    }
}

/// Categories switched on in a preferences object, in visiting order.
/// Only boolean `true` counts as enabled.
pub fn enabled_categories(preferences: &Map<String, Value>) -> Vec<Category> {
    Category::ALL
        .into_iter()
        .filter(|c| {
            preferences
                .get(c.key())
                .and_then(Value::as_bool)
                .unwrap_or(false)
        })
        .collect()
}

struct PoolEntry {
    /// May contain `{destination}`.
    name: &'static str,
    cost: f64,
}

struct ActivityPool {
    heritage: &'static [PoolEntry],
    food: &'static [PoolEntry],
    adventure: &'static [PoolEntry],
}

impl ActivityPool {
    fn entries(&self, category: Category) -> &'static [PoolEntry] {
        match category {
            Category::Heritage => self.heritage,
            Category::Food => self.food,
            Category::Adventure => self.adventure,
        }
    }
}

macro_rules! pool_entry {
    ($name:expr, $cost:expr) => {
        PoolEntry {
            name: $name,
            cost: $cost,
        }
    };
}

static PARIS_POOL: ActivityPool = ActivityPool {
    heritage: &[
        pool_entry!("AI-Guided Louvre Tour", 45.0),
        pool_entry!("Notre-Dame VR Experience", 25.0),
        pool_entry!("Versailles Smart Audio Guide", 35.0),
    ],
    food: &[
        pool_entry!("AI Sommelier Wine Tasting", 60.0),
        pool_entry!("Michelin Star Restaurant (AI-booked)", 120.0),
        pool_entry!("Food Market AI Walking Tour", 40.0),
    ],
    adventure: &[
        pool_entry!("Seine River AI Drone Tour", 80.0),
        pool_entry!("Catacombs AR Experience", 30.0),
    ],
};

static TOKYO_POOL: ActivityPool = ActivityPool {
    heritage: &[
        pool_entry!("AI Temple Guide Experience", 20.0),
        pool_entry!("Traditional Tea Ceremony (AI-matched)", 50.0),
    ],
    food: &[
        pool_entry!("Sushi Master AI Pairing", 90.0),
        pool_entry!("Robot Restaurant Experience", 70.0),
    ],
    adventure: &[
        pool_entry!("Tokyo Skytree AI Observatory", 40.0),
        pool_entry!("Shibuya Crossing Analytics Tour", 25.0),
    ],
};

static NEW_YORK_POOL: ActivityPool = ActivityPool {
    heritage: &[
        pool_entry!("AI-Guided Statue of Liberty Tour", 35.0),
        pool_entry!("Empire State Building VR Experience", 40.0),
        pool_entry!("Central Park Smart Walking Tour", 25.0),
    ],
    food: &[
        pool_entry!("AI Food Truck Discovery", 30.0),
        pool_entry!("Broadway District Restaurant (AI-booked)", 85.0),
        pool_entry!("Little Italy AI Culinary Tour", 55.0),
    ],
    adventure: &[
        pool_entry!("Brooklyn Bridge AI Photo Walk", 20.0),
        pool_entry!("Times Square Analytics Experience", 15.0),
    ],
};

static LONDON_POOL: ActivityPool = ActivityPool {
    heritage: &[
        pool_entry!("AI-Guided Tower of London Tour", 30.0),
        pool_entry!("Buckingham Palace VR Experience", 25.0),
        pool_entry!("Westminster Abbey Smart Guide", 35.0),
    ],
    food: &[
        pool_entry!("AI Pub Crawl Experience", 45.0),
        pool_entry!("Traditional Tea Service (AI-matched)", 40.0),
        pool_entry!("Borough Market AI Food Tour", 35.0),
    ],
    adventure: &[
        pool_entry!("Thames River AI Cruise", 50.0),
        pool_entry!("London Eye Analytics Experience", 45.0),
    ],
};

static GENERIC_POOL: ActivityPool = ActivityPool {
    heritage: &[
        pool_entry!("AI-Guided {destination} Heritage Tour", 35.0),
        pool_entry!("{destination} Museum VR Experience", 25.0),
        pool_entry!("Historic {destination} Smart Walking Tour", 30.0),
    ],
    food: &[
        pool_entry!("Local {destination} Cuisine AI Tour", 50.0),
        pool_entry!("Best {destination} Restaurant (AI-booked)", 75.0),
        pool_entry!("{destination} Food Market Experience", 40.0),
    ],
    adventure: &[
        pool_entry!("{destination} City AI Discovery Tour", 45.0),
        pool_entry!("Scenic {destination} Analytics Walk", 25.0),
    ],
};

fn pool_for(destination: &str) -> &'static ActivityPool {
    let dest = destination.to_lowercase();
    let mentions = |needles: &[&str]| needles.iter().any(|n| dest.contains(n));

    if mentions(&["paris", "france"]) {
        &PARIS_POOL
    } else if mentions(&["tokyo", "japan"]) {
        &TOKYO_POOL
    } else if mentions(&["new york", "nyc"]) {
        &NEW_YORK_POOL
    } else if mentions(&["london", "uk"]) {
        &LONDON_POOL
    } else {
        &GENERIC_POOL
    }
}

fn local_events(destination: &str) -> &'static [&'static str] {
    match destination.to_lowercase().as_str() {
        "paris" => &["Fashion Week", "Wine Festival", "Art Exhibition"],
        "tokyo" => &["Cherry Blossom Festival", "Tech Conference", "Food Festival"],
        "new york" => &["Broadway Week", "Museum Night", "Food Truck Festival"],
        _ => &["Local Festival"],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    Sunny,
    Rainy,
    Cloudy,
    Snowy,
}

impl Weather {
    const ALL: [Weather; 4] = [Weather::Sunny, Weather::Rainy, Weather::Cloudy, Weather::Snowy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weather::Sunny => "sunny",
            Weather::Rainy => "rainy",
            Weather::Cloudy => "cloudy",
            Weather::Snowy => "snowy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrowdLevel {
    Low,
    Medium,
    High,
}

impl CrowdLevel {
    const ALL: [CrowdLevel; 3] = [CrowdLevel::Low, CrowdLevel::Medium, CrowdLevel::High];

    fn risk_factor(&self) -> f64 {
        match self {
            CrowdLevel::Low => 0.1,
            CrowdLevel::Medium => 0.3,
            CrowdLevel::High => 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(total: f64) -> Self {
        if total < 0.3 {
            RiskLevel::Low
        } else if total < 0.6 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserContext {
    pub previous_trips: u64,
}

pub struct PlanRequest<'a> {
    pub destination: &'a str,
    pub duration: u32,
    pub budget: f64,
    pub preferences: &'a [Category],
    pub context: UserContext,
    /// 1-based calendar month, drives the seasonal profile.
    pub month: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedActivity {
    pub day: u32,
    pub activity: String,
    pub location: String,
    pub cost: f64,
    pub ai_enhanced: bool,
    pub weather_adapted: bool,
    #[serde(default)]
    pub ai_optimized: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiInsights {
    pub personalization_score: u32,
    pub budget_optimization: String,
    pub weather_adaptation: String,
    pub local_events: Vec<String>,
    pub risk_level: RiskLevel,
    pub experience_level: String,
    pub seasonal_preference: String,
    pub ai_recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamicPricing {
    pub current_total: f64,
    pub predicted_price_tomorrow: f64,
    pub best_booking_time: String,
    pub savings_opportunity: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SustainabilityScore {
    pub score: u32,
    pub carbon_footprint: String,
    pub eco_friendly_alternatives: usize,
    pub sustainability_tips: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SmartItinerary {
    pub itinerary: Vec<PlannedActivity>,
    pub ai_insights: AiInsights,
    pub dynamic_pricing: DynamicPricing,
    pub sustainability_score: SustainabilityScore,
}

impl SmartItinerary {
    pub fn total_cost(&self) -> f64 {
        self.itinerary.iter().map(|a| a.cost).sum()
    }
}

#[derive(Debug, Clone)]
struct TravelerProfile {
    personality_type: &'static str,
    experience_level: &'static str,
    seasonal_preference: &'static str,
    personalization_score: u32,
}

#[derive(Debug, Clone)]
struct RealTimeSnapshot {
    weather: Weather,
    events: Vec<String>,
    crowd_level: CrowdLevel,
}

impl RealTimeSnapshot {
    fn weather_impact(&self) -> String {
        format!("Adapted for {} conditions", self.weather.as_str())
    }
}

/// Pluggable itinerary generation.
pub trait ItineraryPlanner: Send + Sync {
    fn plan(&self, request: &PlanRequest<'_>) -> SmartItinerary;
}

/// Table-driven planner. The RNG is owned so tests can seed it.
pub struct GenAiTripPlanner {
    rng: Mutex<StdRng>,
}

impl GenAiTripPlanner {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for GenAiTripPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ItineraryPlanner for GenAiTripPlanner {
    fn plan(&self, request: &PlanRequest<'_>) -> SmartItinerary {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        generate_smart_itinerary(request, &mut *rng)
    }
}

pub fn generate_smart_itinerary<R: Rng + ?Sized>(
    request: &PlanRequest<'_>,
    rng: &mut R,
) -> SmartItinerary {
    let profile = analyze_user_context(request, rng);
    let snapshot = collect_real_time_insights(request.destination, rng);

    let activities = personalized_activities(request, &snapshot, rng);
    let itinerary = optimize_itinerary(activities, request.budget);
    let risk_level = assess_travel_risk(&snapshot);

    let total: f64 = itinerary.iter().map(|a| a.cost).sum();

    let ai_insights = AiInsights {
        personalization_score: profile.personalization_score,
        budget_optimization: format!("Saved ${:.2}", request.budget - total),
        weather_adaptation: snapshot.weather_impact(),
        local_events: snapshot.events.clone(),
        risk_level,
        experience_level: profile.experience_level.to_string(),
        seasonal_preference: profile.seasonal_preference.to_string(),
        ai_recommendations: recommendations(&profile, &snapshot),
    };
    let dynamic_pricing = dynamic_pricing(total, rng);
    let sustainability_score = sustainability_score(&itinerary, rng);

    SmartItinerary {
        itinerary,
        ai_insights,
        dynamic_pricing,
        sustainability_score,
    }
}

fn analyze_user_context<R: Rng + ?Sized>(request: &PlanRequest<'_>, rng: &mut R) -> TravelerProfile {
    TravelerProfile {
        personality_type: if request.preferences.contains(&Category::Adventure) {
            "adventurous"
        } else {
            "cultural"
        },
        experience_level: if request.context.previous_trips > EXPERT_TRIP_THRESHOLD {
            "expert"
        } else {
            "beginner"
        },
        seasonal_preference: if (6..=8).contains(&request.month) {
            "summer"
        } else {
            "winter"
        },
        personalization_score: rng.gen_range(85..=98),
    }
}

fn collect_real_time_insights<R: Rng + ?Sized>(destination: &str, rng: &mut R) -> RealTimeSnapshot {
    let weather = *Weather::ALL.choose(rng).unwrap_or(&Weather::Sunny);
    let candidates = local_events(destination);
    let events = candidates
        .choose_multiple(rng, MAX_EVENTS.min(candidates.len()))
        .map(|e| e.to_string())
        .collect();
    let crowd_level = *CrowdLevel::ALL.choose(rng).unwrap_or(&CrowdLevel::Medium);

    RealTimeSnapshot {
        weather,
        events,
        crowd_level,
    }
}

fn personalized_activities<R: Rng + ?Sized>(
    request: &PlanRequest<'_>,
    snapshot: &RealTimeSnapshot,
    rng: &mut R,
) -> Vec<PlannedActivity> {
    let pool = pool_for(request.destination);
    let destination = request.destination;
    let daily_budget = request.budget / f64::from(request.duration);
    let weather = snapshot.weather.as_str();

    let mut selected = Vec::new();

    for day in 1..=request.duration {
        let mut remaining = daily_budget;
        let mut day_activities = Vec::new();

        for category in request.preferences {
            if remaining <= 0.0 {
                break;
            }
            let affordable: Vec<&PoolEntry> = pool
                .entries(*category)
                .iter()
                .filter(|entry| entry.cost <= remaining)
                .collect();

            if let Some(entry) = affordable.choose(rng) {
                let name = entry.name.replace("{destination}", destination);
                let weather_adapted = name.to_lowercase().contains(weather);
                day_activities.push(PlannedActivity {
                    day,
                    activity: name,
                    location: format!("{} - AI Optimized Route", destination),
                    cost: entry.cost,
                    ai_enhanced: true,
                    weather_adapted,
                    ai_optimized: false,
                });
                remaining -= entry.cost;
            }
        }

        if day_activities.is_empty() {
            day_activities.push(PlannedActivity {
                day,
                activity: format!("AI-Curated {} Exploration", destination),
                location: format!("{} City Center", destination),
                cost: DEFAULT_ACTIVITY_COST.min(remaining),
                ai_enhanced: true,
                weather_adapted: true,
                ai_optimized: false,
            });
        }

        selected.extend(day_activities);
    }

    selected
}

/// Discounts pricey activities by 15% (rounded down) once the plan runs over
/// budget.
pub fn optimize_itinerary(mut activities: Vec<PlannedActivity>, budget: f64) -> Vec<PlannedActivity> {
    let total: f64 = activities.iter().map(|a| a.cost).sum();

    if total > budget {
        for activity in activities.iter_mut().filter(|a| a.cost > DISCOUNT_THRESHOLD) {
            activity.cost = (activity.cost * DISCOUNT_FACTOR).floor();
            activity.ai_optimized = true;
        }
    }

    activities
}

fn assess_travel_risk(snapshot: &RealTimeSnapshot) -> RiskLevel {
    let weather = if snapshot.weather == Weather::Sunny { 0.2 } else { 0.4 };
    let general = 0.1;
    RiskLevel::from_score(weather + snapshot.crowd_level.risk_factor() + general)
}

fn recommendations(profile: &TravelerProfile, snapshot: &RealTimeSnapshot) -> Vec<String> {
    vec![
        format!(
            "Based on your {} profile, we've prioritized unique experiences",
            profile.personality_type
        ),
        format!(
            "Weather is {} - we've adapted your itinerary accordingly",
            snapshot.weather.as_str()
        ),
        format!(
            "Local events: {} - consider attending!",
            snapshot.events.join(", ")
        ),
        "AI has optimized your route to minimize travel time between activities".to_string(),
        "Dynamic pricing detected - book now to save on selected activities".to_string(),
    ]
}

fn dynamic_pricing<R: Rng + ?Sized>(total: f64, rng: &mut R) -> DynamicPricing {
    DynamicPricing {
        current_total: total,
        predicted_price_tomorrow: total * rng.gen_range(1.05..=1.15),
        best_booking_time: "Next 2 hours".to_string(),
        savings_opportunity: format!("${:.2}", total * 0.1),
    }
}

fn sustainability_score<R: Rng + ?Sized>(itinerary: &[PlannedActivity], rng: &mut R) -> SustainabilityScore {
    let enhanced = itinerary.iter().filter(|a| a.ai_enhanced).count();
    let score = if itinerary.is_empty() {
        0
    } else {
        (enhanced as f64 / itinerary.len() as f64 * 100.0) as u32
    };

    SustainabilityScore {
        score,
        carbon_footprint: format!("{} kg CO2", rng.gen_range(50..=200)),
        eco_friendly_alternatives: enhanced,
        sustainability_tips: vec![
            "Use public transport between activities".to_string(),
            "Choose local restaurants".to_string(),
            "Book eco-certified accommodations".to_string(),
        ],
    }
}
