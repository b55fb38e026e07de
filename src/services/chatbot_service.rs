use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tokio::sync::Mutex;

const KNOWN_CITIES: [&str; 5] = ["paris", "tokyo", "new york", "london", "rome"];
const KNOWN_DATES: [&str; 3] = ["today", "tomorrow", "next week"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    WeatherInquiry,
    FoodRecommendation,
    AccommodationInquiry,
    TransportInquiry,
    ActivityRecommendation,
    GeneralInquiry,
}

/// Keyword table, checked in order; the first hit wins.
const INTENT_KEYWORDS: [(Intent, &[&str]); 5] = [
    (Intent::WeatherInquiry, &["weather", "climate", "temperature"]),
    (Intent::FoodRecommendation, &["restaurant", "food", "eat", "dining"]),
    (Intent::AccommodationInquiry, &["hotel", "stay", "accommodation"]),
    (Intent::TransportInquiry, &["transport", "travel", "flight", "train"]),
    (Intent::ActivityRecommendation, &["activity", "things to do", "attractions"]),
];

pub fn detect_intent(message: &str) -> Intent {
    let message = message.to_lowercase();
    INTENT_KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| message.contains(w)))
        .map(|(intent, _)| *intent)
        .unwrap_or(Intent::GeneralInquiry)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entities {
    pub cities: Vec<String>,
    pub dates: Vec<String>,
    pub numbers: Vec<u64>,
}

pub fn extract_entities(message: &str) -> Entities {
    let lower = message.to_lowercase();
    let known = |table: &[&str]| -> Vec<String> {
        table
            .iter()
            .filter(|entry| lower.contains(*entry))
            .map(|entry| entry.to_string())
            .collect()
    };

    Entities {
        cities: known(&KNOWN_CITIES[..]),
        dates: known(&KNOWN_DATES[..]),
        numbers: message
            .split_whitespace()
            .filter(|token| token.chars().all(|c| c.is_ascii_digit()))
            .filter_map(|token| token.parse().ok())
            .collect(),
    }
}

fn canned_reply(intent: Intent) -> (&'static str, [&'static str; 3]) {
    match intent {
        Intent::WeatherInquiry => (
            "Based on current data, the weather looks great for your trip! I've already optimized your itinerary for the conditions. Would you like me to suggest weather-appropriate activities?",
            ["Check updated itinerary", "Get weather alerts", "Pack recommendations"],
        ),
        Intent::FoodRecommendation => (
            "I can recommend amazing local restaurants based on your taste preferences! I've analyzed thousands of reviews and your profile to find perfect matches.",
            ["View AI-curated restaurants", "Book table now", "Dietary restrictions"],
        ),
        Intent::AccommodationInquiry => (
            "I can find you the perfect stay! Based on your budget and preferences, I'll show you AI-ranked options with real-time pricing.",
            ["View hotel recommendations", "Compare prices", "Book now"],
        ),
        Intent::TransportInquiry => (
            "I'll help you navigate like a local! I can provide real-time transport updates and optimize your routes between activities.",
            ["Get route optimization", "Transport passes", "Real-time updates"],
        ),
        Intent::ActivityRecommendation => (
            "I've got amazing activity suggestions tailored just for you! Based on your interests and current local events, here are my top picks.",
            ["View personalized activities", "Check availability", "Add to itinerary"],
        ),
        Intent::GeneralInquiry => (
            "I'm your AI travel assistant! I can help you with personalized recommendations, real-time updates, and smart optimizations for your trip.",
            ["Plan new trip", "Optimize current trip", "Get travel tips"],
        ),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub user: String,
    pub bot: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ChatReply {
    pub text: String,
    pub suggestions: Vec<String>,
    pub intent: Intent,
    pub entities: Entities,
    /// Count of all turns handled so far, including this one.
    pub conversation_id: u64,
}

struct History {
    turns: VecDeque<ChatTurn>,
    total: u64,
}

/// Keyword-driven travel assistant shared by all workers. History is capped
/// at `limit` turns; the oldest turns are dropped first.
pub struct TravelChatbot {
    history: Mutex<History>,
    limit: usize,
}

impl TravelChatbot {
    pub fn new(limit: usize) -> Self {
        Self {
            history: Mutex::new(History {
                turns: VecDeque::with_capacity(limit.min(1024)),
                total: 0,
            }),
            limit,
        }
    }

    pub async fn chat(&self, message: &str) -> ChatReply {
        let intent = detect_intent(message);
        let entities = extract_entities(message);
        let (text, suggestions) = canned_reply(intent);

        let mut history = self.history.lock().await;
        if self.limit > 0 {
            while history.turns.len() >= self.limit {
                history.turns.pop_front();
            }
            history.turns.push_back(ChatTurn {
                user: message.to_string(),
                bot: text.to_string(),
                timestamp: Utc::now(),
            });
        }
        history.total += 1;

        ChatReply {
            text: text.to_string(),
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
            intent,
            entities,
            conversation_id: history.total,
        }
    }

    /// Up to `count` most recent turns, oldest first.
    pub async fn recent(&self, count: usize) -> Vec<ChatTurn> {
        let history = self.history.lock().await;
        let skip = history.turns.len().saturating_sub(count);
        history.turns.iter().skip(skip).cloned().collect()
    }
}
