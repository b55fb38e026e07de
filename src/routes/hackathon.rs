//! Public "AI" showcase endpoints mounted under `/hackathon/ai`.

use actix_web::{web, HttpResponse};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::ApiError;
use crate::services::chatbot_service::{Entities, Intent};
use crate::services::insight_service;
use crate::services::optimizer_service::{merge_conditions, optimize_for_conditions, Optimization};
use crate::AppState;

const HISTORY_WINDOW: usize = 5;
const AI_CONFIDENCE: u32 = 95;

#[derive(Debug, Deserialize)]
pub struct ChatMessage {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub suggestions: Vec<String>,
    pub intent: Intent,
    pub entities: Entities,
    pub conversation_id: u64,
    pub ai_confidence: u32,
    pub response_time: String,
}

#[derive(Debug, Deserialize)]
pub struct OptimizationRequest {
    pub trip_id: i64,
    #[serde(default)]
    pub conditions: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OptimizationResponse {
    pub optimization_applied: bool,
    pub improvements: Vec<Optimization>,
    pub confidence_score: u32,
    pub estimated_improvement: String,
    pub next_optimization_check: String,
}

#[derive(Debug, Deserialize)]
pub struct MarketQuery {
    pub destination: Option<String>,
}

async fn ensure_trip_exists(state: &AppState, trip_id: i64) -> Result<(), ApiError> {
    match state.store.find_trip(trip_id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::not_found("Trip not found")),
    }
}

pub async fn chat(state: web::Data<AppState>, input: web::Json<ChatMessage>) -> HttpResponse {
    let reply = state.chatbot.chat(&input.message).await;
    debug!("Chat turn {} classified as {:?}", reply.conversation_id, reply.intent);

    HttpResponse::Ok().json(ChatResponse {
        response: reply.text,
        suggestions: reply.suggestions,
        intent: reply.intent,
        entities: reply.entities,
        conversation_id: reply.conversation_id,
        ai_confidence: AI_CONFIDENCE,
        response_time: "0.3s".to_string(),
    })
}

pub async fn chat_history(state: web::Data<AppState>) -> HttpResponse {
    let history = state.chatbot.recent(HISTORY_WINDOW).await;
    HttpResponse::Ok().json(json!({ "history": history }))
}

pub async fn optimize_realtime(
    state: web::Data<AppState>,
    input: web::Json<OptimizationRequest>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();
    ensure_trip_exists(&state, input.trip_id).await?;

    let conditions = merge_conditions(input.conditions);
    let result = optimize_for_conditions(&conditions, &mut rand::thread_rng());

    Ok(HttpResponse::Ok().json(OptimizationResponse {
        optimization_applied: true,
        improvements: result.optimizations,
        confidence_score: result.confidence_score,
        estimated_improvement: result.estimated_improvement,
        next_optimization_check: "In 2 hours".to_string(),
    }))
}

pub async fn insights(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let trip_id = path.into_inner();
    ensure_trip_exists(&state, trip_id).await?;
    Ok(HttpResponse::Ok().json(insight_service::trip_insights(trip_id)))
}

pub async fn market_intelligence(query: web::Query<MarketQuery>) -> Result<HttpResponse, ApiError> {
    let destination = query
        .into_inner()
        .destination
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ApiError::bad_request("destination query parameter is required"))?;

    Ok(HttpResponse::Ok().json(insight_service::market_intelligence(&destination)))
}

pub async fn generate_alternatives(input: web::Json<Value>) -> Result<HttpResponse, ApiError> {
    let plan = input.into_inner();
    if !plan.is_object() {
        return Err(ApiError::bad_request("Trip data must be a JSON object"));
    }
    Ok(HttpResponse::Ok().json(insight_service::alternatives_report(plan)))
}

pub async fn sustainability_report(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let trip_id = path.into_inner();
    ensure_trip_exists(&state, trip_id).await?;
    Ok(HttpResponse::Ok().json(insight_service::sustainability_report(trip_id)))
}
