use actix_web::{web, HttpResponse};
use chrono::{Datelike, Utc};
use log::info;
use serde_json::{Map, Value};

use crate::db::Sequence;
use crate::error::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::trip::{GeneratedTrip, ItineraryItem, Trip, TripInput, TripItinerary, TripStatus};
use crate::services::trip_planner_service::{enabled_categories, PlanRequest, UserContext};
use crate::AppState;

const DEFAULT_PLANNING_BUDGET: f64 = 2000.0;
const MAX_TRIP_DAYS: u32 = 60;

fn default_preferences() -> Map<String, Value> {
    let mut preferences = Map::new();
    preferences.insert("heritage".to_string(), Value::Bool(true));
    preferences.insert("food".to_string(), Value::Bool(true));
    preferences
}

/// Loads a trip owned by `user_id`. Someone else's trip reads as missing.
pub(crate) async fn owned_trip(
    state: &AppState,
    trip_id: i64,
    user_id: i64,
) -> Result<Trip, ApiError> {
    state
        .store
        .find_trip(trip_id)
        .await?
        .filter(|trip| trip.user_id == user_id)
        .ok_or_else(|| ApiError::not_found("Trip not found"))
}

pub async fn generate(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    input: web::Json<TripInput>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();

    let destination = input.destination.trim().to_string();
    if destination.is_empty() {
        return Err(ApiError::bad_request("Destination is required"));
    }
    let duration = u32::try_from(input.duration)
        .ok()
        .filter(|days| (1..=MAX_TRIP_DAYS).contains(days))
        .ok_or_else(|| {
            ApiError::bad_request(format!(
                "Duration must be between 1 and {} days",
                MAX_TRIP_DAYS
            ))
        })?;
    let budget = input.budget.unwrap_or(DEFAULT_PLANNING_BUDGET);
    if !budget.is_finite() || budget <= 0.0 {
        return Err(ApiError::bad_request("Budget must be positive"));
    }

    let account = state
        .store
        .find_user_by_id(user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let preferences = input
        .preferences
        .filter(|p| !p.is_empty())
        .or_else(|| Some(account.preferences).filter(|p| !p.is_empty()))
        .unwrap_or_else(default_preferences);
    let categories = enabled_categories(&preferences);
    let previous_trips = state.store.count_trips_for_user(user.user_id).await?;

    let plan = state.planner.plan(&PlanRequest {
        destination: &destination,
        duration,
        budget,
        preferences: &categories,
        context: UserContext { previous_trips },
        month: Utc::now().month(),
    });

    let trip_id = state.store.next_id(Sequence::Trips).await?;
    let mut items = Vec::with_capacity(plan.itinerary.len());
    for activity in &plan.itinerary {
        items.push(ItineraryItem {
            id: state.store.next_id(Sequence::Itineraries).await?,
            trip_id,
            day: activity.day,
            activity: activity.activity.clone(),
            location: activity.location.clone(),
            cost: activity.cost,
        });
    }
    let total_cost = items.iter().map(|item| item.cost).sum();

    let trip = Trip {
        id: trip_id,
        user_id: user.user_id,
        destination,
        duration,
        total_cost,
        status: TripStatus::Planning,
        created_at: Utc::now(),
    };
    state.store.insert_trip(&trip).await?;
    state.store.insert_itinerary_items(&items).await?;

    info!(
        "Generated trip {} to {} for user {} ({} activities)",
        trip.id,
        trip.destination,
        user.user_id,
        items.len()
    );

    Ok(HttpResponse::Ok().json(GeneratedTrip {
        id: trip.id,
        destination: trip.destination,
        duration: trip.duration,
        total_cost: trip.total_cost,
        status: trip.status,
        ai_insights: plan.ai_insights,
        dynamic_pricing: plan.dynamic_pricing,
        sustainability_score: plan.sustainability_score,
    }))
}

pub async fn update(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let trip = owned_trip(&state, path.into_inner(), user.user_id).await?;

    let changed = state.store.mark_itinerary_optimized(trip.id).await?;
    info!("Optimized {} itinerary items of trip {}", changed, trip.id);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Itinerary updated with real-time optimization!",
        "trip_id": trip.id,
        "optimized_items": changed,
    })))
}

pub async fn list_trips(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let trips = state.store.list_trips_for_user(user.user_id).await?;
    Ok(HttpResponse::Ok().json(trips))
}

pub async fn trip_itinerary(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let trip = owned_trip(&state, path.into_inner(), user.user_id).await?;
    let itinerary = state.store.list_itinerary_items(trip.id).await?;

    Ok(HttpResponse::Ok().json(TripItinerary { trip, itinerary }))
}
