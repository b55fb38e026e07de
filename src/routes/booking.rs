use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};

use crate::db::Sequence;
use crate::error::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::bookings::{Booking, BookingInput};
use crate::models::trip::TripStatus;
use crate::routes::itinerary::owned_trip;
use crate::AppState;

const CONFIRMED: &str = "confirmed";

#[derive(Debug, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub message: String,
    pub booking_id: i64,
}

pub async fn book(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    input: web::Json<BookingInput>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();
    let trip = owned_trip(&state, input.trip_id, user.user_id).await?;

    let booking = Booking {
        id: state.store.next_id(Sequence::Bookings).await?,
        trip_id: trip.id,
        item_type: input.item_type,
        item_id: input.item_id,
        status: CONFIRMED.to_string(),
        created_at: Utc::now(),
    };
    state.store.insert_booking(&booking).await?;
    state
        .store
        .update_trip_status(trip.id, TripStatus::Booked)
        .await?;

    info!("Booking {} confirmed for trip {}", booking.id, trip.id);
    Ok(HttpResponse::Ok().json(BookingConfirmation {
        message: "Booking confirmed".to_string(),
        booking_id: booking.id,
    }))
}
