use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::bookings::{Booking, Payment};
use crate::models::trip::{ItineraryItem, Trip, TripStatus};
use crate::models::user::User;

pub mod memory;
pub mod mongo;

pub const OPTIMIZED_MARKER: &str = "AI-Optimized";

/// Integer id sequences, one per collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sequence {
    Users,
    Trips,
    Itineraries,
    Bookings,
    Payments,
}

impl Sequence {
    pub fn name(&self) -> &'static str {
        match self {
            Sequence::Users => "users",
            Sequence::Trips => "trips",
            Sequence::Itineraries => "itineraries",
            Sequence::Bookings => "bookings",
            Sequence::Payments => "payments",
        }
    }
}

#[async_trait]
pub trait TripStore: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    /// Returns the next id of `sequence`, starting at 1.
    async fn next_id(&self, sequence: Sequence) -> Result<i64, StoreError>;

    /// Fails with `StoreError::Duplicate` when the email is taken.
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    async fn insert_trip(&self, trip: &Trip) -> Result<(), StoreError>;
    async fn find_trip(&self, id: i64) -> Result<Option<Trip>, StoreError>;
    async fn list_trips_for_user(&self, user_id: i64) -> Result<Vec<Trip>, StoreError>;
    async fn count_trips_for_user(&self, user_id: i64) -> Result<u64, StoreError>;
    async fn update_trip_status(&self, id: i64, status: TripStatus) -> Result<(), StoreError>;

    async fn insert_itinerary_items(&self, items: &[ItineraryItem]) -> Result<(), StoreError>;
    /// Items ordered by day, then id.
    async fn list_itinerary_items(&self, trip_id: i64) -> Result<Vec<ItineraryItem>, StoreError>;
    /// Appends " (AI-Optimized)" to every activity not already carrying the
    /// marker. Returns the number of items changed.
    async fn mark_itinerary_optimized(&self, trip_id: i64) -> Result<u64, StoreError>;

    async fn insert_booking(&self, booking: &Booking) -> Result<(), StoreError>;
    async fn find_booking(&self, id: i64) -> Result<Option<Booking>, StoreError>;

    async fn insert_payment(&self, payment: &Payment) -> Result<(), StoreError>;
    async fn find_payment(&self, id: i64) -> Result<Option<Payment>, StoreError>;
    /// Marks a completed payment refunded. Returns false when no completed
    /// payment with that id exists, so a payment is refunded at most once.
    async fn update_payment_refund(&self, id: i64, refund_id: &str) -> Result<bool, StoreError>;
}

pub fn optimized_activity(activity: &str) -> String {
    format!("{} ({})", activity, OPTIMIZED_MARKER)
}
