use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use crate::db::{optimized_activity, Sequence, TripStore, OPTIMIZED_MARKER};
use crate::error::StoreError;
use crate::models::bookings::{Booking, Payment, PaymentStatus};
use crate::models::trip::{ItineraryItem, Trip, TripStatus};
use crate::models::user::User;

#[derive(Default)]
struct Tables {
    counters: HashMap<Sequence, i64>,
    users: BTreeMap<i64, User>,
    trips: BTreeMap<i64, Trip>,
    itineraries: BTreeMap<i64, ItineraryItem>,
    bookings: BTreeMap<i64, Booking>,
    payments: BTreeMap<i64, Payment>,
}

/// Process-local `TripStore`. Backs the test suite and local runs without a
/// database.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TripStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn next_id(&self, sequence: Sequence) -> Result<i64, StoreError> {
        let mut tables = self.tables.write().await;
        let seq = tables.counters.entry(sequence).or_insert(0);
        *seq += 1;
        Ok(*seq)
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate(format!("email {}", user.email)));
        }
        if tables.users.contains_key(&user.id) {
            return Err(StoreError::Duplicate(format!("user id {}", user.id)));
        }
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn insert_trip(&self, trip: &Trip) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.trips.contains_key(&trip.id) {
            return Err(StoreError::Duplicate(format!("trip id {}", trip.id)));
        }
        tables.trips.insert(trip.id, trip.clone());
        Ok(())
    }

    async fn find_trip(&self, id: i64) -> Result<Option<Trip>, StoreError> {
        Ok(self.tables.read().await.trips.get(&id).cloned())
    }

    async fn list_trips_for_user(&self, user_id: i64) -> Result<Vec<Trip>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .trips
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn count_trips_for_user(&self, user_id: i64) -> Result<u64, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.trips.values().filter(|t| t.user_id == user_id).count() as u64)
    }

    async fn update_trip_status(&self, id: i64, status: TripStatus) -> Result<(), StoreError> {
        if let Some(trip) = self.tables.write().await.trips.get_mut(&id) {
            trip.status = status;
        }
        Ok(())
    }

    async fn insert_itinerary_items(&self, items: &[ItineraryItem]) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        for item in items {
            tables.itineraries.insert(item.id, item.clone());
        }
        Ok(())
    }

    async fn list_itinerary_items(&self, trip_id: i64) -> Result<Vec<ItineraryItem>, StoreError> {
        let tables = self.tables.read().await;
        let mut items: Vec<ItineraryItem> = tables
            .itineraries
            .values()
            .filter(|i| i.trip_id == trip_id)
            .cloned()
            .collect();
        items.sort_by_key(|i| (i.day, i.id));
        Ok(items)
    }

    async fn mark_itinerary_optimized(&self, trip_id: i64) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let mut changed = 0;
        for item in tables
            .itineraries
            .values_mut()
            .filter(|i| i.trip_id == trip_id && !i.activity.contains(OPTIMIZED_MARKER))
        {
            item.activity = optimized_activity(&item.activity);
            changed += 1;
        }
        Ok(changed)
    }

    async fn insert_booking(&self, booking: &Booking) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables.bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn find_booking(&self, id: i64) -> Result<Option<Booking>, StoreError> {
        Ok(self.tables.read().await.bookings.get(&id).cloned())
    }

    async fn insert_payment(&self, payment: &Payment) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables.payments.insert(payment.id, payment.clone());
        Ok(())
    }

    async fn find_payment(&self, id: i64) -> Result<Option<Payment>, StoreError> {
        Ok(self.tables.read().await.payments.get(&id).cloned())
    }

    async fn update_payment_refund(&self, id: i64, refund_id: &str) -> Result<bool, StoreError> {
        match self.tables.write().await.payments.get_mut(&id) {
            Some(payment) if payment.status == PaymentStatus::Completed => {
                payment.status = PaymentStatus::Refunded;
                payment.refund_id = Some(refund_id.to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
