use async_trait::async_trait;
use futures::TryStreamExt;
use log::{info, warn};
use mongodb::{
    bson::{doc, Document, Regex},
    options::{ClientOptions, IndexOptions, ReturnDocument, ServerApi, ServerApiVersion},
    Client, Collection, Database, IndexModel,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::db::{Sequence, TripStore, OPTIMIZED_MARKER};
use crate::error::StoreError;
use crate::models::bookings::{Booking, Payment, PaymentStatus};
use crate::models::trip::{ItineraryItem, Trip, TripStatus};
use crate::models::user::User;

const USERS: &str = "users";
const TRIPS: &str = "trips";
const ITINERARIES: &str = "itineraries";
const BOOKINGS: &str = "bookings";
const PAYMENTS: &str = "payments";
const COUNTERS: &str = "counters";

#[derive(Debug, Serialize, Deserialize)]
struct Counter {
    #[serde(rename = "_id")]
    id: String,
    seq: i64,
}

#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

pub async fn create_mongo_client(uri: &str) -> Result<Client, StoreError> {
    info!("Connecting to MongoDB");

    let mut client_options = ClientOptions::parse(uri).await?;

    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client = Client::with_options(client_options)?;

    match client
        .database("admin")
        .run_command(doc! {"ping": 1})
        .await
    {
        Ok(_) => info!("Connected to MongoDB and verified with ping"),
        Err(e) => warn!(
            "Connected to MongoDB but ping failed, some functionality may be impaired: {}",
            e
        ),
    }

    Ok(client)
}

impl MongoStore {
    pub async fn connect(uri: &str, database_name: &str) -> Result<Self, StoreError> {
        let client = create_mongo_client(uri).await?;
        let store = Self {
            db: client.database(database_name),
        };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let unique = IndexOptions::builder().unique(true).build();

        self.db
            .collection::<Document>(USERS)
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "email": 1 })
                    .options(unique.clone())
                    .build(),
            )
            .await?;

        for name in [USERS, TRIPS, ITINERARIES, BOOKINGS, PAYMENTS] {
            self.db
                .collection::<Document>(name)
                .create_index(
                    IndexModel::builder()
                        .keys(doc! { "id": 1 })
                        .options(unique.clone())
                        .build(),
                )
                .await?;
        }

        self.db
            .collection::<Document>(TRIPS)
            .create_index(IndexModel::builder().keys(doc! { "user_id": 1 }).build())
            .await?;
        self.db
            .collection::<Document>(ITINERARIES)
            .create_index(IndexModel::builder().keys(doc! { "trip_id": 1 }).build())
            .await?;

        Ok(())
    }

    fn users(&self) -> Collection<User> {
        self.db.collection(USERS)
    }

    fn trips(&self) -> Collection<Trip> {
        self.db.collection(TRIPS)
    }

    fn itineraries(&self) -> Collection<ItineraryItem> {
        self.db.collection(ITINERARIES)
    }

    fn bookings(&self) -> Collection<Booking> {
        self.db.collection(BOOKINGS)
    }

    fn payments(&self) -> Collection<Payment> {
        self.db.collection(PAYMENTS)
    }
}

#[async_trait]
impl TripStore for MongoStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! {"ping": 1}).await?;
        Ok(())
    }

    async fn next_id(&self, sequence: Sequence) -> Result<i64, StoreError> {
        let counter = self
            .db
            .collection::<Counter>(COUNTERS)
            .find_one_and_update(
                doc! { "_id": sequence.name() },
                doc! { "$inc": { "seq": 1_i64 } },
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| StoreError::Backend(format!("counter {} missing", sequence.name())))?;
        Ok(counter.seq)
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        self.users().insert_one(user).await?;
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users().find_one(doc! { "email": email }).await?)
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.users().find_one(doc! { "id": id }).await?)
    }

    async fn insert_trip(&self, trip: &Trip) -> Result<(), StoreError> {
        self.trips().insert_one(trip).await?;
        Ok(())
    }

    async fn find_trip(&self, id: i64) -> Result<Option<Trip>, StoreError> {
        Ok(self.trips().find_one(doc! { "id": id }).await?)
    }

    async fn list_trips_for_user(&self, user_id: i64) -> Result<Vec<Trip>, StoreError> {
        let cursor = self
            .trips()
            .find(doc! { "user_id": user_id })
            .sort(doc! { "id": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn count_trips_for_user(&self, user_id: i64) -> Result<u64, StoreError> {
        Ok(self
            .trips()
            .count_documents(doc! { "user_id": user_id })
            .await?)
    }

    async fn update_trip_status(&self, id: i64, status: TripStatus) -> Result<(), StoreError> {
        let status = bson::to_bson(&status)?;
        self.trips()
            .update_one(doc! { "id": id }, doc! { "$set": { "status": status } })
            .await?;
        Ok(())
    }

    async fn insert_itinerary_items(&self, items: &[ItineraryItem]) -> Result<(), StoreError> {
        if items.is_empty() {
            return Ok(());
        }
        self.itineraries().insert_many(items).await?;
        Ok(())
    }

    async fn list_itinerary_items(&self, trip_id: i64) -> Result<Vec<ItineraryItem>, StoreError> {
        let cursor = self
            .itineraries()
            .find(doc! { "trip_id": trip_id })
            .sort(doc! { "day": 1, "id": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn mark_itinerary_optimized(&self, trip_id: i64) -> Result<u64, StoreError> {
        let marker = Regex {
            pattern: OPTIMIZED_MARKER.to_string(),
            options: String::new(),
        };
        let filter = doc! { "trip_id": trip_id, "activity": { "$not": marker } };
        let suffix = format!(" ({})", OPTIMIZED_MARKER);
        let pipeline = vec![doc! {
            "$set": { "activity": { "$concat": ["$activity", suffix] } }
        }];

        let result = self.itineraries().update_many(filter, pipeline).await?;
        Ok(result.modified_count)
    }

    async fn insert_booking(&self, booking: &Booking) -> Result<(), StoreError> {
        self.bookings().insert_one(booking).await?;
        Ok(())
    }

    async fn find_booking(&self, id: i64) -> Result<Option<Booking>, StoreError> {
        Ok(self.bookings().find_one(doc! { "id": id }).await?)
    }

    async fn insert_payment(&self, payment: &Payment) -> Result<(), StoreError> {
        self.payments().insert_one(payment).await?;
        Ok(())
    }

    async fn find_payment(&self, id: i64) -> Result<Option<Payment>, StoreError> {
        Ok(self.payments().find_one(doc! { "id": id }).await?)
    }

    async fn update_payment_refund(&self, id: i64, refund_id: &str) -> Result<bool, StoreError> {
        let result = self
            .payments()
            .update_one(
                doc! { "id": id, "status": PaymentStatus::Completed.as_str() },
                doc! { "$set": {
                    "status": PaymentStatus::Refunded.as_str(),
                    "refund_id": refund_id,
                } },
            )
            .await?;
        Ok(result.modified_count > 0)
    }
}
