use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::{db::DbPool, models::Trip};

const TRIP_COLUMNS: &str =
    "id, passenger_id, driver_id, pickup, dropoff, status, created_at, updated_at";

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("trip {0} not found")]
    NotFound(Uuid),
    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

/// Persistence for [`Trip`] rows. No business rules live here.
#[async_trait]
pub trait TripRepository: Send + Sync {
    async fn create(&self, trip: &Trip) -> Result<(), RepoError>;
    async fn get_by_id(&self, id: Uuid) -> Result<Trip, RepoError>;
    /// Full-row replace keyed by `trip.id`. A missing row is inserted.
    async fn update(&self, trip: &Trip) -> Result<Trip, RepoError>;
    /// Removes the row if present; deleting an unknown id is not an error.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
    async fn ping(&self) -> Result<(), RepoError>;
}

#[derive(Clone)]
pub struct SqliteTripRepository {
    pool: DbPool,
}

impl SqliteTripRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TripRepository for SqliteTripRepository {
    async fn create(&self, trip: &Trip) -> Result<(), RepoError> {
        sqlx::query(&format!(
            "INSERT INTO trips ({TRIP_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(trip.id)
        .bind(trip.passenger_id)
        .bind(trip.driver_id)
        .bind(&trip.pickup)
        .bind(&trip.dropoff)
        .bind(trip.status)
        .bind(trip.created_at)
        .bind(trip.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Trip, RepoError> {
        sqlx::query_as::<_, Trip>(&format!("SELECT {TRIP_COLUMNS} FROM trips WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepoError::NotFound(id))
    }

    async fn update(&self, trip: &Trip) -> Result<Trip, RepoError> {
        let mut stored = trip.clone();
        stored.updated_at = Utc::now();
        sqlx::query(&format!(
            "INSERT INTO trips ({TRIP_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                passenger_id = excluded.passenger_id,
                driver_id = excluded.driver_id,
                pickup = excluded.pickup,
                dropoff = excluded.dropoff,
                status = excluded.status,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at"
        ))
        .bind(stored.id)
        .bind(stored.passenger_id)
        .bind(stored.driver_id)
        .bind(&stored.pickup)
        .bind(&stored.dropoff)
        .bind(stored.status)
        .bind(stored.created_at)
        .bind(stored.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(stored)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM trips WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepoError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// In-memory repository for service tests.
pub mod mock {
    use std::collections::HashMap;
    use std::sync::{Mutex, PoisonError};

    use super::*;

    #[derive(Default)]
    pub struct MemoryTripRepository {
        trips: Mutex<HashMap<Uuid, Trip>>,
        offline: bool,
    }

    impl MemoryTripRepository {
        /// A repository whose every call fails like a lost connection.
        pub fn offline() -> Self {
            Self {
                offline: true,
                ..Self::default()
            }
        }

        pub fn len(&self) -> usize {
            self.trips
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        fn check_online(&self) -> Result<(), RepoError> {
            if self.offline {
                return Err(RepoError::Store(sqlx::Error::PoolClosed));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl TripRepository for MemoryTripRepository {
        async fn create(&self, trip: &Trip) -> Result<(), RepoError> {
            self.check_online()?;
            let mut trips = self.trips.lock().unwrap_or_else(PoisonError::into_inner);
            if trips.contains_key(&trip.id) {
                return Err(RepoError::Store(sqlx::Error::Protocol(format!(
                    "duplicate trip id {}",
                    trip.id
                ))));
            }
            trips.insert(trip.id, trip.clone());
            Ok(())
        }

        async fn get_by_id(&self, id: Uuid) -> Result<Trip, RepoError> {
            self.check_online()?;
            let trips = self.trips.lock().unwrap_or_else(PoisonError::into_inner);
            trips.get(&id).cloned().ok_or(RepoError::NotFound(id))
        }

        async fn update(&self, trip: &Trip) -> Result<Trip, RepoError> {
            self.check_online()?;
            let mut stored = trip.clone();
            stored.updated_at = Utc::now();
            let mut trips = self.trips.lock().unwrap_or_else(PoisonError::into_inner);
            trips.insert(stored.id, stored.clone());
            Ok(stored)
        }

        async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
            self.check_online()?;
            let mut trips = self.trips.lock().unwrap_or_else(PoisonError::into_inner);
            trips.remove(&id);
            Ok(())
        }

        async fn ping(&self) -> Result<(), RepoError> {
            self.check_online()
        }
    }
}
