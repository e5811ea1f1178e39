use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{
    events::TripCreatedEvent,
    models::{CreateTripRequest, Trip, TripStatus},
    repository::{RepoError, TripRepository},
};

#[derive(Debug, Error)]
pub enum TripError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("trip {0} not found")]
    TripNotFound(Uuid),
    #[error("trip store failure")]
    Store(#[source] RepoError),
}

/// Trip operations reachable from HTTP.
#[async_trait]
pub trait TripService: Send + Sync {
    /// `correlation_id` ties the trip's events to the request that created it.
    async fn create_trip(
        &self,
        request: CreateTripRequest,
        correlation_id: &str,
    ) -> Result<Trip, TripError>;
    async fn get_trip(&self, id: Uuid) -> Result<Trip, TripError>;
    async fn check_health(&self) -> Result<(), TripError>;
}

/// Checks the creation rules and returns the passenger id on success.
pub fn validate(request: &CreateTripRequest) -> Result<Uuid, TripError> {
    if request.pickup.trim().is_empty() {
        return Err(TripError::InvalidInput("pickup is required".into()));
    }
    if request.dropoff.trim().is_empty() {
        return Err(TripError::InvalidInput("dropoff is required".into()));
    }
    match request.passenger_id {
        Some(id) if !id.is_nil() => Ok(id),
        _ => Err(TripError::InvalidInput("passenger_id is required".into())),
    }
}

/// The real service, backed by a [`TripRepository`].
pub struct StoreTripService<R: TripRepository> {
    repo: Arc<R>,
}

impl<R: TripRepository> StoreTripService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R: TripRepository> TripService for StoreTripService<R> {
    #[instrument(skip(self, request), fields(passenger_id = ?request.passenger_id))]
    async fn create_trip(
        &self,
        request: CreateTripRequest,
        correlation_id: &str,
    ) -> Result<Trip, TripError> {
        let passenger_id = validate(&request)?;
        let trip = Trip::new(passenger_id, request.pickup, request.dropoff);

        self.repo.create(&trip).await.map_err(TripError::Store)?;

        info!(trip_id = %trip.id, passenger_id = %trip.passenger_id, "trip_created");
        let event = TripCreatedEvent::from_trip(&trip, correlation_id);
        debug!(
            event_id = %event.base.event_id,
            event_type = %event.base.event_type,
            correlation_id = %event.base.correlation_id,
            "trip event not published"
        );
        Ok(trip)
    }

    #[instrument(skip(self))]
    async fn get_trip(&self, id: Uuid) -> Result<Trip, TripError> {
        match self.repo.get_by_id(id).await {
            Ok(trip) => Ok(trip),
            Err(RepoError::NotFound(id)) => Err(TripError::TripNotFound(id)),
            Err(err) => Err(TripError::Store(err)),
        }
    }

    async fn check_health(&self) -> Result<(), TripError> {
        self.repo.ping().await.map_err(TripError::Store)
    }
}

/// Canned responses with no storage behind them, for wiring and demo runs.
#[derive(Debug, Clone, Default)]
pub struct FixedTripService;

pub const FIXED_PICKUP: &str = "Zahlushka Street 1";

#[async_trait]
impl TripService for FixedTripService {
    async fn create_trip(
        &self,
        request: CreateTripRequest,
        _correlation_id: &str,
    ) -> Result<Trip, TripError> {
        let now = Utc::now();
        Ok(Trip {
            id: Uuid::new_v4(),
            passenger_id: request.passenger_id.unwrap_or_default(),
            driver_id: None,
            pickup: request.pickup,
            dropoff: request.dropoff,
            status: TripStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_trip(&self, id: Uuid) -> Result<Trip, TripError> {
        let now = Utc::now();
        Ok(Trip {
            id,
            passenger_id: Uuid::nil(),
            driver_id: None,
            pickup: FIXED_PICKUP.to_string(),
            dropoff: String::new(),
            status: TripStatus::Completed,
            created_at: now,
            updated_at: now,
        })
    }

    async fn check_health(&self) -> Result<(), TripError> {
        Ok(())
    }
}
