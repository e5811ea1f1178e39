//! Event shapes other services expect from the trip service.
//!
//! Nothing here is published yet: the service builds a [`TripCreatedEvent`]
//! after a successful insert and logs it, and no code path assigns drivers.
//! A bus client would be injected into the service next to the repository.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Trip;

pub const TRIP_CREATED: &str = "trip.event.created";
pub const DRIVER_ASSIGNED: &str = "trip.event.driver_assigned";
pub const EVENT_VERSION: &str = "1.0";

/// Metadata shared by every event, flattened into the top level on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseEvent {
    pub event_id: Uuid,
    pub event_type: String,
    pub event_version: String,
    pub correlation_id: String,
    pub timestamp: DateTime<Utc>,
}

impl BaseEvent {
    pub fn new(event_type: &str, correlation_id: impl Into<String>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type: event_type.to_string(),
            event_version: EVENT_VERSION.to_string(),
            correlation_id: correlation_id.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripCreatedPayload {
    pub trip_id: Uuid,
    pub passenger_id: Uuid,
    pub pickup: String,
    pub dropoff: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripCreatedEvent {
    #[serde(flatten)]
    pub base: BaseEvent,
    pub payload: TripCreatedPayload,
}

impl TripCreatedEvent {
    pub fn from_trip(trip: &Trip, correlation_id: impl Into<String>) -> Self {
        Self {
            base: BaseEvent::new(TRIP_CREATED, correlation_id),
            payload: TripCreatedPayload {
                trip_id: trip.id,
                passenger_id: trip.passenger_id,
                pickup: trip.pickup.clone(),
                dropoff: trip.dropoff.clone(),
                created_at: trip.created_at,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverAssignedPayload {
    pub trip_id: Uuid,
    pub driver_id: Uuid,
    pub assigned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverAssignedEvent {
    #[serde(flatten)]
    pub base: BaseEvent,
    pub payload: DriverAssignedPayload,
}

impl DriverAssignedEvent {
    pub fn new(trip_id: Uuid, driver_id: Uuid, correlation_id: impl Into<String>) -> Self {
        Self {
            base: BaseEvent::new(DRIVER_ASSIGNED, correlation_id),
            payload: DriverAssignedPayload {
                trip_id,
                driver_id,
                assigned_at: Utc::now(),
            },
        }
    }
}
