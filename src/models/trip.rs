use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripStatus {
    #[default]
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl TripStatus {
    pub const ALL: [TripStatus; 5] = [
        TripStatus::Pending,
        TripStatus::Confirmed,
        TripStatus::InProgress,
        TripStatus::Completed,
        TripStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Pending => "PENDING",
            TripStatus::Confirmed => "CONFIRMED",
            TripStatus::InProgress => "IN_PROGRESS",
            TripStatus::Completed => "COMPLETED",
            TripStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown trip status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for TripStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TripStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: Uuid,
    pub passenger_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<Uuid>,
    pub pickup: String,
    pub dropoff: String,
    pub status: TripStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Trip {
    /// Builds a fresh `PENDING` trip with a server-assigned id.
    pub fn new(passenger_id: Uuid, pickup: impl Into<String>, dropoff: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            passenger_id,
            driver_id: None,
            pickup: pickup.into(),
            dropoff: dropoff.into(),
            status: TripStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Body of `POST /trips`. Anything else the client sends is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTripRequest {
    #[serde(default)]
    pub passenger_id: Option<Uuid>,
    #[serde(default)]
    pub pickup: String,
    #[serde(default)]
    pub dropoff: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_upper_snake_case_on_the_wire() {
        let json = serde_json::to_string(&TripStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
        for status in TripStatus::ALL {
            assert_eq!(status.as_str().parse::<TripStatus>().unwrap(), status);
        }
        assert!("MOCKED_PENDING".parse::<TripStatus>().is_err());
    }

    #[test]
    fn absent_driver_is_omitted() {
        let trip = Trip::new(Uuid::new_v4(), "A", "B");
        let value = serde_json::to_value(&trip).unwrap();
        assert!(value.get("driver_id").is_none());
        assert_eq!(value["status"], "PENDING");
    }

    #[test]
    fn create_request_ignores_server_owned_fields() {
        let raw = r#"{"id":"not-used","status":"COMPLETED","pickup":"A","dropoff":"B"}"#;
        let req: CreateTripRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(req.pickup, "A");
        assert_eq!(req.dropoff, "B");
        assert!(req.passenger_id.is_none());
    }
}
