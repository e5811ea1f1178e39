#![allow(dead_code)]

use std::{fs::File, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use tempfile::TempDir;
use trips::db::{init_pool, run_migrations, DbPool};
use trips::models::{CreateTripRequest, Trip};
use trips::service::{TripError, TripService};
use uuid::Uuid;

/// A migrated SQLite database living in a temp dir for one test.
pub struct TestDb {
    pub pool: DbPool,
    _root: TempDir,
}

impl TestDb {
    pub async fn new() -> anyhow::Result<Self> {
        let root = TempDir::new().context("create temp dir for test db")?;
        let db_path = root.path().join("trips.sqlite");
        File::create(&db_path)?;
        let database_url = format!("sqlite://{}", db_path.to_string_lossy());

        let pool = init_pool(&database_url, 5).await?;
        run_migrations(&pool).await?;
        Ok(Self { pool, _root: root })
    }
}

/// A service whose reads stall, standing in for a hung store.
pub struct SlowTripService {
    pub delay: Duration,
}

#[async_trait]
impl TripService for SlowTripService {
    async fn create_trip(
        &self,
        request: CreateTripRequest,
        _correlation_id: &str,
    ) -> Result<Trip, TripError> {
        Ok(Trip::new(request.passenger_id.unwrap_or_default(), request.pickup, request.dropoff))
    }

    async fn get_trip(&self, id: Uuid) -> Result<Trip, TripError> {
        tokio::time::sleep(self.delay).await;
        Err(TripError::TripNotFound(id))
    }

    async fn check_health(&self) -> Result<(), TripError> {
        Ok(())
    }
}
