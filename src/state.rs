use std::sync::Arc;

use crate::{
    config::{AppConfig, ServiceMode},
    db::DbPool,
    repository::SqliteTripRepository,
    service::{FixedTripService, StoreTripService, TripService},
};

#[derive(Clone)]
pub struct AppState {
    pub trips: Arc<dyn TripService>,
}

impl AppState {
    pub fn new(trips: Arc<dyn TripService>) -> Self {
        Self { trips }
    }

    /// Wires pool → repository → service for the configured mode.
    pub fn from_config(config: &AppConfig, db: DbPool) -> Self {
        let trips: Arc<dyn TripService> = match config.service_mode {
            ServiceMode::Store => {
                let repo = Arc::new(SqliteTripRepository::new(db));
                Arc::new(StoreTripService::new(repo))
            }
            ServiceMode::Fixed => Arc::new(FixedTripService),
        };
        Self::new(trips)
    }
}
