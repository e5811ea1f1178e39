pub mod trip;

pub use trip::{CreateTripRequest, Trip, TripStatus};
