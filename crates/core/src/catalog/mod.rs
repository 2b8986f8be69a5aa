mod error;
mod types;
mod validation;

pub use error::CatalogError;
pub use types::{
    BikeTour, CatalogRecord, Destination, Difficulty, Experience, TripPlan, Vehicle,
    VehicleCategory,
};
pub use validation::{
    validate_bike_tour, validate_destination, validate_experience, validate_trip_plan,
    validate_vehicle,
};
