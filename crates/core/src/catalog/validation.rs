use super::error::CatalogError;
use super::types::{BikeTour, Destination, Experience, TripPlan, Vehicle};

const MAX_NAME_LEN: usize = 120;
const MAX_TITLE_LEN: usize = 200;
// Highest motorable passes sit around 5,900m; anything past 6,000m is a typo.
const MAX_ALTITUDE_M: u32 = 6000;

/// Validates a vehicle before creation or update.
pub fn validate_vehicle(vehicle: &Vehicle) -> Result<(), CatalogError> {
    validate_name(&vehicle.name)?;
    if vehicle.seats == 0 {
        return Err(CatalogError::InvalidSeats);
    }
    if vehicle.price_per_day == 0 {
        return Err(CatalogError::InvalidPrice);
    }
    Ok(())
}

/// Validates a bike tour before creation or update.
pub fn validate_bike_tour(tour: &BikeTour) -> Result<(), CatalogError> {
    validate_title(&tour.title)?;
    if tour.duration_days == 0 {
        return Err(CatalogError::InvalidDuration);
    }
    if tour.price == 0 {
        return Err(CatalogError::InvalidPrice);
    }
    Ok(())
}

/// Validates a destination before creation or update.
pub fn validate_destination(destination: &Destination) -> Result<(), CatalogError> {
    validate_name(&destination.name)?;
    if destination.region.trim().is_empty() {
        return Err(CatalogError::EmptyName);
    }
    if destination.altitude_m > MAX_ALTITUDE_M {
        return Err(CatalogError::ImplausibleAltitude(destination.altitude_m));
    }
    Ok(())
}

/// Validates an experience before creation or update.
pub fn validate_experience(experience: &Experience) -> Result<(), CatalogError> {
    validate_title(&experience.title)?;
    if experience.duration_hours == 0 {
        return Err(CatalogError::InvalidDuration);
    }
    if experience.price == 0 {
        return Err(CatalogError::InvalidPrice);
    }
    Ok(())
}

/// Validates a trip plan before creation or update.
pub fn validate_trip_plan(plan: &TripPlan) -> Result<(), CatalogError> {
    validate_title(&plan.title)?;
    if plan.duration_days == 0 {
        return Err(CatalogError::InvalidDuration);
    }
    if plan.price_estimate == 0 {
        return Err(CatalogError::InvalidPrice);
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), CatalogError> {
    if name.trim().is_empty() {
        return Err(CatalogError::EmptyName);
    }
    if name.len() > MAX_NAME_LEN {
        return Err(CatalogError::NameTooLong);
    }
    Ok(())
}

fn validate_title(title: &str) -> Result<(), CatalogError> {
    if title.trim().is_empty() {
        return Err(CatalogError::EmptyTitle);
    }
    if title.len() > MAX_TITLE_LEN {
        return Err(CatalogError::TitleTooLong);
    }
    Ok(())
}
