use thiserror::Error;

/// Errors raised when a catalog record fails validation before a write.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Name must not be empty")]
    EmptyName,
    #[error("Name must be 120 characters or fewer")]
    NameTooLong,
    #[error("Title must not be empty")]
    EmptyTitle,
    #[error("Title must be 200 characters or fewer")]
    TitleTooLong,
    #[error("Seat count must be at least 1")]
    InvalidSeats,
    #[error("Price must be greater than zero")]
    InvalidPrice,
    #[error("Duration must be at least 1")]
    InvalidDuration,
    #[error("Altitude {0}m is outside the supported range")]
    ImplausibleAltitude(u32),
}
