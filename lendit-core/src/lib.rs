pub mod model;
pub mod clock;
pub mod validate;
pub mod availability;
pub mod filter;
pub mod repository;
pub mod service;
pub mod memory;

use crate::model::{BookingId, ItemId, UserId};

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("User with id = {0} not found")]
    UserNotFound(UserId),
    #[error("Item with id = {0} not found")]
    ItemNotFound(ItemId),
    #[error("Booking with id = {0} not found")]
    BookingNotFound(BookingId),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Item with id = {0} is not available for booking")]
    Unavailable(ItemId),
    #[error("Owner of the item with id = {0} cannot book it")]
    SelfBooking(ItemId),
    #[error("Only the item owner can confirm a booking")]
    NotOwner,
    #[error("Booking status can no longer be changed")]
    NotWaiting,
    #[error("Unknown state: {0}")]
    UnknownState(String),
    #[error("No bookings found")]
    NoBookingsFound,
    #[error("Only the booker or the item owner can view a booking")]
    NotAuthorized,
    #[error("Storage backend failed: {0}")]
    Storage(#[source] repository::RepoError),
}

pub type BookingResult<T> = Result<T, BookingError>;
