use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::BookingError;

pub type UserId = i64;
pub type ItemId = i64;
pub type BookingId = i64;

/// Booking status in the approval lifecycle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
    Canceled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Waiting => "WAITING",
            BookingStatus::Approved => "APPROVED",
            BookingStatus::Rejected => "REJECTED",
            BookingStatus::Canceled => "CANCELED",
        }
    }

    /// Parse the stored representation. Unknown strings are a data error
    /// handled by the caller, not a business failure.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "WAITING" => Some(BookingStatus::Waiting),
            "APPROVED" => Some(BookingStatus::Approved),
            "REJECTED" => Some(BookingStatus::Rejected),
            "CANCELED" => Some(BookingStatus::Canceled),
            _ => None,
        }
    }
}

/// A member of the platform, consumed read-only from the user directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// A listed item, consumed read-only from the item directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: UserId,
}

/// A request by a booker to use an item for a time interval, subject to
/// approval by the item owner. Both references are always resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Booking {
    pub id: BookingId,
    pub item: Item,
    pub booker: User,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
}

impl Booking {
    /// Decide the WAITING -> APPROVED/REJECTED transition.
    ///
    /// Only the item owner may confirm, and only while the booking is still
    /// WAITING. Returns the target status; writing it back is the caller's
    /// job and must go through the store's conditional update so that two
    /// concurrent confirmations cannot both succeed.
    pub fn confirm(&self, actor: UserId, approve: bool) -> Result<BookingStatus, BookingError> {
        if self.item.owner_id != actor {
            return Err(BookingError::NotOwner);
        }
        if self.status != BookingStatus::Waiting {
            return Err(BookingError::NotWaiting);
        }
        Ok(if approve {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        })
    }
}

/// Creation payload handed to the booking store; the store assigns the id
/// and the status is always WAITING at creation.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub item_id: ItemId,
    pub booker_id: UserId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// The most recently finished and the next upcoming approved booking of an
/// item, as shown to its owner.
#[derive(Debug, Clone, Default)]
pub struct BookingTimeline {
    pub last: Option<Booking>,
    pub next: Option<Booking>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn booking(status: BookingStatus) -> Booking {
        let now = Utc::now();
        Booking {
            id: 1,
            item: Item {
                id: 10,
                name: "drill".to_string(),
                description: "cordless drill".to_string(),
                available: true,
                owner_id: 2,
            },
            booker: User {
                id: 1,
                name: "booker".to_string(),
                email: "booker@mail.test".to_string(),
            },
            start: now + Duration::days(1),
            end: now + Duration::days(3),
            status,
        }
    }

    #[test]
    fn owner_approves_waiting_booking() {
        let b = booking(BookingStatus::Waiting);
        assert_eq!(b.confirm(2, true).unwrap(), BookingStatus::Approved);
    }

    #[test]
    fn owner_rejects_waiting_booking() {
        let b = booking(BookingStatus::Waiting);
        assert_eq!(b.confirm(2, false).unwrap(), BookingStatus::Rejected);
    }

    #[test]
    fn non_owner_cannot_confirm() {
        let b = booking(BookingStatus::Waiting);
        assert!(matches!(b.confirm(1, true), Err(BookingError::NotOwner)));
        assert!(matches!(b.confirm(99, false), Err(BookingError::NotOwner)));
    }

    #[test]
    fn terminal_statuses_cannot_transition() {
        for status in [
            BookingStatus::Approved,
            BookingStatus::Rejected,
            BookingStatus::Canceled,
        ] {
            let b = booking(status);
            assert!(matches!(b.confirm(2, true), Err(BookingError::NotWaiting)));
        }
    }

    #[test]
    fn status_round_trips_through_storage_form() {
        for status in [
            BookingStatus::Waiting,
            BookingStatus::Approved,
            BookingStatus::Rejected,
            BookingStatus::Canceled,
        ] {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::parse("BOGUS"), None);
    }
}
