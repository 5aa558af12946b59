use crate::model::{Item, UserId};
use crate::{BookingError, BookingResult};

/// Decide whether `requester` may book `item` at all: owners cannot book
/// their own items, and the item's availability flag must be set.
///
/// No overlap check against existing bookings happens here; two approved
/// bookings may cover the same interval.
pub fn check_bookable(item: &Item, requester: UserId) -> BookingResult<()> {
    if item.owner_id == requester {
        return Err(BookingError::SelfBooking(item.id));
    }
    if !item.available {
        return Err(BookingError::Unavailable(item.id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(available: bool) -> Item {
        Item {
            id: 7,
            name: "ladder".to_string(),
            description: "3m ladder".to_string(),
            available,
            owner_id: 42,
        }
    }

    #[test]
    fn bookable_by_another_user() {
        assert!(check_bookable(&item(true), 1).is_ok());
    }

    #[test]
    fn owner_cannot_book_own_item() {
        assert!(matches!(
            check_bookable(&item(true), 42),
            Err(BookingError::SelfBooking(7))
        ));
    }

    #[test]
    fn self_booking_wins_over_unavailability() {
        assert!(matches!(
            check_bookable(&item(false), 42),
            Err(BookingError::SelfBooking(7))
        ));
    }

    #[test]
    fn unavailable_item_is_rejected() {
        assert!(matches!(
            check_bookable(&item(false), 1),
            Err(BookingError::Unavailable(7))
        ));
    }
}
