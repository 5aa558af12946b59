use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::model::{Booking, BookingId, BookingStatus, Item, ItemId, NewBooking, User, UserId};
use crate::{BookingError, BookingResult};

/// Adapter-level failure; the service wraps it into `BookingError::Storage`.
pub type RepoError = Box<dyn std::error::Error + Send + Sync>;

/// Page window over a booking listing, derived from an offset/limit pair.
///
/// The page index is `from / size` with integer division. A `from` that is
/// not a multiple of `size` snaps down to the page boundary, so the window
/// starts at `page * size`, not at `from`. Existing clients page against
/// that rounding, so it stays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    from: i64,
    size: i64,
}

impl PageRequest {
    pub fn new(from: i64, size: i64) -> BookingResult<Self> {
        if from < 0 {
            return Err(BookingError::Validation(
                "page offset must not be negative".to_string(),
            ));
        }
        if size <= 0 {
            return Err(BookingError::Validation(
                "page size must be positive".to_string(),
            ));
        }
        Ok(Self { from, size })
    }

    pub fn page(&self) -> i64 {
        self.from / self.size
    }

    pub fn offset(&self) -> i64 {
        self.page() * self.size
    }

    pub fn limit(&self) -> i64 {
        self.size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { from: 0, size: 10 }
    }
}

/// Read-only access to the user records owned elsewhere in the platform.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepoError>;
}

/// Read-only access to the item records owned elsewhere in the platform.
#[async_trait]
pub trait ItemDirectory: Send + Sync {
    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, RepoError>;
}

/// Persistence for bookings. Implementations return hydrated bookings with
/// the item and booker already resolved, and order every listing descending
/// by start timestamp.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Insert a new WAITING booking and return it with its assigned id.
    async fn save(&self, booking: NewBooking) -> Result<Booking, RepoError>;

    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>, RepoError>;

    async fn find_all_by_booker(
        &self,
        booker_id: UserId,
        page: &PageRequest,
    ) -> Result<Vec<Booking>, RepoError>;

    /// Bookings of every item belonging to `owner_id`, joined in a single
    /// query so the listing cannot see a torn item/booking state.
    async fn find_all_by_owner(
        &self,
        owner_id: UserId,
        page: &PageRequest,
    ) -> Result<Vec<Booking>, RepoError>;

    /// Atomically move a booking out of WAITING. Returns the updated booking,
    /// or `None` when the row was no longer WAITING: the losing side of a
    /// concurrent confirmation race observes `None`, never a double write.
    async fn update_status(
        &self,
        id: BookingId,
        status: BookingStatus,
    ) -> Result<Option<Booking>, RepoError>;

    /// The most recently finished APPROVED booking of an item (greatest end
    /// before `now`), scoped to the item owner.
    async fn find_last_booking(
        &self,
        item_id: ItemId,
        owner_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>, RepoError>;

    /// The next upcoming APPROVED booking of an item (smallest start after
    /// `now`), scoped to the item owner.
    async fn find_next_booking(
        &self,
        item_id: ItemId,
        owner_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>, RepoError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_offset_and_non_positive_size() {
        assert!(matches!(
            PageRequest::new(-1, 10),
            Err(BookingError::Validation(_))
        ));
        assert!(matches!(
            PageRequest::new(0, 0),
            Err(BookingError::Validation(_))
        ));
        assert!(matches!(
            PageRequest::new(0, -5),
            Err(BookingError::Validation(_))
        ));
    }

    #[test]
    fn page_index_is_truncated_division() {
        let page = PageRequest::new(0, 10).unwrap();
        assert_eq!(page.page(), 0);
        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), 10);

        let page = PageRequest::new(15, 10).unwrap();
        assert_eq!(page.page(), 1);
        assert_eq!(page.offset(), 10);

        let page = PageRequest::new(20, 10).unwrap();
        assert_eq!(page.page(), 2);
        assert_eq!(page.offset(), 20);
    }

    #[test]
    fn offset_snaps_to_page_start() {
        // from=5 truncates to page 0: the window starts at 0, not at 5.
        let page = PageRequest::new(5, 10).unwrap();
        assert_eq!(page.page(), 0);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn defaults_match_the_http_surface() {
        let page = PageRequest::default();
        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), 10);
    }
}
