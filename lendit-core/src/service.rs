use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::availability::check_bookable;
use crate::clock::Clock;
use crate::filter::{filter_by_state, BookingState};
use crate::model::{Booking, BookingId, BookingTimeline, ItemId, NewBooking, UserId};
use crate::repository::{BookingStore, ItemDirectory, PageRequest, UserDirectory};
use crate::validate::validate_interval;
use crate::{BookingError, BookingResult};

/// Orchestrates the booking lifecycle: creation, approval, retrieval and the
/// state-filtered listings. All time reads go through the injected clock and
/// all persistence goes through the repository traits.
pub struct BookingService {
    users: Arc<dyn UserDirectory>,
    items: Arc<dyn ItemDirectory>,
    bookings: Arc<dyn BookingStore>,
    clock: Arc<dyn Clock>,
}

impl BookingService {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        items: Arc<dyn ItemDirectory>,
        bookings: Arc<dyn BookingStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            items,
            bookings,
            clock,
        }
    }

    /// Fetch one booking; only its booker or the item owner may see it.
    pub async fn get_by_id(
        &self,
        booking_id: BookingId,
        requester: UserId,
    ) -> BookingResult<Booking> {
        debug!("Fetching booking {} for user {}", booking_id, requester);
        let booking = self.find_booking(booking_id).await?;
        if booking.booker.id != requester && booking.item.owner_id != requester {
            return Err(BookingError::NotAuthorized);
        }
        Ok(booking)
    }

    /// Create a WAITING booking after resolving both references, validating
    /// the interval against the clock and checking availability.
    pub async fn create(
        &self,
        booker_id: UserId,
        item_id: ItemId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BookingResult<Booking> {
        let booker = self
            .users
            .find_by_id(booker_id)
            .await
            .map_err(BookingError::Storage)?
            .ok_or(BookingError::UserNotFound(booker_id))?;
        let item = self
            .items
            .find_by_id(item_id)
            .await
            .map_err(BookingError::Storage)?
            .ok_or(BookingError::ItemNotFound(item_id))?;

        validate_interval(start, end, self.clock.now())?;
        check_bookable(&item, booker.id)?;

        let saved = self
            .bookings
            .save(NewBooking {
                item_id,
                booker_id,
                start,
                end,
            })
            .await
            .map_err(BookingError::Storage)?;
        info!(
            "Booking {} created: item {} requested by user {}",
            saved.id, item_id, booker_id
        );
        Ok(saved)
    }

    /// Approve or reject a WAITING booking. The decision comes from the state
    /// machine; the write goes through the store's conditional update, so a
    /// concurrent confirmation that got there first surfaces as `NotWaiting`.
    pub async fn confirm(
        &self,
        booking_id: BookingId,
        actor: UserId,
        approve: bool,
    ) -> BookingResult<Booking> {
        let booking = self.find_booking(booking_id).await?;
        self.require_user(actor).await?;

        let target = booking.confirm(actor, approve)?;
        let updated = self
            .bookings
            .update_status(booking_id, target)
            .await
            .map_err(BookingError::Storage)?
            .ok_or(BookingError::NotWaiting)?;
        info!(
            "Booking {} moved to {} by owner {}",
            booking_id,
            updated.status.as_str(),
            actor
        );
        Ok(updated)
    }

    /// Page of the caller's own bookings, filtered by state.
    pub async fn list_by_booker(
        &self,
        booker_id: UserId,
        state_token: &str,
        page: PageRequest,
    ) -> BookingResult<Vec<Booking>> {
        let state: BookingState = state_token.parse()?;
        self.require_user(booker_id).await?;
        debug!(
            "Listing bookings of booker {} with state {}",
            booker_id, state_token
        );
        let fetched = self
            .bookings
            .find_all_by_booker(booker_id, &page)
            .await
            .map_err(BookingError::Storage)?;
        self.filtered(fetched, state)
    }

    /// Page of bookings over every item the caller owns, filtered by state.
    pub async fn list_by_owner(
        &self,
        owner_id: UserId,
        state_token: &str,
        page: PageRequest,
    ) -> BookingResult<Vec<Booking>> {
        let state: BookingState = state_token.parse()?;
        self.require_user(owner_id).await?;
        debug!(
            "Listing bookings over items of owner {} with state {}",
            owner_id, state_token
        );
        let fetched = self
            .bookings
            .find_all_by_owner(owner_id, &page)
            .await
            .map_err(BookingError::Storage)?;
        self.filtered(fetched, state)
    }

    /// Last finished and next upcoming approved booking of an item, visible
    /// to its owner only.
    pub async fn item_timeline(
        &self,
        item_id: ItemId,
        requester: UserId,
    ) -> BookingResult<BookingTimeline> {
        let item = self
            .items
            .find_by_id(item_id)
            .await
            .map_err(BookingError::Storage)?
            .ok_or(BookingError::ItemNotFound(item_id))?;
        if item.owner_id != requester {
            return Err(BookingError::NotAuthorized);
        }

        let now = self.clock.now();
        let last = self
            .bookings
            .find_last_booking(item_id, requester, now)
            .await
            .map_err(BookingError::Storage)?;
        let next = self
            .bookings
            .find_next_booking(item_id, requester, now)
            .await
            .map_err(BookingError::Storage)?;
        Ok(BookingTimeline { last, next })
    }

    async fn find_booking(&self, booking_id: BookingId) -> BookingResult<Booking> {
        self.bookings
            .find_by_id(booking_id)
            .await
            .map_err(BookingError::Storage)?
            .ok_or(BookingError::BookingNotFound(booking_id))
    }

    async fn require_user(&self, user_id: UserId) -> BookingResult<()> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(BookingError::Storage)?
            .ok_or(BookingError::UserNotFound(user_id))?;
        Ok(())
    }

    /// An empty page means there was nothing to show at all; a page emptied
    /// by the state filter is a valid empty listing.
    fn filtered(&self, fetched: Vec<Booking>, state: BookingState) -> BookingResult<Vec<Booking>> {
        if fetched.is_empty() {
            return Err(BookingError::NoBookingsFound);
        }
        Ok(filter_by_state(fetched, state, self.clock.now()))
    }
}
