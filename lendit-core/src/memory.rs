use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::model::{Booking, BookingId, BookingStatus, Item, ItemId, NewBooking, User, UserId};
use crate::repository::{BookingStore, ItemDirectory, PageRequest, RepoError, UserDirectory};

/// In-memory repository backing for tests and local runs. Mirrors the SQL
/// adapters' observable behavior: hydrated bookings, listings ordered
/// descending by start (id breaks ties), offset/limit windows, and a
/// compare-and-set status update.
#[derive(Default)]
pub struct InMemoryStore {
    users: Mutex<HashMap<UserId, User>>,
    items: Mutex<HashMap<ItemId, Item>>,
    bookings: Mutex<HashMap<BookingId, Booking>>,
    next_booking_id: AtomicI64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_user(&self, user: User) {
        self.users.lock().expect("lock poisoned").insert(user.id, user);
    }

    pub fn put_item(&self, item: Item) {
        self.items.lock().expect("lock poisoned").insert(item.id, item);
    }

    /// Seed a booking as-is, keeping the id counter ahead of it.
    pub fn put_booking(&self, booking: Booking) {
        self.next_booking_id.fetch_max(booking.id, Ordering::SeqCst);
        self.bookings
            .lock()
            .expect("lock poisoned")
            .insert(booking.id, booking);
    }

    fn page_of(&self, mut bookings: Vec<Booking>, page: &PageRequest) -> Vec<Booking> {
        bookings.sort_by(|a, b| b.start.cmp(&a.start).then(b.id.cmp(&a.id)));
        bookings
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect()
    }
}

#[async_trait]
impl UserDirectory for InMemoryStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepoError> {
        Ok(self.users.lock().expect("lock poisoned").get(&id).cloned())
    }
}

#[async_trait]
impl ItemDirectory for InMemoryStore {
    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, RepoError> {
        Ok(self.items.lock().expect("lock poisoned").get(&id).cloned())
    }
}

#[async_trait]
impl BookingStore for InMemoryStore {
    async fn save(&self, booking: NewBooking) -> Result<Booking, RepoError> {
        let item = self
            .items
            .lock()
            .expect("lock poisoned")
            .get(&booking.item_id)
            .cloned()
            .ok_or_else(|| format!("item with id = {} is not stored", booking.item_id))?;
        let booker = self
            .users
            .lock()
            .expect("lock poisoned")
            .get(&booking.booker_id)
            .cloned()
            .ok_or_else(|| format!("user with id = {} is not stored", booking.booker_id))?;

        let id = self.next_booking_id.fetch_add(1, Ordering::SeqCst) + 1;
        let saved = Booking {
            id,
            item,
            booker,
            start: booking.start,
            end: booking.end,
            status: BookingStatus::Waiting,
        };
        self.bookings
            .lock()
            .expect("lock poisoned")
            .insert(id, saved.clone());
        Ok(saved)
    }

    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>, RepoError> {
        Ok(self
            .bookings
            .lock()
            .expect("lock poisoned")
            .get(&id)
            .cloned())
    }

    async fn find_all_by_booker(
        &self,
        booker_id: UserId,
        page: &PageRequest,
    ) -> Result<Vec<Booking>, RepoError> {
        let all: Vec<Booking> = self
            .bookings
            .lock()
            .expect("lock poisoned")
            .values()
            .filter(|b| b.booker.id == booker_id)
            .cloned()
            .collect();
        Ok(self.page_of(all, page))
    }

    async fn find_all_by_owner(
        &self,
        owner_id: UserId,
        page: &PageRequest,
    ) -> Result<Vec<Booking>, RepoError> {
        let all: Vec<Booking> = self
            .bookings
            .lock()
            .expect("lock poisoned")
            .values()
            .filter(|b| b.item.owner_id == owner_id)
            .cloned()
            .collect();
        Ok(self.page_of(all, page))
    }

    async fn update_status(
        &self,
        id: BookingId,
        status: BookingStatus,
    ) -> Result<Option<Booking>, RepoError> {
        let mut bookings = self.bookings.lock().expect("lock poisoned");
        match bookings.get_mut(&id) {
            Some(b) if b.status == BookingStatus::Waiting => {
                b.status = status;
                Ok(Some(b.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn find_last_booking(
        &self,
        item_id: ItemId,
        owner_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>, RepoError> {
        Ok(self
            .bookings
            .lock()
            .expect("lock poisoned")
            .values()
            .filter(|b| {
                b.item.id == item_id
                    && b.item.owner_id == owner_id
                    && b.status == BookingStatus::Approved
                    && b.end < now
            })
            .max_by_key(|b| (b.end, b.id))
            .cloned())
    }

    async fn find_next_booking(
        &self,
        item_id: ItemId,
        owner_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>, RepoError> {
        Ok(self
            .bookings
            .lock()
            .expect("lock poisoned")
            .values()
            .filter(|b| {
                b.item.id == item_id
                    && b.item.owner_id == owner_id
                    && b.status == BookingStatus::Approved
                    && b.start > now
            })
            .min_by_key(|b| (b.start, b.id))
            .cloned())
    }
}
