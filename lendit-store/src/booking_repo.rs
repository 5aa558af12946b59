use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use lendit_core::model::{Booking, BookingId, BookingStatus, Item, ItemId, NewBooking, User, UserId};
use lendit_core::repository::{BookingStore, PageRequest, RepoError};

pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying; one JOIN row carries the booking
// together with its item and booker.
#[derive(sqlx::FromRow)]
struct BookingRow {
    id: i64,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    status: String,
    item_id: i64,
    item_name: String,
    item_description: String,
    item_available: bool,
    item_owner_id: i64,
    booker_id: i64,
    booker_name: String,
    booker_email: String,
}

impl TryFrom<BookingRow> for Booking {
    type Error = RepoError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let status = BookingStatus::parse(&row.status)
            .ok_or_else(|| format!("unknown booking status in storage: {}", row.status))?;
        Ok(Booking {
            id: row.id,
            item: Item {
                id: row.item_id,
                name: row.item_name,
                description: row.item_description,
                available: row.item_available,
                owner_id: row.item_owner_id,
            },
            booker: User {
                id: row.booker_id,
                name: row.booker_name,
                email: row.booker_email,
            },
            start: row.start_date,
            end: row.end_date,
            status,
        })
    }
}

fn hydrate(rows: Vec<BookingRow>) -> Result<Vec<Booking>, RepoError> {
    rows.into_iter().map(Booking::try_from).collect()
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn save(&self, booking: NewBooking) -> Result<Booking, RepoError> {
        let id = sqlx::query_scalar::<_, BookingId>(
            r#"
            INSERT INTO bookings (item_id, booker_id, start_date, end_date, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(booking.item_id)
        .bind(booking.booker_id)
        .bind(booking.start)
        .bind(booking.end)
        .bind(BookingStatus::Waiting.as_str())
        .fetch_one(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| format!("booking with id = {} vanished after insert", id).into())
    }

    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>, RepoError> {
        let row = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT b.id, b.start_date, b.end_date, b.status,
                   i.id AS item_id, i.name AS item_name, i.description AS item_description,
                   i.available AS item_available, i.owner_id AS item_owner_id,
                   u.id AS booker_id, u.name AS booker_name, u.email AS booker_email
            FROM bookings b
            JOIN items i ON i.id = b.item_id
            JOIN users u ON u.id = b.booker_id
            WHERE b.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Booking::try_from).transpose()
    }

    async fn find_all_by_booker(
        &self,
        booker_id: UserId,
        page: &PageRequest,
    ) -> Result<Vec<Booking>, RepoError> {
        let rows = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT b.id, b.start_date, b.end_date, b.status,
                   i.id AS item_id, i.name AS item_name, i.description AS item_description,
                   i.available AS item_available, i.owner_id AS item_owner_id,
                   u.id AS booker_id, u.name AS booker_name, u.email AS booker_email
            FROM bookings b
            JOIN items i ON i.id = b.item_id
            JOIN users u ON u.id = b.booker_id
            WHERE b.booker_id = $1
            ORDER BY b.start_date DESC, b.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(booker_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        hydrate(rows)
    }

    async fn find_all_by_owner(
        &self,
        owner_id: UserId,
        page: &PageRequest,
    ) -> Result<Vec<Booking>, RepoError> {
        let rows = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT b.id, b.start_date, b.end_date, b.status,
                   i.id AS item_id, i.name AS item_name, i.description AS item_description,
                   i.available AS item_available, i.owner_id AS item_owner_id,
                   u.id AS booker_id, u.name AS booker_name, u.email AS booker_email
            FROM bookings b
            JOIN items i ON i.id = b.item_id
            JOIN users u ON u.id = b.booker_id
            WHERE i.owner_id = $1
            ORDER BY b.start_date DESC, b.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        hydrate(rows)
    }

    async fn update_status(
        &self,
        id: BookingId,
        status: BookingStatus,
    ) -> Result<Option<Booking>, RepoError> {
        // The WHERE clause makes the transition conditional: of two racing
        // confirmations only one matches a WAITING row.
        let updated = sqlx::query_scalar::<_, BookingId>(
            "UPDATE bookings SET status = $2 WHERE id = $1 AND status = 'WAITING' RETURNING id",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(id) => {
                let booking = self
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| format!("booking with id = {} vanished after update", id))?;
                Ok(Some(booking))
            }
            None => Ok(None),
        }
    }

    async fn find_last_booking(
        &self,
        item_id: ItemId,
        owner_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>, RepoError> {
        let row = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT b.id, b.start_date, b.end_date, b.status,
                   i.id AS item_id, i.name AS item_name, i.description AS item_description,
                   i.available AS item_available, i.owner_id AS item_owner_id,
                   u.id AS booker_id, u.name AS booker_name, u.email AS booker_email
            FROM bookings b
            JOIN items i ON i.id = b.item_id
            JOIN users u ON u.id = b.booker_id
            WHERE b.item_id = $1 AND i.owner_id = $2
              AND b.status = 'APPROVED' AND b.end_date < $3
            ORDER BY b.end_date DESC, b.id DESC
            LIMIT 1
            "#,
        )
        .bind(item_id)
        .bind(owner_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Booking::try_from).transpose()
    }

    async fn find_next_booking(
        &self,
        item_id: ItemId,
        owner_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>, RepoError> {
        let row = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT b.id, b.start_date, b.end_date, b.status,
                   i.id AS item_id, i.name AS item_name, i.description AS item_description,
                   i.available AS item_available, i.owner_id AS item_owner_id,
                   u.id AS booker_id, u.name AS booker_name, u.email AS booker_email
            FROM bookings b
            JOIN items i ON i.id = b.item_id
            JOIN users u ON u.id = b.booker_id
            WHERE b.item_id = $1 AND i.owner_id = $2
              AND b.status = 'APPROVED' AND b.start_date > $3
            ORDER BY b.start_date ASC, b.id ASC
            LIMIT 1
            "#,
        )
        .bind(item_id)
        .bind(owner_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Booking::try_from).transpose()
    }
}
