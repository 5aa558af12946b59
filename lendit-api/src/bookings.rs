use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::identity::CallerId;
use crate::state::AppState;
use lendit_core::model::{Booking, BookingId, BookingStatus, ItemId, UserId};
use lendit_core::repository::PageRequest;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Timestamps travel zone-less on the wire (`2026-07-01T12:00:00`) and are
/// interpreted as UTC.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub item_id: ItemId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: BookingId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: BookingStatus,
    pub booker: UserResponse,
    pub item: ItemResponse,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: UserId,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineResponse {
    pub last_booking: Option<BookingResponse>,
    pub next_booking: Option<BookingResponse>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_state")]
    pub state: String,
    #[serde(default)]
    pub from: i64,
    #[serde(default = "default_size")]
    pub size: i64,
}

fn default_state() -> String {
    "ALL".to_string()
}

fn default_size() -> i64 {
    10
}

#[derive(Debug, Deserialize)]
pub struct ApproveParams {
    pub approved: bool,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            start: b.start.naive_utc(),
            end: b.end.naive_utc(),
            status: b.status,
            booker: UserResponse {
                id: b.booker.id,
                name: b.booker.name,
                email: b.booker.email,
            },
            item: ItemResponse {
                id: b.item.id,
                name: b.item.name,
                description: b.item.description,
                available: b.item.available,
                owner_id: b.item.owner_id,
            },
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /bookings
/// Request a booking for an item
pub async fn create_booking(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking = state
        .bookings
        .create(user_id, req.item_id, req.start.and_utc(), req.end.and_utc())
        .await?;
    Ok(Json(booking.into()))
}

/// PATCH /bookings/{bookingId}?approved=true|false
/// Approve or reject a waiting booking (item owner only)
pub async fn confirm_booking(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
    Path(booking_id): Path<BookingId>,
    Query(params): Query<ApproveParams>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking = state
        .bookings
        .confirm(booking_id, user_id, params.approved)
        .await?;
    Ok(Json(booking.into()))
}

/// GET /bookings/{bookingId}
/// Retrieve one booking (booker or item owner)
pub async fn get_booking(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
    Path(booking_id): Path<BookingId>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking = state.bookings.get_by_id(booking_id, user_id).await?;
    Ok(Json(booking.into()))
}

/// GET /bookings?state=ALL&from=0&size=10
/// List the caller's bookings, newest first
pub async fn list_bookings(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let page = PageRequest::new(params.from, params.size)?;
    let bookings = state
        .bookings
        .list_by_booker(user_id, &params.state, page)
        .await?;
    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

/// GET /bookings/owner?state=ALL&from=0&size=10
/// List bookings over all items the caller owns, newest first
pub async fn list_owner_bookings(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let page = PageRequest::new(params.from, params.size)?;
    let bookings = state
        .bookings
        .list_by_owner(user_id, &params.state, page)
        .await?;
    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

/// GET /bookings/item/{itemId}
/// Last finished and next upcoming approved booking of an item (owner only)
pub async fn item_timeline(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
    Path(item_id): Path<ItemId>,
) -> Result<Json<TimelineResponse>, ApiError> {
    let timeline = state.bookings.item_timeline(item_id, user_id).await?;
    Ok(Json(TimelineResponse {
        last_booking: timeline.last.map(Into::into),
        next_booking: timeline.next.map(Into::into),
    }))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(create_booking).get(list_bookings))
        .route("/bookings/owner", get(list_owner_bookings))
        .route("/bookings/item/{item_id}", get(item_timeline))
        .route(
            "/bookings/{booking_id}",
            get(get_booking).patch(confirm_booking),
        )
}
