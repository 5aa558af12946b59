use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use lendit_core::BookingError;

#[derive(Debug)]
pub enum ApiError {
    Booking(BookingError),
    Identity(String),
    Anyhow(anyhow::Error),
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        Self::Booking(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Booking(err) => match &err {
                BookingError::UserNotFound(_)
                | BookingError::ItemNotFound(_)
                | BookingError::BookingNotFound(_)
                | BookingError::SelfBooking(_)
                | BookingError::NotOwner
                | BookingError::NoBookingsFound
                | BookingError::NotAuthorized => (StatusCode::NOT_FOUND, err.to_string()),
                BookingError::Validation(_)
                | BookingError::Unavailable(_)
                | BookingError::NotWaiting
                | BookingError::UnknownState(_) => (StatusCode::BAD_REQUEST, err.to_string()),
                BookingError::Storage(_) => {
                    tracing::error!("Internal Server Error: {}", err);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal Server Error".to_string(),
                    )
                }
            },
            ApiError::Identity(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
