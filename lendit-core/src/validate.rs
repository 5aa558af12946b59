use chrono::{DateTime, Utc};

use crate::{BookingError, BookingResult};

/// Check the requested interval against "now", rules in order: start must
/// not lie in the past, end must not lie in the past, end must be strictly
/// after start. Equal start and "now" is allowed; equal start and end is not.
pub fn validate_interval(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> BookingResult<()> {
    if start < now {
        return Err(BookingError::Validation(
            "the start date of the booking is in the past".to_string(),
        ));
    }
    if end < now {
        return Err(BookingError::Validation(
            "the end date of the booking is in the past".to_string(),
        ));
    }
    if end <= start {
        return Err(BookingError::Validation(
            "the end date of the booking is not after the start date".to_string(),
        ));
    }
    Ok(())
}
