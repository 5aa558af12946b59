use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::model::{Booking, BookingStatus};
use crate::BookingError;

/// Query-time classification bucket for booking listings. Never persisted;
/// CURRENT/PAST/FUTURE are computed against "now" on every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingState {
    All,
    Current,
    Past,
    Future,
    Waiting,
    Rejected,
}

impl FromStr for BookingState {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALL" => Ok(BookingState::All),
            "CURRENT" => Ok(BookingState::Current),
            "PAST" => Ok(BookingState::Past),
            "FUTURE" => Ok(BookingState::Future),
            "WAITING" => Ok(BookingState::Waiting),
            "REJECTED" => Ok(BookingState::Rejected),
            other => Err(BookingError::UnknownState(other.to_string())),
        }
    }
}

impl BookingState {
    /// Bucket predicate. Temporal bounds are strict: a booking starting
    /// exactly at `now` is neither FUTURE nor CURRENT.
    fn matches(&self, booking: &Booking, now: DateTime<Utc>) -> bool {
        match self {
            BookingState::All => true,
            BookingState::Waiting => booking.status == BookingStatus::Waiting,
            BookingState::Rejected => booking.status == BookingStatus::Rejected,
            BookingState::Past => booking.end < now,
            BookingState::Future => booking.start > now,
            BookingState::Current => booking.start < now && now < booking.end,
        }
    }
}

/// Keep the bookings matching `state` at instant `now`, most recent start
/// first. Start-time ties are broken by id descending so the order is
/// deterministic even though the retrieved set has none of its own.
pub fn filter_by_state(
    mut bookings: Vec<Booking>,
    state: BookingState,
    now: DateTime<Utc>,
) -> Vec<Booking> {
    bookings.retain(|b| state.matches(b, now));
    bookings.sort_by(|a, b| b.start.cmp(&a.start).then(b.id.cmp(&a.id)));
    bookings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Item, User};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn booking(
        id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        status: BookingStatus,
    ) -> Booking {
        Booking {
            id,
            item: Item {
                id: 10,
                name: "tent".to_string(),
                description: "two-person tent".to_string(),
                available: true,
                owner_id: 2,
            },
            booker: User {
                id: 1,
                name: "booker".to_string(),
                email: "booker@mail.test".to_string(),
            },
            start,
            end,
            status,
        }
    }

    #[test]
    fn parses_every_known_token() {
        for (token, state) in [
            ("ALL", BookingState::All),
            ("CURRENT", BookingState::Current),
            ("PAST", BookingState::Past),
            ("FUTURE", BookingState::Future),
            ("WAITING", BookingState::Waiting),
            ("REJECTED", BookingState::Rejected),
        ] {
            assert_eq!(token.parse::<BookingState>().unwrap(), state);
        }
    }

    #[test]
    fn unknown_token_fails_with_exact_message() {
        let err = "BOGUS".parse::<BookingState>().unwrap_err();
        assert!(matches!(err, BookingError::UnknownState(ref s) if s == "BOGUS"));
        assert_eq!(err.to_string(), "Unknown state: BOGUS");
    }

    #[test]
    fn lowercase_token_is_not_accepted() {
        assert!("all".parse::<BookingState>().is_err());
    }

    #[test]
    fn future_waiting_booking_lands_in_the_right_buckets() {
        let t = now();
        let b = booking(
            1,
            t + Duration::days(1),
            t + Duration::days(3),
            BookingStatus::Waiting,
        );

        for state in [BookingState::All, BookingState::Waiting, BookingState::Future] {
            assert_eq!(filter_by_state(vec![b.clone()], state, t).len(), 1);
        }
        for state in [
            BookingState::Current,
            BookingState::Past,
            BookingState::Rejected,
        ] {
            assert!(filter_by_state(vec![b.clone()], state, t).is_empty());
        }
    }

    #[test]
    fn temporal_buckets_partition_off_boundary() {
        let t = now();
        let past = booking(
            1,
            t - Duration::days(3),
            t - Duration::hours(1),
            BookingStatus::Approved,
        );
        let current = booking(
            2,
            t - Duration::days(1),
            t + Duration::days(1),
            BookingStatus::Approved,
        );
        let future = booking(
            3,
            t + Duration::days(1),
            t + Duration::days(5),
            BookingStatus::Approved,
        );
        let all = vec![past.clone(), current.clone(), future.clone()];

        for b in &all {
            let hits = [BookingState::Past, BookingState::Current, BookingState::Future]
                .iter()
                .filter(|state| !filter_by_state(vec![b.clone()], **state, t).is_empty())
                .count();
            assert_eq!(hits, 1, "booking {} must match exactly one temporal bucket", b.id);
        }

        assert_eq!(filter_by_state(all.clone(), BookingState::Past, t)[0].id, 1);
        assert_eq!(filter_by_state(all.clone(), BookingState::Current, t)[0].id, 2);
        assert_eq!(filter_by_state(all, BookingState::Future, t)[0].id, 3);
    }

    #[test]
    fn boundaries_are_strict() {
        let t = now();
        let starts_now = booking(1, t, t + Duration::days(1), BookingStatus::Approved);
        let ends_now = booking(2, t - Duration::days(1), t, BookingStatus::Approved);

        assert!(filter_by_state(vec![starts_now.clone()], BookingState::Future, t).is_empty());
        assert!(filter_by_state(vec![starts_now], BookingState::Current, t).is_empty());
        assert!(filter_by_state(vec![ends_now.clone()], BookingState::Past, t).is_empty());
        assert!(filter_by_state(vec![ends_now], BookingState::Current, t).is_empty());
    }

    #[test]
    fn status_buckets_ignore_time() {
        let t = now();
        let past_rejected = booking(
            1,
            t - Duration::days(3),
            t - Duration::days(1),
            BookingStatus::Rejected,
        );
        let future_rejected = booking(
            2,
            t + Duration::days(1),
            t + Duration::days(2),
            BookingStatus::Rejected,
        );

        let res = filter_by_state(
            vec![past_rejected, future_rejected],
            BookingState::Rejected,
            t,
        );
        assert_eq!(res.len(), 2);
    }

    #[test]
    fn orders_descending_by_start_then_id() {
        let t = now();
        let early = booking(
            5,
            t + Duration::days(1),
            t + Duration::days(2),
            BookingStatus::Waiting,
        );
        let late = booking(
            1,
            t + Duration::days(4),
            t + Duration::days(5),
            BookingStatus::Waiting,
        );
        let tie_low = booking(
            2,
            t + Duration::days(4),
            t + Duration::days(6),
            BookingStatus::Waiting,
        );

        let res = filter_by_state(
            vec![early.clone(), late.clone(), tie_low.clone()],
            BookingState::All,
            t,
        );
        let ids: Vec<i64> = res.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![2, 1, 5]);
    }

    #[test]
    fn empty_input_filters_to_empty() {
        assert!(filter_by_state(Vec::new(), BookingState::All, now()).is_empty());
    }
}
