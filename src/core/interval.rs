use std::fmt::{Debug, Formatter};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Occupied date range of a single reservation.
///
/// Both boundaries are inclusive: a stay that ends on the day another one starts
/// collides with it.
#[must_use]
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct ReservationInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
#[error("the interval starts on {start} after it ends on {end}")]
pub struct InvalidInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Debug for ReservationInterval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}..={:?}", self.start, self.end)
    }
}

impl ReservationInterval {
    pub fn try_new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, InvalidInterval> {
        if start <= end { Ok(Self { start, end }) } else { Err(InvalidInterval { start, end }) }
    }

    #[must_use]
    pub fn overlaps_with(self, other: Self) -> bool {
        (self.start <= other.end) && (self.end >= other.start)
    }

    /// Number of nights between check-in and checkout.
    #[must_use]
    pub fn n_nights(self) -> i64 {
        (self.end.date_naive() - self.start.date_naive()).num_days()
    }
}

/// Bookings start and end at midnight UTC.
#[must_use]
pub fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Check whether the candidate collides with any of the existing reservations.
#[must_use]
pub fn overlaps(
    candidate: ReservationInterval,
    existing: impl IntoIterator<Item = ReservationInterval>,
) -> bool {
    existing.into_iter().any(|interval| candidate.overlaps_with(interval))
}
