use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};

use crate::{
    api::{
        Backend,
        holidaze::{
            ApiError,
            models::{Booking, BookingId, BookingUpdate, NewBooking, Venue, VenueId},
        },
    },
    core::interval::{ReservationInterval, midnight, overlaps},
    prelude::*,
};

/// Booking form as entered by the user.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct BookingForm {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub guests: u32,
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum BookingError {
    #[error("missing or invalid dates")]
    InvalidDates,

    #[error("check-in date is in the past")]
    PastDates,

    #[error("at least one guest is required")]
    NoGuests,

    #[error("the venue accepts at most {max_guests} guests")]
    TooManyGuests { max_guests: u32 },

    #[error("dates unavailable")]
    Unavailable,

    /// The API refused the booking or could not be reached.
    #[error("{0}")]
    Request(String),
}

impl BookingError {
    const GENERIC_REQUEST_MESSAGE: &'static str = "request failed";

    fn from_request_error(error: &Error) -> Self {
        Self::Request(
            error
                .downcast_ref::<ApiError>()
                .and_then(ApiError::server_message)
                .unwrap_or(Self::GENERIC_REQUEST_MESSAGE)
                .to_string(),
        )
    }
}

/// Confirmation shown after a successful submission.
#[must_use]
#[derive(Clone, Debug)]
pub struct Confirmation {
    pub booking_id: BookingId,
    pub interval: ReservationInterval,
    pub guests: u32,
}

impl Display for Confirmation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "booking confirmed from {} to {}",
            self.interval.start.format("%Y-%m-%d"),
            self.interval.end.format("%Y-%m-%d"),
        )
    }
}

#[derive(Clone, Debug)]
pub enum SubmissionState {
    Idle,
    Validating,
    Submitting,
    Succeeded(Confirmation),
    Failed(BookingError),
}

/// Validates bookings of a single venue and submits them to the API.
///
/// The submitter tracks the venue's known reservations: they are loaded with the
/// venue and updated after every successful submission. Each submission makes at
/// most one API call and is never retried automatically.
pub struct BookingSubmitter<'a, B: ?Sized> {
    backend: &'a B,
    venue_id: VenueId,
    max_guests: Option<u32>,
    reservations: Vec<(BookingId, ReservationInterval)>,
    state: SubmissionState,

    /// Stays may not start before this moment, today's midnight UTC by default.
    earliest_start: DateTime<Utc>,
}

impl<'a, B: Backend + ?Sized> BookingSubmitter<'a, B> {
    /// Fetch the venue with its bookings and build the submitter for it.
    #[instrument(skip_all, fields(venue_id = %venue_id))]
    pub async fn load(backend: &'a B, venue_id: &VenueId) -> Result<Self> {
        let venue = backend.get_venue_with_bookings(venue_id).await?;
        Self::new(backend, &venue)
    }

    pub fn new(backend: &'a B, venue: &Venue) -> Result<Self> {
        let reservations = venue
            .bookings
            .iter()
            .flatten()
            .map(|booking| -> Result<_> { Ok((booking.id.clone(), booking.interval()?)) })
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("venue `{}` has an invalid booking", venue.id))?;
        info!(venue_id = %venue.id, n_reservations = reservations.len(), "loaded reservations");
        Ok(Self {
            backend,
            venue_id: venue.id.clone(),
            max_guests: (venue.max_guests != 0).then_some(venue.max_guests),
            reservations,
            state: SubmissionState::Idle,
            earliest_start: midnight(Utc::now().date_naive()),
        })
    }

    pub const fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Known reservations of the venue.
    pub fn reservations(&self) -> impl Iterator<Item = ReservationInterval> + '_ {
        self.reservations.iter().map(|(_, interval)| *interval)
    }

    /// Discard the outcome of the last submission.
    pub fn reset(&mut self) {
        self.transition(SubmissionState::Idle);
    }

    /// Validate and create a new booking.
    ///
    /// Every call is a fresh attempt, whatever the outcome of the previous one.
    #[instrument(skip_all, fields(venue_id = %self.venue_id))]
    pub async fn submit(&mut self, form: &BookingForm) -> &SubmissionState {
        self.reset();
        let interval = match self.validate(form, None) {
            Ok(interval) => interval,
            Err(error) => return self.fail(error),
        };
        let booking = NewBooking::builder()
            .venue_id(self.venue_id.clone())
            .date_from(interval.start)
            .date_to(interval.end)
            .guests(form.guests)
            .build();
        let result = self.backend.create_booking(&booking).await;
        self.complete(result)
    }

    /// Validate and move an existing booking to other dates.
    ///
    /// The booking's own current dates do not count as a collision.
    #[instrument(skip_all, fields(venue_id = %self.venue_id, booking_id = %booking_id))]
    pub async fn reschedule(
        &mut self,
        booking_id: &BookingId,
        form: &BookingForm,
    ) -> &SubmissionState {
        self.reset();
        let interval = match self.validate(form, Some(booking_id)) {
            Ok(interval) => interval,
            Err(error) => return self.fail(error),
        };
        let update = BookingUpdate::builder()
            .date_from(interval.start)
            .date_to(interval.end)
            .guests(form.guests)
            .build();
        let result = self.backend.update_booking(booking_id, &update).await;
        self.complete(result)
    }

    fn validate(
        &mut self,
        form: &BookingForm,
        excluded: Option<&BookingId>,
    ) -> Result<ReservationInterval, BookingError> {
        self.transition(SubmissionState::Validating);
        let interval = match (form.start, form.end) {
            (Some(start), Some(end)) => {
                ReservationInterval::try_new(start, end).map_err(|_| BookingError::InvalidDates)?
            }
            _ => return Err(BookingError::InvalidDates),
        };
        if interval.start < self.earliest_start {
            return Err(BookingError::PastDates);
        }
        if form.guests == 0 {
            return Err(BookingError::NoGuests);
        }
        if let Some(max_guests) = self.max_guests
            && form.guests > max_guests
        {
            return Err(BookingError::TooManyGuests { max_guests });
        }
        let existing = self
            .reservations
            .iter()
            .filter(|(id, _)| Some(id) != excluded)
            .map(|(_, interval)| *interval);
        if overlaps(interval, existing) {
            return Err(BookingError::Unavailable);
        }
        self.transition(SubmissionState::Submitting);
        Ok(interval)
    }

    fn complete(&mut self, result: Result<Booking>) -> &SubmissionState {
        match result.and_then(|booking| Ok((booking.interval()?, booking))) {
            Ok((interval, booking)) => {
                match self.reservations.iter_mut().find(|(id, _)| *id == booking.id) {
                    Some((_, known)) => *known = interval,
                    None => self.reservations.push((booking.id.clone(), interval)),
                }
                let confirmation =
                    Confirmation { booking_id: booking.id, interval, guests: booking.guests };
                info!(%confirmation.booking_id, "{confirmation}");
                self.transition(SubmissionState::Succeeded(confirmation))
            }
            Err(error) => {
                warn!("booking request failed: {error:#}");
                self.fail(BookingError::from_request_error(&error))
            }
        }
    }

    fn fail(&mut self, error: BookingError) -> &SubmissionState {
        warn!("{error}");
        self.transition(SubmissionState::Failed(error))
    }

    fn transition(&mut self, state: SubmissionState) -> &SubmissionState {
        debug!(from = ?self.state, to = ?state, "transition");
        self.state = state;
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeDelta};

    use super::*;
    use crate::api::fake::{FakeBackend, Reply};

    fn date(month: u32, day: u32) -> Option<DateTime<Utc>> {
        NaiveDate::from_ymd_opt(2025, month, day)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|date| date.and_utc())
    }

    fn form(start: (u32, u32), end: (u32, u32), guests: u32) -> BookingForm {
        BookingForm { start: date(start.0, start.1), end: date(end.0, end.1), guests }
    }

    /// Submitter for the fake venue, as if today were 2025-01-01.
    fn submitter(backend: &FakeBackend) -> Result<BookingSubmitter<'_, FakeBackend>> {
        let mut submitter = BookingSubmitter::new(backend, &backend.venue)?;
        submitter.earliest_start = date(1, 1).context("bad date")?;
        Ok(submitter)
    }

    #[tokio::test]
    async fn reversed_dates_fail_locally() -> Result {
        let backend = FakeBackend::new(Reply::Ok);
        let mut submitter = BookingSubmitter::load(&backend, &VenueId::from("v1")).await?;
        submitter.earliest_start = date(1, 1).context("bad date")?;
        let state = submitter.submit(&form((7, 10), (7, 5), 2)).await;
        assert!(matches!(state, SubmissionState::Failed(BookingError::InvalidDates)));
        assert_eq!(backend.n_calls("create_booking"), 0);
        Ok(())
    }

    #[tokio::test]
    async fn missing_date_fails_locally() -> Result {
        let backend = FakeBackend::new(Reply::Ok);
        let mut submitter = submitter(&backend)?;
        let form = BookingForm { start: date(7, 1), end: None, guests: 1 };
        let state = submitter.submit(&form).await;
        assert!(matches!(state, SubmissionState::Failed(BookingError::InvalidDates)));
        assert_eq!(backend.n_calls("create_booking"), 0);
        Ok(())
    }

    #[tokio::test]
    async fn guest_count_is_checked() -> Result {
        let backend = FakeBackend::new(Reply::Ok);
        let mut submitter = submitter(&backend)?;
        let state = submitter.submit(&form((7, 1), (7, 3), 0)).await;
        assert!(matches!(state, SubmissionState::Failed(BookingError::NoGuests)));
        let state = submitter.submit(&form((7, 1), (7, 3), 5)).await;
        assert!(matches!(
            state,
            SubmissionState::Failed(BookingError::TooManyGuests { max_guests: 4 })
        ));
        assert_eq!(backend.n_calls("create_booking"), 0);
        Ok(())
    }

    #[tokio::test]
    async fn overlapping_dates_are_unavailable() -> Result {
        let backend = FakeBackend::new(Reply::Ok);
        let mut submitter = submitter(&backend)?;
        let state = submitter.submit(&form((6, 5), (6, 10), 2)).await;
        assert!(matches!(state, SubmissionState::Failed(BookingError::Unavailable)));
        assert_eq!(state_message(submitter.state()), Some("dates unavailable".to_string()));
        assert_eq!(backend.n_calls("create_booking"), 0);
        Ok(())
    }

    #[tokio::test]
    async fn successful_submission_is_remembered() -> Result {
        let backend = FakeBackend::new(Reply::Ok);
        let mut submitter = submitter(&backend)?;

        let state = submitter.submit(&form((6, 6), (6, 10), 2)).await;
        let SubmissionState::Succeeded(confirmation) = state else {
            bail!("unexpected state: {state:?}");
        };
        assert_eq!(confirmation.to_string(), "booking confirmed from 2025-06-06 to 2025-06-10");
        assert_eq!(submitter.reservations().count(), 2);

        // The same dates are now taken:
        let state = submitter.submit(&form((6, 6), (6, 10), 2)).await;
        assert!(matches!(state, SubmissionState::Failed(BookingError::Unavailable)));
        assert_eq!(backend.n_calls("create_booking"), 1);
        Ok(())
    }

    #[tokio::test]
    async fn server_message_is_surfaced() -> Result {
        let backend = FakeBackend::new(Reply::Rejected("Venue is fully booked"));
        let mut submitter = submitter(&backend)?;
        let state = submitter.submit(&form((7, 1), (7, 3), 2)).await;
        assert_eq!(state_message(state), Some("Venue is fully booked".to_string()));
        assert_eq!(submitter.reservations().count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn failure_without_message_then_retry() -> Result {
        let backend = FakeBackend::new(Reply::Failed);
        let mut submitter = submitter(&backend)?;
        let state = submitter.submit(&form((7, 1), (7, 3), 2)).await;
        assert_eq!(state_message(state), Some("request failed".to_string()));

        backend.set_reply(Reply::Ok);
        submitter.reset();
        assert!(matches!(submitter.state(), SubmissionState::Idle));
        let state = submitter.submit(&form((7, 1), (7, 3), 2)).await;
        assert!(matches!(state, SubmissionState::Succeeded(_)));
        assert_eq!(backend.n_calls("create_booking"), 2);
        Ok(())
    }

    #[tokio::test]
    async fn reschedule_ignores_own_dates() -> Result {
        let backend = FakeBackend::new(Reply::Ok);
        let mut submitter = submitter(&backend)?;
        let state = submitter.reschedule(&BookingId::from("b1"), &form((6, 3), (6, 7), 2)).await;
        assert!(matches!(state, SubmissionState::Succeeded(_)));
        assert_eq!(submitter.reservations().count(), 1);
        assert_eq!(backend.n_calls("update_booking"), 1);
        Ok(())
    }

    #[tokio::test]
    async fn reschedule_of_another_booking_collides() -> Result {
        let backend = FakeBackend::new(Reply::Ok);
        let mut submitter = submitter(&backend)?;
        let state = submitter.reschedule(&BookingId::from("b2"), &form((6, 3), (6, 7), 2)).await;
        assert!(matches!(state, SubmissionState::Failed(BookingError::Unavailable)));
        assert_eq!(backend.n_calls("update_booking"), 0);
        Ok(())
    }

    #[tokio::test]
    async fn past_dates_fail_locally() -> Result {
        let backend = FakeBackend::new(Reply::Ok);
        let mut submitter = BookingSubmitter::new(&backend, &backend.venue)?;
        let form = BookingForm {
            start: Some(midnight(NaiveDate::from_ymd_opt(2001, 1, 1).context("bad date")?)),
            end: Some(midnight(NaiveDate::from_ymd_opt(2001, 1, 3).context("bad date")?)),
            guests: 2,
        };
        let state = submitter.submit(&form).await;
        assert!(matches!(state, SubmissionState::Failed(BookingError::PastDates)));
        let state = submitter.reschedule(&BookingId::from("b1"), &form).await;
        assert!(matches!(state, SubmissionState::Failed(BookingError::PastDates)));
        assert_eq!(backend.n_calls("create_booking"), 0);
        assert_eq!(backend.n_calls("update_booking"), 0);
        Ok(())
    }

    #[tokio::test]
    async fn check_in_today_is_accepted() -> Result {
        let backend = FakeBackend::new(Reply::Ok);
        let mut submitter = BookingSubmitter::new(&backend, &backend.venue)?;
        let today = midnight(Utc::now().date_naive());
        let form =
            BookingForm { start: Some(today), end: Some(today + TimeDelta::days(2)), guests: 1 };
        let state = submitter.submit(&form).await;
        assert!(matches!(state, SubmissionState::Succeeded(_)), "{state:?}");
        Ok(())
    }

    fn state_message(state: &SubmissionState) -> Option<String> {
        match state {
            SubmissionState::Failed(error) => Some(error.to_string()),
            _ => None,
        }
    }
}
