use async_trait::async_trait;

use crate::{
    api::holidaze::models::{
        Booking,
        BookingId,
        BookingUpdate,
        NewBooking,
        Profile,
        Registration,
        Venue,
        VenueId,
    },
    prelude::*,
};

/// API calls the booking, role and registration logic depend upon.
#[async_trait]
pub trait Backend: Sync {
    async fn register(&self, registration: &Registration) -> Result<Profile>;

    async fn get_profile(&self, name: &str) -> Result<Profile>;

    /// Update the venue manager role.
    ///
    /// Returns the role confirmed by the API, or [`None`] when the call succeeded
    /// but the response could not be parsed.
    async fn set_venue_manager(&self, name: &str, venue_manager: bool) -> Result<Option<bool>>;

    /// Fetch the venue together with its current bookings.
    async fn get_venue_with_bookings(&self, venue_id: &VenueId) -> Result<Venue>;

    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking>;

    async fn update_booking(&self, id: &BookingId, update: &BookingUpdate) -> Result<Booking>;
}
