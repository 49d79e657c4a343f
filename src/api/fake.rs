//! In-memory [`Backend`] for the unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;

use crate::{
    api::{
        Backend,
        holidaze::{
            ApiError,
            models::{
                Booking,
                BookingId,
                BookingUpdate,
                NewBooking,
                Profile,
                Registration,
                Venue,
                VenueId,
            },
        },
    },
    prelude::*,
};

/// How the fake answers the next calls.
#[derive(Copy, Clone)]
pub enum Reply {
    Ok,

    /// Successful status, but the body cannot be parsed.
    Unparsable,

    /// Error envelope with a message.
    Rejected(&'static str),

    /// Error status without anything useful in the body.
    Failed,
}

pub struct FakeBackend {
    pub profile: Mutex<Profile>,
    pub venue: Venue,
    reply: Mutex<Reply>,
    calls: Mutex<Vec<&'static str>>,
}

impl FakeBackend {
    /// Fake with a customer profile `kari` and a venue `v1` booked on 2025-06-01..=2025-06-05.
    pub fn new(reply: Reply) -> Self {
        let venue = serde_json::from_value(serde_json::json!({
            "id": "v1",
            "name": "Cabin by the fjord",
            "price": 1200,
            "maxGuests": 4,
            "bookings": [
                {
                    "id": "b1",
                    "dateFrom": "2025-06-01T00:00:00.000Z",
                    "dateTo": "2025-06-05T00:00:00.000Z",
                    "guests": 2
                }
            ]
        }))
        .unwrap();
        let profile = serde_json::from_value(serde_json::json!({
            "name": "kari",
            "email": "kari@stud.noroff.no",
            "venueManager": false
        }))
        .unwrap();
        Self {
            profile: Mutex::new(profile),
            venue,
            reply: Mutex::new(reply),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_reply(&self, reply: Reply) {
        *self.reply.lock().unwrap() = reply;
    }

    /// Number of calls made to the specified method.
    pub fn n_calls(&self, method: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|call| **call == method).count()
    }

    /// Record the call and fail it if the fake is configured so.
    fn answer(&self, method: &'static str) -> Result<Reply> {
        self.calls.lock().unwrap().push(method);
        match *self.reply.lock().unwrap() {
            Reply::Rejected(message) => Err(ApiError::Rejected {
                status: StatusCode::BAD_REQUEST,
                message: message.to_string(),
            }
            .into()),
            Reply::Failed => {
                Err(ApiError::Failed { status: StatusCode::INTERNAL_SERVER_ERROR }.into())
            }
            reply => Ok(reply),
        }
    }

    fn booking(
        id: BookingId,
        date_from: DateTime<Utc>,
        date_to: DateTime<Utc>,
        guests: u32,
    ) -> Booking {
        Booking { id, date_from, date_to, guests, created: None, venue: None, customer: None }
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn register(&self, registration: &Registration) -> Result<Profile> {
        self.answer("register")?;
        Ok(Profile {
            name: registration.name.clone(),
            email: registration.email.clone(),
            bio: None,
            avatar: None,
            banner: None,
            venue_manager: registration.venue_manager.unwrap_or_default(),
            count: None,
        })
    }

    async fn get_profile(&self, _name: &str) -> Result<Profile> {
        self.answer("get_profile")?;
        Ok(self.profile.lock().unwrap().clone())
    }

    async fn set_venue_manager(&self, _name: &str, venue_manager: bool) -> Result<Option<bool>> {
        match self.answer("set_venue_manager")? {
            Reply::Unparsable => Ok(None),
            _ => {
                self.profile.lock().unwrap().venue_manager = venue_manager;
                Ok(Some(venue_manager))
            }
        }
    }

    async fn get_venue_with_bookings(&self, _venue_id: &VenueId) -> Result<Venue> {
        self.answer("get_venue_with_bookings")?;
        Ok(self.venue.clone())
    }

    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking> {
        self.answer("create_booking")?;
        Ok(Self::booking(
            BookingId::from("new"),
            booking.date_from,
            booking.date_to,
            booking.guests,
        ))
    }

    async fn update_booking(&self, id: &BookingId, update: &BookingUpdate) -> Result<Booking> {
        self.answer("update_booking")?;
        Ok(Self::booking(
            id.clone(),
            update.date_from.context("no start date")?,
            update.date_to.context("no end date")?,
            update.guests.unwrap_or(1),
        ))
    }
}
