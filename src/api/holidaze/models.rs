use bon::Builder;
use chrono::{DateTime, Utc};
use enumset::{EnumSet, EnumSetType};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::core::interval::{InvalidInterval, ReservationInterval};

#[derive(
    Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, derive_more::Display, derive_more::From,
)]
#[serde(transparent)]
#[from(forward)]
pub struct VenueId(String);

impl VenueId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(
    Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, derive_more::Display, derive_more::From,
)]
#[serde(transparent)]
#[from(forward)]
pub struct BookingId(String);

impl BookingId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Media {
    pub url: String,

    #[serde(default)]
    pub alt: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Location {
    pub address: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    pub continent: Option<String>,

    #[serde(rename = "lat")]
    pub latitude: Option<f64>,

    #[serde(rename = "lng")]
    pub longitude: Option<f64>,
}

impl Location {
    /// Human-readable `city, country` pair, skipping whatever is missing.
    #[must_use]
    pub fn short(&self) -> String {
        [self.city.as_deref(), self.country.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Hash, EnumSetType, clap::ValueEnum)]
pub enum Amenity {
    Wifi,
    Parking,
    Breakfast,
    Pets,
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize)]
pub struct VenueMeta {
    #[serde(default)]
    pub wifi: bool,

    #[serde(default)]
    pub parking: bool,

    #[serde(default)]
    pub breakfast: bool,

    #[serde(default)]
    pub pets: bool,
}

impl From<VenueMeta> for EnumSet<Amenity> {
    fn from(meta: VenueMeta) -> Self {
        [
            (meta.wifi, Amenity::Wifi),
            (meta.parking, Amenity::Parking),
            (meta.breakfast, Amenity::Breakfast),
            (meta.pets, Amenity::Pets),
        ]
        .into_iter()
        .filter_map(|(is_available, amenity)| is_available.then_some(amenity))
        .collect()
    }
}

impl From<EnumSet<Amenity>> for VenueMeta {
    fn from(amenities: EnumSet<Amenity>) -> Self {
        Self {
            wifi: amenities.contains(Amenity::Wifi),
            parking: amenities.contains(Amenity::Parking),
            breakfast: amenities.contains(Amenity::Breakfast),
            pets: amenities.contains(Amenity::Pets),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Venue {
    pub id: VenueId,
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub media: Vec<Media>,

    pub price: f64,

    #[serde(rename = "maxGuests")]
    pub max_guests: u32,

    #[serde(default)]
    pub rating: f64,

    #[serde(default)]
    pub meta: VenueMeta,

    #[serde(default)]
    pub location: Location,

    /// Embedded with `_owner=true`.
    pub owner: Option<Profile>,

    /// Embedded with `_bookings=true`.
    pub bookings: Option<Vec<Booking>>,
}

impl Venue {
    #[must_use]
    pub fn amenities(&self) -> EnumSet<Amenity> {
        self.meta.into()
    }
}

/// Venue as embedded into a booking.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VenueSummary {
    pub id: VenueId,
    pub name: String,

    #[serde(default)]
    pub location: Location,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,

    #[serde(rename = "dateFrom")]
    pub date_from: DateTime<Utc>,

    #[serde(rename = "dateTo")]
    pub date_to: DateTime<Utc>,

    pub guests: u32,

    pub created: Option<DateTime<Utc>>,

    /// Embedded with `_venue=true`.
    pub venue: Option<VenueSummary>,

    /// Embedded with `_customer=true`.
    pub customer: Option<Profile>,
}

impl Booking {
    pub fn interval(&self) -> Result<ReservationInterval, InvalidInterval> {
        ReservationInterval::try_new(self.date_from, self.date_to)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub bio: Option<String>,
    pub avatar: Option<Media>,
    pub banner: Option<Media>,

    #[serde(default, rename = "venueManager")]
    pub venue_manager: bool,

    #[serde(rename = "_count")]
    pub count: Option<ProfileCount>,
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct ProfileCount {
    #[serde(default)]
    pub venues: u32,

    #[serde(default)]
    pub bookings: u32,
}

/// Login response: the profile together with the bearer token.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthenticatedProfile {
    #[serde(flatten)]
    pub profile: Profile,

    #[serde(rename = "accessToken")]
    pub access_token: String,
}

#[derive(Serialize)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Builder)]
pub struct Registration {
    #[builder(into)]
    pub name: String,

    #[builder(into)]
    pub email: String,

    #[builder(into)]
    pub password: String,

    #[serde(rename = "venueManager")]
    pub venue_manager: Option<bool>,
}

#[derive(Clone, Debug, Serialize, Builder)]
pub struct NewBooking {
    #[serde(rename = "venueId")]
    pub venue_id: VenueId,

    #[serde(rename = "dateFrom")]
    pub date_from: DateTime<Utc>,

    #[serde(rename = "dateTo")]
    pub date_to: DateTime<Utc>,

    pub guests: u32,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Builder)]
pub struct BookingUpdate {
    #[serde(rename = "dateFrom")]
    pub date_from: Option<DateTime<Utc>>,

    #[serde(rename = "dateTo")]
    pub date_to: Option<DateTime<Utc>>,

    pub guests: Option<u32>,
}

/// Payload of the venue create and update calls.
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Builder)]
pub struct VenueDraft {
    #[builder(into)]
    pub name: String,

    #[builder(into)]
    pub description: String,

    #[builder(default)]
    pub media: Vec<Media>,

    pub price: f64,

    #[serde(rename = "maxGuests")]
    pub max_guests: u32,

    pub rating: Option<f64>,

    #[builder(default)]
    pub meta: VenueMeta,

    pub location: Option<Location>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Builder)]
pub struct ProfileUpdate {
    #[builder(into)]
    pub bio: Option<String>,

    pub avatar: Option<Media>,
    pub banner: Option<Media>,

    #[serde(rename = "venueManager")]
    pub venue_manager: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn deserialize_venue_with_bookings_ok() -> Result {
        // language=json
        let body = r#"{
            "id": "5a6e5d52-2f1b-4f3c-9c52-8b5f7f0c9a10",
            "name": "Cabin by the fjord",
            "description": "Quiet place",
            "media": [{ "url": "https://images.example.com/cabin.jpg", "alt": "Cabin" }],
            "price": 1200,
            "maxGuests": 4,
            "rating": 4.5,
            "created": "2025-01-10T12:00:00.000Z",
            "updated": "2025-01-10T12:00:00.000Z",
            "meta": { "wifi": true, "parking": false, "breakfast": true, "pets": false },
            "location": { "address": null, "city": "Bergen", "zip": null, "country": "Norway", "continent": null, "lat": 0, "lng": 0 },
            "bookings": [
                {
                    "id": "b1",
                    "dateFrom": "2025-06-01T00:00:00.000Z",
                    "dateTo": "2025-06-05T00:00:00.000Z",
                    "guests": 2,
                    "created": "2025-05-01T10:00:00.000Z",
                    "updated": "2025-05-01T10:00:00.000Z"
                }
            ]
        }"#;
        let venue = serde_json::from_str::<Venue>(body)?;
        assert_eq!(venue.max_guests, 4);
        assert_eq!(venue.location.short(), "Bergen, Norway");
        assert_eq!(venue.amenities(), Amenity::Wifi | Amenity::Breakfast);
        let bookings = venue.bookings.context("no bookings")?;
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].interval()?.n_nights(), 4);
        Ok(())
    }

    #[test]
    fn deserialize_authenticated_profile_ok() -> Result {
        // language=json
        let body = r#"{
            "name": "kari",
            "email": "kari@stud.noroff.no",
            "bio": null,
            "avatar": { "url": "https://images.example.com/kari.png", "alt": "" },
            "banner": null,
            "accessToken": "token",
            "venueManager": true
        }"#;
        let profile = serde_json::from_str::<AuthenticatedProfile>(body)?;
        assert_eq!(profile.access_token, "token");
        assert!(profile.profile.venue_manager);
        Ok(())
    }

    #[test]
    fn serialize_new_booking_ok() -> Result {
        let booking = NewBooking::builder()
            .venue_id(VenueId::from("v1"))
            .date_from(DateTime::parse_from_rfc3339("2025-06-01T00:00:00Z")?.to_utc())
            .date_to(DateTime::parse_from_rfc3339("2025-06-05T00:00:00Z")?.to_utc())
            .guests(2)
            .build();
        assert_eq!(
            serde_json::to_value(&booking)?,
            serde_json::json!({
                "venueId": "v1",
                "dateFrom": "2025-06-01T00:00:00Z",
                "dateTo": "2025-06-05T00:00:00Z",
                "guests": 2,
            }),
        );
        Ok(())
    }

    #[test]
    fn profile_update_skips_missing_fields() -> Result {
        let update = ProfileUpdate::builder().bio("Hello").build();
        assert_eq!(serde_json::to_value(&update)?, serde_json::json!({ "bio": "Hello" }));
        Ok(())
    }

    #[test]
    fn amenities_round_trip_through_meta() {
        let amenities = Amenity::Parking | Amenity::Pets;
        assert_eq!(EnumSet::from(VenueMeta::from(amenities)), amenities);
    }
}
