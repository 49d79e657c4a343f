//! [Noroff Holidaze](https://docs.noroff.dev/docs/v2/holidaze/venues) client.

pub mod models;
mod response;

use std::time::Duration;

use async_trait::async_trait;
use bon::Builder;
use http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

pub use self::response::{ApiError, Envelope};
use self::models::{
    AuthenticatedProfile,
    Booking,
    BookingId,
    BookingUpdate,
    Credentials,
    NewBooking,
    Profile,
    ProfileUpdate,
    Registration,
    Venue,
    VenueDraft,
    VenueId,
};
use crate::{api::Backend, prelude::*};

pub struct Api {
    client: Client,
    base_url: Url,
}

/// Venue listing parameters.
#[derive(Copy, Clone, Serialize, Builder)]
pub struct Page<'a> {
    #[builder(default = 1)]
    pub page: u32,

    #[builder(default = 20)]
    pub limit: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<&'a str>,

    #[serde(rename = "sortOrder", skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

#[derive(Copy, Clone, Serialize, clap::ValueEnum)]
pub enum SortOrder {
    #[serde(rename = "asc")]
    Ascending,

    #[serde(rename = "desc")]
    Descending,
}

impl Api {
    /// Build the client.
    ///
    /// The bearer token is only attached when there is a session.
    pub fn new(base_url: Url, api_key: &str, access_token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.append("X-Noroff-API-Key", HeaderValue::from_str(api_key)?);
        if let Some(access_token) = access_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {access_token}"))?;
            value.set_sensitive(true);
            headers.append(AUTHORIZATION, value);
        }
        let client = Client::builder()
            .user_agent("holidaze")
            .timeout(Duration::from_secs(15))
            .default_headers(headers)
            .build()?;
        Ok(Self { client, base_url })
    }

    #[instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthenticatedProfile> {
        info!("logging in…");
        let request = self
            .request(Method::POST, &["auth", "login"])?
            .query(&[("_holidaze", "true")])
            .json(&Credentials { email, password });
        Ok(Self::execute::<AuthenticatedProfile>(request).await.context("failed to log in")?.data)
    }

    #[instrument(skip_all, fields(name = name))]
    pub async fn get_profile_bookings(&self, name: &str) -> Result<Vec<Booking>> {
        info!("fetching…");
        let request = self
            .request(Method::GET, &["holidaze", "profiles", name, "bookings"])?
            .query(&[("_venue", "true")]);
        let bookings = Self::execute::<Vec<Booking>>(request)
            .await
            .context("failed to fetch the profile bookings")?
            .data;
        info!(n_bookings = bookings.len(), "fetched");
        Ok(bookings)
    }

    /// Fetch the venues managed by the profile, each with the bookings it received.
    #[instrument(skip_all, fields(name = name))]
    pub async fn get_profile_venues(&self, name: &str) -> Result<Vec<Venue>> {
        info!("fetching…");
        let request = self
            .request(Method::GET, &["holidaze", "profiles", name, "venues"])?
            .query(&[("_bookings", "true")]);
        let venues = Self::execute::<Vec<Venue>>(request)
            .await
            .context("failed to fetch the profile venues")?
            .data;
        info!(n_venues = venues.len(), "fetched");
        Ok(venues)
    }

    #[instrument(skip_all, fields(name = name))]
    pub async fn update_profile(&self, name: &str, update: &ProfileUpdate) -> Result<Profile> {
        info!("updating…");
        let request =
            self.request(Method::PUT, &["holidaze", "profiles", name])?.json(update);
        Ok(Self::execute(request).await.context("failed to update the profile")?.data)
    }

    #[instrument(skip_all, fields(page = page.page, limit = page.limit))]
    pub async fn get_venues(&self, page: Page<'_>) -> Result<Envelope<Vec<Venue>>> {
        info!("fetching…");
        let request = self.request(Method::GET, &["holidaze", "venues"])?.query(&page);
        Self::execute(request).await.context("failed to fetch the venues")
    }

    #[instrument(skip_all, fields(query = query))]
    pub async fn search_venues(&self, query: &str) -> Result<Vec<Venue>> {
        info!("searching…");
        let request =
            self.request(Method::GET, &["holidaze", "venues", "search"])?.query(&[("q", query)]);
        let venues = Self::execute::<Vec<Venue>>(request)
            .await
            .context("failed to search the venues")?
            .data;
        info!(n_venues = venues.len(), "found");
        Ok(venues)
    }

    #[instrument(skip_all, fields(id = %id))]
    pub async fn get_venue(&self, id: &VenueId, with_owner: bool) -> Result<Venue> {
        info!("fetching…");
        let request = self
            .request(Method::GET, &["holidaze", "venues", id.as_str()])?
            .query(&[("_bookings", "true"), ("_owner", if with_owner { "true" } else { "false" })]);
        Ok(Self::execute(request).await.context("failed to fetch the venue")?.data)
    }

    #[instrument(skip_all, fields(name = %draft.name))]
    pub async fn create_venue(&self, draft: &VenueDraft) -> Result<Venue> {
        info!("creating…");
        let request = self.request(Method::POST, &["holidaze", "venues"])?.json(draft);
        Ok(Self::execute(request).await.context("failed to create the venue")?.data)
    }

    #[instrument(skip_all, fields(id = %id))]
    pub async fn update_venue(&self, id: &VenueId, draft: &VenueDraft) -> Result<Venue> {
        info!("updating…");
        let request =
            self.request(Method::PUT, &["holidaze", "venues", id.as_str()])?.json(draft);
        Ok(Self::execute(request).await.context("failed to update the venue")?.data)
    }

    #[instrument(skip_all, fields(id = %id))]
    pub async fn delete_venue(&self, id: &VenueId) -> Result {
        info!("deleting…");
        let request = self.request(Method::DELETE, &["holidaze", "venues", id.as_str()])?;
        Self::execute_empty(request).await.context("failed to delete the venue")
    }

    #[instrument(skip_all, fields(id = %id))]
    pub async fn delete_booking(&self, id: &BookingId) -> Result {
        info!("deleting…");
        let request = self.request(Method::DELETE, &["holidaze", "bookings", id.as_str()])?;
        Self::execute_empty(request).await.context("failed to delete the booking")
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("invalid base URL"))?
            .pop_if_empty()
            .extend(segments);
        debug!(%method, %url, "requesting…");
        Ok(self.client.request(method, url))
    }

    async fn execute<R: DeserializeOwned>(request: RequestBuilder) -> Result<Envelope<R>> {
        let body = Self::send(request).await?;
        serde_json::from_slice(&body).context("failed to deserialize the response")
    }

    async fn execute_empty(request: RequestBuilder) -> Result {
        Self::send(request).await.map(drop)
    }

    /// Send the request and return the body of a successful response.
    ///
    /// Non-successful responses turn into [`ApiError`].
    async fn send(request: RequestBuilder) -> Result<Vec<u8>> {
        let response = request.send().await.context("failed to call the API")?;
        let status = response.status();
        let body = response.bytes().await.context("failed to read the response")?;
        if status.is_success() {
            debug!(%status, n_bytes = body.len(), "call succeeded");
            Ok(body.to_vec())
        } else {
            let error = ApiError::from_body(status, &body);
            warn!(%status, "{error}");
            Err(error.into())
        }
    }
}

#[async_trait]
impl Backend for Api {
    #[instrument(skip_all)]
    async fn register(&self, registration: &Registration) -> Result<Profile> {
        info!(name = %registration.name, "registering…");
        let request = self.request(Method::POST, &["auth", "register"])?.json(registration);
        Ok(Self::execute(request).await.context("failed to register")?.data)
    }

    #[instrument(skip_all, fields(name = name))]
    async fn get_profile(&self, name: &str) -> Result<Profile> {
        info!("fetching…");
        let request = self.request(Method::GET, &["holidaze", "profiles", name])?;
        Ok(Self::execute(request).await.context("failed to fetch the profile")?.data)
    }

    #[instrument(skip_all, fields(name = name, venue_manager = venue_manager))]
    async fn set_venue_manager(&self, name: &str, venue_manager: bool) -> Result<Option<bool>> {
        #[derive(Deserialize)]
        struct VenueManager {
            #[serde(rename = "venueManager")]
            venue_manager: bool,
        }

        info!("updating…");
        let request = self
            .request(Method::PUT, &["holidaze", "profiles", name])?
            .json(&ProfileUpdate::builder().venue_manager(venue_manager).build());
        let body = Self::send(request).await.context("failed to update the venue manager role")?;
        match serde_json::from_slice::<Envelope<VenueManager>>(&body) {
            Ok(envelope) => Ok(Some(envelope.data.venue_manager)),
            Err(error) => {
                warn!("unparsable response: {error:#}");
                Ok(None)
            }
        }
    }

    #[instrument(skip_all, fields(id = %venue_id))]
    async fn get_venue_with_bookings(&self, venue_id: &VenueId) -> Result<Venue> {
        self.get_venue(venue_id, false).await
    }

    #[instrument(skip_all, fields(venue_id = %booking.venue_id))]
    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking> {
        info!(guests = booking.guests, "booking…");
        let request = self.request(Method::POST, &["holidaze", "bookings"])?.json(booking);
        Ok(Self::execute(request).await.context("failed to create the booking")?.data)
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn update_booking(&self, id: &BookingId, update: &BookingUpdate) -> Result<Booking> {
        info!("updating…");
        let request =
            self.request(Method::PUT, &["holidaze", "bookings", id.as_str()])?.json(update);
        Ok(Self::execute(request).await.context("failed to update the booking")?.data)
    }
}
