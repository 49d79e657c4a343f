use clap::Parser;
use reqwest::Url;

use crate::{api::holidaze::Api, core::session::SessionSlot, prelude::*};

#[derive(Parser)]
pub struct ApiArgs {
    /// Noroff API base URL.
    #[clap(
        long = "api-base-url",
        env = "HOLIDAZE_API_BASE_URL",
        default_value = "https://v2.api.noroff.dev"
    )]
    base_url: Url,

    /// Noroff API key, sent with every request.
    #[clap(long = "api-key", env = "NOROFF_API_KEY")]
    api_key: String,
}

impl ApiArgs {
    /// Client without the bearer token.
    pub fn new_anonymous_client(&self) -> Result<Api> {
        Api::new(self.base_url.clone(), &self.api_key, None)
    }

    /// Client acting on behalf of the logged-in user.
    pub fn new_client(&self, slot: &SessionSlot) -> Result<Api> {
        let session = slot.require()?;
        Api::new(self.base_url.clone(), &self.api_key, Some(&session.access_token))
    }
}
