use std::path::PathBuf;

use clap::Parser;

use crate::{core::session::SessionSlot, prelude::*};

#[derive(Parser)]
pub struct SessionArgs {
    /// File to remember the logged-in user in.
    #[clap(long = "session-path", env = "HOLIDAZE_SESSION_PATH", default_value = "session.toml")]
    path: PathBuf,
}

impl SessionArgs {
    pub fn open(&self) -> Result<SessionSlot> {
        SessionSlot::open(&self.path)
    }
}
