use std::{
    fs,
    path::{Path, PathBuf},
};

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Authenticated user as remembered between the runs.
#[must_use]
#[derive(Clone, Debug, Serialize, Deserialize, Builder)]
pub struct Session {
    #[builder(into)]
    pub access_token: String,

    #[builder(into)]
    pub user_name: String,

    #[serde(default)]
    #[builder(default)]
    pub venue_manager: bool,
}

#[derive(Copy, Clone, Debug, thiserror::Error)]
#[error("no user found, please log in")]
pub struct NotLoggedIn;

/// Durable session slot backed by a TOML file.
///
/// An absent file means that nobody is logged in.
pub struct SessionSlot {
    path: PathBuf,
    session: Option<Session>,
}

impl SessionSlot {
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let session = if path.is_file() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("failed to read `{}`", path.display()))?;
            Some(
                toml::from_str::<Session>(&contents)
                    .with_context(|| format!("failed to parse `{}`", path.display()))?,
            )
        } else {
            None
        };
        debug!(is_logged_in = session.is_some(), "opened the session slot");
        Ok(Self { path, session })
    }

    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn require(&self) -> Result<&Session, NotLoggedIn> {
        self.session.as_ref().ok_or(NotLoggedIn)
    }

    #[instrument(skip_all, fields(user_name = %session.user_name))]
    pub fn store(&mut self, session: Session) -> Result {
        fs::write(&self.path, toml::to_string(&session)?)
            .with_context(|| format!("failed to write `{}`", self.path.display()))?;
        info!("stored the session");
        self.session = Some(session);
        Ok(())
    }

    /// Update the remembered venue manager role of the current session.
    pub fn set_venue_manager(&mut self, venue_manager: bool) -> Result {
        let mut session = self.require()?.clone();
        session.venue_manager = venue_manager;
        self.store(session)
    }

    /// Forget the session entirely.
    #[instrument(skip_all)]
    pub fn clear(&mut self) -> Result {
        if self.path.is_file() {
            fs::remove_file(&self.path)
                .with_context(|| format!("failed to remove `{}`", self.path.display()))?;
        }
        self.session = None;
        info!("cleared the session");
        Ok(())
    }
}
