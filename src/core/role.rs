use tokio::sync::watch;

use crate::{api::Backend, core::session::SessionSlot, prelude::*};

/// Outcome of a role toggle.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RoleCommit {
    /// Whether the API confirmed the value, as opposed to the optimistic guess.
    pub committed: bool,

    pub value: bool,
}

/// Owner of the venue manager role flag.
///
/// The flag lives in a [`watch`] channel, so that any number of observers can read
/// the latest value or wait for a change, and is mirrored into the session slot.
/// Both are written together, and the API stays the source of truth.
pub struct RoleStore<'a, B: ?Sized> {
    backend: &'a B,
    slot: SessionSlot,
    sender: watch::Sender<bool>,
}

impl<'a, B: Backend + ?Sized> RoleStore<'a, B> {
    /// Start from the role remembered in the session slot.
    pub fn new(backend: &'a B, slot: SessionSlot) -> Self {
        let (sender, _) =
            watch::channel(slot.session().is_some_and(|session| session.venue_manager));
        Self { backend, slot, sender }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.sender.subscribe()
    }

    #[must_use]
    pub fn is_venue_manager(&self) -> bool {
        *self.sender.borrow()
    }

    /// Read the role from the API and remember it.
    #[instrument(skip_all)]
    pub async fn fetch_role(&mut self) -> Result<bool> {
        let user_name = self.slot.require()?.user_name.clone();
        let venue_manager = self.backend.get_profile(&user_name).await?.venue_manager;
        self.slot.set_venue_manager(venue_manager)?;
        self.sender.send_if_modified(|current| {
            let is_modified = *current != venue_manager;
            *current = venue_manager;
            is_modified
        });
        info!(venue_manager, "fetched the role");
        Ok(venue_manager)
    }

    /// Flip the role via the API.
    ///
    /// On failure, the role stays as it was. When the API accepted the change but its
    /// response is unparsable, the optimistic value is kept and reported as not
    /// committed.
    #[instrument(skip_all)]
    pub async fn toggle_role(&mut self) -> Result<RoleCommit> {
        let user_name = self.slot.require()?.user_name.clone();
        let optimistic = !self.is_venue_manager();
        info!(optimistic, "toggling the role…");
        let commit = match self.backend.set_venue_manager(&user_name, optimistic).await? {
            Some(value) => RoleCommit { committed: true, value },
            None => {
                warn!("the role is not confirmed, assuming the optimistic value");
                RoleCommit { committed: false, value: optimistic }
            }
        };
        self.slot.set_venue_manager(commit.value)?;
        self.sender.send_replace(commit.value);
        info!(commit.committed, commit.value, "toggled the role");
        Ok(commit)
    }
}
