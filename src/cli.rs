mod api;
mod auth;
mod bookings;
mod profile;
mod session;
mod venues;

use clap::{Parser, Subcommand};

use crate::{
    cli::{
        api::ApiArgs,
        auth::{LoginArgs, RegisterArgs},
        bookings::BookingsArgs,
        profile::ProfileArgs,
        session::SessionArgs,
        venues::VenuesArgs,
    },
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[clap(flatten)]
    api: ApiArgs,

    #[clap(flatten)]
    session: SessionArgs,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub async fn run(self) -> Result {
        let mut slot = self.session.open()?;
        match self.command {
            Command::Login(args) => args.run(&self.api, &mut slot).await,
            Command::Register(args) => args.run(&self.api).await,
            Command::Logout => auth::logout(&mut slot),
            Command::Venues(args) => args.run(&self.api, &slot).await,
            Command::Bookings(args) => args.run(&self.api, &slot).await,
            Command::Profile(args) => args.run(&self.api, slot).await,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Log in and remember the session.
    Login(LoginArgs),

    /// Register a new profile.
    Register(RegisterArgs),

    /// Forget the session.
    Logout,

    /// Browse and manage the venues.
    Venues(Box<VenuesArgs>),

    /// Book venues and manage your bookings.
    Bookings(BookingsArgs),

    /// Show and update your profile.
    Profile(ProfileArgs),
}
