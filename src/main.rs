#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod api;
mod cli;
mod core;
mod prelude;
mod tables;

use std::process::ExitCode;

use clap::{Parser, crate_version};
use reqwest::StatusCode;

use crate::{api::holidaze::ApiError, cli::Args, core::session::NotLoggedIn, prelude::*};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    debug!(version = crate_version!(), "starting…");

    match Args::parse().run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            match login_hint(&error) {
                Some(hint) => eprintln!("{hint}: `holidaze login --email <EMAIL>`"),
                None => error!("{error:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

/// Errors that are fixed by logging in (again) rather than reported.
fn login_hint(error: &Error) -> Option<String> {
    if error.downcast_ref::<NotLoggedIn>().is_some() {
        return Some(error.to_string());
    }
    error
        .downcast_ref::<ApiError>()
        .filter(|error| error.status() == StatusCode::UNAUTHORIZED)
        .map(|_| "the session has expired, please log in again".to_string())
}
