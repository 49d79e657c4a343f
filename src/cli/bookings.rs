use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use itertools::Itertools;

use crate::{
    api::{
        Backend,
        holidaze::models::{BookingId, VenueId},
    },
    cli::api::ApiArgs,
    core::{
        booking::{BookingError, BookingForm, BookingSubmitter, SubmissionState},
        interval::midnight,
        session::SessionSlot,
    },
    prelude::*,
    tables::build_bookings_table,
};

#[derive(Parser)]
pub struct BookingsArgs {
    #[command(subcommand)]
    command: BookingsCommand,
}

impl BookingsArgs {
    pub async fn run(self, api: &ApiArgs, slot: &SessionSlot) -> Result {
        let user_name = slot.require()?.user_name.as_str();
        let client = api.new_client(slot)?;
        match self.command {
            BookingsCommand::List => {
                let bookings = client.get_profile_bookings(user_name).await?;
                println!("{}", build_bookings_table(&bookings));
            }
            BookingsCommand::Create { venue_id, form } => {
                let mut submitter = BookingSubmitter::load(&client, &venue_id).await?;
                submitter.submit(&form.into()).await;
                println!("{}", outcome(&submitter)?);
            }
            BookingsCommand::Reschedule { id, form } => {
                let venue_id = client
                    .get_profile_bookings(user_name)
                    .await?
                    .into_iter()
                    .find(|booking| booking.id == id)
                    .with_context(|| format!("booking `{id}` is not yours"))?
                    .venue
                    .with_context(|| format!("booking `{id}` has no venue"))?
                    .id;
                let mut submitter = BookingSubmitter::load(&client, &venue_id).await?;
                submitter.reschedule(&id, &form.into()).await;
                println!("{}", outcome(&submitter)?);
            }
            BookingsCommand::Cancel { id } => {
                client.delete_booking(&id).await?;
                println!("cancelled booking `{id}`");
            }
        }
        Ok(())
    }
}

#[derive(Subcommand)]
enum BookingsCommand {
    /// List your bookings.
    List,

    /// Book the venue.
    Create {
        venue_id: VenueId,

        #[clap(flatten)]
        form: BookingFormArgs,
    },

    /// Move your booking to other dates.
    Reschedule {
        id: BookingId,

        #[clap(flatten)]
        form: BookingFormArgs,
    },

    /// Cancel your booking.
    Cancel { id: BookingId },
}

#[derive(Copy, Clone, Parser)]
struct BookingFormArgs {
    /// Check-in date, for example `2025-06-01`.
    #[clap(long = "from")]
    start: Option<NaiveDate>,

    /// Check-out date.
    #[clap(long = "to")]
    end: Option<NaiveDate>,

    #[clap(long, default_value = "1")]
    guests: u32,
}

impl From<BookingFormArgs> for BookingForm {
    fn from(args: BookingFormArgs) -> Self {
        Self { start: args.start.map(midnight), end: args.end.map(midnight), guests: args.guests }
    }
}

/// Describe the last submission, failing unless it succeeded.
fn outcome<B: Backend + ?Sized>(submitter: &BookingSubmitter<'_, B>) -> Result<String> {
    match submitter.state() {
        SubmissionState::Succeeded(confirmation) => Ok(format!(
            "{confirmation}, {} night(s) for {} guest(s), booking `{}`",
            confirmation.interval.n_nights(),
            confirmation.guests,
            confirmation.booking_id,
        )),
        SubmissionState::Failed(BookingError::Unavailable) => {
            let taken = submitter
                .reservations()
                .sorted_by_key(|interval| interval.start)
                .map(|interval| {
                    format!(
                        "{} to {}",
                        interval.start.format("%Y-%m-%d"),
                        interval.end.format("%Y-%m-%d"),
                    )
                })
                .join(", ");
            bail!("{}, the venue is taken on: {taken}", BookingError::Unavailable)
        }
        SubmissionState::Failed(error) => bail!("{error}"),
        state => bail!("unexpected submission state: {state:?}"),
    }
}
