use clap::{Parser, Subcommand};
use enumset::EnumSet;
use itertools::Itertools;

use crate::{
    api::holidaze::{
        Page,
        SortOrder,
        models::{Amenity, Location, Media, VenueDraft, VenueId},
    },
    cli::api::ApiArgs,
    core::{
        session::{Session, SessionSlot},
        validation::validate_venue,
    },
    prelude::*,
    tables::{build_received_bookings_table, build_venue_details_table, build_venues_table},
};

#[derive(Parser)]
pub struct VenuesArgs {
    #[command(subcommand)]
    command: VenuesCommand,
}

impl VenuesArgs {
    pub async fn run(self, api: &ApiArgs, slot: &SessionSlot) -> Result {
        match self.command {
            VenuesCommand::List(args) => args.run(api).await,
            VenuesCommand::Search { query } => {
                let venues = api.new_anonymous_client()?.search_venues(&query).await?;
                println!("{}", build_venues_table(&venues));
                Ok(())
            }
            VenuesCommand::Show { id, owner } => {
                let venue = api.new_anonymous_client()?.get_venue(&id, owner).await?;
                println!("{}", build_venue_details_table(&venue));
                Ok(())
            }
            VenuesCommand::Create(form) => {
                require_venue_manager(slot)?;
                let draft = form.into_draft()?;
                let venue = api.new_client(slot)?.create_venue(&draft).await?;
                println!("{}", build_venue_details_table(&venue));
                Ok(())
            }
            VenuesCommand::Update { id, form } => {
                require_venue_manager(slot)?;
                let draft = form.into_draft()?;
                let venue = api.new_client(slot)?.update_venue(&id, &draft).await?;
                println!("{}", build_venue_details_table(&venue));
                Ok(())
            }
            VenuesCommand::Delete { id } => {
                require_venue_manager(slot)?;
                api.new_client(slot)?.delete_venue(&id).await?;
                println!("deleted venue `{id}`");
                Ok(())
            }
            VenuesCommand::Mine => {
                let session = require_venue_manager(slot)?;
                let venues = api.new_client(slot)?.get_profile_venues(&session.user_name).await?;
                println!("{}", build_venues_table(&venues));
                println!("{}", build_received_bookings_table(&venues));
                Ok(())
            }
        }
    }
}

#[derive(Subcommand)]
enum VenuesCommand {
    /// List the venues page by page.
    List(ListArgs),

    /// Search the venues by name and description.
    Search { query: String },

    /// Show the venue with its bookings.
    Show {
        id: VenueId,

        /// Include the venue owner.
        #[clap(long)]
        owner: bool,
    },

    /// Create a new venue (venue managers only).
    Create(VenueFormArgs),

    /// Replace the venue details (venue managers only).
    Update {
        id: VenueId,

        #[clap(flatten)]
        form: VenueFormArgs,
    },

    /// Delete the venue (venue managers only).
    Delete { id: VenueId },

    /// List your own venues together with the bookings they received.
    Mine,
}

#[derive(Parser)]
struct ListArgs {
    #[clap(long, default_value = "1")]
    page: u32,

    #[clap(long, default_value = "20")]
    limit: u32,

    /// Field to sort by, for example `created` or `price`.
    #[clap(long)]
    sort: Option<String>,

    #[clap(long)]
    sort_order: Option<SortOrder>,
}

impl ListArgs {
    async fn run(self, api: &ApiArgs) -> Result {
        let page = Page::builder()
            .page(self.page)
            .limit(self.limit)
            .maybe_sort(self.sort.as_deref())
            .maybe_sort_order(self.sort_order)
            .build();
        let envelope = api.new_anonymous_client()?.get_venues(page).await?;
        println!("{}", build_venues_table(&envelope.data));
        if let (Some(current_page), Some(page_count)) =
            (envelope.meta.current_page, envelope.meta.page_count)
        {
            println!(
                "page {current_page} of {page_count}, {} venues in total",
                envelope.meta.total_count.unwrap_or_default(),
            );
        }
        if envelope.meta.is_last_page == Some(false) {
            println!("next page: `--page {}`", self.page + 1);
        }
        Ok(())
    }
}

#[derive(Parser)]
struct VenueFormArgs {
    #[clap(long)]
    name: String,

    #[clap(long)]
    description: String,

    /// Price per night.
    #[clap(long)]
    price: f64,

    #[clap(long)]
    max_guests: u32,

    #[clap(long)]
    rating: Option<f64>,

    /// Image URL, may be repeated.
    #[clap(long = "media")]
    media: Vec<String>,

    #[clap(long, value_delimiter = ',')]
    amenities: Vec<Amenity>,

    #[clap(long)]
    address: Option<String>,

    #[clap(long)]
    city: Option<String>,

    #[clap(long)]
    country: Option<String>,
}

impl VenueFormArgs {
    /// Build the payload and check it locally.
    fn into_draft(self) -> Result<VenueDraft> {
        let media = self
            .media
            .into_iter()
            .map(|url| Media { url, alt: self.name.clone() })
            .collect_vec();
        let location = Location {
            address: self.address,
            city: self.city,
            country: self.country,
            ..Location::default()
        };
        let draft = VenueDraft::builder()
            .name(self.name)
            .description(self.description)
            .media(media)
            .price(self.price)
            .max_guests(self.max_guests)
            .maybe_rating(self.rating)
            .meta(self.amenities.into_iter().collect::<EnumSet<_>>().into())
            .location(location)
            .build();
        let errors = validate_venue(&draft);
        if !errors.is_empty() {
            bail!("{}", errors.iter().join("; "));
        }
        Ok(draft)
    }
}

fn require_venue_manager(slot: &SessionSlot) -> Result<&Session> {
    let session = slot.require()?;
    ensure!(session.venue_manager, "only venue managers can manage venues");
    Ok(session)
}
