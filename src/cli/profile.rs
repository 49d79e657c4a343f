use clap::{Parser, Subcommand};

use crate::{
    api::{
        Backend,
        holidaze::models::{Media, ProfileUpdate},
    },
    cli::api::ApiArgs,
    core::{
        role::{RoleCommit, RoleStore},
        session::SessionSlot,
        validation::is_valid_image_url,
    },
    prelude::*,
    tables::build_profile_table,
};

#[derive(Parser)]
pub struct ProfileArgs {
    #[command(subcommand)]
    command: ProfileCommand,
}

impl ProfileArgs {
    pub async fn run(self, api: &ApiArgs, slot: SessionSlot) -> Result {
        let client = api.new_client(&slot)?;
        let user_name = slot.require()?.user_name.clone();
        match self.command {
            ProfileCommand::Show => {
                let profile = client.get_profile(&user_name).await?;
                println!("{}", build_profile_table(&profile));
            }
            ProfileCommand::Update(args) => {
                let update = args.into_update(&user_name)?;
                let profile = client.update_profile(&user_name, &update).await?;
                println!("{}", build_profile_table(&profile));
            }
            ProfileCommand::ToggleManager => {
                let mut store = RoleStore::new(&client, slot);
                let mut observer = store.subscribe();
                let RoleCommit { committed, value } = store.toggle_role().await?;
                if observer.has_changed()? {
                    println!("venue manager: {}", *observer.borrow_and_update());
                }
                if !committed {
                    warn!(value, "the API did not confirm the role, it may be out of sync");
                }
            }
            ProfileCommand::FetchRole => {
                let venue_manager = RoleStore::new(&client, slot).fetch_role().await?;
                println!("venue manager: {venue_manager}");
            }
        }
        Ok(())
    }
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Show your profile.
    Show,

    /// Update the bio, avatar or banner.
    Update(UpdateArgs),

    /// Switch between the customer and venue manager roles.
    ToggleManager,

    /// Refresh the remembered role from the API.
    FetchRole,
}

#[derive(Parser)]
struct UpdateArgs {
    #[clap(long)]
    bio: Option<String>,

    /// Avatar image URL.
    #[clap(long)]
    avatar: Option<String>,

    /// Banner image URL.
    #[clap(long)]
    banner: Option<String>,
}

impl UpdateArgs {
    fn into_update(self, user_name: &str) -> Result<ProfileUpdate> {
        ensure!(
            self.bio.is_some() || self.avatar.is_some() || self.banner.is_some(),
            "nothing to update"
        );
        Ok(ProfileUpdate::builder()
            .maybe_bio(self.bio)
            .maybe_avatar(image(self.avatar, &format!("{user_name}'s avatar"))?)
            .maybe_banner(image(self.banner, &format!("{user_name}'s banner"))?)
            .build())
    }
}

fn image(url: Option<String>, alt: &str) -> Result<Option<Media>> {
    url.map(|url| -> Result<Media> {
        ensure!(is_valid_image_url(&url), "`{url}` is not a valid image URL");
        Ok(Media { url, alt: alt.to_string() })
    })
    .transpose()
}
