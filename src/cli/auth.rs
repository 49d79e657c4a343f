use clap::Parser;

use crate::{
    cli::api::ApiArgs,
    core::{
        registration::RegistrationStep,
        session::{Session, SessionSlot},
        validation::CredentialsDraft,
    },
    prelude::*,
    tables::build_profile_table,
};

#[derive(Parser)]
pub struct LoginArgs {
    #[clap(long, env = "HOLIDAZE_EMAIL")]
    email: String,

    #[clap(long, env = "HOLIDAZE_PASSWORD", hide_env_values = true)]
    password: String,
}

impl LoginArgs {
    #[instrument(skip_all, fields(email = %self.email))]
    pub async fn run(self, api: &ApiArgs, slot: &mut SessionSlot) -> Result {
        let profile = api.new_anonymous_client()?.login(&self.email, &self.password).await?;
        info!(
            name = %profile.profile.name,
            venue_manager = profile.profile.venue_manager,
            "logged in"
        );
        slot.store(
            Session::builder()
                .access_token(profile.access_token)
                .user_name(profile.profile.name.as_str())
                .venue_manager(profile.profile.venue_manager)
                .build(),
        )?;
        println!("{}", build_profile_table(&profile.profile));
        Ok(())
    }
}

#[derive(Parser)]
pub struct RegisterArgs {
    #[clap(long)]
    name: String,

    /// Must be a `@stud.noroff.no` address.
    #[clap(long)]
    email: String,

    #[clap(long, env = "HOLIDAZE_PASSWORD", hide_env_values = true)]
    password: String,

    /// Repeat the password.
    #[clap(long = "confirm-password")]
    password_confirmation: String,

    /// Register as a venue manager instead of a customer.
    #[clap(long)]
    venue_manager: bool,
}

impl RegisterArgs {
    pub async fn run(self, api: &ApiArgs) -> Result {
        let draft = CredentialsDraft {
            name: self.name,
            email: self.email,
            password: self.password,
            password_confirmation: self.password_confirmation,
        };
        let step = RegistrationStep::default().submit_credentials(draft);
        if let Some(error) = step.error() {
            bail!("{error}");
        }
        let step = step.choose_role(&api.new_anonymous_client()?, self.venue_manager).await;
        match step {
            RegistrationStep::Registered(profile) => {
                println!("{}", build_profile_table(&profile));
                println!("registered, you can now log in");
                Ok(())
            }
            step => bail!("{}", step.error().unwrap_or("registration failed")),
        }
    }
}

pub fn logout(slot: &mut SessionSlot) -> Result {
    slot.clear()?;
    println!("logged out");
    Ok(())
}
