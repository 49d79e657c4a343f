//! Two-step registration: credentials first, then the role.

use crate::{
    api::{
        Backend,
        holidaze::{
            ApiError,
            models::{Profile, Registration},
        },
    },
    core::validation::{CredentialsDraft, validate_credentials},
    prelude::*,
};

const ALREADY_REGISTERED: &str =
    "this email or name is already registered, please log in or use a different one";

#[must_use]
#[derive(Clone, Debug)]
pub enum RegistrationStep {
    /// Filling in the credentials, possibly after a failed attempt.
    Credentials { draft: CredentialsDraft, error: Option<String> },

    /// Credentials are valid, choosing between a customer and a venue manager.
    Role { draft: CredentialsDraft },

    Registered(Profile),
}

impl Default for RegistrationStep {
    fn default() -> Self {
        Self::Credentials { draft: CredentialsDraft::default(), error: None }
    }
}

impl RegistrationStep {
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Credentials { error, .. } => error.as_deref(),
            _ => None,
        }
    }

    /// Validate the credentials and proceed to the role choice.
    ///
    /// Submitting from any other step restarts the wizard with the new draft.
    pub fn submit_credentials(self, draft: CredentialsDraft) -> Self {
        match validate_credentials(&draft) {
            Ok(()) => {
                debug!(name = %draft.name, "credentials accepted");
                Self::Role { draft }
            }
            Err(error) => Self::Credentials { draft, error: Some(error.to_string()) },
        }
    }

    /// Return to the credentials, keeping what has been typed.
    pub fn back(self) -> Self {
        match self {
            Self::Role { draft } => Self::Credentials { draft, error: None },
            step => step,
        }
    }

    /// Show the error on the credentials step, leaving other steps as they are.
    fn with_error(self, error: impl Into<String>) -> Self {
        match self {
            Self::Credentials { draft, .. } => {
                Self::Credentials { draft, error: Some(error.into()) }
            }
            step => step,
        }
    }

    /// Register the user with the chosen role.
    ///
    /// On failure, the wizard returns to the credentials with the error message.
    #[instrument(skip_all, fields(venue_manager = venue_manager))]
    pub async fn choose_role<B: Backend + ?Sized>(self, backend: &B, venue_manager: bool) -> Self {
        let draft = match self {
            Self::Role { draft } => draft,
            credentials @ Self::Credentials { .. } => {
                warn!("no credentials to register with");
                return credentials.with_error("registration data is missing, please start over");
            }
            registered @ Self::Registered(_) => return registered,
        };
        let registration = Registration::builder()
            .name(draft.name.trim())
            .email(draft.email.trim())
            .password(draft.password.as_str())
            .venue_manager(venue_manager)
            .build();
        match backend.register(&registration).await {
            Ok(profile) => {
                info!(name = %profile.name, "registered");
                Self::Registered(profile)
            }
            Err(error) => {
                warn!("registration failed: {error:#}");
                Self::Role { draft }.back().with_error(describe_failure(&error))
            }
        }
    }
}

fn describe_failure(error: &Error) -> String {
    match error.downcast_ref::<ApiError>().and_then(ApiError::server_message) {
        Some(message) if message.contains("Profile already exists") => {
            ALREADY_REGISTERED.to_string()
        }
        Some(message) => message.to_string(),
        None => "registration failed, please try again".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{FakeBackend, Reply};

    fn draft() -> CredentialsDraft {
        CredentialsDraft {
            name: "kari".to_string(),
            email: "kari@stud.noroff.no".to_string(),
            password: "correct horse".to_string(),
            password_confirmation: "correct horse".to_string(),
        }
    }

    #[test]
    fn invalid_credentials_stay_on_first_step() {
        let step = RegistrationStep::default()
            .submit_credentials(CredentialsDraft { email: "kari@example.com".to_string(), ..draft() });
        assert!(matches!(step, RegistrationStep::Credentials { .. }));
        assert!(step.error().is_some_and(|error| error.contains("@stud.noroff.no")));
    }

    #[test]
    fn back_keeps_the_draft() {
        let step = RegistrationStep::default().submit_credentials(draft()).back();
        match step {
            RegistrationStep::Credentials { draft, error } => {
                assert_eq!(draft.name, "kari");
                assert_eq!(draft.password, "correct horse");
                assert!(error.is_none());
            }
            step => panic!("unexpected step: {step:?}"),
        }
    }

    #[tokio::test]
    async fn register_venue_manager() {
        let backend = FakeBackend::new(Reply::Ok);
        let step = RegistrationStep::default()
            .submit_credentials(draft())
            .choose_role(&backend, true)
            .await;
        match step {
            RegistrationStep::Registered(profile) => {
                assert_eq!(profile.name, "kari");
                assert!(profile.venue_manager);
            }
            step => panic!("unexpected step: {step:?}"),
        }
        assert_eq!(backend.n_calls("register"), 1);
    }

    #[tokio::test]
    async fn existing_profile_is_explained() {
        let backend = FakeBackend::new(Reply::Rejected("Profile already exists"));
        let step = RegistrationStep::default()
            .submit_credentials(draft())
            .choose_role(&backend, false)
            .await;
        assert_eq!(step.error(), Some(ALREADY_REGISTERED));
        let RegistrationStep::Credentials { draft, .. } = step else {
            panic!("expected to return to the credentials");
        };
        assert_eq!(draft.email, "kari@stud.noroff.no");
    }

    #[tokio::test]
    async fn opaque_failure_is_generic() {
        let backend = FakeBackend::new(Reply::Failed);
        let step = RegistrationStep::default()
            .submit_credentials(draft())
            .choose_role(&backend, false)
            .await;
        assert_eq!(step.error(), Some("registration failed, please try again"));
    }

    #[tokio::test]
    async fn role_without_credentials_asks_to_start_over() {
        let backend = FakeBackend::new(Reply::Ok);
        let step = RegistrationStep::default().choose_role(&backend, false).await;
        assert!(step.error().is_some_and(|error| error.contains("start over")));
        assert_eq!(backend.n_calls("register"), 0);
    }
}
