//! Local form rules, checked before anything reaches the API.

use reqwest::Url;

use crate::api::holidaze::models::VenueDraft;

/// Only students may register.
pub const REQUIRED_EMAIL_SUFFIX: &str = "@stud.noroff.no";

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub const MAX_GUESTS: u32 = 50;

const IMAGE_URL_HINTS: [&str; 10] =
    [".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg", "image", "photo", "picture", "unsplash"];

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("please fill in all required fields")]
    MissingFields,

    #[error("registration is only allowed with a @stud.noroff.no email address")]
    ForeignEmail,

    #[error("password must be at least 8 characters long")]
    ShortPassword,

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("venue name is required")]
    MissingVenueName,

    #[error("venue description is required")]
    MissingVenueDescription,

    #[error("price must be greater than 0")]
    NonPositivePrice,

    #[error("max guests must be between 1 and 50")]
    MaxGuestsOutOfRange,

    #[error("rating must be between 0 and 5")]
    RatingOutOfRange,

    #[error("`{0}` is not a valid image URL")]
    InvalidImageUrl(String),
}

/// Registration credentials as typed in.
#[derive(Clone, Debug, Default)]
pub struct CredentialsDraft {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

pub fn validate_credentials(draft: &CredentialsDraft) -> Result<(), ValidationError> {
    if [&draft.name, &draft.email, &draft.password, &draft.password_confirmation]
        .iter()
        .any(|field| field.trim().is_empty())
    {
        return Err(ValidationError::MissingFields);
    }
    if !draft.email.ends_with(REQUIRED_EMAIL_SUFFIX) {
        return Err(ValidationError::ForeignEmail);
    }
    if draft.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::ShortPassword);
    }
    if draft.password != draft.password_confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Collect every problem of the venue form at once.
#[must_use]
pub fn validate_venue(draft: &VenueDraft) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if draft.name.trim().is_empty() {
        errors.push(ValidationError::MissingVenueName);
    }
    if draft.description.trim().is_empty() {
        errors.push(ValidationError::MissingVenueDescription);
    }
    if draft.price <= 0.0 {
        errors.push(ValidationError::NonPositivePrice);
    }
    if !(1..=MAX_GUESTS).contains(&draft.max_guests) {
        errors.push(ValidationError::MaxGuestsOutOfRange);
    }
    if let Some(rating) = draft.rating
        && !(0.0..=5.0).contains(&rating)
    {
        errors.push(ValidationError::RatingOutOfRange);
    }
    errors.extend(
        draft
            .media
            .iter()
            .filter(|media| !is_valid_image_url(&media.url))
            .map(|media| ValidationError::InvalidImageUrl(media.url.clone())),
    );
    errors
}

/// Loose check that the URL is absolute and looks like it points to an image.
#[must_use]
pub fn is_valid_image_url(url: &str) -> bool {
    if Url::parse(url).is_err() {
        return false;
    }
    let url = url.to_lowercase();
    IMAGE_URL_HINTS.iter().any(|hint| url.contains(hint))
}
