use reqwest::StatusCode;
use serde::Deserialize;

/// Successful response envelope.
#[derive(Deserialize)]
pub struct Envelope<T> {
    pub data: T,

    #[serde(default)]
    pub meta: Meta,
}

/// Pagination details, only filled in by the list endpoints.
#[derive(Copy, Clone, Debug, Default, Deserialize)]
pub struct Meta {
    #[serde(rename = "isLastPage")]
    pub is_last_page: Option<bool>,

    #[serde(rename = "currentPage")]
    pub current_page: Option<u32>,

    #[serde(rename = "pageCount")]
    pub page_count: Option<u32>,

    #[serde(rename = "totalCount")]
    pub total_count: Option<u32>,
}

/// Error response envelope.
#[derive(Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    errors: Vec<ErrorMessage>,
}

#[derive(Deserialize)]
struct ErrorMessage {
    message: String,
}

/// Non-successful API response.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The API explained what went wrong.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    /// Nothing usable in the response body.
    #[error("request failed with status {status}")]
    Failed { status: StatusCode },
}

impl ApiError {
    /// Build the error from a non-successful response body.
    ///
    /// Only the first message of the error envelope is kept.
    pub fn from_body(status: StatusCode, body: &[u8]) -> Self {
        serde_json::from_slice::<ErrorEnvelope>(body)
            .ok()
            .and_then(|envelope| envelope.errors.into_iter().next())
            .map_or(Self::Failed { status }, |error| Self::Rejected {
                status,
                message: error.message,
            })
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Rejected { status, .. } | Self::Failed { status } => *status,
        }
    }

    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => Some(message),
            Self::Failed { .. } => None,
        }
    }
}
