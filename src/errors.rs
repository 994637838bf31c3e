use sqlx;
use thiserror::Error;

/// Enumerates high-level errors returned by this library.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Represents an SQL error.
    #[error("SQLx error")]
    Sqlx { source: sqlx::Error },

    /// Represents an attempt to reuse an existing name.
    #[error("Recommendations names must be unique")]
    NameAlreadyExists,

    /// Represents an operation on an ID with no matching recommendation.
    #[error("no recommendation with ID {0} exists")]
    NonExistentId(i32),

    /// Represents a random pick against an empty catalog.
    #[error("no recommendations exist")]
    NoRecommendations,

    /// Represents an ID that could not be parsed.
    #[error("invalid ID: {0}")]
    InvalidId(String),

    /// Represents a submission without a usable name.
    #[error("name must not be empty")]
    MissingName,

    /// Represents a link that does not point at a recognized video host.
    #[error("link is not a recognized video URL: {0}")]
    InvalidLink(String),

    /// Represents a stored link that could not be parsed back into a URL.
    #[error("unable to parse URL {url}")]
    UnableToParseUrl {
        url: String,
        source: url::ParseError,
    },
}
