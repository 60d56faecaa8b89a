//! Error types for pinmap-core

use thiserror::Error;

/// Result type alias using pinmap-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// A required draft field or value that failed local validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationIssue {
    MissingTitle,
    MissingContent,
    InvalidDate,
    DateLineInContent,
    MissingLocation,
    InvalidCoordinates,
    EmptyKeyword,
}

impl ValidationIssue {
    pub const fn describe(self) -> &'static str {
        match self {
            Self::MissingTitle => "title is required",
            Self::MissingContent => "content is required",
            Self::InvalidDate => "date must be formatted as YYYY-MM-DD",
            Self::DateLineInContent => {
                "content starts with a date line; move it to the date field"
            }
            Self::MissingLocation => "a location must be selected",
            Self::InvalidCoordinates => "coordinates are out of range",
            Self::EmptyKeyword => "search keyword is required",
        }
    }
}

/// Errors that can occur in pinmap-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// A required field is empty or malformed; no network call was made
    #[error("Invalid input: {}", .0.describe())]
    Validation(ValidationIssue),

    /// The backend rejected the submitted input
    #[error("Rejected by server: {0}")]
    Rejected(String),

    /// The acting user no longer resolves, or the session was refused
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Sign-in refused: missing, unknown or wrong credentials
    #[error("Sign-in failed: {0}")]
    Credentials(String),

    /// The target of an edit or delete vanished server-side
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transport-level failure talking to the backend
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with a failure status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Another call for the same action is still in flight
    #[error("Another request is still in progress")]
    Busy,

    /// Durable session storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Backend payload did not have the expected shape
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Client configuration is missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification used to pick recovery behavior and user messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Auth,
    NotFound,
    Network,
    Server,
    Busy,
    Storage,
    Config,
}

impl Error {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::Rejected(_) => ErrorKind::Validation,
            Self::Auth(_) | Self::Credentials(_) => ErrorKind::Auth,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Network(_) => ErrorKind::Network,
            Self::Server { .. } | Self::Malformed(_) | Self::Serialization(_) => ErrorKind::Server,
            Self::Busy => ErrorKind::Busy,
            Self::Storage(_) => ErrorKind::Storage,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Transient failures that leave the draft and overlays untouched.
    pub const fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Network | ErrorKind::Server)
    }

    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(issue) => format!("Please check the form: {}.", issue.describe()),
            Self::Rejected(message) => format!("The server rejected this pin: {message}"),
            Self::Auth(_) => "Your session is no longer valid. Please sign in again.".to_string(),
            Self::Credentials(_) => {
                "Sign-in failed. Check your username and password and try again.".to_string()
            }
            Self::NotFound(_) => {
                "That item no longer exists. The list has been refreshed.".to_string()
            }
            Self::Server { message, .. } if message.contains("FileNotFoundException") => {
                "Uploading the attachment failed. Your changes are kept; please try again."
                    .to_string()
            }
            Self::Network(_) | Self::Server { .. } | Self::Malformed(_) | Self::Serialization(_) => {
                "Could not reach the server. Your changes are kept; please try again.".to_string()
            }
            Self::Busy => "Please wait for the current request to finish.".to_string(),
            Self::Storage(message) => format!("Could not access local session storage: {message}"),
            Self::Config(message) => format!("Pinmap is not configured: {message}"),
        }
    }
}

impl From<ValidationIssue> for Error {
    fn from(issue: ValidationIssue) -> Self {
        Self::Validation(issue)
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            Self::Server {
                status: status.as_u16(),
                message: error.to_string(),
            }
        } else if error.is_decode() {
            Self::Malformed(error.to_string())
        } else {
            Self::Network(error.to_string())
        }
    }
}
