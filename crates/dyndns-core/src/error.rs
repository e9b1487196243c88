//! Error types for the dynamic DNS endpoint
//!
//! Every failure the dispatcher can report is a variant here. The
//! `Display` text of the caller-facing variants is exactly what ends up in
//! `return_message`, so keep it free of storage or credential detail.

use thiserror::Error;

/// Result type alias for dyndns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the dyndns system
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration document could not be fetched or parsed
    ///
    /// The cause is logged, not returned.
    #[error("There was an issue finding or reading the config file.")]
    ConfigUnavailable,

    /// No configuration entry for the requested hostname
    #[error("No configuration found for hostname: {0}")]
    UnknownHostname(String),

    /// Caller-supplied key did not match the shared secret
    #[error("{0}")]
    Authentication(String),

    /// The dynamic A record holds more than one value
    #[error(
        "You should only have a single value for your dynamic record. \
         You currently have more than one."
    )]
    MultipleValues {
        /// Record name
        record_name: String,
        /// Number of values found
        count: usize,
    },

    /// Execution mode was neither `get` nor `set`
    #[error("mode must be get or set")]
    BadMode(String),

    /// A required inbound event field is absent
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Zone API errors not tied to a specific provider
    #[error("Zone API error: {0}")]
    ZoneApi(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// HTTP client errors (from collaborator APIs)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Deployment configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an unknown hostname error
    pub fn unknown_hostname(hostname: impl Into<String>) -> Self {
        Self::UnknownHostname(hostname.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a multiple values error
    pub fn multiple_values(record_name: impl Into<String>, count: usize) -> Self {
        Self::MultipleValues {
            record_name: record_name.into(),
            count,
        }
    }

    /// Create a bad mode error
    pub fn bad_mode(mode: impl Into<String>) -> Self {
        Self::BadMode(mode.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a zone API error
    pub fn zone_api(msg: impl Into<String>) -> Self {
        Self::ZoneApi(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
