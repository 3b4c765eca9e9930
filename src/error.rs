use thiserror::Error;

/// Failure of a single GitHub service call.
///
/// Every call ends in exactly one of these or a value; there is no partial
/// success. The payload strings are diagnostic detail for logs, while
/// [`ServiceError::message`] is the short text meant for the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Request error: {0}")]
    Request(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Response error: {0}")]
    Response(String),

    #[error("GitHub API rate limit reached")]
    ApiLimitReached,

    #[error("Resource not found")]
    NotFound,
}

impl ServiceError {
    /// Short human-readable message suitable for direct display
    pub fn message(&self) -> &'static str {
        match self {
            ServiceError::Request(_) => "Could not create request",
            ServiceError::Network(_) => "Network error",
            ServiceError::Response(_) => "Invalid response from server",
            ServiceError::ApiLimitReached => "API limit reached. Please try again later.",
            ServiceError::NotFound => "Resource not found",
        }
    }

    /// Whether re-issuing the same call could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ServiceError::Network(_) | ServiceError::Response(_))
    }
}

/// Result delivered to service callers
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Form codec failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingError {
    #[error("invalid parameter name")]
    InvalidKey,

    #[error("invalid parameter value")]
    InvalidValue,

    #[error("invalid parameter encoding")]
    InvalidEncoding,
}

impl From<EncodingError> for ServiceError {
    fn from(err: EncodingError) -> Self {
        ServiceError::Request(format!("Failed to encode request parameters: {err}"))
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("GitHub service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the failed command is worth running again as is
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Service(e) if e.is_retryable())
    }

    /// Get a message safe for logging and terminal output
    pub fn log_safe(&self) -> String {
        match self {
            // Service errors already carry a user-facing message
            Error::Service(e) => e.message().to_string(),
            Error::Encoding(e) => format!("Encoding error: {e}"),
            Error::InvalidUrl(_) => "Invalid URL provided".to_string(),
            Error::Config(msg) => format!("Configuration error: {msg}"),
            Error::Validation(msg) => format!("Validation error: {msg}"),
            Error::Internal(msg) => {
                if msg.to_lowercase().contains("token") || msg.to_lowercase().contains("secret")
                {
                    "Internal error (details redacted)".to_string()
                } else {
                    format!("Internal error: {msg}")
                }
            }
        }
    }
}
