//! Error types for cudex
//!
//! Every stage of catalog assembly reports failures through [`CudexError`].
//! Messages always name the offending tag or URL so a failed run can be
//! diagnosed without re-running it.

use thiserror::Error;


/// Main error type for cudex operations
#[derive(Error, Debug)]
pub enum CudexError {
    /// Network-related errors (connection, timeout, DNS)
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Authentication errors (401, 403, token issues)
    #[error("Authentication error (status: {status_code:?}): {message}")]
    Authentication {
        message: String,
        status_code: Option<u16>,
    },

    /// Resource not found errors (404, missing platform)
    #[error("{resource_type} not found: {name}")]
    NotFound { resource_type: String, name: String },

    /// Rate limiting errors (429)
    #[error("Rate limit: {message}")]
    RateLimit {
        message: String,
        retry_after: Option<u64>,
    },

    /// Server errors (500, 503)
    #[error("Server error (status: {status_code}): {message}")]
    Server { message: String, status_code: u16 },

    /// Upstream data that does not have the expected shape (tag, env entry,
    /// reference, JSON body)
    #[error("Format error: {message}")]
    Format {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors (missing required version, digest mismatch, etc.)
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors (invalid config file, bad settings)
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A catalog task stopped because another task failed first
    #[error("Operation cancelled")]
    Cancelled,

    /// A catalog task panicked or was aborted unexpectedly
    #[error("Task error: {message}")]
    Task { message: String },
}

/// Result type alias for cudex operations
pub type Result<T> = std::result::Result<T, CudexError>;

impl CudexError {
    /// Creates a new network error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libcudex::error::CudexError;
    ///
    /// let err = CudexError::network("connection refused");
    /// assert!(matches!(err, CudexError::Network { .. }));
    /// ```
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new network error with a source error.
    pub fn network_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new authentication error.
    pub fn authentication<S: Into<String>>(message: S, status_code: Option<u16>) -> Self {
        Self::Authentication {
            message: message.into(),
            status_code,
        }
    }

    /// Creates a new not found error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libcudex::error::CudexError;
    ///
    /// let err = CudexError::not_found("platform", "linux/amd64");
    /// assert_eq!(err.to_string(), "platform not found: linux/amd64");
    /// ```
    pub fn not_found<S: Into<String>>(resource_type: S, name: S) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }

    /// Creates a new rate limit error.
    pub fn rate_limit<S: Into<String>>(message: S, retry_after: Option<u64>) -> Self {
        Self::RateLimit {
            message: message.into(),
            retry_after,
        }
    }

    /// Creates a new server error.
    pub fn server<S: Into<String>>(message: S, status_code: u16) -> Self {
        Self::Server {
            message: message.into(),
            status_code,
        }
    }

    /// Creates a new format error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libcudex::error::CudexError;
    ///
    /// let err = CudexError::format("invalid tag format: \"latest\"");
    /// assert!(matches!(err, CudexError::Format { .. }));
    /// ```
    pub fn format<S: Into<String>>(message: S) -> Self {
        Self::Format {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new format error with a source error.
    pub fn format_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Format {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S, path: Option<S>) -> Self {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: None,
        }
    }

    /// Creates a new configuration error with a source error.
    pub fn config_with_source<S, E>(message: S, path: Option<S>, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new task error.
    pub fn task<S: Into<String>>(message: S) -> Self {
        Self::Task {
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for CudexError {
    fn from(err: config::ConfigError) -> Self {
        CudexError::config_with_source("Failed to build configuration", None::<&str>, err)
    }
}
