//! Error types for the enterprise-lookup client core
//!
//! This module defines error types for all components of the crate. Errors
//! are designed to be actionable: payment setup failures carry enough context
//! to show a useful message, while expected user-facing branches (quota and
//! tier limits) are modelled as enumerated outcomes elsewhere, not as errors.

use thiserror::Error;

/// Errors from the remote JSON API
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed (network, timeout, TLS)
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    /// Server returned a non-success status code
    #[error("Server error: HTTP {status}")]
    ServerError { status: u16 },

    /// Response body carried `success: false`
    #[error("API call unsuccessful: {endpoint}")]
    Unsuccessful { endpoint: &'static str },

    /// Response body could not be decoded into the expected shape
    #[error("Unexpected response body from {endpoint}: {reason}")]
    Decode {
        endpoint: &'static str,
        reason: String,
    },

    /// Invalid base URL or endpoint path
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// Maximum retries exceeded for an idempotent request
    #[error("Maximum retry attempts ({max_retries}) exceeded")]
    MaxRetriesExceeded { max_retries: u32 },
}

/// Payment checkout errors
///
/// These are configuration/parameter failures and setup failures. All of
/// them surface once as a `Failed` terminal payment state and are never
/// retried silently.
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Payment channel string not recognized
    #[error("Unsupported payment method: {channel}")]
    UnsupportedChannel { channel: String },

    /// In-app bridge payment requires all six signed parameters
    #[error("Incomplete payment parameters: missing {missing}")]
    IncompleteParameters { missing: &'static str },

    /// Mobile-browser WeChat payment requires a redirect URL
    #[error("Payment redirect URL missing from gateway response")]
    MissingRedirectUrl,

    /// Desktop WeChat payment requires a QR payload
    #[error("Payment QR code missing from gateway response")]
    MissingQrCode,

    /// Alipay returned neither a QR payload nor a redirect URL
    #[error("Alipay response carried neither qr_code nor pay_url")]
    MissingAlipayTarget,

    /// A setup step (purchase, order, or channel params) failed remotely
    #[error("Checkout setup failed at {step}")]
    SetupFailed {
        step: &'static str,
        #[source]
        source: ApiError,
    },

    /// open() called on a session that is already terminal or closed
    #[error("Payment session already closed")]
    SessionClosed,
}

/// Search request construction and execution errors
#[derive(Error, Debug)]
pub enum SearchError {
    /// Search keyword was empty after trimming
    #[error("Search keyword must not be empty")]
    EmptyKeyword,

    /// Remote search call failed
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: std::path::PathBuf },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    /// I/O error reading configuration
    #[error("I/O error reading configuration")]
    Io(#[from] std::io::Error),
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// API error
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Payment error
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Search error
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if the error is recoverable (transient)
    ///
    /// Setup failures during checkout are deliberately non-recoverable even
    /// when the underlying cause was transient: retrying a purchase-creation
    /// sequence automatically risks duplicate orders, so the user must
    /// restart checkout manually.
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Api(ApiError::Http(_))
            | AppError::Api(ApiError::ServerError { .. })
            | AppError::Search(SearchError::Api(ApiError::Http(_))) => true,

            AppError::Payment(_) => false,

            _ => false,
        }
    }

    /// Get error category for logging and metrics
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Api(_) => "api",
            AppError::Payment(_) => "payment",
            AppError::Search(_) => "search",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// API result type alias
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Payment result type alias
pub type PaymentResult<T> = std::result::Result<T, PaymentError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
