//! Error types for fiscal-tracker

use thiserror::Error;

/// Main error type for fiscal-tracker
#[derive(Debug, Error)]
pub enum FiscalError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level HTTP failure (connection refused, timeout, bad body)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Non-success response from the API
    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },

    /// Login rejected or not logged in
    #[error("Authentication error: {0}")]
    Auth(String),

    /// CSV upload rejected
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Export could not produce or save the file
    #[error("Export failed: {0}")]
    ExportFailed(String),

    /// Malformed CNPJ
    #[error("Invalid CNPJ '{cnpj}': {reason}")]
    InvalidCnpj { cnpj: String, reason: String },

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<FiscalError>,
    },
}

impl FiscalError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        FiscalError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Whether the failure came from the network layer rather than local state.
    ///
    /// Callers use this to decide whether a fallback data source applies.
    pub fn is_network(&self) -> bool {
        match self {
            FiscalError::Http(_) | FiscalError::Server { .. } => true,
            FiscalError::WithContext { source, .. } => source.is_network(),
            _ => false,
        }
    }
}

impl From<toml::de::Error> for FiscalError {
    fn from(err: toml::de::Error) -> Self {
        FiscalError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for FiscalError {
    fn from(err: toml::ser::Error) -> Self {
        FiscalError::Toml(err.to_string())
    }
}

/// Result type alias for fiscal-tracker
pub type Result<T> = std::result::Result<T, FiscalError>;
