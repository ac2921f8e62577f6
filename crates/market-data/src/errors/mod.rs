//! Error types and retry classification for the market data crate.

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur during market data operations.
///
/// Each variant maps to a [`RetryClass`] via [`retry_class`](Self::retry_class),
/// which tells the provider registry whether falling through to the next
/// provider can help.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol was not found by the provider.
    /// Terminal - another provider will not know it either.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// No provider handles this kind of instrument.
    #[error("Unsupported instrument: {0}")]
    UnsupportedInstrument(String),

    /// The provider rate limited the request (HTTP 429 or quota exhausted).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A provider-specific error occurred. Try the next provider.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider returned data that failed validation
    /// (non-positive or unparseable price).
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// Description of the validation failure
        message: String,
    },

    /// The operation is not supported by this provider.
    #[error("Operation '{operation}' not supported by {provider}")]
    NotSupported {
        /// The unsupported operation
        operation: String,
        /// The provider it was requested from
        provider: String,
    },

    /// No provider in the registry supports the instrument kind.
    #[error("No providers available")]
    NoProvidersAvailable,

    /// Every eligible provider was tried and all failed.
    #[error("All providers failed")]
    AllProvidersFailed,

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns the retry classification for this error.
    ///
    /// - [`RetryClass::Never`]: terminal, stop the fallback loop
    /// - [`RetryClass::WithBackoff`]: transient, the caller may retry later
    /// - [`RetryClass::NextProvider`]: try the next provider in the chain
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::SymbolNotFound(_)
            | Self::UnsupportedInstrument(_)
            | Self::NoProvidersAvailable
            | Self::AllProvidersFailed => RetryClass::Never,

            Self::RateLimited { .. } | Self::Timeout { .. } => RetryClass::WithBackoff,

            Self::ProviderError { .. }
            | Self::ValidationFailed { .. }
            | Self::NotSupported { .. }
            | Self::Network(_) => RetryClass::NextProvider,
        }
    }
}
