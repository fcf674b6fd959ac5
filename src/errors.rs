/*!
 * Error types for the quran-srt application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to the text provider or audio catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The source answered but returned no usable data for a required field
    #[error("source returned no usable data: {0}")]
    SourceUnavailable(String),

    /// Network-level failure during an external call
    #[error("transport failure: {0}")]
    Transport(String),

    /// Error when parsing an API response fails
    #[error("failed to parse API response: {0}")]
    Parse(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// The duration of a downloaded clip could not be determined
    #[error("cannot determine clip duration: {0}")]
    UnreadableAudio(String),
}

impl CatalogError {
    /// Whether this error means "data absent" rather than a hard failure.
    /// Both kinds fall through from the authoritative timing strategy to the
    /// fallback; data absence is expected for most reciters and logged at a
    /// lower level than a transport or server failure.
    pub fn is_data_absent(&self) -> bool {
        matches!(self, Self::SourceUnavailable(_))
    }
}

/// Application-level errors surfaced to the CLI and the sweep summary
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from the text provider or audio catalog
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// One chapter failed during a full sweep
    #[error("chapter {chapter} failed: {cause}")]
    SweepItem {
        /// Chapter number that failed
        chapter: u32,
        /// Underlying failure description
        cause: String,
    },
}
