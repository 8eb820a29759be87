//! Error types for transcoding operations.
//!
//! Malformed HTML input is never an error here: the parser tolerates broken
//! markup and missing structural elements are repaired by get-or-create
//! fallbacks. The variants below cover shape errors raised by the serializer,
//! broken internal invariants, and HTTP-level failures from the optional
//! fetcher.

use thiserror::Error;

/// Main error type for transcoding operations.
#[derive(Error, Debug)]
pub enum PerlegoError {
    /// HTTP request errors from reqwest.
    ///
    /// Only produced by [`crate::fetch::HttpFetcher::try_fetch`]; the
    /// [`crate::fetch::Fetcher`] trait itself swallows fetch failures, since
    /// a dead next-page link is expected input for the multi-page stitcher.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The document does not have the shape an operation requires, e.g.
    /// serializing with a content-type meta tag requested while the root
    /// element is not `html`.
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// An internal invariant was broken (e.g. a glued document that lost its
    /// inner container). Indicates a bug, not bad input.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for [`PerlegoError`].
pub type Result<T> = std::result::Result<T, PerlegoError>;
