//! Readability-style main-content extraction.
//!
//! `perlego-core` takes arbitrary HTML and produces a clean, self-contained
//! document holding just the article: scoring paragraphs, picking the best
//! candidate subtree, merging continuation siblings, pruning chrome and
//! gluing the result into a styled page. Multi-page articles can be stitched
//! together by following next-page links.
//!
//! ```no_run
//! use perlego_core::transcoder::Transcoder;
//!
//! let mut transcoder = Transcoder::new();
//! let readable = transcoder.transcode("<html>...</html>")?;
//! # Ok::<(), perlego_core::error::PerlegoError>(())
//! ```

pub mod dom;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod options;
pub mod pagination;
pub mod parse;
pub(crate) mod patterns;
pub mod postprocess;
pub mod preprocess;
pub mod scoring;
pub mod serialize;
pub mod transcoder;
pub mod traverse;

pub use dom::{Document, NodeData, NodeId};
pub use error::{PerlegoError, Result};
pub use fetch::Fetcher;
#[cfg(feature = "fetch")]
pub use fetch::{FetchConfig, HttpFetcher};
pub use options::{ReadingMargin, ReadingSize, ReadingStyle, TranscoderOptions};
pub use pagination::WebTranscoder;
pub use serialize::SerializationConfig;
pub use transcoder::{TranscodedPage, Transcoder, transcode};
