//! Error types, one enum per failure domain.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Umbrella error for callers that don't care which stage failed.
#[derive(Error, Debug)]
pub enum Error {
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("index error: {0}")]
    Index(#[from] IndexError),

    #[error("splice error: {0}")]
    Splice(#[from] SpliceError),
}

/// Corpus acquisition failures. Both leave the session in the
/// "index unavailable" state.
#[derive(Error, Debug, Clone)]
pub enum SourceError {
    /// The corpus could not be fetched at all.
    #[error("corpus unavailable: {0}")]
    Unavailable(String),

    /// The corpus was fetched but could not be understood.
    #[error("malformed corpus: {0}")]
    Malformed(String),
}

/// Index construction failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// Record at this position has an empty name. Names key the rendered
    /// snapshot, so a nameless record can never be surfaced.
    #[error("record {0} has an empty name")]
    EmptyName(usize),
}

/// Contract violations in the fragment splicer. Spans handed to the
/// splicer come from the highlighter, so any of these means a caller bug,
/// not bad user input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpliceError {
    /// A span reaches past the concatenated leaf text.
    #[error("span ({start}, {end}) exceeds text of {len} chars")]
    SpanOutOfRange { start: usize, end: usize, len: usize },

    /// The span at this position is not strictly after its predecessor,
    /// or is inverted.
    #[error("span {0} is out of order or overlaps its predecessor")]
    UnsortedSpans(usize),
}
