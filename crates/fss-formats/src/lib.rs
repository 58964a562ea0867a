//! Format parsers for the it2fss converter.
//!
//! Parses Impulse Tracker (IT) files into the IR.

mod it_format;
mod it_pattern;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixture;

pub use it_format::{load_it, ItHeader, IT_MAGIC};
pub use it_pattern::{decode_pattern, CHANNELS, EMPTY_PATTERN_ROWS};

/// Error type for format parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// Missing `IMPM` magic bytes
    #[error("not an Impulse Tracker module (missing IMPM magic)")]
    BadMagic,
    /// Unexpected end of file
    #[error("unexpected end of file")]
    Truncated,
    /// Order list references a pattern that is not in the pattern table
    #[error("order {order} references pattern {pattern}, which does not exist")]
    UnknownPattern { order: usize, pattern: u8 },
    /// Any other header parse failure
    #[error("invalid module header: {0}")]
    Header(String),
}
