//! Conversion error types.

use fss_formats::FormatError;

/// Pattern content the FSS encoder cannot model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SemanticError {
    #[error("row {row}: note has no instrument assigned")]
    MissingInstrument { row: usize },
    #[error("note {note} lies in octave {octave}, outside the playable range 1-7")]
    OctaveOutOfRange { note: u8, octave: i16 },
    #[error("instrument {0} is not supported (use 1-4)")]
    UnsupportedInstrument(u8),
    #[error("row {row} has content but no note")]
    RowWithoutNote { row: usize },
    #[error("tempo 0 cannot be translated")]
    ZeroTempo,
}

/// Any failure of the load/convert pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Semantic(#[from] SemanticError),
}
