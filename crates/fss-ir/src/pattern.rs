//! Pattern and cell types for a single tracker channel.

use alloc::vec::Vec;
use crate::effects::TempoCommand;

/// Highest volume-column value that sets a volume.
pub const MAX_VOLUME: u8 = 64;

/// A note value in a pattern cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Note {
    /// Note on with IT note number (0-119, where 0 = C-0)
    Tone(u8),
    /// Note cut (`^^^`)
    Cut,
    /// Note off / key release (`===`)
    Off,
    /// Note fade (`~~~`)
    Fade,
}

impl Note {
    /// Decode a raw IT note byte.
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0..=119 => Note::Tone(raw),
            254 => Note::Cut,
            255 => Note::Off,
            _ => Note::Fade,
        }
    }

    /// Returns true if this note stops the sound instead of starting one.
    pub const fn is_silent(self) -> bool {
        !matches!(self, Note::Tone(_))
    }
}

/// A single row of the retained channel.
///
/// Every field is optional: `None` means the row neither set nor carried a
/// value for it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub note: Option<Note>,
    /// Instrument number as stored in the module (1-based)
    pub instrument: Option<u8>,
    /// Volume column (0-64)
    pub volume: Option<u8>,
    pub tempo: Option<TempoCommand>,
}

impl Cell {
    /// Create an empty cell.
    pub const fn empty() -> Self {
        Self {
            note: None,
            instrument: None,
            volume: None,
            tempo: None,
        }
    }

    /// Returns true if the cell is completely empty.
    pub fn is_empty(&self) -> bool {
        self.note.is_none()
            && self.instrument.is_none()
            && self.volume.is_none()
            && self.tempo.is_none()
    }
}

/// A decoded pattern, reduced to one channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    /// Number of rows (typically 64, can be 1-200)
    pub rows: u16,
    /// One cell per row
    pub cells: Vec<Cell>,
}

impl Pattern {
    /// Create a new pattern with empty cells.
    pub fn new(rows: u16) -> Self {
        Self {
            rows,
            cells: alloc::vec![Cell::empty(); rows as usize],
        }
    }

    /// Get a reference to a cell.
    pub fn cell(&self, row: u16) -> &Cell {
        debug_assert!(row < self.rows);
        &self.cells[row as usize]
    }

    /// Get a mutable reference to a cell.
    pub fn cell_mut(&mut self, row: u16) -> &mut Cell {
        debug_assert!(row < self.rows);
        &mut self.cells[row as usize]
    }
}
