//! Order list walk and run grouping.
//!
//! The retained channel of every played pattern is concatenated into one
//! row stream. Within a pattern, note, instrument and volume are forward
//! filled; consecutive rows with the same effective sound are merged into a
//! [`Run`]. Empty rows always extend the open run, also across patterns.

use std::collections::VecDeque;

use fss_formats::FormatError;
use fss_ir::{Cell, Module, Note, TempoCommand, MAX_VOLUME};

use crate::error::{ConvertError, SemanticError};

/// Effective sound of a row after forward filling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sound {
    /// No note yet, or a cut / off / fade
    Rest,
    Note {
        note: u8,
        instrument: Option<u8>,
        volume: u8,
    },
}

/// Consecutive rows with the same sound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Run {
    /// Index of the first row in the song's row stream
    pub start_row: usize,
    /// Always >= 1
    pub rows: u32,
    pub sound: Sound,
    /// Tempo/speed change on the first row
    pub tempo: Option<TempoCommand>,
}

/// Item produced by [`RowAggregator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment {
    /// A played pattern begins. Emitted before the first run that starts at
    /// or after the pattern's first row.
    Pattern(u8),
    Run(Run),
}

/// Forward-fill state, reset at the start of every pattern.
#[derive(Clone, Copy, Debug)]
struct Fill {
    note: Option<Note>,
    instrument: Option<u8>,
    volume: u8,
}

impl Fill {
    const fn new() -> Self {
        Self { note: None, instrument: None, volume: MAX_VOLUME }
    }
}

/// Pull iterator over the segments of a song.
///
/// A run is only yielded once the next run starts, the song ends or a row
/// fails, so pattern markers reached while a run is still open wait behind
/// it. After an error every finished run and marker is yielded before the
/// error itself.
pub struct RowAggregator<'a> {
    module: &'a Module,
    /// `(order index, pattern)` pairs
    orders: Vec<(usize, u8)>,
    order_pos: usize,
    row_pos: u16,
    stream_row: usize,
    require_instrument: bool,
    fill: Fill,

    open: Option<Run>,
    waiting: Vec<u8>,
    ready: VecDeque<Segment>,
    error: Option<ConvertError>,
    done: bool,
}

impl<'a> RowAggregator<'a> {
    pub fn new(module: &'a Module, require_instrument: bool) -> Self {
        Self {
            module,
            orders: module.played_orders().collect(),
            order_pos: 0,
            row_pos: 0,
            stream_row: 0,
            require_instrument,
            fill: Fill::new(),
            open: None,
            waiting: Vec::new(),
            ready: VecDeque::new(),
            error: None,
            done: false,
        }
    }

    fn advance(&mut self) -> Result<(), ConvertError> {
        let Some(&(order, index)) = self.orders.get(self.order_pos) else {
            self.done = true;
            self.close_open();
            return Ok(());
        };
        let module = self.module;
        let pattern = module
            .pattern(index)
            .ok_or(FormatError::UnknownPattern { order, pattern: index })?;

        if self.row_pos == 0 {
            self.fill = Fill::new();
            if self.open.is_some() {
                self.waiting.push(index);
            } else {
                self.ready.push_back(Segment::Pattern(index));
            }
        }

        if self.row_pos >= pattern.rows {
            self.order_pos += 1;
            self.row_pos = 0;
            return Ok(());
        }

        let cell = *pattern.cell(self.row_pos);
        self.row_pos += 1;
        self.push_row(&cell)?;
        Ok(())
    }

    fn push_row(&mut self, cell: &Cell) -> Result<(), SemanticError> {
        let row = self.stream_row;
        self.stream_row += 1;

        if cell.is_empty() {
            if let Some(run) = self.open.as_mut() {
                run.rows += 1;
                return Ok(());
            }
        }

        let fill = &mut self.fill;
        if let Some(note) = cell.note {
            fill.note = Some(note);
            fill.volume = cell.volume.unwrap_or(MAX_VOLUME);
        } else if let Some(volume) = cell.volume {
            fill.volume = volume;
        }
        if cell.instrument.is_some() {
            fill.instrument = cell.instrument;
        }

        let sound = match fill.note {
            None if !cell.is_empty() => return Err(SemanticError::RowWithoutNote { row }),
            Some(Note::Tone(note)) => Sound::Note {
                note,
                instrument: fill.instrument,
                volume: fill.volume,
            },
            _ => Sound::Rest,
        };

        if let Some(run) = self.open.as_mut() {
            if run.sound == sound && cell.tempo.is_none() {
                run.rows += 1;
                return Ok(());
            }
        }

        if let Sound::Note { instrument: None, .. } = sound {
            if self.require_instrument {
                return Err(SemanticError::MissingInstrument { row });
            }
        }

        let next = Run {
            start_row: row,
            rows: 1,
            sound,
            tempo: cell.tempo,
        };
        if let Some(closed) = self.open.replace(next) {
            self.ready.push_back(Segment::Run(closed));
            self.ready.extend(self.waiting.drain(..).map(Segment::Pattern));
        }
        Ok(())
    }

    fn close_open(&mut self) {
        if let Some(run) = self.open.take() {
            self.ready.push_back(Segment::Run(run));
        }
        self.ready.extend(self.waiting.drain(..).map(Segment::Pattern));
    }
}

impl Iterator for RowAggregator<'_> {
    type Item = Result<Segment, ConvertError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(segment) = self.ready.pop_front() {
                return Some(Ok(segment));
            }
            if let Some(e) = self.error.take() {
                return Some(Err(e));
            }
            if self.done {
                return None;
            }
            if let Err(e) = self.advance() {
                // the open run ended before the failing row
                self.done = true;
                self.close_open();
                self.error = Some(e);
            }
        }
    }
}
