//! IT packed pattern decoder.
//!
//! Each row is a list of channel records terminated by a zero byte. A record
//! starts with a channel variable; its top bit announces a fresh mask byte,
//! otherwise the channel's previous mask is reused. Mask bits 0-3 mark
//! explicit note / instrument / volume / command fields, bits 4-7 copy the
//! channel's last explicit value of the same field.

use fss_ir::{Cell, Note, Pattern, TempoCommand, MAX_VOLUME};

use crate::FormatError;

/// Number of channels addressable by a channel variable.
pub const CHANNELS: usize = 64;

/// Row count of a pattern whose offset is 0 in the pattern table.
pub const EMPTY_PATTERN_ROWS: u16 = 64;

const MASK_NOTE: u8 = 0x01;
const MASK_INSTRUMENT: u8 = 0x02;
const MASK_VOLUME: u8 = 0x04;
const MASK_COMMAND: u8 = 0x08;
const MASK_LAST_NOTE: u8 = 0x10;
const MASK_LAST_INSTRUMENT: u8 = 0x20;
const MASK_LAST_VOLUME: u8 = 0x40;
const MASK_LAST_COMMAND: u8 = 0x80;

const CHANNEL_NEW_MASK: u8 = 0x80;

// ---------------------------------------------------------------------------
// ItReader: cursor over a byte slice
// ---------------------------------------------------------------------------

struct ItReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ItReader<'a> {
    fn new(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    /// Next `n` bytes, or `Truncated` if the buffer ends first.
    fn take(&mut self, n: usize) -> Result<&'a [u8], FormatError> {
        let end = self.pos.checked_add(n).ok_or(FormatError::Truncated)?;
        let bytes = self.data.get(self.pos..end).ok_or(FormatError::Truncated)?;
        self.pos = end;
        Ok(bytes)
    }

    fn skip(&mut self, n: usize) -> Result<(), FormatError> {
        self.take(n).map(drop)
    }

    fn read_u8(&mut self) -> Result<u8, FormatError> {
        Ok(self.take(1)?[0])
    }

    fn read_u16_le(&mut self) -> Result<u16, FormatError> {
        let lo = self.read_u8()?;
        let hi = self.read_u8()?;
        Ok(u16::from_le_bytes([lo, hi]))
    }
}

// ---------------------------------------------------------------------------
// Per-channel decode state
// ---------------------------------------------------------------------------

/// Last mask and last explicit values of one channel.
#[derive(Clone, Copy, Default)]
struct ChannelMemory {
    mask: u8,
    note: Option<u8>,
    instrument: Option<u8>,
    volume: Option<u8>,
    command: Option<(u8, u8)>,
}

/// Fields of one record after explicit reads and carries are applied.
#[derive(Clone, Copy, Default)]
struct Entry {
    note: Option<u8>,
    instrument: Option<u8>,
    volume: Option<u8>,
    command: Option<(u8, u8)>,
}

impl Entry {
    fn into_cell(self) -> Cell {
        Cell {
            note: self.note.map(Note::from_raw),
            instrument: self.instrument,
            // 65+ are panning / slide commands in the volume column
            volume: self.volume.filter(|&v| v <= MAX_VOLUME),
            tempo: self
                .command
                .and_then(|(cmd, value)| TempoCommand::from_raw(cmd, value)),
        }
    }
}

fn read_entry(reader: &mut ItReader<'_>, memory: &mut ChannelMemory) -> Result<Entry, FormatError> {
    let mask = memory.mask;
    let mut entry = Entry::default();

    if mask & MASK_NOTE != 0 {
        let note = reader.read_u8()?;
        memory.note = Some(note);
        entry.note = Some(note);
    }
    if mask & MASK_INSTRUMENT != 0 {
        let instrument = reader.read_u8()?;
        memory.instrument = Some(instrument);
        entry.instrument = Some(instrument);
    }
    if mask & MASK_VOLUME != 0 {
        let volume = reader.read_u8()?;
        memory.volume = Some(volume);
        entry.volume = Some(volume);
    }
    if mask & MASK_COMMAND != 0 {
        let command = reader.read_u8()?;
        let value = reader.read_u8()?;
        memory.command = Some((command, value));
        entry.command = Some((command, value));
    }

    if mask & MASK_LAST_NOTE != 0 {
        entry.note = memory.note;
    }
    if mask & MASK_LAST_INSTRUMENT != 0 {
        entry.instrument = memory.instrument;
    }
    if mask & MASK_LAST_VOLUME != 0 {
        entry.volume = memory.volume;
    }
    if mask & MASK_LAST_COMMAND != 0 {
        entry.command = memory.command;
    }

    Ok(entry)
}

/// Decode the pattern stored at `offset`, keeping only `channel`.
///
/// All other channels are decoded and discarded so the cursor stays aligned.
/// Channel memory starts out empty for every pattern.
pub fn decode_pattern(data: &[u8], offset: u32, channel: u8) -> Result<Pattern, FormatError> {
    if offset == 0 {
        return Ok(Pattern::new(EMPTY_PATTERN_ROWS));
    }

    let mut reader = ItReader::new(data, offset as usize);
    let _packed_len = reader.read_u16_le()?;
    let rows = reader.read_u16_le()?;
    reader.skip(4)?; // reserved

    let mut pattern = Pattern::new(rows);
    let mut memory = [ChannelMemory::default(); CHANNELS];

    for row in 0..rows {
        loop {
            let channel_var = reader.read_u8()?;
            if channel_var == 0 {
                break; // end of row
            }

            let ch = (channel_var.wrapping_sub(1) & 63) as usize;
            if channel_var & CHANNEL_NEW_MASK != 0 {
                memory[ch].mask = reader.read_u8()?;
            }

            let entry = read_entry(&mut reader, &mut memory[ch])?;
            if ch == channel as usize {
                *pattern.cell_mut(row) = entry.into_cell();
            }
        }
    }

    tracing::debug!(offset, rows, "decoded pattern");
    Ok(pattern)
}
