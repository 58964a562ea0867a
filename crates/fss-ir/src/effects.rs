//! Effect command types kept by the converter.

/// IT effect number for `Axx` (set speed).
const CMD_SET_SPEED: u8 = 1;
/// IT effect number for `Txx` (set tempo / tempo slide).
const CMD_TEMPO: u8 = 20;

/// A tempo or speed change carried by a pattern row.
///
/// These are the only effects that influence the translated output; every
/// other effect column command is dropped during decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TempoCommand {
    /// `Axx`: ticks per row
    SetSpeed(u8),
    /// `Txx` with xx >= 0x20: BPM
    SetTempo(u8),
}

impl TempoCommand {
    /// Interpret a raw IT effect command and parameter.
    ///
    /// Returns `None` for anything that does not set a new tempo or speed,
    /// including `A00`, `T00` and the tempo slides `T0x` / `T1x`.
    pub const fn from_raw(command: u8, value: u8) -> Option<Self> {
        match command {
            CMD_SET_SPEED if value > 0 => Some(TempoCommand::SetSpeed(value)),
            CMD_TEMPO if value >= 0x20 => Some(TempoCommand::SetTempo(value)),
            _ => None,
        }
    }

    /// Effect letter as shown in a tracker.
    pub const fn letter(self) -> char {
        match self {
            TempoCommand::SetSpeed(_) => 'A',
            TempoCommand::SetTempo(_) => 'T',
        }
    }

    /// Command parameter byte.
    pub const fn value(self) -> u8 {
        match self {
            TempoCommand::SetSpeed(v) | TempoCommand::SetTempo(v) => v,
        }
    }
}
