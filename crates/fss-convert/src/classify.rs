//! Mapping of notes to FSS voices.

use crate::error::SemanticError;

/// FSS note names, starting at A.
const NOTE_NAMES: [char; 12] = ['a', 'A', 'b', 'c', 'C', 'd', 'D', 'e', 'f', 'F', 'g', 'G'];

/// IT note number of FSS note `a` in octave 0.
const NOTE_OFFSET: i16 = 9;

/// Octaves FSS can play as a pitched tone.
pub const TONE_OCTAVES: core::ops::RangeInclusive<i16> = 1..=7;

/// A tracker note expressed in FSS naming.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pitch {
    pub note: u8,
    pub name: char,
    pub octave: i16,
}

impl Pitch {
    pub fn from_note(note: u8) -> Self {
        let fs_note = note as i16 - NOTE_OFFSET;
        Self {
            note,
            name: NOTE_NAMES[fs_note.rem_euclid(12) as usize],
            octave: fs_note.div_euclid(12),
        }
    }

    /// Octave as a digit, if it is in the playable tone range.
    pub fn tone_octave(&self) -> Result<u8, SemanticError> {
        if TONE_OCTAVES.contains(&self.octave) {
            Ok(self.octave as u8)
        } else {
            Err(SemanticError::OctaveOutOfRange {
                note: self.note,
                octave: self.octave,
            })
        }
    }
}

/// Sound source of the FSS synth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Voice {
    /// Pitched square tone
    Tone,
    /// White noise
    Noise,
    /// One-shot kick sample
    Kick,
    /// One-shot snare sample
    Snare,
}

/// How a sounding note picks its voice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Classifier {
    /// Instrument 1 = tone, 2 = noise, 3 = kick, 4 = snare
    #[default]
    Instrument,
    /// Octave 1-7 = tone, 0 = kick, 8 = snare, anything else = noise.
    /// Instruments are ignored.
    Octave,
}

impl Classifier {
    pub fn requires_instrument(self) -> bool {
        matches!(self, Classifier::Instrument)
    }

    /// Pick the voice for a note starting at stream row `row`.
    pub fn classify(
        self,
        row: usize,
        pitch: &Pitch,
        instrument: Option<u8>,
    ) -> Result<Voice, SemanticError> {
        match self {
            Classifier::Instrument => match instrument {
                None => Err(SemanticError::MissingInstrument { row }),
                Some(1) => {
                    pitch.tone_octave()?;
                    Ok(Voice::Tone)
                }
                Some(2) => Ok(Voice::Noise),
                Some(3) => Ok(Voice::Kick),
                Some(4) => Ok(Voice::Snare),
                Some(other) => Err(SemanticError::UnsupportedInstrument(other)),
            },
            Classifier::Octave => Ok(match pitch.octave {
                0 => Voice::Kick,
                8 => Voice::Snare,
                o if TONE_OCTAVES.contains(&o) => Voice::Tone,
                _ => Voice::Noise,
            }),
        }
    }
}
