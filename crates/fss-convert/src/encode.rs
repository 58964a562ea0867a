//! Run to FSS line encoding.

use core::fmt;

use crate::aggregate::{Run, Sound};
use crate::classify::{Classifier, Pitch, Voice};
use crate::duration::split;
use crate::error::SemanticError;
use crate::line::Line;

/// Highest FSS volume digit.
const MAX_LEVEL: u8 = 15;

/// Tracker volume 0-64 reduced to one hex digit 0-f.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VolumeLevel(u8);

impl VolumeLevel {
    /// `round(volume / 4)` with ties to even, clamped to 15.
    pub fn from_volume(volume: u8) -> Self {
        let (quotient, remainder) = (volume / 4, volume % 4);
        let rounded = match remainder {
            3 => quotient + 1,
            2 if quotient % 2 == 1 => quotient + 1,
            _ => quotient,
        };
        VolumeLevel(rounded.min(MAX_LEVEL))
    }

    /// Volume column value used as the level directly, clamped to 15.
    pub fn from_level(volume: u8) -> Self {
        VolumeLevel(volume.min(MAX_LEVEL))
    }

    pub fn level(self) -> u8 {
        self.0
    }

    pub fn symbol(self) -> char {
        char::from_digit(self.0 as u32, 16).unwrap_or('f')
    }
}

impl fmt::Display for VolumeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Renders runs as FSS lines.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoteEncoder {
    classifier: Classifier,
}

impl NoteEncoder {
    pub fn new(classifier: Classifier) -> Self {
        Self { classifier }
    }

    /// Append the lines for `run` to `out`.
    ///
    /// `tempo` is written as a `t` line before the first length token only.
    /// Nothing is appended when the run cannot be encoded.
    pub fn encode(&self, run: &Run, tempo: Option<u32>, out: &mut Vec<Line>) -> Result<(), SemanticError> {
        let sound = self.resolve(run)?;

        if let Some(value) = tempo {
            out.push(Line::SetTempo(value));
        }

        for (i, length) in split(run.rows).into_iter().enumerate() {
            let line = match sound {
                Resolved::Rest => Line::Rest(length),
                Resolved::Tone { name, octave, volume } => Line::Tone { name, octave, length, volume },
                Resolved::Noise(volume) => Line::Noise { length, volume },
                // one-shot samples trigger once, then the run rests
                Resolved::OneShot(_) if i > 0 => Line::Rest(length),
                Resolved::OneShot(Voice::Snare) => Line::Snare(length),
                Resolved::OneShot(_) => Line::Kick(length),
            };
            out.push(line);
        }

        Ok(())
    }

    fn resolve(&self, run: &Run) -> Result<Resolved, SemanticError> {
        let Sound::Note { note, instrument, volume } = run.sound else {
            return Ok(Resolved::Rest);
        };
        let pitch = Pitch::from_note(note);
        // octave-classified songs write levels 0-15 straight into the volume column
        let volume = match self.classifier {
            Classifier::Instrument => VolumeLevel::from_volume(volume),
            Classifier::Octave => VolumeLevel::from_level(volume),
        };

        Ok(match self.classifier.classify(run.start_row, &pitch, instrument)? {
            Voice::Tone => Resolved::Tone {
                name: pitch.name,
                octave: pitch.tone_octave()?,
                volume,
            },
            Voice::Noise => Resolved::Noise(volume),
            voice => Resolved::OneShot(voice),
        })
    }
}

/// What every length token of a run renders as.
#[derive(Clone, Copy)]
enum Resolved {
    Rest,
    Tone { name: char, octave: u8, volume: VolumeLevel },
    Noise(VolumeLevel),
    OneShot(Voice),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::LengthToken::*;
    use crate::line::render;

    fn note_run(rows: u32, note: u8, instrument: u8, volume: u8) -> Run {
        Run {
            start_row: 0,
            rows,
            sound: Sound::Note { note, instrument: Some(instrument), volume },
            tempo: None,
        }
    }

    fn encode(classifier: Classifier, run: &Run, tempo: Option<u32>) -> Result<String, SemanticError> {
        let mut out = Vec::new();
        NoteEncoder::new(classifier).encode(run, tempo, &mut out)?;
        Ok(render(&out))
    }

    #[test]
    fn volume_quantization() {
        let symbol = |v| VolumeLevel::from_volume(v).symbol();
        assert_eq!(symbol(0), '0');
        assert_eq!(symbol(2), '0'); // 0.5 rounds to even
        assert_eq!(symbol(6), '2'); // 1.5 rounds to even
        assert_eq!(symbol(10), '2'); // 2.5 rounds to even
        assert_eq!(symbol(7), '2');
        assert_eq!(symbol(40), 'a');
        assert_eq!(symbol(56), 'e');
        assert_eq!(symbol(58), 'e'); // 14.5 rounds to even
        assert_eq!(symbol(62), 'f');
        assert_eq!(symbol(64), 'f');
        assert!((0..=64).all(|v| VolumeLevel::from_volume(v).level() <= 15));
    }

    #[test]
    fn pitched_tone() {
        let run = note_run(3, 69, 1, 64);
        assert_eq!(encode(Classifier::Instrument, &run, None).unwrap(), "a52f\na51f\n");
    }

    #[test]
    fn tempo_prefix_only_on_first_token() {
        let run = note_run(20, 60, 1, 32);
        assert_eq!(
            encode(Classifier::Instrument, &run, Some(120)).unwrap(),
            "t120\nc4f8\nc448\n"
        );
    }

    #[test]
    fn noise_keeps_volume() {
        let run = note_run(2, 30, 2, 20);
        assert_eq!(encode(Classifier::Instrument, &run, None).unwrap(), "x-25\n");
    }

    #[test]
    fn one_shot_trigger_then_rests() {
        let kick = note_run(40, 60, 3, 64);
        assert_eq!(encode(Classifier::Instrument, &kick, None).unwrap(), "K-f\nr-f\nr-8\n");

        let snare = note_run(3, 60, 4, 64);
        assert_eq!(
            encode(Classifier::Instrument, &snare, Some(2500)).unwrap(),
            "t2500\nS-2\nr-1\n"
        );
    }

    #[test]
    fn rest_run() {
        let run = Run { start_row: 0, rows: 17, sound: Sound::Rest, tempo: None };
        assert_eq!(encode(Classifier::Instrument, &run, None).unwrap(), "r-f\nr-1\n");
    }

    #[test]
    fn failures_append_nothing() {
        let mut out = Vec::new();
        let encoder = NoteEncoder::new(Classifier::Instrument);

        let low = note_run(4, 12, 1, 64);
        assert_eq!(
            encoder.encode(&low, Some(2500), &mut out),
            Err(SemanticError::OctaveOutOfRange { note: 12, octave: 0 })
        );
        let odd = note_run(4, 60, 7, 64);
        assert_eq!(
            encoder.encode(&odd, None, &mut out),
            Err(SemanticError::UnsupportedInstrument(7))
        );
        assert!(out.is_empty());
    }

    #[test]
    fn octave_classifier() {
        let kick = note_run(2, 12, 9, 64);
        assert_eq!(encode(Classifier::Octave, &kick, None).unwrap(), "K-2\n");
        let tone = note_run(1, 69, 9, 64);
        assert_eq!(encode(Classifier::Octave, &tone, None).unwrap(), "a51f\n");
        let noise = note_run(1, 118, 9, 0);
        assert_eq!(encode(Classifier::Octave, &noise, None).unwrap(), "x-10\n");
    }

    #[test]
    fn octave_classifier_uses_raw_levels() {
        let quiet = note_run(1, 69, 9, 12);
        assert_eq!(encode(Classifier::Octave, &quiet, None).unwrap(), "a51c\n");
        let loud = note_run(1, 69, 9, 40);
        assert_eq!(encode(Classifier::Octave, &loud, None).unwrap(), "a51f\n");
        // same volume, quartered
        let quiet = note_run(1, 69, 1, 12);
        assert_eq!(encode(Classifier::Instrument, &quiet, None).unwrap(), "a513\n");
    }

    #[test]
    fn tokens_follow_split() {
        let run = note_run(7, 69, 2, 64);
        let mut out = Vec::new();
        NoteEncoder::default().encode(&run, None, &mut out).unwrap();
        let lengths: Vec<_> = out
            .iter()
            .map(|line| match line {
                Line::Noise { length, .. } => *length,
                other => panic!("unexpected line {:?}", other),
            })
            .collect();
        assert_eq!(lengths, vec![Four, Two, One]);
    }
}
