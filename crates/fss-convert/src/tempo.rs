//! Tracker tempo/speed to FSS tempo translation.

use fss_ir::TempoCommand;

use crate::error::SemanticError;

/// Numerator of the FSS tempo formula.
pub const TEMPO_SCALE: u32 = 2500;

/// Running tempo and speed of the song.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TempoTranslator {
    tempo: u8,
    speed: u8,
}

impl TempoTranslator {
    pub fn new(tempo: u8, speed: u8) -> Result<Self, SemanticError> {
        if tempo == 0 {
            return Err(SemanticError::ZeroTempo);
        }
        Ok(Self { tempo, speed })
    }

    pub fn tempo(&self) -> u8 {
        self.tempo
    }

    pub fn speed(&self) -> u8 {
        self.speed
    }

    /// FSS tempo for the current state: `2500 / tempo * speed`, truncating.
    pub fn translate(&self) -> u32 {
        TEMPO_SCALE / self.tempo as u32 * self.speed as u32
    }

    /// Apply a tempo or speed change and return the new FSS tempo.
    pub fn apply(&mut self, command: TempoCommand) -> Result<u32, SemanticError> {
        match command {
            TempoCommand::SetTempo(0) => return Err(SemanticError::ZeroTempo),
            TempoCommand::SetTempo(tempo) => self.tempo = tempo,
            TempoCommand::SetSpeed(speed) => self.speed = speed,
        }
        Ok(self.translate())
    }
}

/// An FSS tempo the synth's scheduler is known to play with audible pauses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PauseAdvisory {
    pub value: u32,
    /// Stream row of the tempo change, `None` for the initial tempo
    pub row: Option<usize>,
}

impl PauseAdvisory {
    /// Flag values whose last decimal digit is 1, 2, 4 or 8.
    pub fn check(value: u32, row: Option<usize>) -> Option<Self> {
        matches!(value % 10, 1 | 2 | 4 | 8).then_some(Self { value, row })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_formula() {
        // 2500 / 6 truncates to 416
        assert_eq!(TempoTranslator::new(6, 6).unwrap().translate(), 2496);
        assert_eq!(TempoTranslator::new(5, 5).unwrap().translate(), 2500);
        assert_eq!(TempoTranslator::new(125, 6).unwrap().translate(), 120);
        // 2500 / 150 truncates to 16
        assert_eq!(TempoTranslator::new(150, 3).unwrap().translate(), 48);
    }

    #[test]
    fn commands_update_state() {
        let mut t = TempoTranslator::new(125, 6).unwrap();
        assert_eq!(t.apply(TempoCommand::SetSpeed(3)).unwrap(), 60);
        assert_eq!(t.speed(), 3);
        assert_eq!(t.apply(TempoCommand::SetTempo(100)).unwrap(), 75);
        assert_eq!(t.tempo(), 100);
        assert_eq!(t.speed(), 3);
    }

    #[test]
    fn zero_tempo_is_rejected() {
        assert_eq!(TempoTranslator::new(0, 6), Err(SemanticError::ZeroTempo));
        let mut t = TempoTranslator::new(125, 6).unwrap();
        assert_eq!(t.apply(TempoCommand::SetTempo(0)), Err(SemanticError::ZeroTempo));
    }

    #[test]
    fn pause_advisory_digits() {
        assert_eq!(PauseAdvisory::check(2500, None), None);
        assert_eq!(PauseAdvisory::check(120, None), None);
        assert_eq!(
            PauseAdvisory::check(48, Some(7)),
            Some(PauseAdvisory { value: 48, row: Some(7) })
        );
        for value in [11, 12, 14, 18] {
            assert!(PauseAdvisory::check(value, None).is_some(), "{}", value);
        }
        for value in [13, 15, 16, 17, 19, 20] {
            assert!(PauseAdvisory::check(value, None).is_none(), "{}", value);
        }
    }
}
