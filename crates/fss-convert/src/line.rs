//! FSS output lines.

use core::fmt;

use crate::duration::LengthToken;
use crate::encode::VolumeLevel;

/// Name written into the generator comment.
pub const GENERATOR: &str = "it2fss";

/// One line of an FSS file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Line {
    /// Initial tempo at the top of the file
    Tempo(u32),
    Blank,
    /// `> text`
    Comment(String),
    /// `t<value>` tempo change before a note
    SetTempo(u32),
    /// `<name><octave><length><volume>`
    Tone {
        name: char,
        octave: u8,
        length: LengthToken,
        volume: VolumeLevel,
    },
    /// `x-<length><volume>`
    Noise { length: LengthToken, volume: VolumeLevel },
    /// `K-<length>`
    Kick(LengthToken),
    /// `S-<length>`
    Snare(LengthToken),
    /// `r-<length>`
    Rest(LengthToken),
}

impl Line {
    pub fn generator() -> Self {
        Line::Comment(format!("generated by {} {}", GENERATOR, env!("CARGO_PKG_VERSION")))
    }

    pub fn pattern(index: u8) -> Self {
        Line::Comment(format!("pattern {}", index))
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Tempo(value) => write!(f, "{}", value),
            Line::Blank => Ok(()),
            Line::Comment(text) => write!(f, "> {}", text),
            Line::SetTempo(value) => write!(f, "t{}", value),
            Line::Tone { name, octave, length, volume } => {
                write!(f, "{}{}{}{}", name, octave, length, volume)
            }
            Line::Noise { length, volume } => write!(f, "x-{}{}", length, volume),
            Line::Kick(length) => write!(f, "K-{}", length),
            Line::Snare(length) => write!(f, "S-{}", length),
            Line::Rest(length) => write!(f, "r-{}", length),
        }
    }
}

/// Join lines into file text, every line terminated by `\n`.
pub fn render(lines: &[Line]) -> String {
    let mut text = String::new();
    for line in lines {
        text.push_str(&line.to_string());
        text.push('\n');
    }
    text
}
