//! Row counts to FSS length tokens.

use core::fmt;

/// Largest token covers 2^4 = 16 rows.
const MAX_POWER: u32 = 4;

/// One FSS duration symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LengthToken {
    One,
    Two,
    Four,
    Eight,
    Sixteen,
}

impl LengthToken {
    const fn from_power(power: u32) -> Self {
        match power {
            0 => LengthToken::One,
            1 => LengthToken::Two,
            2 => LengthToken::Four,
            3 => LengthToken::Eight,
            _ => LengthToken::Sixteen,
        }
    }

    /// Number of pattern rows this token lasts.
    pub const fn rows(self) -> u32 {
        match self {
            LengthToken::One => 1,
            LengthToken::Two => 2,
            LengthToken::Four => 4,
            LengthToken::Eight => 8,
            LengthToken::Sixteen => 16,
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            LengthToken::One => '1',
            LengthToken::Two => '2',
            LengthToken::Four => '4',
            LengthToken::Eight => '8',
            LengthToken::Sixteen => 'f',
        }
    }
}

impl fmt::Display for LengthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Split a row count into length tokens, largest first.
///
/// Each step takes the largest power of two (capped at 16) that fits in the
/// remaining count.
pub fn split(rows: u32) -> Vec<LengthToken> {
    let mut tokens = Vec::new();
    let mut remaining = rows;
    while remaining > 0 {
        let power = remaining.ilog2().min(MAX_POWER);
        tokens.push(LengthToken::from_power(power));
        remaining -= 1 << power;
    }
    tokens
}
