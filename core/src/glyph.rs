use core::fmt;
use serde::{Deserialize, Serialize};

/// Player-visible rendering of one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Glyph {
    Hidden,
    Flagged,
    Mine,
    Count(u8),
}

const DIGITS: [&str; 9] = ["0", "1", "2", "3", "4", "5", "6", "7", "8"];

impl Glyph {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hidden => "?",
            Self::Flagged => "|>",
            Self::Mine => "*",
            Self::Count(count) if (count as usize) < DIGITS.len() => DIGITS[count as usize],
            // adjacency never exceeds 8
            Self::Count(_) => "#",
        }
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Mine | Self::Count(_))
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
