use serde::{Deserialize, Serialize};

use crate::Glyph;

/// Hidden and player-visible state of a single board square.
///
/// `mined` is set once while the board is initialized, `revealed` only ever goes from `false` to
/// `true`, and `flagged` toggles freely until the cell is revealed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    mined: bool,
    revealed: bool,
    flagged: bool,
}

impl Cell {
    pub const fn is_mined(self) -> bool {
        self.mined
    }

    pub const fn is_revealed(self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(self) -> bool {
        self.flagged
    }

    /// Neither revealed nor flagged.
    pub const fn is_hidden(self) -> bool {
        !self.revealed && !self.flagged
    }

    pub fn set_mined(&mut self) {
        self.mined = true;
    }

    /// Marks the cell revealed, dropping any flag. Returns `false` if it already was.
    pub fn reveal(&mut self) -> bool {
        if self.revealed {
            return false;
        }
        self.revealed = true;
        self.flagged = false;
        true
    }

    /// Returns whether the flag actually changed; revealed cells never take a flag.
    pub fn set_flag(&mut self, flagged: bool) -> bool {
        if self.revealed || self.flagged == flagged {
            return false;
        }
        self.flagged = flagged;
        true
    }

    pub fn toggle_flag(&mut self) -> bool {
        self.set_flag(!self.flagged)
    }

    /// Display token for this cell, `adjacent` being its adjacency count.
    pub const fn glyph(self, adjacent: u8) -> Glyph {
        match (self.revealed, self.mined, self.flagged) {
            (true, true, _) => Glyph::Mine,
            (true, false, _) => Glyph::Count(adjacent),
            (false, _, true) => Glyph::Flagged,
            (false, _, false) => Glyph::Hidden,
        }
    }
}
