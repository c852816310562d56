#![no_std]

extern crate alloc;

use rand::Rng;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use generator::*;
pub use glyph::*;
pub use session::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod generator;
mod glyph;
mod session;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Location,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Location, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new(size: Location, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(size, mines);
        config.validate()?;
        Ok(config)
    }

    /// Deserialized configs skip [`GameConfig::new`], so check them before use.
    pub fn validate(&self) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return Err(GameError::InvalidDimension);
        }
        if self.mines > self.total_cells() {
            return Err(GameError::InvalidMineCount);
        }
        Ok(())
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

/// Starts a game on a freshly mined `width` by `height` board.
pub fn new_game<R: Rng>(
    width: Coord,
    height: Coord,
    mines: CellCount,
    rng: &mut R,
) -> Result<GameSession> {
    GameSession::new(GameConfig::new((width, height), mines)?, rng)
}
