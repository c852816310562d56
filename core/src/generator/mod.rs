use ndarray::Array2;
use rand::Rng;

use crate::*;
pub use rejection::*;
pub use shuffle::*;

mod rejection;
mod shuffle;

/// Strategy that chooses which cells of a `size` board hold mines.
///
/// Implementations must return a mask of exactly `size` with exactly `mines` cells set, every
/// mine set being equally likely.
pub trait MineGenerator {
    fn generate<R: Rng>(&self, size: Location, mines: CellCount, rng: &mut R)
    -> Result<Array2<bool>>;
}

/// Picks [`RejectionSampler`] while at most half the board is mined, [`ShuffleSampler`] beyond
/// that, where rejection draws start to pile up.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AutoSampler;

impl AutoSampler {
    pub fn prefers_shuffle(size: Location, mines: CellCount) -> bool {
        u32::from(mines) * 2 > u32::from(mult(size.0, size.1))
    }
}

impl MineGenerator for AutoSampler {
    fn generate<R: Rng>(
        &self,
        size: Location,
        mines: CellCount,
        rng: &mut R,
    ) -> Result<Array2<bool>> {
        if Self::prefers_shuffle(size, mines) {
            ShuffleSampler.generate(size, mines, rng)
        } else {
            RejectionSampler.generate(size, mines, rng)
        }
    }
}

/// Validates a generation request, returning the number of cells on the board.
pub(crate) fn check_request(size: Location, mines: CellCount) -> Result<CellCount> {
    if size.0 == 0 || size.1 == 0 {
        return Err(GameError::InvalidDimension);
    }
    let total_cells = mult(size.0, size.1);
    if mines > total_cells {
        return Err(GameError::InvalidMineCount);
    }
    Ok(total_cells)
}
