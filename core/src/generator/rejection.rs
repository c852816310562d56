use super::*;

/// Draws uniformly random locations and mines each one that is not mined yet, until the
/// requested count is reached.
///
/// Placing `m` mines on `n` cells takes `n/n + n/(n-1) + ... + n/(n-m+1)` draws on average,
/// roughly `m / (1 - m/n)`. That is cheap on sparse boards and blows up as `m` approaches `n`;
/// prefer [`ShuffleSampler`] (or [`AutoSampler`]) for dense boards.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RejectionSampler;

impl RejectionSampler {
    /// Mean number of draws needed to place `mines` mines on `total_cells` cells.
    pub fn expected_draws(mines: CellCount, total_cells: CellCount) -> f64 {
        let n = f64::from(total_cells);
        (0..mines.min(total_cells))
            .map(|placed| n / (n - f64::from(placed)))
            .sum()
    }
}

impl MineGenerator for RejectionSampler {
    fn generate<R: Rng>(
        &self,
        size: Location,
        mines: CellCount,
        rng: &mut R,
    ) -> Result<Array2<bool>> {
        let total_cells = check_request(size, mines)?;
        log::trace!(
            "Rejection sampling {} mines over {} cells, expecting {:.1} draws",
            mines,
            total_cells,
            Self::expected_draws(mines, total_cells)
        );

        let mut mask: Array2<bool> = Array2::default(size.to_nd_index());
        let mut placed: CellCount = 0;
        let mut draws: u64 = 0;
        while placed < mines {
            let coords = (rng.random_range(0..size.0), rng.random_range(0..size.1));
            draws += 1;
            let cell = &mut mask[coords.to_nd_index()];
            if !*cell {
                *cell = true;
                placed += 1;
            }
        }
        log::trace!("Placed {} mines in {} draws", placed, draws);

        Ok(mask)
    }
}
