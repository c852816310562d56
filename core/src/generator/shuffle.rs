use alloc::vec::Vec;

use super::*;

/// Partial Fisher–Yates shuffle over the cell indices: the first `mines` positions of the
/// shuffled order are mined. Always `O(width * height)`, regardless of density.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ShuffleSampler;

impl MineGenerator for ShuffleSampler {
    fn generate<R: Rng>(
        &self,
        size: Location,
        mines: CellCount,
        rng: &mut R,
    ) -> Result<Array2<bool>> {
        let total_cells = check_request(size, mines)?;
        let mines = usize::from(mines);

        let mut order: Vec<usize> = (0..usize::from(total_cells)).collect();
        for i in 0..mines {
            let j = rng.random_range(i..order.len());
            order.swap(i, j);
        }

        let height = usize::from(size.1);
        let mut mask: Array2<bool> = Array2::default(size.to_nd_index());
        for &index in &order[..mines] {
            mask[[index / height, index % height]] = true;
        }
        log::trace!("Shuffled {} mines over {} cells", mines, total_cells);

        Ok(mask)
    }
}
