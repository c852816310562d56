use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

impl From<bool> for MarkOutcome {
    fn from(changed: bool) -> Self {
        if changed { Self::Changed } else { Self::NoChange }
    }
}

/// Cells uncovered by a single [`Board::reveal`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reveal {
    /// Newly revealed locations, the requested one first. Empty when nothing changed.
    pub cells: Vec<Location>,
    /// The requested location held a mine.
    pub hit_mine: bool,
}

impl Reveal {
    pub fn has_update(&self) -> bool {
        !self.cells.is_empty()
    }
}

/// Fixed-size grid of [`Cell`]s.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoardData")]
pub struct Board {
    size: Location,
    cells: Array2<Cell>,
    mines_placed: bool,
    mine_count: CellCount,
    revealed_count: CellCount,
    flag_count: CellCount,
}

/// Wire form of a [`Board`], checked against its cells before it becomes one.
#[derive(Deserialize)]
struct BoardData {
    size: Location,
    cells: Array2<Cell>,
    mines_placed: bool,
    mine_count: CellCount,
    revealed_count: CellCount,
    flag_count: CellCount,
}

impl TryFrom<BoardData> for Board {
    type Error = GameError;

    fn try_from(data: BoardData) -> Result<Self> {
        let mut board = Self::new(data.size.0, data.size.1)?;
        if data.cells.dim() != (usize::from(data.size.0), usize::from(data.size.1)) {
            return Err(GameError::InvalidBoardShape);
        }
        if data.cells.iter().any(|cell| cell.is_revealed() && cell.is_flagged()) {
            return Err(GameError::InconsistentState);
        }

        // dimensions are checked, so every count fits
        let count = |pred: fn(&Cell) -> bool| {
            data.cells.iter().filter(|&cell| pred(cell)).count() as CellCount
        };
        let mine_count = count(|cell| cell.is_mined());
        let revealed_count = count(|cell| cell.is_revealed());
        let flag_count = count(|cell| cell.is_flagged());
        if (mine_count, revealed_count, flag_count)
            != (data.mine_count, data.revealed_count, data.flag_count)
            || (mine_count > 0 && !data.mines_placed)
        {
            return Err(GameError::InconsistentState);
        }

        board.cells = data.cells;
        board.mines_placed = data.mines_placed;
        board.mine_count = mine_count;
        board.revealed_count = revealed_count;
        board.flag_count = flag_count;
        Ok(board)
    }
}

impl Board {
    /// Board of unmined, hidden cells. Mines are added later with [`Board::place_mines`].
    pub fn new(width: Coord, height: Coord) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GameError::InvalidDimension);
        }
        let size = (width, height);
        Ok(Self {
            size,
            cells: Array2::default(size.to_nd_index()),
            mines_placed: false,
            mine_count: 0,
            revealed_count: 0,
            flag_count: 0,
        })
    }

    /// Board with mines at exactly `mine_coords`; repeated coordinates count once.
    pub fn from_mine_coords(size: Location, mine_coords: &[Location]) -> Result<Self> {
        let mut board = Self::new(size.0, size.1)?;
        let mut mask: Array2<bool> = Array2::default(size.to_nd_index());
        for &coords in mine_coords {
            let coords = board.validate(coords)?;
            mask[coords.to_nd_index()] = true;
        }
        board.apply_mine_mask(&mask);
        Ok(board)
    }

    pub fn place_mines<R: Rng>(&mut self, count: CellCount, rng: &mut R) -> Result<()> {
        self.place_mines_with(&AutoSampler, count, rng)
    }

    pub fn place_mines_with<G, R>(
        &mut self,
        generator: &G,
        count: CellCount,
        rng: &mut R,
    ) -> Result<()>
    where
        G: MineGenerator,
        R: Rng,
    {
        if self.mines_placed {
            return Err(GameError::MinesAlreadyPlaced);
        }
        if count > self.total_cells() {
            return Err(GameError::InvalidMineCount);
        }

        let mask = generator.generate(self.size, count, rng)?;
        self.apply_mine_mask(&mask);

        if self.mine_count != count {
            log::warn!(
                "Generated mine count mismatch, actual: {}, requested: {}",
                self.mine_count,
                count
            );
        }
        log::debug!("Placed {} mines on {:?} board", self.mine_count, self.size);
        Ok(())
    }

    fn apply_mine_mask(&mut self, mask: &Array2<bool>) {
        for (cell, _) in self
            .cells
            .iter_mut()
            .zip(mask.iter())
            .filter(|&(_, &mined)| mined)
        {
            cell.set_mined();
        }
        self.mine_count = self
            .cells
            .iter()
            .filter(|cell| cell.is_mined())
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX);
        self.mines_placed = true;
    }

    pub fn validate(&self, coords: Location) -> Result<Location> {
        if coords.0 < self.size.0 && coords.1 < self.size.1 {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    pub fn size(&self) -> Location {
        self.size
    }

    pub fn width(&self) -> Coord {
        self.size.0
    }

    pub fn height(&self) -> Coord {
        self.size.1
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    /// Cells not revealed yet, flagged or not.
    pub fn hidden_count(&self) -> CellCount {
        self.total_cells() - self.revealed_count
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    /// Mines minus flags; negative when the player over-flags.
    pub fn mines_left(&self) -> isize {
        (self.mine_count as isize) - (self.flag_count as isize)
    }

    pub fn cell_at(&self, coords: Location) -> Result<Cell> {
        let coords = self.validate(coords)?;
        Ok(self.cells[coords.to_nd_index()])
    }

    pub fn is_mined(&self, coords: Location) -> Result<bool> {
        Ok(self.cell_at(coords)?.is_mined())
    }

    pub fn adjacent_mine_count(&self, coords: Location) -> Result<u8> {
        let coords = self.validate(coords)?;
        Ok(self.count_adjacent_mines(coords))
    }

    fn neighbors(&self, coords: Location) -> NeighborIter {
        NeighborIter::new(coords, self.size)
    }

    fn count_adjacent_mines(&self, coords: Location) -> u8 {
        let count = self
            .neighbors(coords)
            .filter(|pos| self.cells[pos.to_nd_index()].is_mined())
            .count();
        // at most 8 neighbors
        count as u8
    }

    /// Every non-mined cell has been revealed.
    pub fn is_won(&self) -> bool {
        self.hidden_count() == self.mine_count
    }

    /// Reveals the cell at `coords`, flooding outwards through cells with no adjacent mines.
    ///
    /// Revealed or flagged cells are left alone, as are flagged cells reached by the flood. A mined
    /// cell is still revealed, reported through [`Reveal::hit_mine`], and nothing else changes.
    pub fn reveal(&mut self, coords: Location) -> Result<Reveal> {
        let coords = self.validate(coords)?;
        let cell = self.cells[coords.to_nd_index()];

        if cell.is_revealed() || cell.is_flagged() {
            return Ok(Reveal::default());
        }

        self.open(coords);
        let mut cells = vec![coords];

        if cell.is_mined() {
            log::debug!("Revealed mine at {:?}", coords);
            return Ok(Reveal {
                cells,
                hit_mine: true,
            });
        }

        let adjacent_mines = self.count_adjacent_mines(coords);
        log::debug!("Revealed {:?}, adjacent mines: {}", coords, adjacent_mines);
        if adjacent_mines == 0 {
            self.flood_fill(coords, &mut cells);
        }

        Ok(Reveal {
            cells,
            hit_mine: false,
        })
    }

    fn open(&mut self, coords: Location) {
        if self.cells[coords.to_nd_index()].reveal() {
            self.revealed_count += 1;
        }
    }

    /// Breadth-first reveal of the region around the zero cell `start`.
    fn flood_fill(&mut self, start: Location, revealed: &mut Vec<Location>) {
        let mut visited = BTreeSet::from([start]);
        let mut to_visit: VecDeque<Location> = self.hidden_neighbors(start).collect();
        log::trace!(
            "Starting flood-fill from {:?}, initial neighbors: {:?}",
            start,
            to_visit
        );

        while let Some(visit_coords) = to_visit.pop_front() {
            if !visited.insert(visit_coords) {
                continue;
            }

            let cell = self.cells[visit_coords.to_nd_index()];
            // flags block the flood; a zero cell never borders a mine
            if !cell.is_hidden() || cell.is_mined() {
                log::trace!("Skipping cell at {:?}", visit_coords);
                continue;
            }

            self.open(visit_coords);
            revealed.push(visit_coords);

            let visit_adjacent_mines = self.count_adjacent_mines(visit_coords);
            log::trace!(
                "Flood revealed {:?}, adjacent mines: {}",
                visit_coords,
                visit_adjacent_mines
            );

            if visit_adjacent_mines == 0 {
                to_visit.extend(
                    self.hidden_neighbors(visit_coords)
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }

    fn hidden_neighbors(&self, coords: Location) -> impl Iterator<Item = Location> + '_ {
        self.neighbors(coords)
            .filter(|pos| self.cells[pos.to_nd_index()].is_hidden())
    }

    /// Flips the flag on a hidden cell; revealed cells are left untouched.
    pub fn toggle_flag(&mut self, coords: Location) -> Result<MarkOutcome> {
        let coords = self.validate(coords)?;
        let flagged = self.cells[coords.to_nd_index()].is_flagged();
        self.set_flag(coords, !flagged)
    }

    pub fn set_flag(&mut self, coords: Location, flagged: bool) -> Result<MarkOutcome> {
        let coords = self.validate(coords)?;
        let changed = self.cells[coords.to_nd_index()].set_flag(flagged);
        if changed {
            if flagged {
                self.flag_count += 1;
            } else {
                self.flag_count -= 1;
            }
            log::debug!("Flag at {:?} set to {}", coords, flagged);
        }
        Ok(changed.into())
    }

    pub fn glyph_at(&self, coords: Location) -> Result<Glyph> {
        let coords = self.validate(coords)?;
        Ok(self.glyph_unchecked(coords))
    }

    fn glyph_unchecked(&self, coords: Location) -> Glyph {
        let cell = self.cells[coords.to_nd_index()];
        if cell.is_revealed() && !cell.is_mined() {
            cell.glyph(self.count_adjacent_mines(coords))
        } else {
            cell.glyph(0)
        }
    }

    /// Read-only view rendering every cell as if it were revealed.
    pub fn uncovered(&self) -> Uncovered<'_> {
        Uncovered(self)
    }

    fn render(
        &self,
        f: &mut fmt::Formatter<'_>,
        glyph: impl Fn(Location) -> Glyph,
    ) -> fmt::Result {
        let (width, height) = self.size;

        write!(f, "    ")?;
        for x in 0..width {
            write!(f, "{:^3}", x)?;
        }
        writeln!(f)?;

        write!(f, "    ")?;
        for _ in 0..width {
            write!(f, " _ ")?;
        }
        writeln!(f)?;

        for y in 0..height {
            write!(f, "{:>3}|", y)?;
            for x in 0..width {
                write!(f, "{:^3}", glyph((x, y)))?;
            }
            writeln!(f, "|")?;
        }

        write!(f, "    ")?;
        for _ in 0..width {
            write!(f, " _ ")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, |coords| self.glyph_unchecked(coords))
    }
}

/// See [`Board::uncovered`].
#[derive(Copy, Clone, Debug)]
pub struct Uncovered<'a>(&'a Board);

impl fmt::Display for Uncovered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board = self.0;
        board.render(f, |coords| {
            let mut cell = board.cells[coords.to_nd_index()];
            cell.reveal();
            cell.glyph(board.count_adjacent_mines(coords))
        })
    }
}
