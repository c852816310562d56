use alloc::vec::Vec;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// What a reveal left the game in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    StillInProgress,
    Won,
    Lost,
}

impl From<GameStatus> for RevealOutcome {
    fn from(status: GameStatus) -> Self {
        match status {
            GameStatus::InProgress => Self::StillInProgress,
            GameStatus::Won => Self::Won,
            GameStatus::Lost => Self::Lost,
        }
    }
}

/// One playthrough on a single board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SessionData")]
pub struct GameSession {
    config: GameConfig,
    board: Board,
    status: GameStatus,
    triggered_mine: Option<Location>,
}

#[derive(Deserialize)]
struct SessionData {
    config: GameConfig,
    board: Board,
    status: GameStatus,
    triggered_mine: Option<Location>,
}

impl TryFrom<SessionData> for GameSession {
    type Error = GameError;

    fn try_from(data: SessionData) -> Result<Self> {
        let board = data.board;
        if data.config.size != board.size() || data.config.mines != board.mine_count() {
            return Err(GameError::InconsistentState);
        }
        if let Some(coords) = data.triggered_mine {
            if data.status != GameStatus::Lost || !board.is_mined(coords)? {
                return Err(GameError::InconsistentState);
            }
        }
        Ok(Self {
            config: data.config,
            board,
            status: data.status,
            triggered_mine: data.triggered_mine,
        })
    }
}

impl GameSession {
    pub fn new<R: Rng>(config: GameConfig, rng: &mut R) -> Result<Self> {
        let board = Self::mined_board(config, rng)?;
        Ok(Self::with_config(config, board))
    }

    pub fn from_seed(config: GameConfig, seed: u64) -> Result<Self> {
        log::debug!("seed: {}", seed);
        Self::new(config, &mut SmallRng::seed_from_u64(seed))
    }

    /// Session over an already mined board. The status starts out in progress, even when there is
    /// no safe cell left to reveal; the first reveal that does not hit a mine then wins.
    pub fn from_board(board: Board) -> Self {
        let config = GameConfig::new_unchecked(board.size(), board.mine_count());
        Self::with_config(config, board)
    }

    fn with_config(config: GameConfig, board: Board) -> Self {
        Self {
            config,
            board,
            status: GameStatus::InProgress,
            triggered_mine: None,
        }
    }

    fn mined_board<R: Rng>(config: GameConfig, rng: &mut R) -> Result<Board> {
        config.validate()?;
        let mut board = Board::new(config.size.0, config.size.1)?;
        board.place_mines(config.mines, rng)?;
        Ok(board)
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The mine that ended a lost game.
    pub fn triggered_mine(&self) -> Option<Location> {
        self.triggered_mine
    }

    pub fn reveal_at(&mut self, coords: Location) -> Result<RevealOutcome> {
        self.reveal_cells_at(coords).map(|(outcome, _)| outcome)
    }

    /// Like [`GameSession::reveal_at`], also returning the newly revealed cells.
    pub fn reveal_cells_at(&mut self, coords: Location) -> Result<(RevealOutcome, Vec<Location>)> {
        let coords = self.board.validate(coords)?;
        if self.status.is_finished() {
            return Ok((self.status.into(), Vec::new()));
        }

        let reveal = self.board.reveal(coords)?;
        if reveal.hit_mine {
            self.triggered_mine = Some(coords);
            self.end_game(GameStatus::Lost);
        } else if self.board.is_won() {
            self.end_game(GameStatus::Won);
        }

        Ok((self.status.into(), reveal.cells))
    }

    pub fn toggle_flag_at(&mut self, coords: Location) -> Result<MarkOutcome> {
        let coords = self.board.validate(coords)?;
        if self.status.is_finished() {
            return Ok(MarkOutcome::NoChange);
        }
        self.board.toggle_flag(coords)
    }

    /// Discards the board for a freshly mined one with the same configuration.
    pub fn restart<R: Rng>(&mut self, rng: &mut R) -> Result<()> {
        let board = Self::mined_board(self.config, rng)?;
        *self = Self::with_config(self.config, board);
        log::debug!("Restarted {:?} game", self.config.size);
        Ok(())
    }

    fn end_game(&mut self, status: GameStatus) {
        if self.status.is_finished() {
            return;
        }
        self.status = status;
        log::debug!("Game ended: {:?}", status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(size: Location, mines: &[Location]) -> GameSession {
        GameSession::from_board(Board::from_mine_coords(size, mines).unwrap())
    }

    #[test]
    fn single_safe_cell_wins_immediately() {
        let mut game = GameSession::from_seed(GameConfig::new((1, 1), 0).unwrap(), 0).unwrap();

        assert_eq!(game.reveal_at((0, 0)), Ok(RevealOutcome::Won));
        assert_eq!(game.status(), GameStatus::Won);
    }

    #[test]
    fn single_mined_cell_loses_immediately() {
        let mut game = GameSession::from_seed(GameConfig::new((1, 1), 1).unwrap(), 0).unwrap();
        assert_eq!(game.status(), GameStatus::InProgress);

        assert_eq!(game.reveal_at((0, 0)), Ok(RevealOutcome::Lost));
        assert_eq!(game.status(), GameStatus::Lost);
        assert_eq!(game.triggered_mine(), Some((0, 0)));
    }

    #[test]
    fn cascade_then_win() {
        let mut game = session((3, 3), &[(2, 1), (1, 2)]);

        let (outcome, cells) = game.reveal_cells_at((0, 0)).unwrap();
        assert_eq!(outcome, RevealOutcome::StillInProgress);
        assert_eq!(cells.len(), 4);
        for coords in [(0, 1), (1, 0), (1, 1)] {
            assert!(cells.contains(&coords));
        }
        assert!(!game.board().cell_at((2, 1)).unwrap().is_revealed());

        for coords in [(2, 0), (0, 2)] {
            assert_eq!(game.reveal_at(coords), Ok(RevealOutcome::StillInProgress));
        }
        assert_eq!(game.reveal_at((2, 2)), Ok(RevealOutcome::Won));
        assert!(game.is_finished());
    }

    #[test]
    fn corner_mine_cascade_wins_in_one_move() {
        let mut game = session((3, 3), &[(2, 2)]);

        let (outcome, cells) = game.reveal_cells_at((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(cells.len(), 8);
        assert!(!cells.contains(&(2, 2)));
    }

    #[test]
    fn blocked_reveal_on_mine_only_board_still_wins() {
        let mut game = session((1, 1), &[(0, 0)]);
        game.toggle_flag_at((0, 0)).unwrap();

        assert_eq!(game.reveal_cells_at((0, 0)), Ok((RevealOutcome::Won, Vec::new())));
        assert_eq!(game.status(), GameStatus::Won);
        assert!(!game.board().cell_at((0, 0)).unwrap().is_revealed());
    }

    #[test]
    fn flag_blocks_reveal_until_removed() {
        let mut game = session((3, 3), &[(2, 2)]);

        assert_eq!(game.toggle_flag_at((1, 1)), Ok(MarkOutcome::Changed));
        assert_eq!(game.reveal_at((1, 1)), Ok(RevealOutcome::StillInProgress));
        assert_eq!(game.status(), GameStatus::InProgress);
        assert!(!game.board().cell_at((1, 1)).unwrap().is_revealed());

        assert_eq!(game.toggle_flag_at((1, 1)), Ok(MarkOutcome::Changed));
        game.reveal_at((1, 1)).unwrap();
        assert!(game.board().cell_at((1, 1)).unwrap().is_revealed());
    }

    #[test]
    fn finished_game_ignores_actions() {
        let mut game = session((2, 2), &[(0, 0)]);
        game.reveal_at((0, 0)).unwrap();
        let before = game.clone();

        assert_eq!(game.reveal_cells_at((1, 1)), Ok((RevealOutcome::Lost, Vec::new())));
        assert_eq!(game.toggle_flag_at((1, 0)), Ok(MarkOutcome::NoChange));
        assert_eq!(game, before);
    }

    #[test]
    fn toggle_flag_on_revealed_cell_is_a_no_op() {
        let mut game = session((3, 3), &[(2, 2)]);
        game.reveal_at((1, 1)).unwrap();

        assert_eq!(game.toggle_flag_at((1, 1)), Ok(MarkOutcome::NoChange));
    }

    #[test]
    fn out_of_bounds_surfaces_even_after_the_game() {
        let mut game = session((2, 2), &[(0, 0)]);
        assert_eq!(game.reveal_at((2, 2)), Err(GameError::OutOfBounds));

        game.reveal_at((0, 0)).unwrap();
        assert_eq!(game.toggle_flag_at((5, 0)), Err(GameError::OutOfBounds));
    }

    #[test]
    fn losing_does_not_touch_other_cells() {
        let mut game = session((3, 3), &[(0, 0), (2, 2)]);

        assert_eq!(game.reveal_at((2, 2)), Ok(RevealOutcome::Lost));
        assert_eq!(game.board().revealed_count(), 1);
    }

    #[test]
    fn saved_session_round_trips_and_rejects_mismatched_config() {
        let mut game = session((3, 3), &[(0, 0)]);
        game.reveal_at((0, 0)).unwrap();
        let value = serde_json::to_value(&game).unwrap();

        let restored: GameSession = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(restored, game);

        let mut tampered = value.clone();
        tampered["config"]["size"] = serde_json::Value::from(alloc::vec![9u8, 9u8]);
        assert!(serde_json::from_value::<GameSession>(tampered).is_err());

        let mut tampered = value;
        tampered["triggered_mine"] = serde_json::Value::from(alloc::vec![7u8, 7u8]);
        assert!(serde_json::from_value::<GameSession>(tampered).is_err());
    }

    #[test]
    fn seeded_sessions_are_reproducible() {
        let config = GameConfig::new((9, 9), 10).unwrap();
        let a = GameSession::from_seed(config, 99).unwrap();
        let b = GameSession::from_seed(config, 99).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.board().mine_count(), 10);
    }

    #[test]
    fn restart_replaces_board() {
        let mut rng = SmallRng::seed_from_u64(1);
        let config = GameConfig::new((4, 4), 16).unwrap();
        let mut game = GameSession::new(config, &mut rng).unwrap();
        game.reveal_at((3, 3)).unwrap();
        assert_eq!(game.status(), GameStatus::Lost);

        game.restart(&mut rng).unwrap();

        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.triggered_mine(), None);
        assert_eq!(game.board().revealed_count(), 0);
        assert_eq!(game.board().mine_count(), 16);
        assert_eq!(game.config(), config);
    }

    #[test]
    fn full_playthrough_on_random_boards() {
        for seed in 0..20 {
            let mut game = GameSession::from_seed(GameConfig::new((8, 6), 9).unwrap(), seed).unwrap();
            let (width, height) = game.board().size();
            for x in 0..width {
                for y in 0..height {
                    if !game.board().is_mined((x, y)).unwrap() {
                        game.reveal_at((x, y)).unwrap();
                    }
                }
            }
            assert_eq!(game.status(), GameStatus::Won);
        }
    }
}
