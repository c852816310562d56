use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board width and height must be non-zero")]
    InvalidDimension,
    #[error("Mine count does not fit on the board")]
    InvalidMineCount,
    #[error("Location is outside the board")]
    OutOfBounds,
    #[error("Mines were already placed on this board")]
    MinesAlreadyPlaced,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Stored game state does not match its cells")]
    InconsistentState,
}

pub type Result<T> = core::result::Result<T, GameError>;
