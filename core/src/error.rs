use thiserror::Error;

use crate::{CellCount, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: {mines} mines on a {size}x{size} board")]
    InvalidConfiguration { size: Coord, mines: CellCount },
    #[error("Coordinates ({row}, {col}) are outside a {size}x{size} board")]
    IndexOutOfBounds { row: Coord, col: Coord, size: Coord },
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Board state is inconsistent with its mine layout")]
    InconsistentBoard,
}

pub type Result<T> = core::result::Result<T, GameError>;
