#![no_std]

//! Rule engine for a square-grid minesweeper game.
//!
//! A [`Board`] owns one game session: the mine layout, the flags and the
//! revealed cells. Hosts drive it with [`Board::reveal`] and
//! [`Board::toggle_flag`] and render it through [`Board::query_cell`].

extern crate alloc;

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use generator::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod generator;
mod types;

/// Side length and mine count of a game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub size: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const DEFAULT_SIZE: Coord = 12;
    pub const DEFAULT_MINES: CellCount = 8;

    pub const fn new_unchecked(size: Coord, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new(size: Coord, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(size, mines);
        config.validate()?;
        Ok(config)
    }

    /// Rejects empty boards and mine counts that cannot fit.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 || self.mines > self.total_cells() {
            Err(GameError::InvalidConfiguration {
                size: self.size,
                mines: self.mines,
            })
        } else {
            Ok(())
        }
    }

    pub const fn total_cells(&self) -> CellCount {
        square(self.size)
    }

    pub const fn safe_cell_count(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(Self::DEFAULT_SIZE, Self::DEFAULT_MINES)
    }
}

/// Fixed placement of mines on a square board.
///
/// Mines never move once a layout exists, so this is immutable after construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MineLayoutRaw")]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

/// Unchecked serialized form of [`MineLayout`].
#[derive(Deserialize)]
struct MineLayoutRaw {
    mine_mask: Array2<bool>,
}

impl TryFrom<MineLayoutRaw> for MineLayout {
    type Error = GameError;

    /// The stored mine count is ignored and recomputed from the mask.
    fn try_from(raw: MineLayoutRaw) -> Result<Self> {
        let (rows, cols) = raw.mine_mask.dim();
        if rows == 0 || rows != cols || rows > usize::from(Coord::MAX) {
            return Err(GameError::InvalidBoardShape);
        }
        Ok(Self::from_mine_mask(raw.mine_mask))
    }
}

impl MineLayout {
    pub(crate) fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        // the mask is at most 255x255 so the count always fits
        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX);
        Self {
            mine_count,
            mine_mask,
        }
    }

    /// Builds a layout from explicit mine positions; duplicates count once.
    pub fn from_mine_coords(size: Coord, mine_coords: &[Coord2]) -> Result<Self> {
        GameConfig::new(size, 0)?;
        let mut mine_mask: Array2<bool> = Array2::default((size, size).to_nd_index());

        for &coords in mine_coords {
            let (row, col) = coords;
            if row >= size || col >= size {
                return Err(GameError::IndexOutOfBounds { row, col, size });
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(mine_mask))
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        let (row, col) = coords;
        if row < size && col < size {
            Ok(coords)
        } else {
            Err(GameError::IndexOutOfBounds { row, col, size })
        }
    }

    pub fn size(&self) -> Coord {
        Coord::try_from(self.mine_mask.nrows()).unwrap_or(Coord::MAX)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.game_config().safe_cell_count()
    }

    pub fn total_cells(&self) -> CellCount {
        self.game_config().total_cells()
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        // at most eight neighbors
        self.iter_neighbors(coords).filter(|&pos| self[pos]).count() as u8
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.mine_mask.iter_neighbors(coords)
    }

    /// Positions of every mine, in row-major order.
    pub(crate) fn iter_mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, (row, col): Coord2) -> &Self::Output {
        &self.mine_mask[(row as usize, col as usize)]
    }
}

/// Why a move was declined. Declined moves leave the board untouched.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    Flagged,
    AlreadyRevealed,
    GameOver,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealResult {
    /// A safe cell was opened; carries its adjacent mine count.
    Revealed(u8),
    Lost,
    Won,
    Rejected(RejectReason),
}

impl RevealResult {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Rejected(_))
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Lost | Self::Won)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagResult {
    /// The flag was flipped; carries the new flag state.
    Toggled(bool),
    Rejected(RejectReason),
}

impl FlagResult {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Toggled(_))
    }
}
