use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl Outcome {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One game session: mine layout, per-cell player state and outcome.
///
/// Every mutation goes through `&mut self`, so a reveal (including its flood) is never
/// observable half-done. Independent games are independent `Board` values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoardRaw")]
pub struct Board {
    mine_layout: MineLayout,
    cells: Array2<CellState>,
    revealed_count: CellCount,
    flagged_count: CellCount,
    outcome: Outcome,
    triggered_mine: Option<Coord2>,
}

/// Unchecked serialized form of [`Board`].
#[derive(Deserialize)]
struct BoardRaw {
    mine_layout: MineLayout,
    cells: Array2<CellState>,
    revealed_count: CellCount,
    flagged_count: CellCount,
    outcome: Outcome,
    triggered_mine: Option<Coord2>,
}

impl TryFrom<BoardRaw> for Board {
    type Error = GameError;

    /// Accepts only states reachable through `reveal` and `toggle_flag`.
    fn try_from(raw: BoardRaw) -> Result<Self> {
        use CellState::*;

        let layout = &raw.mine_layout;
        let size = usize::from(layout.size());
        if raw.cells.dim() != (size, size) {
            return Err(GameError::InvalidBoardShape);
        }

        let mut revealed: CellCount = 0;
        let mut flagged: CellCount = 0;
        let mut exploded = false;
        for ((row, col), &cell) in raw.cells.indexed_iter() {
            let coords = (row as Coord, col as Coord);
            let has_mine = layout.contains_mine(coords);
            match cell {
                Hidden => {}
                Flagged => flagged += 1,
                Revealed(count) if !has_mine && count == layout.adjacent_mine_count(coords) => {
                    revealed += 1
                }
                Exploded if has_mine => exploded = true,
                Revealed(_) | Exploded => return Err(GameError::InconsistentBoard),
            }
        }

        let triggered_ok = match raw.triggered_mine {
            Some(coords) => {
                layout.validate_coords(coords).is_ok() && layout.contains_mine(coords)
            }
            None => true,
        };
        let outcome_ok = match raw.outcome {
            Outcome::Lost => exploded && raw.triggered_mine.is_some(),
            Outcome::Won => !exploded && revealed == layout.safe_cell_count(),
            // a board with no safe cells stays in progress until its first reveal
            Outcome::InProgress => {
                !exploded && (revealed < layout.safe_cell_count() || revealed == 0)
            }
        };
        if revealed != raw.revealed_count
            || flagged != raw.flagged_count
            || !triggered_ok
            || !outcome_ok
        {
            return Err(GameError::InconsistentBoard);
        }

        Ok(Self {
            mine_layout: raw.mine_layout,
            cells: raw.cells,
            revealed_count: raw.revealed_count,
            flagged_count: raw.flagged_count,
            outcome: raw.outcome,
            triggered_mine: raw.triggered_mine,
        })
    }
}

impl Board {
    /// Starts a new game with a freshly drawn random layout.
    pub fn initialize(config: GameConfig) -> Result<Self> {
        RandomLayoutGenerator::from_entropy()
            .generate(config)
            .map(Self::from_layout)
    }

    /// Starts a new game whose layout is fully determined by `seed`.
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        RandomLayoutGenerator::new(seed)
            .generate(config)
            .map(Self::from_layout)
    }

    pub fn from_layout(mine_layout: MineLayout) -> Self {
        let size = mine_layout.size();
        log::debug!(
            "New {}x{} board with {} mines",
            size,
            size,
            mine_layout.mine_count()
        );
        Self {
            cells: Array2::default((size, size).to_nd_index()),
            mine_layout,
            revealed_count: 0,
            flagged_count: 0,
            outcome: Outcome::InProgress,
            triggered_mine: None,
        }
    }

    /// Replaces this session with a new random game of the same size and mine count.
    pub fn restart(&mut self) -> Result<()> {
        *self = Self::initialize(self.config())?;
        Ok(())
    }

    pub fn config(&self) -> GameConfig {
        self.mine_layout.game_config()
    }

    pub fn size(&self) -> Coord {
        self.mine_layout.size()
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_finished()
    }

    pub fn total_mines(&self) -> CellCount {
        self.mine_layout.mine_count()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    /// Mines minus flags; negative when the player placed too many flags.
    pub fn mines_left(&self) -> i32 {
        i32::from(self.mine_layout.mine_count()) - i32::from(self.flagged_count)
    }

    /// The mine whose reveal lost the game.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn query_cell(&self, coords: Coord2) -> Result<CellView> {
        let coords = self.mine_layout.validate_coords(coords)?;
        Ok(self.view_at(coords))
    }

    /// Every cell with its view, row by row.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, CellView)> + '_ {
        let size = self.size();
        (0..size)
            .flat_map(move |row| (0..size).map(move |col| (row, col)))
            .map(|coords| (coords, self.view_at(coords)))
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagResult> {
        use CellState::*;
        use FlagResult::*;

        let coords = self.mine_layout.validate_coords(coords)?;
        if self.outcome.is_finished() {
            return Ok(Rejected(RejectReason::GameOver));
        }

        Ok(match self.cells[coords.to_nd_index()] {
            Hidden => {
                self.cells[coords.to_nd_index()] = Flagged;
                self.flagged_count += 1;
                Toggled(true)
            }
            Flagged => {
                self.cells[coords.to_nd_index()] = Hidden;
                self.flagged_count -= 1;
                Toggled(false)
            }
            Revealed(_) | Exploded => Rejected(RejectReason::AlreadyRevealed),
        })
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealResult> {
        use RevealResult::*;

        let coords = self.mine_layout.validate_coords(coords)?;
        if self.outcome.is_finished() {
            return Ok(Rejected(RejectReason::GameOver));
        }

        let cell = self.cells[coords.to_nd_index()];
        if cell.is_flagged() {
            return Ok(Rejected(RejectReason::Flagged));
        }
        if cell.is_revealed() {
            return Ok(Rejected(RejectReason::AlreadyRevealed));
        }

        if self.mine_layout.contains_mine(coords) {
            self.lose(coords);
            return Ok(Lost);
        }

        let adjacent_mines = self.flood_reveal(coords);

        if self.revealed_count == self.mine_layout.safe_cell_count() {
            log::debug!("Won after revealing {} cells", self.revealed_count);
            self.outcome = Outcome::Won;
            Ok(Won)
        } else {
            Ok(Revealed(adjacent_mines))
        }
    }

    /// Reveals a safe cell and, when it has no adjacent mines, the connected zero region and
    /// its border. Returns the adjacent count of the starting cell.
    fn flood_reveal(&mut self, start: Coord2) -> u8 {
        let adjacent_mines = self.reveal_safe_cell(start);
        log::debug!("Revealed {:?}, adjacent mines: {}", start, adjacent_mines);
        if adjacent_mines != 0 {
            return adjacent_mines;
        }

        let mut to_visit: Vec<Coord2> = self.hidden_neighbors(start).collect();
        while let Some(visit_coords) = to_visit.pop() {
            // already opened earlier in this flood, or flagged
            if self.cells[visit_coords.to_nd_index()] != CellState::Hidden {
                continue;
            }

            let visit_adjacent_mines = self.reveal_safe_cell(visit_coords);
            log::trace!(
                "Flood revealed {:?}, adjacent mines: {}",
                visit_coords,
                visit_adjacent_mines
            );

            if visit_adjacent_mines == 0 {
                to_visit.extend(self.hidden_neighbors(visit_coords));
            }
        }

        adjacent_mines
    }

    fn reveal_safe_cell(&mut self, coords: Coord2) -> u8 {
        let adjacent_mines = self.mine_layout.adjacent_mine_count(coords);
        self.cells[coords.to_nd_index()] = CellState::Revealed(adjacent_mines);
        self.revealed_count += 1;
        adjacent_mines
    }

    fn hidden_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_layout
            .iter_neighbors(coords)
            .filter(|&pos| self.cells[pos.to_nd_index()] == CellState::Hidden)
    }

    /// Ends the game and exposes every mine, including flagged ones.
    fn lose(&mut self, triggered: Coord2) {
        log::debug!("Mine hit at {:?}", triggered);
        self.triggered_mine = Some(triggered);
        self.outcome = Outcome::Lost;

        for coords in self.mine_layout.iter_mines() {
            let cell = &mut self.cells[coords.to_nd_index()];
            if cell.is_flagged() {
                self.flagged_count -= 1;
            }
            *cell = CellState::Exploded;
        }
    }

    fn view_at(&self, coords: Coord2) -> CellView {
        let cell = self.cells[coords.to_nd_index()];
        let has_mine = self.mine_layout.contains_mine(coords);
        CellView {
            is_revealed: cell.is_revealed(),
            is_flagged: cell.is_flagged(),
            adjacent_mine_count: match cell {
                CellState::Revealed(count) => Some(count),
                _ => None,
            },
            has_mine_visible: has_mine
                && (cell.is_revealed() || self.outcome == Outcome::Lost),
        }
    }
}
