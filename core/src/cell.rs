use serde::{Deserialize, Serialize};

/// Player-side state of a single cell, stored by the board.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Flagged,
    /// Revealed safe cell with its adjacent mine count.
    Revealed(u8),
    /// Revealed mine, either the one that was hit or one exposed by the loss.
    Exploded,
}

impl CellState {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed(_) | Self::Exploded)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }
}

/// Read-only projection of a cell for rendering.
///
/// Mines are only visible through this view once revealed or after a loss.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub is_revealed: bool,
    pub is_flagged: bool,
    /// Set only for revealed safe cells. `Some(0)` renders as blank.
    pub adjacent_mine_count: Option<u8>,
    pub has_mine_visible: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cell_is_hidden() {
        assert_eq!(CellState::default(), CellState::Hidden);
        assert_eq!(CellView::default().adjacent_mine_count, None);
    }

    #[test]
    fn exploded_counts_as_revealed() {
        assert!(CellState::Exploded.is_revealed());
        assert!(CellState::Revealed(0).is_revealed());
        assert!(!CellState::Flagged.is_revealed());
        assert!(CellState::Flagged.is_flagged());
    }
}
