use crate::*;
pub use random::*;

mod random;

/// Strategy for placing the mines of a new game.
pub trait MineLayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout>;
}
