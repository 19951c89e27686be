use super::*;
use ndarray::Array2;

/// Uniform placement without replacement, driven by a seed so a layout can be reproduced.
///
/// Mine positions are a random subset of the flat cell indices, so placement is linear in the
/// board area even when the board is nearly full.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Generator seeded from the thread-local RNG.
    pub fn from_entropy() -> Self {
        use rand::prelude::*;

        Self::new(rand::rng().random())
    }
}

impl MineLayoutGenerator for RandomLayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout> {
        use rand::prelude::*;

        config.validate()?;

        let size = usize::from(config.size);
        let mut mines: Array2<bool> = Array2::default((size, size));

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let picks = rand::seq::index::sample(
            &mut rng,
            config.total_cells().into(),
            config.mines.into(),
        );
        for index in picks {
            mines[(index / size, index % size)] = true;
        }

        let layout = MineLayout::from_mine_mask(mines);
        // double check mine count
        if layout.mine_count() != config.mines {
            log::warn!(
                "Generated layout count mismatch, actual: {}, requested: {}",
                layout.mine_count(),
                config.mines
            );
        }
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(seed: u64, size: Coord, mines: CellCount) -> MineLayout {
        RandomLayoutGenerator::new(seed)
            .generate(GameConfig::new(size, mines).unwrap())
            .unwrap()
    }

    #[test]
    fn places_exact_mine_count() {
        for seed in 0..32 {
            let layout = generate(seed, 12, 8);
            assert_eq!(layout.mine_count(), 8);
            assert_eq!(layout.size(), 12);
        }
    }

    #[test]
    fn same_seed_gives_same_layout() {
        assert_eq!(generate(7, 9, 10), generate(7, 9, 10));
    }

    #[test]
    fn fills_dense_and_full_boards() {
        assert_eq!(generate(3, 4, 15).mine_count(), 15);
        assert_eq!(generate(3, 4, 16).mine_count(), 16);
        assert_eq!(generate(3, 4, 0).mine_count(), 0);
    }

    #[test]
    fn largest_dense_board_generates_exact_count() {
        let layout = generate(1, Coord::MAX, 65000);

        assert_eq!(layout.mine_count(), 65000);
        assert_eq!(layout.safe_cell_count(), 25);
    }

    #[test]
    fn rejects_invalid_config() {
        let config = GameConfig::new_unchecked(2, 5);

        assert_eq!(
            RandomLayoutGenerator::new(1).generate(config),
            Err(GameError::InvalidConfiguration { size: 2, mines: 5 })
        );
    }
}
