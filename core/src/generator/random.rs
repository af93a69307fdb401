use super::*;

/// Purely random placement by rejection sampling: draw cells uniformly at
/// random and retry duplicates until the requested count is placed. Fine as
/// long as mines stay a small fraction of the board.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomMineGenerator {
    seed: u64,
}

impl RandomMineGenerator {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MineLayoutGenerator for RandomMineGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        use rand::prelude::*;

        let total_cells = config.total_cells();
        let (rows, cols) = config.size;

        // rejection sampling cannot make progress on a full board
        if config.mines >= total_cells {
            if config.mines > total_cells {
                log::warn!(
                    "Board already full, generated anyway, requested {} but only fits {}",
                    config.mines,
                    total_cells
                );
            }
            return MineLayout::from_mine_mask(Array2::from_elem(
                (usize::from(rows), usize::from(cols)),
                true,
            ));
        }

        let mut mine_mask: Array2<bool> = Array2::default((usize::from(rows), usize::from(cols)));
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut placed: CellCount = 0;

        while placed < config.mines {
            let pos = (rng.random_range(0..rows), rng.random_range(0..cols));
            let cell = &mut mine_mask[pos.to_index()];
            if *cell {
                continue;
            }
            *cell = true;
            placed += 1;
        }

        MineLayout::from_mine_mask(mine_mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_the_exact_mine_count_for_every_preset() {
        for preset in Difficulty::ALL {
            let config = preset.config();
            let layout = RandomMineGenerator::new(7).generate(config);

            assert_eq!(layout.total_cells(), config.total_cells());
            assert_eq!(layout.mine_count(), config.mines);

            let (rows, cols) = layout.size();
            let mined = (0..rows)
                .flat_map(|row| (0..cols).map(move |col| (row, col)))
                .filter(|&pos| layout.contains_mine(pos))
                .count();
            assert_eq!(mined, usize::from(config.mines));
        }
    }

    #[test]
    fn same_seed_reproduces_the_same_layout() {
        let config = Difficulty::Intermediate.config();
        let first = RandomMineGenerator::new(0xC0FFEE).generate(config);
        let second = RandomMineGenerator::new(0xC0FFEE).generate(config);
        assert_eq!(first, second);
    }

    #[test]
    fn adjacency_matches_brute_force_recount_over_random_seeds() {
        for seed in 0..8 {
            let layout = RandomMineGenerator::new(seed).generate(Difficulty::Beginner.config());
            let (rows, cols) = layout.size();

            for row in 0..rows {
                for col in 0..cols {
                    if layout.contains_mine((row, col)) {
                        continue;
                    }

                    let mut expected = 0;
                    for d_row in -1i16..=1 {
                        for d_col in -1i16..=1 {
                            if d_row == 0 && d_col == 0 {
                                continue;
                            }
                            let n_row = i16::from(row) + d_row;
                            let n_col = i16::from(col) + d_col;
                            if (0..i16::from(rows)).contains(&n_row)
                                && (0..i16::from(cols)).contains(&n_col)
                                && layout.contains_mine((n_row as Coord, n_col as Coord))
                            {
                                expected += 1;
                            }
                        }
                    }

                    assert_eq!(
                        layout.adjacent_mine_count((row, col)),
                        expected,
                        "adjacency mismatch at ({row}, {col}) for seed {seed}"
                    );
                }
            }
        }
    }

    #[test]
    fn full_board_short_circuits_instead_of_sampling() {
        let layout =
            RandomMineGenerator::new(1).generate(GameConfig::new_unchecked((3, 3), 9));
        assert_eq!(layout.mine_count(), 9);
        assert_eq!(layout.safe_cell_count(), 0);
    }
}
