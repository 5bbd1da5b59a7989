use std::collections::HashSet;

use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use crate::chain::Chain;
use crate::error::{GameError, GameResult};
use crate::grid::{Cell, Grid};

/// Random draws tried before falling back to scanning for free cells.
pub const MAX_RANDOM_ATTEMPTS: usize = 64;

/// Part of the board food is dropped on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum FoodArea {
    /// Anywhere on the board.
    Full,
    /// The coarse top-left sub-grid, `0..=cols/4` by `0..=rows/4`.
    #[default]
    Quarter,
}

impl FoodArea {
    /// Exclusive upper bounds of the area on `grid`.
    fn bounds(self, grid: &Grid) -> (u16, u16) {
        match self {
            FoodArea::Full => (grid.cols(), grid.rows()),
            FoodArea::Quarter => (
                (grid.cols() / 4 + 1).min(grid.cols()),
                (grid.rows() / 4 + 1).min(grid.rows()),
            ),
        }
    }
}

pub struct FoodSpawner {
    area: FoodArea,
    rng: StdRng,
}

impl FoodSpawner {
    pub fn new(area: FoodArea, rng: StdRng) -> Self {
        FoodSpawner { area, rng }
    }

    /// Picks a cell not covered by `chain`. Random draws inside the area
    /// first, then a uniform pick among the free cells of the area, then of
    /// the whole board. Fails only when every cell is taken.
    pub fn place(&mut self, chain: &Chain, grid: &Grid) -> GameResult<Cell> {
        let (w, h) = self.area.bounds(grid);

        for _ in 0..MAX_RANDOM_ATTEMPTS {
            let candidate = Cell::new(self.rng.gen_range(0..w), self.rng.gen_range(0..h));
            if !chain.occupies(candidate) {
                return Ok(candidate);
            }
        }

        warn!(attempts = MAX_RANDOM_ATTEMPTS, len = chain.len(), "no free cell drawn, scanning");

        let occupied: HashSet<Cell> = chain.cells().collect();
        let mut free: Vec<Cell> = grid.cells()
            .filter(|c| c.x < w && c.y < h && !occupied.contains(c))
            .collect();
        if free.is_empty() {
            free = grid.cells().filter(|c| !occupied.contains(c)).collect();
        }

        free.choose(&mut self.rng).copied().ok_or(GameError::BoardFull {
            length: chain.len(),
            cols: grid.cols(),
            rows: grid.rows(),
        })
    }
}
