use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, trace};

use crate::adapter::{Command, Frame, Role};
use crate::chain::Chain;
use crate::config::Settings;
use crate::error::GameResult;
use crate::food::FoodSpawner;
use crate::grid::{Cell, Direction, Grid};

pub const SPAWN_CELL: Cell = Cell { x: 0, y: 0 };
pub const SPAWN_DIRECTION: Direction = Direction::Right;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameState {
    Active,
    Over,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Speed {
    Normal,
    Boosted,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Moved,
    Ate,
    Crashed,
    /// The game was already over, nothing happened.
    Halted,
}

pub struct Simulation {
    grid: Grid,
    chain: Chain,
    food: Cell,
    spawner: FoodSpawner,
    state: GameState,
    score: u32,
    interactable: bool,
    speed: Speed,
    normal_tick: Duration,
    boosted_tick: Duration,
}

impl Simulation {
    /// A fresh game, seeded from the settings or from system entropy.
    pub fn new(settings: &Settings) -> GameResult<Self> {
        let rng = match settings.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(settings, rng)
    }

    pub fn with_rng(settings: &Settings, rng: StdRng) -> GameResult<Self> {
        let grid = settings.grid();
        let chain = Chain::new(SPAWN_CELL, SPAWN_DIRECTION);
        let mut spawner = FoodSpawner::new(settings.food_area(), rng);
        let food = spawner.place(&chain, &grid)?;

        Ok(Simulation {
            grid,
            chain,
            food,
            spawner,
            state: GameState::Active,
            score: 0,
            interactable: true,
            speed: Speed::Normal,
            normal_tick: settings.normal_tick(),
            boosted_tick: settings.boosted_tick(),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state == GameState::Over
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    /// Time until the next tick should fire.
    pub fn interval(&self) -> Duration {
        match self.speed {
            Speed::Normal => self.normal_tick,
            Speed::Boosted => self.boosted_tick,
        }
    }

    /// Moves the food to `cell`, for setting up scenarios. Refused when the
    /// cell is off the board or under the chain.
    pub fn place_food_at(&mut self, cell: Cell) -> bool {
        if !self.grid.contains(cell) || self.chain.occupies(cell) {
            return false;
        }
        self.food = cell;
        true
    }

    /// Feeds one input command in. Returns whether it had any effect;
    /// front-end commands (pause, quit) never do.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Turn(direction) => self.turn(direction),
            Command::BoostStart => {
                self.speed = Speed::Boosted;
                true
            },
            Command::BoostEnd => {
                self.speed = Speed::Normal;
                true
            },
            Command::TogglePause | Command::Quit => false,
        }
    }

    /// Steers the head. Only the first accepted turn between two ticks counts;
    /// reversals and turns after the game ended are dropped.
    pub fn turn(&mut self, direction: Direction) -> bool {
        if self.is_over() || !self.interactable {
            trace!(?direction, "turn dropped");
            return false;
        }
        if !self.chain.turn(direction) {
            trace!(?direction, "reversal dropped");
            return false;
        }
        self.interactable = false;
        true
    }

    pub fn tick(&mut self) -> GameResult<TickOutcome> {
        if self.is_over() {
            return Ok(TickOutcome::Halted);
        }
        self.interactable = true;

        // Growth can put the new tail on top of another segment.
        if self.check_collision() {
            return Ok(TickOutcome::Crashed);
        }

        self.chain.advance(&self.grid);
        if self.check_collision() {
            return Ok(TickOutcome::Crashed);
        }

        if self.chain.head().position() != self.food {
            return Ok(TickOutcome::Moved);
        }

        self.score += 1;
        self.chain.grow(&self.grid);
        self.food = self.spawner.place(&self.chain, &self.grid)?;
        info!(score = self.score, len = self.chain.len(), food = ?self.food, "food eaten");

        Ok(TickOutcome::Ate)
    }

    pub fn frame(&self) -> Frame {
        let mut cells = Vec::with_capacity(self.chain.len() + 1);
        for (i, seg) in self.chain.segments().iter().enumerate() {
            let role = if i == 0 { Role::Head(seg.direction()) } else { Role::Body };
            cells.push((seg.position(), role));
        }
        cells.push((self.food, Role::Food));

        Frame { cells, score: self.score, boosted: self.speed == Speed::Boosted }
    }

    fn check_collision(&mut self) -> bool {
        match self.chain.self_collision() {
            Some((i, j)) => {
                debug!(i, j, at = ?self.chain.segments()[i].position(), "segments overlap");
                info!(score = self.score, len = self.chain.len(), "game over");
                self.state = GameState::Over;
                true
            },
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Direction::*;

    fn sim(width: u32, height: u32) -> Simulation {
        let settings = Settings::new(width, height, 10).unwrap();
        Simulation::with_rng(&settings, StdRng::seed_from_u64(3)).unwrap()
    }

    /// Parks the food somewhere the head will not reach in a few ticks.
    fn park_food(sim: &mut Simulation) {
        let far = Cell::new(sim.grid().cols() / 2, sim.grid().rows() - 1);
        assert!(sim.place_food_at(far));
    }

    #[test]
    fn starts_with_one_segment_and_free_food() {
        let sim = sim(480, 480);
        assert_eq!(sim.chain().len(), 1);
        assert_eq!(sim.chain().head().position(), SPAWN_CELL);
        assert_ne!(sim.food(), SPAWN_CELL);
        assert_eq!(sim.state(), GameState::Active);
        assert_eq!(sim.score(), 0);
    }

    #[test]
    fn food_drops_in_the_top_left_quarter_by_default() {
        let settings = Settings::new(480, 480, 10).unwrap();
        for seed in 0..50 {
            let sim = Simulation::with_rng(&settings, StdRng::seed_from_u64(seed)).unwrap();
            let food = sim.food();
            assert!(food.x <= 12 && food.y <= 12, "seed {}: {:?}", seed, food);
        }
    }

    #[test]
    fn only_the_first_turn_per_tick_counts() {
        let mut sim = sim(480, 480);
        park_food(&mut sim);

        assert!(sim.turn(Up));
        assert!(!sim.turn(Down));
        assert!(!sim.turn(Left));
        assert_eq!(sim.chain().head().direction(), Up);

        sim.tick().unwrap();
        assert!(sim.turn(Left));
    }

    #[test]
    fn a_dropped_reversal_keeps_the_window_open() {
        let mut sim = sim(480, 480);
        park_food(&mut sim);

        assert!(!sim.turn(Left));
        assert!(sim.turn(Down));
    }

    #[test]
    fn boost_only_changes_the_interval() {
        let mut sim = sim(480, 480);
        park_food(&mut sim);
        let normal = sim.interval();

        assert!(sim.apply(Command::BoostStart));
        assert!(sim.interval() < normal);
        assert!(sim.frame().boosted);

        sim.tick().unwrap();
        assert_eq!(sim.chain().head().position(), Cell::new(1, 0));

        sim.apply(Command::BoostEnd);
        assert_eq!(sim.interval(), normal);
    }

    #[test]
    fn eating_scores_grows_and_replaces_food() {
        let mut sim = sim(480, 480);
        assert!(sim.place_food_at(Cell::new(1, 0)));

        assert_eq!(sim.tick().unwrap(), TickOutcome::Ate);
        assert_eq!(sim.score(), 1);
        assert_eq!(sim.chain().len(), 2);
        assert_eq!(sim.chain().tail().position(), Cell::new(0, 0));
        assert!(!sim.chain().occupies(sim.food()));
    }

    #[test]
    fn coiling_into_the_body_ends_the_game() {
        let mut sim = sim(480, 480);
        park_food(&mut sim);

        for x in 1..=4 {
            assert!(sim.place_food_at(Cell::new(x, 0)));
            assert_eq!(sim.tick().unwrap(), TickOutcome::Ate);
        }
        park_food(&mut sim);
        assert_eq!(sim.chain().len(), 5);

        for dir in [Down, Left, Up] {
            assert!(sim.turn(dir));
            let outcome = sim.tick().unwrap();
            if dir == Up {
                assert_eq!(outcome, TickOutcome::Crashed);
            } else {
                assert_eq!(outcome, TickOutcome::Moved);
            }
        }

        assert!(sim.is_over());
        assert_eq!(sim.tick().unwrap(), TickOutcome::Halted);
        assert!(!sim.turn(Right));
    }

    #[test]
    fn tail_grown_onto_the_head_crashes_before_moving() {
        let mut sim = sim(480, 480);
        for x in 1..=5 {
            assert!(sim.place_food_at(Cell::new(x, 0)));
            assert_eq!(sim.tick().unwrap(), TickOutcome::Ate);
        }
        park_food(&mut sim);

        // Head ends on (6, 2) with the tail at (5, 1) heading Left.
        for dir in [Some(Down), Some(Left), Some(Down), Some(Right), None] {
            if let Some(dir) = dir {
                assert!(sim.turn(dir));
            }
            assert_eq!(sim.tick().unwrap(), TickOutcome::Moved);
        }

        assert!(sim.turn(Up));
        assert!(sim.place_food_at(Cell::new(6, 1)));
        assert_eq!(sim.tick().unwrap(), TickOutcome::Ate);
        assert_eq!(sim.state(), GameState::Active);
        assert_eq!(sim.chain().head().position(), Cell::new(6, 1));
        assert_eq!(sim.chain().tail().position(), Cell::new(6, 1));
        assert_eq!(sim.chain().tail().direction(), Left);

        let before: Vec<Cell> = sim.chain().cells().collect();
        assert_eq!(sim.tick().unwrap(), TickOutcome::Crashed);
        assert!(sim.is_over());
        let after: Vec<Cell> = sim.chain().cells().collect();
        assert_eq!(after, before);
    }

    #[test]
    fn frame_lists_head_body_and_food() {
        let mut sim = sim(480, 480);
        assert!(sim.place_food_at(Cell::new(1, 0)));
        sim.tick().unwrap();

        let frame = sim.frame();
        assert_eq!(frame.score, 1);
        assert_eq!(frame.cells[0], (Cell::new(1, 0), Role::Head(Right)));
        assert_eq!(frame.cells[1], (Cell::new(0, 0), Role::Body));
        assert_eq!(frame.cells[2], (sim.food(), Role::Food));
    }

    #[test]
    fn food_cannot_be_parked_on_the_chain() {
        let mut sim = sim(100, 100);
        assert!(!sim.place_food_at(SPAWN_CELL));
        assert!(!sim.place_food_at(Cell::new(10, 0)));
    }
}
