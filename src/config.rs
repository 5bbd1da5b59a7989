use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::ConfigError;
use crate::food::FoodArea;
use crate::grid::Grid;

pub const DEFAULT_WIDTH: u32 = 380;
pub const DEFAULT_HEIGHT: u32 = 200;
pub const DEFAULT_CELL_SIZE: u32 = 10;
pub const NORMAL_TICK: Duration = Duration::from_millis(150);
pub const BOOSTED_TICK: Duration = Duration::from_nanos(1_000_000_000 / 24);

const MAX_CELLS_PER_SIDE: u32 = 1024;

#[derive(Parser, Debug)]
#[command(name = "snake", about = "Terminal snake on a wrap-around board")]
pub struct Args {
    /// Playfield width in pixels, a multiple of --size
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Playfield height in pixels, a multiple of --size
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// Edge length of one cell in pixels
    #[arg(long, default_value_t = DEFAULT_CELL_SIZE)]
    pub size: u32,

    /// Milliseconds between ticks at normal speed [default: 150]
    #[arg(long)]
    pub tick_ms: Option<u64>,

    /// Milliseconds between ticks while boosting [default: 1000/24]
    #[arg(long)]
    pub boost_ms: Option<u64>,

    /// Where food may appear
    #[arg(long, value_enum, default_value_t = FoodArea::Quarter)]
    pub food_area: FoodArea,

    /// Seed for food placement, random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write logs to this file (filtered by RUST_LOG, default "info")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Validated startup configuration. Fixed for the lifetime of a game.
#[derive(Clone, Debug)]
pub struct Settings {
    grid: Grid,
    cell_size: u32,
    normal_tick: Duration,
    boosted_tick: Duration,
    food_area: FoodArea,
    seed: Option<u64>,
}

impl Settings {
    pub fn new(width: u32, height: u32, cell_size: u32) -> Result<Self, ConfigError> {
        if cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }

        let cols = cells_along("width", width, cell_size)?;
        let rows = cells_along("height", height, cell_size)?;
        if cols > MAX_CELLS_PER_SIDE || rows > MAX_CELLS_PER_SIDE {
            return Err(ConfigError::BoardTooLarge { cols, rows, max: MAX_CELLS_PER_SIDE });
        }

        Ok(Settings {
            grid: Grid::new(cols as u16, rows as u16),
            cell_size,
            normal_tick: NORMAL_TICK,
            boosted_tick: BOOSTED_TICK,
            food_area: FoodArea::Quarter,
            seed: None,
        })
    }

    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let mut settings = Settings::new(args.width, args.height, args.size)?
            .with_food_area(args.food_area)
            .with_seed(args.seed);

        if args.tick_ms.is_some() || args.boost_ms.is_some() {
            let normal = args.tick_ms.map(Duration::from_millis).unwrap_or(NORMAL_TICK);
            let boosted = args.boost_ms.map(Duration::from_millis).unwrap_or(BOOSTED_TICK);
            settings = settings.with_ticks(normal, boosted)?;
        }

        Ok(settings)
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn normal_tick(&self) -> Duration {
        self.normal_tick
    }

    pub fn boosted_tick(&self) -> Duration {
        self.boosted_tick
    }

    pub fn food_area(&self) -> FoodArea {
        self.food_area
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

// builder
impl Settings {
    pub fn with_ticks(mut self, normal: Duration, boosted: Duration) -> Result<Self, ConfigError> {
        if normal.is_zero() {
            return Err(ConfigError::ZeroInterval { which: "normal" });
        }
        if boosted.is_zero() {
            return Err(ConfigError::ZeroInterval { which: "boosted" });
        }
        self.normal_tick = normal;
        self.boosted_tick = boosted;
        Ok(self)
    }

    pub fn with_food_area(mut self, area: FoodArea) -> Self {
        self.food_area = area;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

fn cells_along(axis: &'static str, pixels: u32, size: u32) -> Result<u32, ConfigError> {
    if pixels == 0 || pixels % size != 0 {
        return Err(ConfigError::NotCellMultiple { axis, pixels, size });
    }
    Ok(pixels / size)
}
