use std::io;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("cell size must be positive")]
    ZeroCellSize,
    #[error("{axis} of {pixels}px is not a positive multiple of the {size}px cell size")]
    NotCellMultiple { axis: &'static str, pixels: u32, size: u32 },
    #[error("the board would be {cols}x{rows} cells, at most {max} per side is supported")]
    BoardTooLarge { cols: u32, rows: u32, max: u32 },
    #[error("{which} tick interval must be positive")]
    ZeroInterval { which: &'static str },
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("no free cell left for food: a chain of {length} fills the {cols}x{rows} board")]
    BoardFull { length: usize, cols: u16, rows: u16 },
    #[error("terminal is {have_w}x{have_h}, the board needs at least {need_w}x{need_h}")]
    TerminalTooSmall { have_w: u16, have_h: u16, need_w: u16, need_h: u16 },
    #[error("terminal I/O failed")]
    Io(#[from] io::Error),
}

pub type GameResult<T = ()> = Result<T, GameError>;
