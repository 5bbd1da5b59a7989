//! The two boundaries between the simulation and the outside world: commands
//! coming in, frames going out.

use std::time::Duration;

use crate::error::GameResult;
use crate::grid::{Cell, Direction};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    BoostStart,
    BoostEnd,
    TogglePause,
    Quit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Role {
    Head(Direction),
    Body,
    Food,
}

/// Everything a renderer needs for one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub cells: Vec<(Cell, Role)>,
    pub score: u32,
    pub boosted: bool,
}

pub trait CommandSource {
    /// Waits at most `timeout` for input and returns whatever arrived, in
    /// order. An empty result means the timeout passed.
    fn poll(&mut self, timeout: Duration) -> GameResult<Vec<Command>>;
}

pub trait RenderSink {
    fn draw(&mut self, frame: &Frame) -> GameResult;

    /// Called once, after the frame of the tick that ended the game.
    fn game_over(&mut self, frame: &Frame) -> GameResult;

    fn paused(&mut self, paused: bool) -> GameResult;
}
