use std::collections::VecDeque;

use crate::grid::{Cell, Direction, Grid};

/// "When you reach `at`, start heading `direction`."
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TurnInstruction {
    pub at: Cell,
    pub direction: Direction,
}

/// One element of the chain. Followers never read the head's direction: they
/// turn only by consuming the instructions queued for them, in order.
#[derive(Clone, Debug)]
pub struct Segment {
    position: Cell,
    direction: Direction,
    pending: VecDeque<TurnInstruction>,
}

impl Segment {
    pub fn new(position: Cell, direction: Direction) -> Self {
        Segment { position, direction, pending: VecDeque::new() }
    }

    pub fn position(&self) -> Cell {
        self.position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_turns(&self) -> impl Iterator<Item = &TurnInstruction> {
        self.pending.iter()
    }

    pub(crate) fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn record_turn(&mut self, at: Cell, direction: Direction) {
        self.pending.push_back(TurnInstruction { at, direction });
    }

    pub fn advance(&mut self, grid: &Grid) {
        self.position = grid.step(self.position, self.direction);
    }

    /// Adopts the front instruction if it was scheduled for the current cell.
    /// Checks once: a tick moves exactly one cell, so two instructions can
    /// never fall due together.
    pub fn consume_due_turn(&mut self) -> bool {
        match self.pending.front() {
            Some(turn) if turn.at == self.position => {
                self.direction = turn.direction;
                self.pending.pop_front();
                true
            },
            _ => false,
        }
    }

    /// A new segment one cell behind this one, following the same path.
    /// The pending queue is copied, not shared.
    pub fn trailing(&self, grid: &Grid) -> Segment {
        Segment {
            position: grid.step(self.position, self.direction.opposite()),
            direction: self.direction,
            pending: self.pending.clone(),
        }
    }
}
