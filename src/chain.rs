use tracing::debug;

use crate::grid::{Cell, Direction, Grid};
use crate::segment::Segment;

/// The snake: `segments[0]` is the head, the last element the tail.
/// Never empty.
#[derive(Clone, Debug)]
pub struct Chain {
    segments: Vec<Segment>,
}

impl Chain {
    pub fn new(spawn: Cell, direction: Direction) -> Self {
        Chain { segments: vec![Segment::new(spawn, direction)] }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn head(&self) -> &Segment {
        &self.segments[0]
    }

    pub fn tail(&self) -> &Segment {
        &self.segments[self.segments.len() - 1]
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.segments.iter().map(Segment::position)
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.cells().any(|c| c == cell)
    }

    /// Points the head at `direction` and schedules the same turn, at the
    /// head's current cell, for every follower. A reversal is refused.
    pub fn turn(&mut self, direction: Direction) -> bool {
        let head = &self.segments[0];
        if head.direction().is_opposite(direction) {
            return false;
        }
        if head.direction() == direction {
            return true;
        }

        let at = head.position();
        self.segments[0].set_direction(direction);
        for seg in &mut self.segments[1..] {
            seg.record_turn(at, direction);
        }

        debug!(?at, ?direction, followers = self.segments.len() - 1, "head turned");
        true
    }

    /// Moves every segment one cell and lets it pick up a turn that fell due.
    /// Each segment only looks at its own state, so order is irrelevant.
    pub fn advance(&mut self, grid: &Grid) {
        for seg in &mut self.segments {
            seg.advance(grid);
            seg.consume_due_turn();
        }
    }

    pub fn grow(&mut self, grid: &Grid) {
        let new_tail = self.tail().trailing(grid);
        debug!(at = ?new_tail.position(), len = self.segments.len() + 1, "chain grew");
        self.segments.push(new_tail);
    }

    /// First pair of distinct segments sharing a cell, if any.
    pub fn self_collision(&self) -> Option<(usize, usize)> {
        let n = self.segments.len();
        for i in 0..n {
            for j in (i + 1)..n {
                if self.segments[i].position() == self.segments[j].position() {
                    return Some((i, j));
                }
            }
        }
        None
    }
}
