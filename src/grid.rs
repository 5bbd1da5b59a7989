use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }
}

/// A grid coordinate in cell units, `(0, 0)` being the top left corner.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: u16,
    pub y: u16,
}

impl Cell {
    pub fn new(x: u16, y: u16) -> Self {
        Cell { x, y }
    }
}

/// The playfield, `cols` by `rows` cells. Movement on it is toroidal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cols: u16,
    rows: u16,
}

impl Grid {
    pub fn new(cols: u16, rows: u16) -> Self {
        Grid { cols, rows }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn area(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x < self.cols && cell.y < self.rows
    }

    /// The neighbour of `cell` in `direction`, re-entering from the opposite
    /// edge when the step would leave the grid.
    pub fn step(&self, cell: Cell, direction: Direction) -> Cell {
        let wrap = |v: u16, len: u16, forward: bool| {
            if forward {
                if v + 1 >= len { 0 } else { v + 1 }
            } else if v == 0 {
                len - 1
            } else {
                v - 1
            }
        };

        match direction {
            Up => Cell::new(cell.x, wrap(cell.y, self.rows, false)),
            Down => Cell::new(cell.x, wrap(cell.y, self.rows, true)),
            Left => Cell::new(wrap(cell.x, self.cols, false), cell.y),
            Right => Cell::new(wrap(cell.x, self.cols, true), cell.y),
        }
    }

    /// All cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows).flat_map(move |y| (0..self.cols).map(move |x| Cell::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_wrap_to_the_opposite_edge() {
        let grid = Grid::new(48, 30);

        assert_eq!(grid.step(Cell::new(0, 5), Left), Cell::new(47, 5));
        assert_eq!(grid.step(Cell::new(47, 5), Right), Cell::new(0, 5));
        assert_eq!(grid.step(Cell::new(3, 0), Up), Cell::new(3, 29));
        assert_eq!(grid.step(Cell::new(3, 29), Down), Cell::new(3, 0));
    }

    #[test]
    fn steps_inside_the_grid_move_one_cell() {
        let grid = Grid::new(10, 10);
        let c = Cell::new(4, 4);

        assert_eq!(grid.step(c, Up), Cell::new(4, 3));
        assert_eq!(grid.step(c, Down), Cell::new(4, 5));
        assert_eq!(grid.step(c, Left), Cell::new(3, 4));
        assert_eq!(grid.step(c, Right), Cell::new(5, 4));
    }

    #[test]
    fn every_step_stays_on_the_grid() {
        let grid = Grid::new(3, 2);

        for cell in grid.cells() {
            for dir in [Up, Down, Left, Right] {
                assert!(grid.contains(grid.step(cell, dir)));
            }
        }
        assert_eq!(grid.cells().count(), grid.area());
    }

    #[test]
    fn opposites() {
        assert!(Up.is_opposite(Down));
        assert!(Left.is_opposite(Right));
        assert!(!Up.is_opposite(Left));
        assert!(!Right.is_opposite(Right));
    }
}
