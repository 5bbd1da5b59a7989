use crate::{TermInt, Coords};
use crate::adapter::{Frame, RenderSink, Role};
use crate::error::{GameError, GameResult};
use crate::grid::{Cell, Direction::*, Grid};
use std::io::{Stdout, Write, stdout};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};

const SNAKE_BODY_CHAR: char = '█';
const DEAD_SNAKE_CHAR: char = 'X';

/// Terminal columns per board cell. Characters are about twice as tall as
/// they are wide, so two of them make a roughly square cell.
const CELL_WIDTH: TermInt = 2;

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<char>,
    current_msg: Option<Message>,
    board: Option<Board>,
    last_frame: Vec<(Cell, Role)>,
    active: bool,
    enhanced_keys: bool,
}

struct Message {
    top_left: Coords,
    width: TermInt,
    height: TermInt,
}

/// Where the playfield sits on the terminal.
#[derive(Copy, Clone)]
struct Board {
    grid: Grid,
    top_left: Coords,
}

impl TermManager {
    pub fn new() -> GameResult<Self> {
        let (width, height) = terminal::size()?;
        let stdout = stdout();
        let screen = vec![' '; width as usize * height as usize];
        Ok(TermManager {
            width, height, stdout, screen,
            current_msg: None,
            board: None,
            last_frame: vec![],
            active: false,
            enhanced_keys: false,
        })
    }

    /// Enters the alternate screen in raw mode. Returns whether key release
    /// events will be reported.
    pub fn setup(&mut self) -> GameResult<bool> {
        execute!(self.stdout, EnterAlternateScreen)?;
        self.active = true;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(self.stdout, PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))?;
            self.enhanced_keys = true;
        }

        Ok(self.enhanced_keys)
    }

    /// Undoes [`setup`](Self::setup). Does nothing if it never ran.
    pub fn restore(&mut self) -> GameResult {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        if self.enhanced_keys {
            execute!(self.stdout, PopKeyboardEnhancementFlags)?;
            self.enhanced_keys = false;
        }
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)?;
        Ok(())
    }

    /// Centers a board for `grid` on the terminal, with a border around it and
    /// a status line below.
    pub fn fit(&mut self, grid: Grid) -> GameResult {
        let need_w = grid.cols().saturating_mul(CELL_WIDTH).saturating_add(2);
        let need_h = grid.rows().saturating_add(3);
        if need_w > self.width || need_h > self.height {
            return Err(GameError::TerminalTooSmall {
                have_w: self.width, have_h: self.height, need_w, need_h,
            });
        }

        let top_left = ((self.width - need_w) / 2, (self.height - need_h) / 2);
        self.board = Some(Board { grid, top_left });
        Ok(())
    }

    pub fn draw_borders(&mut self) -> GameResult {
        let board = match self.board {
            Some(b) => b,
            None => return Ok(()),
        };

        let (x0, y0) = board.top_left;
        let width = board.grid.cols() * CELL_WIDTH + 2;
        let height = board.grid.rows() + 2;
        let end_x = x0 + width - 1;
        let end_y = y0 + height - 1;

        for x in x0..x0 + width {
            let ch = if x == x0 || x == end_x {'+'} else {'-'};
            self.print_at((x, y0), ch)?;
            self.print_at((x, end_y), ch)?;
        }

        for y in y0 + 1..end_y {
            self.print_at((x0, y), '|')?;
            self.print_at((end_x, y), '|')?;
        }

        self.flush()
    }

    pub fn show_message(&mut self, lines: &[&str]) -> GameResult {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), ' ')?;
            }
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), ch)?;
            }
        }

        self.current_msg = Some(Message { top_left, width: msg_width, height: msg_height });
        self.flush()
    }

    pub fn hide_message(&mut self) -> GameResult {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };
        let Message { top_left, width, height } = msg;

        // Repaint what the popup covered from the screen buffer
        for y_diff in 0..height {
            for x_diff in 0..width {
                let (x, y) = (top_left.0 + x_diff, top_left.1 + y_diff);
                let ch = self.screen_at((x, y)).unwrap_or(' ');
                self.print_at_no_save((x, y), ch)?;
            }
        }

        self.flush()
    }

    pub fn print_at(&mut self, pos: Coords, ch: char) -> GameResult {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
        if let Some(slot) = self.screen_index(pos).and_then(|i| self.screen.get_mut(i)) {
            *slot = ch;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> GameResult {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.screen = vec![' '; self.width as usize * self.height as usize];
        self.current_msg = None;
        self.last_frame.clear();
        Ok(())
    }

    pub fn flush(&mut self) -> GameResult {
        self.stdout.flush()?;
        Ok(())
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    /// Draws over the board without touching `screen`, so popups can be
    /// erased by repainting from it.
    fn print_at_no_save(&mut self, pos: Coords, ch: char) -> GameResult {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
        Ok(())
    }

    fn screen_index(&self, pos: Coords) -> Option<usize> {
        if pos.0 < self.width && pos.1 < self.height {
            Some(self.width as usize * pos.1 as usize + pos.0 as usize)
        } else {
            None
        }
    }

    fn screen_at(&self, pos: Coords) -> Option<char> {
        self.screen_index(pos).and_then(|i| self.screen.get(i)).copied()
    }

    fn paint_cell(&mut self, cell: Cell, glyph: [char; 2]) -> GameResult {
        let board = match self.board {
            Some(b) => b,
            None => return Ok(()),
        };
        let x = board.top_left.0 + 1 + cell.x * CELL_WIDTH;
        let y = board.top_left.1 + 1 + cell.y;
        self.print_at((x, y), glyph[0])?;
        self.print_at((x + 1, y), glyph[1])
    }

    fn print_status(&mut self, text: &str) -> GameResult {
        let board = match self.board {
            Some(b) => b,
            None => return Ok(()),
        };
        let y = board.top_left.1 + board.grid.rows() + 2;
        let width = (board.grid.cols() * CELL_WIDTH + 2) as usize;
        let line = format!("{text: <width$}", text = text, width = width);
        for (i, ch) in line.chars().take(width).enumerate() {
            self.print_at((board.top_left.0 + i as TermInt, y), ch)?;
        }
        Ok(())
    }
}

fn glyph(role: Role) -> [char; 2] {
    match role {
        Role::Head(Up) => ['^', '^'],
        Role::Head(Down) => ['v', 'v'],
        Role::Head(Left) => ['<', SNAKE_BODY_CHAR],
        Role::Head(Right) => [SNAKE_BODY_CHAR, '>'],
        Role::Body => [SNAKE_BODY_CHAR; 2],
        Role::Food => ['(', ')'],
    }
}

impl RenderSink for TermManager {
    fn draw(&mut self, frame: &Frame) -> GameResult {
        let previous = std::mem::take(&mut self.last_frame);
        for (cell, _) in &previous {
            if !frame.cells.iter().any(|(c, _)| c == cell) {
                self.paint_cell(*cell, [' '; 2])?;
            }
        }

        for (cell, role) in &frame.cells {
            self.paint_cell(*cell, glyph(*role))?;
        }
        self.last_frame = frame.cells.clone();

        let boost = if frame.boosted {"  >> boost"} else {""};
        self.print_status(&format!("Score: {}{}", frame.score, boost))?;
        self.flush()
    }

    fn game_over(&mut self, frame: &Frame) -> GameResult {
        for (cell, role) in &frame.cells {
            if *role != Role::Food {
                self.paint_cell(*cell, [DEAD_SNAKE_CHAR; 2])?;
            }
        }

        self.show_message(&[
            "Game over!",
            &*format!("Score: {}", frame.score),
            "",
            "Press any key to play again,",
            "or CTRL+C to quit."
        ])
    }

    fn paused(&mut self, paused: bool) -> GameResult {
        if paused {
            self.show_message(&["Paused", "Press Esc to resume", "or Ctrl+C to quit"])
        } else {
            self.hide_message()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_glyph_points_where_the_head_goes() {
        assert_eq!(glyph(Role::Head(Right)), [SNAKE_BODY_CHAR, '>']);
        assert_eq!(glyph(Role::Head(Left)), ['<', SNAKE_BODY_CHAR]);
        assert_eq!(glyph(Role::Food), ['(', ')']);
        assert_eq!(glyph(Role::Body), [SNAKE_BODY_CHAR; 2]);
    }
}
