use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::adapter::{Command, CommandSource};
use crate::error::GameResult;
use crate::grid::Direction::*;

/// Without key-release events, a boost ends once the boost key has not
/// auto-repeated for this long. Covers the usual initial repeat delay.
pub const BOOST_RELEASE_GRACE: Duration = Duration::from_millis(600);

/// Turns crossterm key events into [`Command`]s.
pub struct KeyboardInput {
    release_events: bool,
    boosting: bool,
    last_boost_key: Option<Instant>,
}

impl KeyboardInput {
    /// `release_events` tells whether the terminal reports key releases
    /// (keyboard enhancement is active).
    pub fn new(release_events: bool) -> Self {
        KeyboardInput { release_events, boosting: false, last_boost_key: None }
    }

    /// Blocks until a key is pressed. Used outside of a running game.
    pub fn read_key_blocking(&mut self) -> GameResult<KeyEvent> {
        loop {
            if let Event::Key(ev) = event::read()? {
                if ev.kind != KeyEventKind::Release {
                    return Ok(ev);
                }
            }
        }
    }

    /// Drops queued events and any held boost, so keys pressed during one game
    /// do not leak into the next screen.
    pub fn flush(&mut self) -> GameResult {
        while event::poll(Duration::ZERO)? {
            event::read()?;
        }
        self.boosting = false;
        self.last_boost_key = None;
        Ok(())
    }

    pub fn translate(&mut self, ev: KeyEvent, now: Instant) -> Option<Command> {
        if ev.kind == KeyEventKind::Release {
            return match ev.code {
                KeyCode::Char(' ') if self.boosting => {
                    self.boosting = false;
                    self.last_boost_key = None;
                    Some(Command::BoostEnd)
                },
                _ => None,
            };
        }

        if is_ctrl_c(&ev) {
            return Some(Command::Quit);
        }

        match ev.code {
            KeyCode::Char('w') | KeyCode::Up => Some(Command::Turn(Up)),
            KeyCode::Char('a') | KeyCode::Left => Some(Command::Turn(Left)),
            KeyCode::Char('s') | KeyCode::Down => Some(Command::Turn(Down)),
            KeyCode::Char('d') | KeyCode::Right => Some(Command::Turn(Right)),
            KeyCode::Char('q') => Some(Command::Quit),
            KeyCode::Esc if ev.kind == KeyEventKind::Press => Some(Command::TogglePause),
            KeyCode::Char(' ') => {
                if !self.release_events {
                    self.last_boost_key = Some(now);
                }
                if self.boosting {
                    None
                } else {
                    self.boosting = true;
                    Some(Command::BoostStart)
                }
            },
            _ => None,
        }
    }

    /// When a held boost key is considered let go.
    fn boost_expiry(&self) -> Option<Instant> {
        match (self.boosting, self.last_boost_key) {
            (true, Some(at)) => Some(at + BOOST_RELEASE_GRACE),
            _ => None,
        }
    }

    fn expire_boost(&mut self, now: Instant) -> Option<Command> {
        match self.boost_expiry() {
            Some(at) if now >= at => {
                self.boosting = false;
                self.last_boost_key = None;
                Some(Command::BoostEnd)
            },
            _ => None,
        }
    }
}

impl CommandSource for KeyboardInput {
    fn poll(&mut self, timeout: Duration) -> GameResult<Vec<Command>> {
        let deadline = Instant::now() + timeout;
        let mut commands = vec![];

        loop {
            let now = Instant::now();
            let mut wait = deadline.saturating_duration_since(now);
            if let Some(at) = self.boost_expiry() {
                wait = wait.min(at.saturating_duration_since(now));
            }

            if event::poll(wait)? {
                // Drain everything already queued
                loop {
                    if let Event::Key(ev) = event::read()? {
                        if let Some(command) = self.translate(ev, Instant::now()) {
                            commands.push(command);
                        }
                    }
                    if !event::poll(Duration::ZERO)? {
                        break;
                    }
                }
            }

            if let Some(command) = self.expire_boost(Instant::now()) {
                commands.push(command);
            }

            if !commands.is_empty() || Instant::now() >= deadline {
                return Ok(commands);
            }
        }
    }
}

pub fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers, .. } if modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    #[test]
    fn maps_arrows_and_wasd() {
        let mut input = KeyboardInput::new(true);
        let now = Instant::now();

        assert_eq!(input.translate(press(KeyCode::Up), now), Some(Command::Turn(Up)));
        assert_eq!(input.translate(press(KeyCode::Char('a')), now), Some(Command::Turn(Left)));
        assert_eq!(input.translate(press(KeyCode::Char('s')), now), Some(Command::Turn(Down)));
        assert_eq!(input.translate(press(KeyCode::Right), now), Some(Command::Turn(Right)));
        assert_eq!(input.translate(press(KeyCode::Char('x')), now), None);
    }

    #[test]
    fn quit_and_pause_keys() {
        let mut input = KeyboardInput::new(true);
        let now = Instant::now();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);

        assert!(is_ctrl_c(&ctrl_c));
        assert_eq!(input.translate(ctrl_c, now), Some(Command::Quit));
        assert_eq!(input.translate(press(KeyCode::Char('c')), now), None);
        assert_eq!(input.translate(press(KeyCode::Esc), now), Some(Command::TogglePause));
        assert_eq!(input.translate(release(KeyCode::Esc), now), None);
    }

    #[test]
    fn boost_follows_press_and_release() {
        let mut input = KeyboardInput::new(true);
        let now = Instant::now();

        assert_eq!(input.translate(press(KeyCode::Char(' ')), now), Some(Command::BoostStart));
        assert_eq!(input.translate(press(KeyCode::Char(' ')), now), None);
        assert_eq!(input.expire_boost(now + Duration::from_secs(10)), None);
        assert_eq!(input.translate(release(KeyCode::Char(' ')), now), Some(Command::BoostEnd));
        assert_eq!(input.translate(release(KeyCode::Char(' ')), now), None);
    }

    #[test]
    fn boost_ends_when_repeats_stop() {
        let mut input = KeyboardInput::new(false);
        let start = Instant::now();

        assert_eq!(input.translate(press(KeyCode::Char(' ')), start), Some(Command::BoostStart));
        let repeat = start + Duration::from_millis(400);
        assert_eq!(input.translate(press(KeyCode::Char(' ')), repeat), None);

        assert_eq!(input.expire_boost(repeat + BOOST_RELEASE_GRACE / 2), None);
        assert_eq!(input.expire_boost(repeat + BOOST_RELEASE_GRACE), Some(Command::BoostEnd));
        assert_eq!(input.expire_boost(repeat + BOOST_RELEASE_GRACE * 2), None);
    }
}
