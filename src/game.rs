use crate::clock::{ClockExit, SimulationClock};
use crate::config::Settings;
use crate::error::GameResult;
use crate::input::{is_ctrl_c, KeyboardInput};
use crate::sim::Simulation;
use crate::term::TermManager;

use tracing::info;

/// One terminal session: intro screen, then games until the player quits.
pub struct SnakeGame {
    settings: Settings,
    term: TermManager,
    input: KeyboardInput,
}

impl SnakeGame {
    pub fn new(settings: Settings) -> GameResult<Self> {
        Ok(SnakeGame { settings, term: TermManager::new()?, input: KeyboardInput::new(false) })
    }

    pub fn initialize(&mut self) -> GameResult {
        let release_events = self.term.setup()?;
        self.input = KeyboardInput::new(release_events);
        self.term.fit(self.settings.grid())?;

        let grid = self.settings.grid();
        info!(
            cols = grid.cols(),
            rows = grid.rows(),
            cell_size = self.settings.cell_size(),
            tick = ?self.settings.normal_tick(),
            release_events,
            "terminal ready"
        );
        Ok(())
    }

    /// Returns false if the player quit from the intro.
    pub fn show_intro(&mut self) -> GameResult<bool> {
        let lines = &[
            "Arrow keys or WASD to move",
            "Hold Space to speed up",
            "Esc to pause",
            "CTRL+C or q to quit",
            "",
            "Press any key to begin"
        ];

        self.term.show_message(lines)?;

        if is_ctrl_c(&self.input.read_key_blocking()?) {
            return Ok(false);
        }

        self.term.hide_message()?;
        Ok(true)
    }

    pub fn play(&mut self) -> GameResult<ClockExit> {
        self.term.clear()?;
        self.term.draw_borders()?;

        self.input.flush()?;
        let sim = Simulation::new(&self.settings)?;
        let mut clock = SimulationClock::new(sim);
        let exit = clock.run(&mut self.input, &mut self.term)?;

        info!(?exit, "game finished");
        Ok(exit)
    }

    /// After a game over: any key plays again, CTRL+C quits.
    pub fn wants_another(&mut self) -> GameResult<bool> {
        self.input.flush()?;
        Ok(!is_ctrl_c(&self.input.read_key_blocking()?))
    }

    pub fn restore(&mut self) -> GameResult {
        self.term.restore()
    }
}
