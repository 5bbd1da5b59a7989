use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::adapter::{Command, CommandSource, RenderSink};
use crate::error::GameResult;
use crate::sim::{Simulation, TickOutcome};

/// How long to block on input at a time while paused.
const PAUSE_POLL: Duration = Duration::from_millis(250);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClockExit {
    GameOver { score: u32 },
    Quit { score: u32 },
}

/// Drives a [`Simulation`] in real time: one tick per interval, input handled
/// in between, never during a tick.
pub struct SimulationClock {
    sim: Simulation,
    paused: bool,
}

impl SimulationClock {
    pub fn new(sim: Simulation) -> Self {
        SimulationClock { sim, paused: false }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Runs until the game ends or the player quits.
    pub fn run<S, R>(&mut self, input: &mut S, output: &mut R) -> GameResult<ClockExit>
    where
        S: CommandSource,
        R: RenderSink,
    {
        output.draw(&self.sim.frame())?;

        loop {
            let mut deadline = Instant::now() + self.sim.interval();

            // An empty poll means the deadline passed.
            loop {
                let timeout = if self.paused {
                    PAUSE_POLL
                } else {
                    deadline.saturating_duration_since(Instant::now())
                };

                let commands = input.poll(timeout)?;
                if commands.is_empty() && !self.paused {
                    break;
                }

                let was_paused = self.paused;
                for command in commands {
                    if let Some(exit) = self.handle(command, output)? {
                        return Ok(exit);
                    }
                }
                if was_paused && !self.paused {
                    deadline = Instant::now() + self.sim.interval();
                }
                if !self.paused && Instant::now() >= deadline {
                    break;
                }
            }

            let outcome = self.sim.tick()?;
            let frame = self.sim.frame();
            output.draw(&frame)?;

            if matches!(outcome, TickOutcome::Crashed | TickOutcome::Halted) {
                output.game_over(&frame)?;
                return Ok(ClockExit::GameOver { score: self.sim.score() });
            }
        }
    }

    fn handle<R: RenderSink>(&mut self, command: Command, output: &mut R) -> GameResult<Option<ClockExit>> {
        match command {
            Command::Quit => {
                info!(score = self.sim.score(), "quit");
                return Ok(Some(ClockExit::Quit { score: self.sim.score() }));
            },
            Command::TogglePause => {
                self.paused = !self.paused;
                debug!(paused = self.paused, "pause toggled");
                output.paused(self.paused)?;
            },
            Command::Turn(_) if self.paused => {},
            other => {
                self.sim.apply(other);
            },
        }

        Ok(None)
    }
}
