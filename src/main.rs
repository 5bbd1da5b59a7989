use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use snake::clock::ClockExit;
use snake::config::{Args, Settings};
use snake::game::SnakeGame;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let settings = Settings::from_args(&args).context("invalid configuration")?;
    let mut game = SnakeGame::new(settings)?;

    // The terminal has to be restored before any error gets printed
    let res = run(&mut game);
    game.restore()?;
    res
}

fn run(game: &mut SnakeGame) -> Result<()> {
    game.initialize()?;
    if !game.show_intro()? {
        return Ok(());
    }

    loop {
        match game.play().context("game aborted")? {
            ClockExit::Quit { .. } => return Ok(()),
            ClockExit::GameOver { .. } => {
                if !game.wants_another()? {
                    return Ok(());
                }
            },
        }
    }
}

/// Logs go to a file, if anywhere: the game owns the terminal.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(p) => p,
        None => return Ok(()),
    };

    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
