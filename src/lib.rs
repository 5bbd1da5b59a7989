pub mod adapter;
pub mod chain;
pub mod clock;
pub mod config;
pub mod error;
pub mod food;
pub mod game;
pub mod grid;
pub mod input;
pub mod segment;
pub mod sim;
pub mod term;

pub type TermInt = u16;
pub type Coords = (TermInt, TermInt);
