//! Command-line interface.

mod commands;
mod input;
mod interactive;
mod render;
mod session;

pub use commands::{is_verbose, run};
