pub mod animation;
pub mod canvas;
pub mod handlers;
pub mod render;
pub mod types;

pub use types::*;

use crate::errors::CliError;

/// Hands the terminal to a child program and takes it back afterwards.
pub trait Suspend {
    /// Leave raw mode and the alternate screen.
    fn suspend(&mut self) -> Result<(), CliError>;
    /// Re-enter raw mode and the alternate screen and force a full redraw.
    fn resume(&mut self) -> Result<(), CliError>;
}
