//! Command implementations for the Tuneforge CLI.

pub mod render;
pub mod replay;
pub mod simulate;
pub mod types;

pub use types::{ReplayArgs, SimulateArgs};
