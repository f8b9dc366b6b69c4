pub mod actions;
pub mod cli;
pub mod config;
pub mod events;
pub mod keys;
pub mod logging;
pub mod refresh;
pub mod state;
pub mod worker;

pub use actions::{Action, ActionSettings};
pub use state::*;
