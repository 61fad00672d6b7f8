//! Process-wide state shared across the codebase.

mod state;

pub use state::{Step, set_step, setup_shutdown_handler};
