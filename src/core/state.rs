//! Run state tracking.
//!
//! `STEP` records which deploy step is running, reported on Ctrl+C.

use std::sync::atomic::{AtomicU8, Ordering};

/// Exit status after Ctrl+C (128 + SIGINT)
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Current deploy step, as `Step as u8`
static STEP: AtomicU8 = AtomicU8::new(Step::Preflight as u8);

/// Deploy steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Step {
    Preflight = 0,
    Commit = 1,
    Push = 2,
    Report = 3,
}

impl Step {
    const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Commit,
            2 => Self::Push,
            3 => Self::Report,
            _ => Self::Preflight,
        }
    }

    /// What an interruption during this step leaves behind.
    pub const fn interrupted_hint(self) -> &'static str {
        match self {
            Self::Preflight => "nothing was changed",
            Self::Commit => "the index may hold staged changes, check `git status`",
            Self::Push => "the hosting branch may not be updated, run again to retry",
            Self::Report => "the deploy already finished",
        }
    }
}

// =============================================================================
// STEP state
// =============================================================================

/// Record the step that is about to run
pub fn set_step(step: Step) {
    STEP.store(step as u8, Ordering::SeqCst);
}

/// Step currently running
pub fn current_step() -> Step {
    Step::from_u8(STEP.load(Ordering::SeqCst))
}

// =============================================================================
// Ctrl+C
// =============================================================================

/// Setup global Ctrl+C handler
///
/// `git` children receive the same SIGINT from the terminal, so the handler
/// only reports where the run stopped and exits.
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        let step = current_step();
        crate::log!("deploy"; "interrupted during {:?} step, {}", step, step.interrupted_hint());
        std::process::exit(INTERRUPTED_EXIT_CODE);
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

// =============================================================================
// Tests
// =============================================================================
