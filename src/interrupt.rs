use crate::prompt::Cancelled;
use anyhow::{Context, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

static CHILDREN_IN_FOREGROUND: AtomicUsize = AtomicUsize::new(0);

/// Turn SIGINT into the same neutral exit as an operator cancellation
///
/// Raw-mode prompts read Ctrl+C as a key and never see the signal. Everywhere
/// else (line prompts, the URL fetch, file I/O) the handler prints the
/// cancellation notice and exits with 0. Documents are only ever replaced by
/// rename, so stopping between any two steps leaves them whole.
///
/// # Errors
///
/// Returns an error if a handler is already installed or the OS refuses it.
pub fn install() -> Result<()> {
    ctrlc::set_handler(|| {
        if child_in_foreground() {
            debug!("Interrupt left to the foreground editor");
            return;
        }
        let _ = crossterm::terminal::disable_raw_mode();
        println!("\n{Cancelled}");
        std::process::exit(0);
    })
    .context("Failed to install interrupt handler")
}

/// Leaves interrupts to a child process for as long as it is held
///
/// The terminal sends SIGINT to the whole foreground group, so an editor
/// that uses Ctrl+C itself would otherwise end the session.
#[must_use]
pub struct ChildGuard;

impl ChildGuard {
    pub fn enter() -> Self {
        CHILDREN_IN_FOREGROUND.fetch_add(1, Ordering::SeqCst);
        Self
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        CHILDREN_IN_FOREGROUND.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Whether an interrupt would currently be left to a child process
pub fn child_in_foreground() -> bool {
    CHILDREN_IN_FOREGROUND.load(Ordering::SeqCst) > 0
}
