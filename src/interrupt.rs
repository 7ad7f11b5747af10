//! Cancellation token raised by SIGINT (or Ctrl-C in raw terminal mode).
//!
//! The signal handler only sets an atomic flag. The session loop checks it
//! at the top of every tick and bails out; the binary then exits with the
//! interrupted code without the graceful teardown.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use signal_hook::consts::SIGINT;

#[derive(Clone, Debug, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route SIGINT to this token.
    pub fn register_sigint(&self) -> io::Result<()> {
        signal_hook::flag::register(SIGINT, Arc::clone(&self.flag))?;
        Ok(())
    }

    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
