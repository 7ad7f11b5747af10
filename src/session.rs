//! Session state machine and the frame loop.
//!
//! A session is `Running` until a button intent or the timeout ends it.
//! Each tick:
//!   1. bail out if the interrupt token is set
//!   2. poll input, bail out if that raised the interrupt, resolve at most
//!      one release
//!   3. mark dirty on network status change
//!   4. check the timeout; mark dirty when the whole-second count moves
//!   5. redraw if dirty, otherwise wait for the next frame

use std::time::Duration;

use crate::config::PresenterConfig;
use crate::error::PlatformError;
use crate::exit_code::ExitCode;
use crate::interrupt::Interrupt;
use crate::platform::Platform;
use crate::ui::buttons::{resolve, Intent};
use crate::ui::input_logic::released_button;
use crate::ui::render;

/// Mutable per-session state, owned by [`run`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    /// Next tick must redraw.
    pub dirty: bool,
    pub done: bool,
    pub exit_code: ExitCode,
    pub started_at: Duration,
    /// `None` when no timeout is configured.
    pub timeout: Option<Duration>,
    pub countdown_visible: bool,
    last_elapsed_secs: u64,
    was_online: bool,
}

impl SessionState {
    pub fn new(config: &PresenterConfig, now: Duration, online: bool) -> Self {
        Self {
            dirty: true,
            done: false,
            exit_code: ExitCode::Success,
            started_at: now,
            timeout: config.timeout,
            countdown_visible: config.countdown_visible(),
            last_elapsed_secs: 0,
            was_online: online,
        }
    }

    pub fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.started_at)
    }

    /// Seconds shown by the countdown, if it is drawn at all.
    pub fn countdown_secs(&self, now: Duration) -> Option<u64> {
        if !self.countdown_visible {
            return None;
        }
        self.timeout
            .map(|timeout| render::remaining_secs(timeout, self.elapsed(now)))
    }

    /// End the session on a resolved button intent.
    pub fn apply_intent(&mut self, intent: Intent) {
        self.done = true;
        self.dirty = false;
        self.exit_code = intent.exit_code();
    }

    /// Track connectivity; a change forces a redraw of the status glyphs.
    pub fn note_network(&mut self, online: bool) {
        if online != self.was_online {
            tracing::debug!(online, "network status changed");
            self.dirty = true;
        }
        self.was_online = online;
    }

    /// Apply the timeout and the once-per-second countdown redraw.
    pub fn advance_clock(&mut self, now: Duration) {
        let Some(timeout) = self.timeout else {
            return;
        };

        let elapsed = self.elapsed(now);
        if elapsed >= timeout {
            tracing::info!(timeout_secs = timeout.as_secs(), "timeout reached");
            self.done = true;
            self.exit_code = ExitCode::Timeout;
        }

        let secs = elapsed.as_secs();
        if secs != self.last_elapsed_secs {
            self.last_elapsed_secs = secs;
            self.dirty = true;
        }
    }
}

/// Result of a single tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    Continue,
    Done(ExitCode),
    Interrupted,
}

/// How the whole session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Finished(ExitCode),
    /// Interrupt token was raised; the caller skips graceful teardown.
    Interrupted,
}

/// Advance the session by one frame.
pub fn tick<P>(
    platform: &mut P,
    config: &PresenterConfig,
    state: &mut SessionState,
    interrupt: &Interrupt,
) -> Result<Tick, PlatformError>
where
    P: Platform + ?Sized,
{
    if interrupt.is_triggered() {
        return Ok(Tick::Interrupted);
    }

    platform.poll_input();
    if interrupt.is_triggered() {
        return Ok(Tick::Interrupted);
    }
    let pressed = released_button(platform);
    if let Some(intent) = resolve(pressed, &config.bindings) {
        tracing::info!(%intent, "button resolved");
        state.apply_intent(intent);
        return Ok(Tick::Done(state.exit_code));
    }

    state.note_network(platform.is_network_online());
    state.advance_clock(platform.now());
    if state.done {
        return Ok(Tick::Done(state.exit_code));
    }

    if state.dirty {
        render::draw_screen(platform, state, config)?;
        state.dirty = false;
    } else {
        platform.wait_for_next_frame();
    }

    Ok(Tick::Continue)
}

/// Run ticks until the session ends or is interrupted.
pub fn run<P>(
    platform: &mut P,
    config: &PresenterConfig,
    interrupt: &Interrupt,
) -> Result<Outcome, PlatformError>
where
    P: Platform + ?Sized,
{
    let mut state = SessionState::new(config, platform.now(), platform.is_network_online());
    tracing::debug!(
        timeout_secs = config.timeout.map(|t| t.as_secs()),
        countdown = state.countdown_visible,
        "session started"
    );

    loop {
        match tick(platform, config, &mut state, interrupt)? {
            Tick::Continue => {}
            Tick::Done(code) => {
                tracing::info!(%code, "session finished");
                return Ok(Outcome::Finished(code));
            }
            Tick::Interrupted => {
                tracing::warn!("session interrupted");
                return Ok(Outcome::Interrupted);
            }
        }
    }
}
