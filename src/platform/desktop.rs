//! Linux framebuffer output with keyboard input from the controlling terminal.
//!
//! Frames are rasterized on the RGB565 [`Canvas`] and written to the start
//! of the framebuffer device on present. Keys map onto the handheld pad:
//!   a / b / x / y  → A / B / X / Y
//!   Enter          → START
//!   Ctrl-C         → interrupt (raw mode swallows SIGINT)
//!
//! Terminals only report key presses, so a press counts as the release for
//! the poll that observed it.

use std::fs::{File, OpenOptions};
use std::io::{self, IsTerminal, Seek, SeekFrom, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use embedded_graphics::prelude::{Point, Size};

use crate::config::{
    PresenterConfig, FRAME_INTERVAL, NETWORK_INTERFACE, SCREEN_HEIGHT, SCREEN_WIDTH,
};
use crate::error::PlatformError;
use crate::interrupt::Interrupt;
use crate::platform::canvas::{Canvas, FontSet};
use crate::platform::{FontRole, HintGroup, Platform};
use crate::ui::buttons::Button;

pub struct DesktopPlatform {
    canvas: Canvas,
    framebuffer: File,
    scratch: Vec<u8>,
    raw_mode: bool,
    interrupt: Interrupt,
    released: Option<Button>,
    network: NetworkSampler,
    epoch: Instant,
    last_frame: Instant,
}

impl DesktopPlatform {
    /// Open the framebuffer and put the terminal into raw mode.
    ///
    /// Without a terminal on stdin the presenter still draws, it just never
    /// sees a button; only the timeout or a signal can end the session.
    pub fn open(
        framebuffer: &Path,
        config: &PresenterConfig,
        interrupt: Interrupt,
    ) -> Result<Self, PlatformError> {
        let file = OpenOptions::new()
            .write(true)
            .open(framebuffer)
            .map_err(|source| PlatformError::FramebufferOpen {
                path: framebuffer.to_path_buf(),
                source,
            })?;

        let raw_mode = if io::stdin().is_terminal() {
            terminal::enable_raw_mode().map_err(PlatformError::Terminal)?;
            true
        } else {
            tracing::warn!("stdin is not a terminal, button input disabled");
            false
        };

        let now = Instant::now();
        let platform = Self {
            canvas: Canvas::new(
                Size::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                FontSet::from_config(&config.fonts),
            ),
            framebuffer: file,
            scratch: Vec::new(),
            raw_mode,
            interrupt,
            released: None,
            network: NetworkSampler::new(read_operstate(), now),
            epoch: now,
            last_frame: now,
        };
        tracing::info!(path = %framebuffer.display(), raw_mode, "desktop platform ready");
        Ok(platform)
    }

}

/// What a terminal key means to the presenter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum KeyAction {
    Press(Button),
    Interrupt,
}

fn map_key(key: KeyEvent) -> Option<KeyAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let button = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Some(KeyAction::Interrupt);
        }
        KeyCode::Char('a') | KeyCode::Char('A') => Button::A,
        KeyCode::Char('b') | KeyCode::Char('B') => Button::B,
        KeyCode::Char('x') | KeyCode::Char('X') => Button::X,
        KeyCode::Char('y') | KeyCode::Char('Y') => Button::Y,
        KeyCode::Enter => Button::Start,
        _ => return None,
    };
    Some(KeyAction::Press(button))
}

/// Fold one poll's worth of key actions into the released button.
///
/// An interrupt anywhere in the batch wins and clears any earlier press;
/// otherwise the first press is the release for this poll.
fn drain_actions<I>(actions: I) -> Result<Option<Button>, Interrupted>
where
    I: IntoIterator<Item = KeyAction>,
{
    let mut released = None;
    for action in actions {
        match action {
            KeyAction::Interrupt => return Err(Interrupted),
            KeyAction::Press(button) => {
                released.get_or_insert(button);
            }
        }
    }
    Ok(released)
}

#[derive(Debug, PartialEq, Eq)]
struct Interrupted;

/// Link state cached between sysfs reads.
#[derive(Debug)]
struct NetworkSampler {
    online: bool,
    last_read: Instant,
}

impl NetworkSampler {
    /// Minimum time between two reads of the operstate file.
    const INTERVAL: Duration = Duration::from_secs(1);

    fn new(online: bool, now: Instant) -> Self {
        Self {
            online,
            last_read: now,
        }
    }

    fn due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_read) >= Self::INTERVAL
    }

    /// Refresh through `read` if a second has passed, then report the state.
    fn sample(&mut self, now: Instant, read: impl FnOnce() -> bool) -> bool {
        if self.due(now) {
            self.online = read();
            self.last_read = now;
        }
        self.online
    }
}

/// Next mapped key already queued on the terminal, without blocking.
fn next_key_action() -> Option<KeyAction> {
    loop {
        match event::poll(Duration::ZERO) {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "terminal poll failed");
                return None;
            }
        }
        match event::read() {
            Ok(Event::Key(key)) => {
                if let Some(action) = map_key(key) {
                    return Some(action);
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "terminal read failed");
                return None;
            }
        }
    }
}

fn read_operstate() -> bool {
    let path = format!("/sys/class/net/{NETWORK_INTERFACE}/operstate");
    std::fs::read_to_string(path)
        .map(|state| state.trim() == "up")
        .unwrap_or(false)
}

impl Platform for DesktopPlatform {
    fn poll_input(&mut self) {
        self.released = None;
        self.network.sample(Instant::now(), read_operstate);
        if !self.raw_mode {
            return;
        }

        match drain_actions(std::iter::from_fn(next_key_action)) {
            Ok(button) => self.released = button,
            Err(Interrupted) => {
                tracing::debug!("ctrl-c read from terminal");
                self.interrupt.trigger();
            }
        }
    }

    fn is_button_released(&self, button: Button) -> bool {
        self.released == Some(button)
    }

    fn measure_text_width(&self, font: FontRole, text: &str) -> u32 {
        self.canvas.measure_width(font, text)
    }

    fn measure_text_height(&self, font: FontRole) -> u32 {
        self.canvas.line_height(font)
    }

    fn screen_size(&self) -> Size {
        Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    fn clear_canvas(&mut self) {
        self.canvas.clear_all();
    }

    fn blit_text(&mut self, font: FontRole, text: &str, origin: Point) {
        self.canvas.draw_text(font, text, origin);
    }

    fn blit_button_hint_group(&mut self, group: &HintGroup) {
        self.canvas.draw_hint_group(group);
    }

    fn blit_hardware_group(&mut self, online: bool) {
        self.canvas.draw_hardware_group(online);
    }

    fn present_canvas(&mut self) -> Result<(), PlatformError> {
        self.scratch.clear();
        self.canvas.write_rgb565_le(&mut self.scratch);
        self.framebuffer
            .seek(SeekFrom::Start(0))
            .and_then(|_| self.framebuffer.write_all(&self.scratch))
            .and_then(|()| self.framebuffer.flush())
            .map_err(PlatformError::Present)?;
        self.last_frame = Instant::now();
        Ok(())
    }

    fn wait_for_next_frame(&mut self) {
        let next = self.last_frame + FRAME_INTERVAL;
        let now = Instant::now();
        if next > now {
            std::thread::sleep(next - now);
        }
        self.last_frame = Instant::now();
    }

    fn is_network_online(&self) -> bool {
        self.network.online
    }

    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

impl Drop for DesktopPlatform {
    fn drop(&mut self) {
        if self.raw_mode {
            if let Err(e) = terminal::disable_raw_mode() {
                tracing::warn!(error = %e, "failed to restore terminal");
            }
        }
        tracing::debug!("framebuffer released");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn face_keys_map_to_buttons() {
        assert_eq!(
            map_key(key(KeyCode::Char('a'), KeyModifiers::NONE)),
            Some(KeyAction::Press(Button::A))
        );
        assert_eq!(
            map_key(key(KeyCode::Char('Y'), KeyModifiers::SHIFT)),
            Some(KeyAction::Press(Button::Y))
        );
        assert_eq!(
            map_key(key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(KeyAction::Press(Button::Start))
        );
        assert_eq!(map_key(key(KeyCode::Char('q'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn ctrl_c_maps_to_interrupt() {
        assert_eq!(
            map_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(KeyAction::Interrupt)
        );
        assert_eq!(map_key(key(KeyCode::Char('c'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn first_press_wins_the_poll() {
        let actions = [KeyAction::Press(Button::B), KeyAction::Press(Button::A)];
        assert_eq!(drain_actions(actions), Ok(Some(Button::B)));
        assert_eq!(drain_actions(std::iter::empty()), Ok(None));
    }

    #[test]
    fn interrupt_survives_a_following_press() {
        let actions = [KeyAction::Interrupt, KeyAction::Press(Button::A)];
        assert_eq!(drain_actions(actions), Err(Interrupted));
    }

    #[test]
    fn interrupt_discards_an_earlier_press() {
        let actions = [KeyAction::Press(Button::A), KeyAction::Interrupt];
        assert_eq!(drain_actions(actions), Err(Interrupted));
    }

    #[test]
    fn operstate_read_at_most_once_per_second() {
        let start = Instant::now();
        let mut network = NetworkSampler::new(false, start);
        let reads = Cell::new(0);
        let read = || {
            reads.set(reads.get() + 1);
            true
        };

        for ms in (0..1000).step_by(16) {
            assert!(!network.sample(start + Duration::from_millis(ms), &read));
        }
        assert!(network.sample(start + Duration::from_secs(1), &read));
        assert!(network.sample(start + Duration::from_millis(1500), &read));
        assert_eq!(reads.get(), 1);
        network.sample(start + Duration::from_secs(2), &read);
        assert_eq!(reads.get(), 2);
    }
}
