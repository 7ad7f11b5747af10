//! Capability interface to the device: input, drawing, clock, network.
//!
//! The presentation engine only talks to hardware through [`Platform`].
//!
//! ## Implementations
//!
//! - **Canvas**: `embedded-graphics` RGB565 framebuffer shared by backends
//! - **Headless**: scripted input, manual clock, recorded draw calls
//! - **Desktop**: canvas → framebuffer device, terminal keyboard input
//!   (feature `desktop`)

pub mod canvas;
#[cfg(feature = "desktop")]
pub mod desktop;
pub mod headless;

use std::time::Duration;

use embedded_graphics::prelude::{Point, Size};

use crate::error::PlatformError;
use crate::ui::buttons::Button;

/// Which of the two loaded faces a text uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontRole {
    /// Large bold face for the message body.
    Message,
    /// Small face for the countdown and status text.
    Status,
}

/// One button glyph with its label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HintEntry {
    /// Text inside the round glyph ("A", "MENU", ...).
    pub glyph: String,
    pub label: String,
}

impl HintEntry {
    pub fn new(glyph: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            glyph: glyph.into(),
            label: label.into(),
        }
    }
}

/// Where a hint pill is anchored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HintPlacement {
    /// Top-right corner; pushed down one pill row when the status group
    /// occupies the corner.
    TopRight { below_status: bool },
    BottomLeft,
    BottomRight,
}

/// At most two hints drawn together in one pill.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HintGroup {
    pub entries: heapless::Vec<HintEntry, 2>,
    pub placement: HintPlacement,
}

impl HintGroup {
    pub fn new(placement: HintPlacement) -> Self {
        Self {
            entries: heapless::Vec::new(),
            placement,
        }
    }

    /// Append an entry. Returns it back if the group is already full.
    pub fn push(&mut self, entry: HintEntry) -> Result<(), HintEntry> {
        self.entries.push(entry)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Services the presenter needs from the device.
pub trait Platform {
    /// Latch input state for this frame.
    fn poll_input(&mut self);

    /// Whether `button` was released since the previous poll.
    fn is_button_released(&self, button: Button) -> bool;

    fn measure_text_width(&self, font: FontRole, text: &str) -> u32;

    /// Glyph height of `font`, constant for the session.
    fn measure_text_height(&self, font: FontRole) -> u32;

    fn screen_size(&self) -> Size;

    fn clear_canvas(&mut self);

    /// Draw `text` with its top-left corner at `origin`.
    fn blit_text(&mut self, font: FontRole, text: &str, origin: Point);

    fn blit_button_hint_group(&mut self, group: &HintGroup);

    /// Status glyphs (network) in the top-right corner.
    fn blit_hardware_group(&mut self, online: bool);

    /// Push the finished canvas to the display.
    fn present_canvas(&mut self) -> Result<(), PlatformError>;

    /// Block until the next display frame boundary.
    fn wait_for_next_frame(&mut self);

    fn is_network_online(&self) -> bool;

    /// Monotonic time since the platform was opened.
    fn now(&self) -> Duration;
}
