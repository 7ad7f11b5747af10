//! Application-wide constants and the validated runtime configuration.
//!
//! Screen geometry, spacing, font sizes and text limits live here so they
//! can be tuned in one place. `PresenterConfig` is what the CLI layer
//! produces after validation; the session and renderer only ever see this.

use std::time::Duration;

use crate::fonts::FontFace;
use crate::ui::buttons::Bindings;
use crate::ui::message::MessageDeck;

// Screen

/// Native panel resolution (640×480 handhelds).
pub const SCREEN_WIDTH: u32 = 640;
pub const SCREEN_HEIGHT: u32 = 480;

/// Outer padding from every screen edge (px).
pub const PADDING: u32 = 20;

/// Extra horizontal inset applied to the message block (px).
pub const BUTTON_PADDING: u32 = 24;

/// Height of a button-hint pill (px).
pub const PILL_SIZE: u32 = 36;

/// Diameter of the round button glyph inside a pill (px).
pub const BUTTON_SIZE: u32 = 28;

/// Wrap boundary for the message block.
pub const CONTENT_WIDTH: u32 = SCREEN_WIDTH - 2 * (PADDING + BUTTON_PADDING);

/// Maximum number of wrapped message rows. Rows past this are dropped.
pub const MAX_MESSAGE_ROWS: usize = 8;

// Fonts

/// Default point size of the message font.
pub const FONT_LARGE: u32 = 16;

/// Point size of the countdown / status font.
pub const FONT_SMALL: u32 = 12;

/// Accepted range for `--font-size-default` with a custom face.
pub const FONT_SIZE_MIN: u32 = 6;
pub const FONT_SIZE_MAX: u32 = 64;

/// Largest size the bundled monospace faces can draw (10×20).
pub const BUNDLED_FONT_SIZE_MAX: u32 = 20;

// Text limits

/// Longest accepted message, in bytes.
pub const MAX_MESSAGE_BYTES: usize = 1024;

/// Longest accepted button label, in bytes.
pub const MAX_LABEL_BYTES: usize = 256;

// Timing

/// Target frame period when idling (~60 Hz panel refresh).
pub const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

// Desktop platform defaults

/// Framebuffer device the desktop platform presents to.
pub const DEFAULT_FRAMEBUFFER: &str = "/dev/fb0";

/// Interface whose operstate drives the network glyph.
pub const NETWORK_INTERFACE: &str = "wlan0";

/// Font selection requested on the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontConfig {
    /// Face loaded from `--font-default`; `None` uses the bundled faces.
    pub face: Option<FontFace>,
    /// Point size of the message font.
    pub size: u32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            face: None,
            size: FONT_LARGE,
        }
    }
}

/// Fully validated presenter configuration.
#[derive(Clone, Debug)]
pub struct PresenterConfig {
    pub messages: MessageDeck,
    pub bindings: Bindings,
    /// `None` disables the timeout.
    pub timeout: Option<Duration>,
    pub show_time_left: bool,
    pub show_hardware_group: bool,
    pub fonts: FontConfig,
}

impl PresenterConfig {
    /// Whether the countdown line is drawn at all.
    pub fn countdown_visible(&self) -> bool {
        self.show_time_left && self.timeout.is_some()
    }
}
