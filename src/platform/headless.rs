//! Display-less platform with scripted input and a frame-stepped clock.
//!
//! Every poll advances the clock by one frame interval. Button releases
//! and network changes are scheduled by poll number (the first poll is 1).
//! Draw calls are recorded instead of rasterized, with monospace metrics.

use std::collections::BTreeMap;
use std::time::Duration;

use embedded_graphics::prelude::{Point, Size};

use crate::config::{FRAME_INTERVAL, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::error::PlatformError;
use crate::interrupt::Interrupt;
use crate::platform::{FontRole, HintGroup, Platform};
use crate::ui::buttons::Button;

/// A recorded drawing operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawCall {
    Clear,
    Text {
        font: FontRole,
        text: String,
        origin: Point,
    },
    HintGroup(HintGroup),
    HardwareGroup {
        online: bool,
    },
    Present,
}

pub struct HeadlessPlatform {
    size: Size,
    frame: Duration,
    polls: u64,
    releases: BTreeMap<u64, Button>,
    network: BTreeMap<u64, bool>,
    interrupts: BTreeMap<u64, Interrupt>,
    released: Option<Button>,
    online: bool,
    calls: Vec<DrawCall>,
    waits: u64,
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self {
            size: Size::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            frame: FRAME_INTERVAL,
            polls: 0,
            releases: BTreeMap::new(),
            network: BTreeMap::new(),
            interrupts: BTreeMap::new(),
            released: None,
            online: false,
            calls: Vec::new(),
            waits: 0,
        }
    }

    pub fn with_frame_interval(mut self, frame: Duration) -> Self {
        self.frame = frame;
        self
    }

    pub fn with_online(mut self, online: bool) -> Self {
        self.online = online;
        self
    }

    /// Report `button` as released on poll number `poll`.
    pub fn release_at(mut self, poll: u64, button: Button) -> Self {
        self.releases.insert(poll, button);
        self
    }

    /// Switch network status on poll number `poll`.
    pub fn network_at(mut self, poll: u64, online: bool) -> Self {
        self.network.insert(poll, online);
        self
    }

    /// Raise `interrupt` from inside poll number `poll`, the way a Ctrl-C
    /// key read during the drain does.
    pub fn interrupt_at(mut self, poll: u64, interrupt: &Interrupt) -> Self {
        self.interrupts.insert(poll, interrupt.clone());
        self
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }

    pub fn waits(&self) -> u64 {
        self.waits
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Recorded calls grouped per presented frame.
    pub fn frames(&self) -> Vec<Vec<DrawCall>> {
        let mut frames = Vec::new();
        let mut current = Vec::new();
        for call in &self.calls {
            if *call == DrawCall::Present {
                frames.push(std::mem::take(&mut current));
            } else {
                current.push(call.clone());
            }
        }
        frames
    }

    fn metrics(font: FontRole) -> (u32, u32) {
        match font {
            FontRole::Message => (10, 20),
            FontRole::Status => (7, 13),
        }
    }
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for HeadlessPlatform {
    fn poll_input(&mut self) {
        self.polls += 1;
        self.released = self.releases.get(&self.polls).copied();
        if let Some(online) = self.network.get(&self.polls) {
            self.online = *online;
        }
        if let Some(interrupt) = self.interrupts.get(&self.polls) {
            interrupt.trigger();
        }
    }

    fn is_button_released(&self, button: Button) -> bool {
        self.released == Some(button)
    }

    fn measure_text_width(&self, font: FontRole, text: &str) -> u32 {
        Self::metrics(font).0 * text.chars().count() as u32
    }

    fn measure_text_height(&self, font: FontRole) -> u32 {
        Self::metrics(font).1
    }

    fn screen_size(&self) -> Size {
        self.size
    }

    fn clear_canvas(&mut self) {
        self.calls.push(DrawCall::Clear);
    }

    fn blit_text(&mut self, font: FontRole, text: &str, origin: Point) {
        self.calls.push(DrawCall::Text {
            font,
            text: text.to_owned(),
            origin,
        });
    }

    fn blit_button_hint_group(&mut self, group: &HintGroup) {
        self.calls.push(DrawCall::HintGroup(group.clone()));
    }

    fn blit_hardware_group(&mut self, online: bool) {
        self.calls.push(DrawCall::HardwareGroup { online });
    }

    fn present_canvas(&mut self) -> Result<(), PlatformError> {
        self.calls.push(DrawCall::Present);
        Ok(())
    }

    fn wait_for_next_frame(&mut self) {
        self.waits += 1;
    }

    fn is_network_online(&self) -> bool {
        self.online
    }

    fn now(&self) -> Duration {
        self.frame * self.polls as u32
    }
}
