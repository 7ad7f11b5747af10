//! Turns the session state into draw calls for one frame.
//!
//! Draw order:
//!   1. hardware status group (optional)
//!   2. confirm / cancel hints, top right
//!   3. countdown, top left
//!   4. wrapped message
//!   5. action hint, bottom left
//!
//! Every redraw starts from a cleared canvas; nothing is carried over.

use std::time::Duration;

use embedded_graphics::prelude::Point;

use crate::config::{PresenterConfig, CONTENT_WIDTH, PADDING};
use crate::error::PlatformError;
use crate::platform::{FontRole, HintEntry, HintGroup, HintPlacement, Platform};
use crate::session::SessionState;
use crate::ui::buttons::{Bindings, ButtonBinding, Intent};
use crate::ui::layout;

/// Whole seconds left before the timeout, never negative.
pub fn remaining_secs(timeout: Duration, elapsed: Duration) -> u64 {
    timeout.as_secs().saturating_sub(elapsed.as_secs())
}

/// Countdown line, e.g. "time left: 1 second" / "time left: 3 seconds".
pub fn countdown_text(remaining: u64) -> String {
    let unit = if remaining == 1 { "second" } else { "seconds" };
    format!("time left: {remaining} {unit}")
}

fn entry(binding: &ButtonBinding) -> HintEntry {
    HintEntry::new(binding.button.name(), binding.label.as_str())
}

fn visible(bindings: &Bindings, intent: Intent) -> Option<&ButtonBinding> {
    bindings.get(intent).filter(|binding| binding.visible)
}

/// Confirm/cancel pill: cancel then confirm when both are shown.
pub fn confirm_cancel_hints(bindings: &Bindings, below_status: bool) -> Option<HintGroup> {
    let mut group = HintGroup::new(HintPlacement::TopRight { below_status });
    for intent in [Intent::Cancel, Intent::Confirm] {
        if let Some(binding) = visible(bindings, intent) {
            // Two slots, two candidates.
            let _ = group.push(entry(binding));
        }
    }
    (!group.is_empty()).then_some(group)
}

/// Action pill, drawn whenever an action button is configured.
pub fn action_hint(bindings: &Bindings) -> Option<HintGroup> {
    let binding = bindings.get(Intent::Action)?;
    let mut group = HintGroup::new(HintPlacement::BottomLeft);
    let _ = group.push(entry(binding));
    Some(group)
}

fn sleep_hint() -> HintGroup {
    let mut group = HintGroup::new(HintPlacement::BottomRight);
    let _ = group.push(HintEntry::new("MENU", "SLEEP"));
    group
}

/// Draw one complete frame and present it.
pub fn draw_screen<P>(
    platform: &mut P,
    state: &SessionState,
    config: &PresenterConfig,
) -> Result<(), PlatformError>
where
    P: Platform + ?Sized,
{
    platform.clear_canvas();

    if config.show_hardware_group {
        let online = platform.is_network_online();
        platform.blit_hardware_group(online);
        platform.blit_button_hint_group(&sleep_hint());
    }

    if let Some(group) = confirm_cancel_hints(&config.bindings, config.show_hardware_group) {
        platform.blit_button_hint_group(&group);
    }

    if let Some(remaining) = state.countdown_secs(platform.now()) {
        let origin = Point::new(PADDING as i32, PADDING as i32);
        platform.blit_text(FontRole::Status, &countdown_text(remaining), origin);
    }

    let message = config.messages.current();
    let lines = layout::layout(&message.text, CONTENT_WIDTH, |text| {
        platform.measure_text_width(FontRole::Message, text)
    });
    let placed = layout::place(
        &lines,
        platform.measure_text_height(FontRole::Message),
        PADDING,
        message.alignment,
        platform.screen_size(),
        PADDING,
    );
    for row in &placed {
        platform.blit_text(FontRole::Message, &row.line.text, row.origin);
    }

    if let Some(group) = action_hint(&config.bindings) {
        platform.blit_button_hint_group(&group);
    }

    tracing::trace!(rows = lines.len(), "frame drawn");
    platform.present_canvas()
}
