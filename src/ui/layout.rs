//! Greedy word wrapping and block placement for the message text.
//!
//! Words are packed left to right onto rows no wider than the content
//! width. A single word wider than a row gets a row of its own and is
//! allowed to overflow; words are never split. Rows past
//! [`MAX_MESSAGE_ROWS`] are dropped.

use embedded_graphics::prelude::{Point, Size};

use crate::config::MAX_MESSAGE_ROWS;
use crate::ui::message::Alignment;

/// One wrapped row of the message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutLine {
    pub text: String,
    pub pixel_width: u32,
}

/// Wrap `message` into rows at most `max_width` px wide.
///
/// `measure` returns the rendered width of a string in the message font.
/// Each word is measured once; the inter-word gap is the width of one
/// space.
pub fn layout<F>(message: &str, max_width: u32, measure: F) -> Vec<LayoutLine>
where
    F: FnMut(&str) -> u32,
{
    layout_rows(message, max_width, MAX_MESSAGE_ROWS, measure)
}

/// [`layout`] with an explicit row cap.
pub fn layout_rows<F>(
    message: &str,
    max_width: u32,
    max_rows: usize,
    mut measure: F,
) -> Vec<LayoutLine>
where
    F: FnMut(&str) -> u32,
{
    let mut lines: Vec<LayoutLine> = Vec::new();
    if max_rows == 0 {
        return lines;
    }

    let gap = measure(" ");

    for word in message.split_whitespace() {
        let width = measure(word);

        if let Some(line) = lines.last_mut() {
            let candidate = line.pixel_width.saturating_add(gap).saturating_add(width);
            if candidate <= max_width {
                line.text.push(' ');
                line.text.push_str(word);
                line.pixel_width = candidate;
                continue;
            }
        }

        if lines.len() == max_rows {
            tracing::debug!(max_rows, "message truncated at row cap");
            break;
        }

        if width > max_width {
            tracing::trace!(word, width, max_width, "word wider than a row");
        }
        lines.push(LayoutLine {
            text: word.to_owned(),
            pixel_width: width,
        });
    }

    lines
}

/// Total height of `count` rows with `gap` px between them.
pub fn block_height(count: usize, line_height: u32, gap: u32) -> u32 {
    match count {
        0 => 0,
        n => n as u32 * line_height + (n as u32 - 1) * gap,
    }
}

/// Y of the first row for the given anchor.
pub fn block_top(
    block_height: u32,
    alignment: Alignment,
    screen_height: u32,
    padding: u32,
) -> i32 {
    let screen_height = screen_height as i32;
    let block_height = block_height as i32;
    match alignment {
        Alignment::Top => padding as i32,
        Alignment::Middle => (screen_height - block_height) / 2,
        Alignment::Bottom => screen_height - block_height - padding as i32,
    }
}

/// X that centers a row of `line_width` px. Negative for overflowing rows.
pub fn centered_x(screen_width: u32, line_width: u32) -> i32 {
    (screen_width as i32 - line_width as i32) / 2
}

/// A wrapped row with its top-left position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacedLine<'a> {
    pub line: &'a LayoutLine,
    pub origin: Point,
}

/// Position every row: block anchored by `alignment`, rows centered.
pub fn place<'a>(
    lines: &'a [LayoutLine],
    line_height: u32,
    gap: u32,
    alignment: Alignment,
    screen: Size,
    padding: u32,
) -> Vec<PlacedLine<'a>> {
    let height = block_height(lines.len(), line_height, gap);
    let mut y = block_top(height, alignment, screen.height, padding);

    lines
        .iter()
        .map(|line| {
            let origin = Point::new(centered_x(screen.width, line.pixel_width), y);
            y += (line_height + gap) as i32;
            PlacedLine { line, origin }
        })
        .collect()
}
