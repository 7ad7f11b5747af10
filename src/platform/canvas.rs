//! RGB565 off-screen canvas drawn with `embedded-graphics`.
//!
//! Text comes from one of two kinds of face:
//!   - a custom TrueType/OpenType font, rasterized with `ab_glyph` at the
//!     exact requested size and blended into the canvas
//!   - otherwise the ISO 8859-1 mono fonts bundled with `embedded-graphics`,
//!     the closest one to the requested size
//!
//! Backends present the finished canvas however their display wants it.

use core::convert::Infallible;

use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};
use embedded_graphics::mono_font::iso_8859_1::{
    FONT_10X20, FONT_6X10, FONT_7X13, FONT_7X13_BOLD, FONT_9X15, FONT_9X15_BOLD, FONT_9X18,
    FONT_9X18_BOLD,
};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::{IntoStorage, Rgb565};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle, RoundedRectangle};
use embedded_graphics::text::renderer::TextRenderer;
use embedded_graphics::text::{Baseline, Text};

use crate::config::{FontConfig, BUTTON_SIZE, FONT_SMALL, PADDING, PILL_SIZE};
use crate::platform::{FontRole, HintEntry, HintGroup, HintPlacement};

const BACKGROUND: Rgb565 = Rgb565::BLACK;
const FOREGROUND: Rgb565 = Rgb565::WHITE;
const PILL_FILL: Rgb565 = Rgb565::new(4, 8, 4);
const GLYPH_FILL: Rgb565 = Rgb565::new(24, 48, 24);
const GLYPH_TEXT: Rgb565 = Rgb565::new(2, 4, 2);
const ONLINE_FILL: Rgb565 = Rgb565::new(8, 50, 10);

/// Space between glyph, label and the next entry (px).
const HINT_GAP: u32 = 8;
/// Inner padding before the first glyph (px).
const HINT_INSET: u32 = 4;

/// Closest bundled face for a point size. Bold only where a bold cut exists.
pub fn mono_font(size: u32, bold: bool) -> &'static MonoFont<'static> {
    match (size, bold) {
        (0..=10, _) => &FONT_6X10,
        (11..=13, false) => &FONT_7X13,
        (11..=13, true) => &FONT_7X13_BOLD,
        (14..=15, false) => &FONT_9X15,
        (14..=15, true) => &FONT_9X15_BOLD,
        (16..=18, false) => &FONT_9X18,
        (16..=18, true) => &FONT_9X18_BOLD,
        _ => &FONT_10X20,
    }
}

/// One text face at a fixed size.
#[derive(Clone)]
pub enum Face {
    Mono(&'static MonoFont<'static>),
    Outline { font: FontArc, scale: PxScale },
}

impl Face {
    fn outline(font: &FontArc, size: u32) -> Self {
        Self::Outline {
            font: font.clone(),
            scale: PxScale::from(size as f32),
        }
    }

    /// Advance width of `text`, rounded up to whole pixels.
    pub fn width(&self, text: &str) -> u32 {
        if text.is_empty() {
            return 0;
        }
        match self {
            Self::Mono(font) => MonoTextStyle::new(*font, FOREGROUND)
                .measure_string(text, Point::zero(), Baseline::Top)
                .bounding_box
                .size
                .width,
            Self::Outline { font, scale } => shape(font, *scale, text).1.ceil() as u32,
        }
    }

    /// Ascent plus descent.
    pub fn height(&self) -> u32 {
        match self {
            Self::Mono(font) => font.character_size.height,
            Self::Outline { font, scale } => {
                let scaled = font.as_scaled(*scale);
                (scaled.ascent() - scaled.descent()).round() as u32
            }
        }
    }
}

/// Glyphs of `text` with the kerned pen x of each, plus the total advance.
fn shape(font: &FontArc, scale: PxScale, text: &str) -> (Vec<(GlyphId, f32)>, f32) {
    let scaled = font.as_scaled(scale);
    let mut glyphs = Vec::with_capacity(text.len());
    let mut caret = 0.0;
    let mut previous = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(previous) = previous {
            caret += scaled.kern(previous, id);
        }
        glyphs.push((id, caret));
        caret += scaled.h_advance(id);
        previous = Some(id);
    }
    (glyphs, caret)
}

/// The two faces used during a session.
#[derive(Clone)]
pub struct FontSet {
    message: Face,
    status: Face,
}

impl FontSet {
    /// Bundled faces closest to the two sizes.
    pub fn for_sizes(message_size: u32, status_size: u32) -> Self {
        Self {
            message: Face::Mono(mono_font(message_size, true)),
            status: Face::Mono(mono_font(status_size, false)),
        }
    }

    /// `font` rasterized at exactly the two sizes.
    pub fn outline(font: &FontArc, message_size: u32, status_size: u32) -> Self {
        Self {
            message: Face::outline(font, message_size),
            status: Face::outline(font, status_size),
        }
    }

    pub fn from_config(fonts: &FontConfig) -> Self {
        match &fonts.face {
            Some(face) => Self::outline(&face.font, fonts.size, FONT_SMALL),
            None => Self::for_sizes(fonts.size, FONT_SMALL),
        }
    }

    pub fn face(&self, role: FontRole) -> &Face {
        match role {
            FontRole::Message => &self.message,
            FontRole::Status => &self.status,
        }
    }
}

impl Default for FontSet {
    fn default() -> Self {
        Self::from_config(&FontConfig::default())
    }
}

/// Full-screen RGB565 pixel buffer.
pub struct Canvas {
    size: Size,
    pixels: Vec<Rgb565>,
    fonts: FontSet,
}

impl Canvas {
    pub fn new(size: Size, fonts: FontSet) -> Self {
        let len = size.width as usize * size.height as usize;
        Self {
            size,
            pixels: vec![BACKGROUND; len],
            fonts,
        }
    }

    fn index_of(&self, point: Point) -> Option<usize> {
        let (x, y) = (point.x, point.y);
        if x < 0 || y < 0 || x as u32 >= self.size.width || y as u32 >= self.size.height {
            return None;
        }
        Some(y as usize * self.size.width as usize + x as usize)
    }

    pub fn pixel(&self, point: Point) -> Option<Rgb565> {
        self.index_of(point).map(|i| self.pixels[i])
    }

    pub fn measure_width(&self, role: FontRole, text: &str) -> u32 {
        self.fonts.face(role).width(text)
    }

    pub fn line_height(&self, role: FontRole) -> u32 {
        self.fonts.face(role).height()
    }

    pub fn clear_all(&mut self) {
        self.pixels.fill(BACKGROUND);
    }

    pub fn draw_text(&mut self, role: FontRole, text: &str, origin: Point) {
        self.draw_text_in(role, text, origin, FOREGROUND);
    }

    /// Draw `text` with its top-left corner at `origin`.
    fn draw_text_in(&mut self, role: FontRole, text: &str, origin: Point, color: Rgb565) {
        match self.fonts.face(role).clone() {
            Face::Mono(font) => {
                let style = MonoTextStyle::new(font, color);
                let _ = Text::with_baseline(text, origin, style, Baseline::Top).draw(self);
            }
            Face::Outline { font, scale } => self.draw_outline(&font, scale, text, origin, color),
        }
    }

    fn draw_outline(
        &mut self,
        font: &FontArc,
        scale: PxScale,
        text: &str,
        origin: Point,
        color: Rgb565,
    ) {
        let baseline = origin.y as f32 + font.as_scaled(scale).ascent();
        let (glyphs, _) = shape(font, scale, text);
        for (id, pen) in glyphs {
            let glyph = id.with_scale_and_position(scale, point(origin.x as f32 + pen, baseline));
            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            let (left, top) = (bounds.min.x as i32, bounds.min.y as i32);
            outlined.draw(|x, y, coverage| {
                self.blend(Point::new(left + x as i32, top + y as i32), color, coverage);
            });
        }
    }

    /// Mix `color` over the existing pixel by glyph coverage.
    fn blend(&mut self, at: Point, color: Rgb565, coverage: f32) {
        let Some(index) = self.index_of(at) else {
            return;
        };
        let coverage = coverage.clamp(0.0, 1.0);
        if coverage == 0.0 {
            return;
        }
        let under = self.pixels[index];
        let mix = |from: u8, to: u8| {
            (f32::from(from) + (f32::from(to) - f32::from(from)) * coverage).round() as u8
        };
        self.pixels[index] = Rgb565::new(
            mix(under.r(), color.r()),
            mix(under.g(), color.g()),
            mix(under.b(), color.b()),
        );
    }

    fn glyph_width(&self, glyph: &str) -> u32 {
        let text = self.measure_width(FontRole::Status, glyph);
        BUTTON_SIZE.max(text + HINT_GAP * 2)
    }

    fn entry_width(&self, entry: &HintEntry) -> u32 {
        self.glyph_width(&entry.glyph)
            + HINT_GAP
            + self.measure_width(FontRole::Status, &entry.label)
            + HINT_GAP
    }

    fn pill_origin(&self, placement: HintPlacement, width: u32) -> Point {
        let right = self.size.width as i32 - PADDING as i32 - width as i32;
        let bottom = self.size.height as i32 - PADDING as i32 - PILL_SIZE as i32;
        match placement {
            HintPlacement::TopRight { below_status: false } => Point::new(right, PADDING as i32),
            HintPlacement::TopRight { below_status: true } => {
                Point::new(right, (PADDING * 3 / 2 + PILL_SIZE) as i32)
            }
            HintPlacement::BottomLeft => Point::new(PADDING as i32, bottom),
            HintPlacement::BottomRight => Point::new(right, bottom),
        }
    }

    fn draw_pill(&mut self, origin: Point, width: u32, fill: Rgb565) {
        let radius = PILL_SIZE / 2;
        let _ = RoundedRectangle::with_equal_corners(
            Rectangle::new(origin, Size::new(width, PILL_SIZE)),
            Size::new(radius, radius),
        )
        .into_styled(PrimitiveStyle::with_fill(fill))
        .draw(self);
    }

    fn draw_glyph(&mut self, glyph: &str, origin: Point) -> u32 {
        let width = self.glyph_width(glyph);
        let top = origin.y + ((PILL_SIZE - BUTTON_SIZE) / 2) as i32;
        let shape = PrimitiveStyle::with_fill(GLYPH_FILL);
        if width == BUTTON_SIZE {
            let _ = Circle::new(Point::new(origin.x, top), BUTTON_SIZE)
                .into_styled(shape)
                .draw(self);
        } else {
            let radius = BUTTON_SIZE / 2;
            let _ = RoundedRectangle::with_equal_corners(
                Rectangle::new(Point::new(origin.x, top), Size::new(width, BUTTON_SIZE)),
                Size::new(radius, radius),
            )
            .into_styled(shape)
            .draw(self);
        }

        let text_width = self.measure_width(FontRole::Status, glyph);
        let text_height = self.line_height(FontRole::Status);
        let text_origin = Point::new(
            origin.x + (width as i32 - text_width as i32) / 2,
            top + (BUTTON_SIZE as i32 - text_height as i32) / 2,
        );
        self.draw_text_in(FontRole::Status, glyph, text_origin, GLYPH_TEXT);
        width
    }

    /// Draw a pill of button glyphs and labels at its anchor.
    pub fn draw_hint_group(&mut self, group: &HintGroup) {
        if group.is_empty() {
            return;
        }

        let width = HINT_INSET
            + group
                .entries
                .iter()
                .map(|entry| self.entry_width(entry))
                .sum::<u32>();
        let origin = self.pill_origin(group.placement, width);
        self.draw_pill(origin, width, PILL_FILL);

        let label_top =
            origin.y + (PILL_SIZE as i32 - self.line_height(FontRole::Status) as i32) / 2;
        let mut x = origin.x + HINT_INSET as i32;
        for entry in &group.entries {
            x += (self.draw_glyph(&entry.glyph, Point::new(x, origin.y)) + HINT_GAP) as i32;
            self.draw_text(FontRole::Status, &entry.label, Point::new(x, label_top));
            x += (self.measure_width(FontRole::Status, &entry.label) + HINT_GAP) as i32;
        }
    }

    /// Network indicator pill in the top-right corner.
    pub fn draw_hardware_group(&mut self, online: bool) {
        let label = "WIFI";
        let label_width = self.measure_width(FontRole::Status, label);
        let width = HINT_INSET + BUTTON_SIZE + HINT_GAP + label_width + HINT_GAP;
        let origin = Point::new(
            self.size.width as i32 - PADDING as i32 - width as i32,
            PADDING as i32,
        );
        self.draw_pill(origin, width, PILL_FILL);

        let dot = Point::new(
            origin.x + HINT_INSET as i32,
            origin.y + ((PILL_SIZE - BUTTON_SIZE) / 2) as i32,
        );
        let style = if online {
            PrimitiveStyle::with_fill(ONLINE_FILL)
        } else {
            PrimitiveStyle::with_stroke(GLYPH_FILL, 2)
        };
        let _ = Circle::new(dot, BUTTON_SIZE).into_styled(style).draw(self);

        let label_origin = Point::new(
            dot.x + (BUTTON_SIZE + HINT_GAP) as i32,
            origin.y + (PILL_SIZE as i32 - self.line_height(FontRole::Status) as i32) / 2,
        );
        self.draw_text(FontRole::Status, label, label_origin);
    }

    /// Serialize the canvas as little-endian RGB565, row major.
    pub fn write_rgb565_le(&self, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.pixels.len() * 2);
        for color in &self.pixels {
            let raw: u16 = color.into_storage();
            out.extend_from_slice(&raw.to_le_bytes());
        }
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(index) = self.index_of(point) {
                self.pixels[index] = color;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(color);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::{box_font_bytes, FontFace, FontFormat};

    const SCREEN: Size = Size::new(640, 480);

    fn canvas() -> Canvas {
        Canvas::new(SCREEN, FontSet::default())
    }

    fn box_font() -> FontArc {
        FontArc::try_from_vec(box_font_bytes()).unwrap()
    }

    fn lit_pixels(canvas: &Canvas, area: Rectangle) -> usize {
        area.points()
            .filter(|p| canvas.pixel(*p).is_some_and(|c| c != BACKGROUND))
            .count()
    }

    #[test]
    fn font_sizes_pick_nearest_face() {
        assert_eq!(mono_font(8, true).character_size, Size::new(6, 10));
        assert_eq!(mono_font(12, false).character_size, Size::new(7, 13));
        assert_eq!(mono_font(16, true).character_size, Size::new(9, 18));
        assert_eq!(mono_font(40, true).character_size, Size::new(10, 20));
    }

    #[test]
    fn measures_monospace_runs() {
        let c = canvas();
        assert_eq!(c.measure_width(FontRole::Message, ""), 0);
        assert_eq!(c.measure_width(FontRole::Message, "abc"), 27);
        assert_eq!(c.line_height(FontRole::Message), 18);
        assert_eq!(c.line_height(FontRole::Status), 13);
    }

    #[test]
    fn configured_face_and_size_drive_metrics() {
        let bundled = Canvas::new(
            SCREEN,
            FontSet::from_config(&FontConfig { face: None, size: 20 }),
        );
        assert_eq!(bundled.measure_width(FontRole::Message, "hello"), 50);
        assert_eq!(bundled.line_height(FontRole::Message), 20);

        let face = FontFace {
            path: "box.ttf".into(),
            format: FontFormat::TrueType,
            font: box_font(),
        };
        let custom = Canvas::new(
            SCREEN,
            FontSet::from_config(&FontConfig {
                face: Some(face),
                size: 64,
            }),
        );
        // 640 of 1024 units per char.
        assert_eq!(custom.measure_width(FontRole::Message, "hello"), 200);
        assert_eq!(custom.line_height(FontRole::Message), 64);
        assert_eq!(custom.line_height(FontRole::Status), FONT_SMALL);
    }

    #[test]
    fn outline_widths_round_up() {
        let c = Canvas::new(SCREEN, FontSet::outline(&box_font(), 20, FONT_SMALL));
        assert_eq!(c.measure_width(FontRole::Message, ""), 0);
        assert_eq!(c.measure_width(FontRole::Message, "hello"), 63);
        assert_eq!(c.line_height(FontRole::Message), 20);
    }

    #[test]
    fn outline_text_is_rasterized_below_origin() {
        let mut c = Canvas::new(SCREEN, FontSet::outline(&box_font(), 64, FONT_SMALL));
        c.draw_text(FontRole::Message, "hi", Point::new(100, 100));

        // Box of the first glyph: x 104..136, y 108..148.
        assert_eq!(c.pixel(Point::new(120, 130)), Some(FOREGROUND));
        let inside = Rectangle::new(Point::new(100, 100), Size::new(80, 64));
        assert!(lit_pixels(&c, inside) > 0);
        assert_eq!(lit_pixels(&c, Rectangle::new(Point::zero(), Size::new(640, 100))), 0);
        let right = Rectangle::new(Point::new(180, 0), Size::new(460, 480));
        assert_eq!(lit_pixels(&c, right), 0);
    }

    #[test]
    fn outline_hint_stays_in_its_corner() {
        let mut c = Canvas::new(SCREEN, FontSet::outline(&box_font(), 32, FONT_SMALL));
        let mut group = HintGroup::new(HintPlacement::BottomLeft);
        group.push(HintEntry::new("X", "ACTION")).unwrap();
        c.draw_hint_group(&group);

        let corner = Rectangle::new(
            Point::new(0, (480 - PADDING - PILL_SIZE) as i32),
            Size::new(320, PILL_SIZE),
        );
        assert!(lit_pixels(&c, corner) > 0);
        let top = Rectangle::new(Point::zero(), Size::new(640, 240));
        assert_eq!(lit_pixels(&c, top), 0);
    }

    #[test]
    fn text_lands_inside_its_box() {
        let mut c = canvas();
        c.draw_text(FontRole::Message, "HELLO", Point::new(100, 100));
        let inside = Rectangle::new(Point::new(100, 100), Size::new(45, 18));
        assert!(lit_pixels(&c, inside) > 0);
        assert_eq!(lit_pixels(&c, Rectangle::new(Point::zero(), Size::new(640, 100))), 0);
    }

    #[test]
    fn offscreen_drawing_is_clipped() {
        let mut c = canvas();
        c.draw_text(FontRole::Message, "overflowing", Point::new(-40, -5));
        c.draw_text(FontRole::Message, "overflowing", Point::new(600, 470));
        assert!(c.pixel(Point::new(-1, 0)).is_none());
        assert!(c.pixel(Point::new(640, 0)).is_none());
    }

    #[test]
    fn clear_resets_every_pixel() {
        let mut c = canvas();
        c.draw_text(FontRole::Message, "X", Point::new(10, 10));
        c.clear_all();
        assert_eq!(lit_pixels(&c, c.bounding_box()), 0);
    }

    #[test]
    fn bottom_left_hint_is_drawn_in_corner() {
        let mut c = canvas();
        let mut group = HintGroup::new(HintPlacement::BottomLeft);
        group.push(HintEntry::new("X", "ACTION")).unwrap();
        c.draw_hint_group(&group);

        let corner = Rectangle::new(
            Point::new(0, (480 - PADDING - PILL_SIZE) as i32),
            Size::new(320, PILL_SIZE),
        );
        assert!(lit_pixels(&c, corner) > 0);
        let top = Rectangle::new(Point::zero(), Size::new(640, 240));
        assert_eq!(lit_pixels(&c, top), 0);
    }

    #[test]
    fn top_right_hint_moves_below_status() {
        let mut plain = canvas();
        let mut shifted = canvas();
        let mut group = HintGroup::new(HintPlacement::TopRight { below_status: false });
        group.push(HintEntry::new("A", "SELECT")).unwrap();
        plain.draw_hint_group(&group);
        group.placement = HintPlacement::TopRight { below_status: true };
        shifted.draw_hint_group(&group);

        let first_row = Rectangle::new(Point::new(320, PADDING as i32), Size::new(320, PILL_SIZE));
        assert!(lit_pixels(&plain, first_row) > 0);
        assert_eq!(lit_pixels(&shifted, first_row), 0);
    }

    #[test]
    fn empty_hint_group_draws_nothing() {
        let mut c = canvas();
        c.draw_hint_group(&HintGroup::new(HintPlacement::BottomRight));
        assert_eq!(lit_pixels(&c, c.bounding_box()), 0);
    }

    #[test]
    fn hardware_group_sits_top_right() {
        let mut c = canvas();
        c.draw_hardware_group(true);
        let corner = Rectangle::new(Point::new(320, 0), Size::new(320, 80));
        assert!(lit_pixels(&c, corner) > 0);
        let rest = Rectangle::new(Point::new(0, 80), Size::new(640, 400));
        assert_eq!(lit_pixels(&c, rest), 0);
    }

    #[test]
    fn serializes_two_bytes_per_pixel() {
        let mut c = Canvas::new(Size::new(4, 2), FontSet::default());
        let _ = Pixel(Point::new(0, 0), Rgb565::WHITE).draw(&mut c);
        let mut out = Vec::new();
        c.write_rgb565_le(&mut out);
        assert_eq!(out.len(), 16);
        assert_eq!(&out[0..2], &[0xFF, 0xFF]);
        assert_eq!(&out[2..4], &[0x00, 0x00]);
    }
}
