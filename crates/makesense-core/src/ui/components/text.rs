// src/ui/components/text.rs
//! Single-line text component

use crate::ui::core::Drawable;
use crate::ui::theme;
use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, iso_8859_1};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text as EgText, TextStyleBuilder};

/// Maximum characters a [`TextComponent`] holds; longer text is clipped.
pub const MAX_TEXT_LEN: usize = 64;

/// Text size variants
///
/// - `Small`: 5x8 font
/// - `Medium`: 6x10 font (default)
/// - `Large`: 10x20 font
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextSize {
    Small,
    Medium,
    Large,
}

impl TextSize {
    pub fn font(&self) -> &'static MonoFont<'static> {
        match self {
            TextSize::Small => &iso_8859_1::FONT_5X8,
            TextSize::Medium => &iso_8859_1::FONT_6X10,
            TextSize::Large => &iso_8859_1::FONT_10X20,
        }
    }

    pub fn char_height(&self) -> u32 {
        self.font().character_size.height
    }
}

/// Copy as much of `text` as fits into a fixed-capacity string.
pub fn fit_text<const N: usize>(text: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Left-aligned, top-anchored text line with dirty tracking.
pub struct TextComponent {
    bounds: Rectangle,
    text: heapless::String<MAX_TEXT_LEN>,
    size: TextSize,
    color: Rgb565,
    alignment: Alignment,
    dirty: bool,
}

impl TextComponent {
    pub fn new(bounds: Rectangle, text: &str, size: TextSize) -> Self {
        Self {
            bounds,
            text: fit_text(text),
            size,
            color: theme::FOREGROUND,
            alignment: Alignment::Left,
            dirty: true,
        }
    }

    pub fn with_color(mut self, color: Rgb565) -> Self {
        self.color = color;
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Update the displayed text, marking the component dirty if it changed.
    pub fn set_text(&mut self, text: &str) {
        let new_text = fit_text(text);
        if self.text != new_text {
            self.text = new_text;
            self.dirty = true;
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn text_position(&self) -> Point {
        let top = self.bounds.top_left.y;
        match self.alignment {
            Alignment::Left => Point::new(self.bounds.top_left.x, top),
            Alignment::Center => Point::new(self.bounds.center().x, top),
            Alignment::Right => Point::new(
                self.bounds.top_left.x + self.bounds.size.width as i32,
                top,
            ),
        }
    }
}

impl Drawable for TextComponent {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        self.bounds
            .into_styled(PrimitiveStyle::with_fill(theme::BACKGROUND))
            .draw(display)?;

        let character_style = MonoTextStyle::new(self.size.font(), self.color);
        let text_style = TextStyleBuilder::new()
            .alignment(self.alignment)
            .baseline(Baseline::Top)
            .build();

        EgText::with_text_style(&self.text, self.text_position(), character_style, text_style)
            .draw(display)?;

        Ok(())
    }

    fn bounds(&self) -> Rectangle {
        self.bounds
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_text_clips_to_capacity() {
        let s: heapless::String<4> = fit_text("Accelerometer");
        assert_eq!(s.as_str(), "Acce");
    }

    #[test]
    fn test_fit_text_respects_char_boundaries() {
        // 'é' is two bytes; only one more byte of room after "ab".
        let s: heapless::String<3> = fit_text("abé");
        assert_eq!(s.as_str(), "ab");
    }

    #[test]
    fn test_set_text_marks_dirty_only_on_change() {
        let mut text = TextComponent::new(
            Rectangle::new(Point::zero(), Size::new(100, 10)),
            "Waiting",
            TextSize::Medium,
        );
        text.mark_clean();

        text.set_text("Waiting");
        assert!(!text.is_dirty());

        text.set_text("Value[0]: 1.0");
        assert!(text.is_dirty());
        assert_eq!(text.text(), "Value[0]: 1.0");
    }
}
