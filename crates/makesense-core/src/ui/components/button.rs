// src/ui/components/button.rs
//! Button component

use crate::ui::core::{Action, Drawable, TouchEvent, TouchPoint, TouchResult, Touchable};
use crate::ui::theme;
use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::{MonoTextStyle, ascii::FONT_6X10};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{ContainsPoint, PrimitiveStyle, Rectangle, RoundedRectangle};
use embedded_graphics::text::{Alignment as TextAlignment, Baseline, Text, TextStyleBuilder};

use super::fit_text;

const BORDER_RADIUS_PX: u32 = 6;

/// Touchable button that yields its [`Action`] on press.
///
/// Pressing shows a darker background until the touch is dragged off the
/// button.
pub struct Button {
    bounds: Rectangle,
    label: heapless::String<16>,
    action: Action,
    pressed: bool,
    dirty: bool,
}

impl Button {
    pub fn new(bounds: Rectangle, label: &str, action: Action) -> Self {
        Self {
            bounds,
            label: fit_text(label),
            action,
            pressed: false,
            dirty: true,
        }
    }

    fn set_pressed(&mut self, pressed: bool) {
        if self.pressed != pressed {
            self.pressed = pressed;
            self.dirty = true;
        }
    }
}

impl Drawable for Button {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        let fill = if self.pressed {
            theme::ACCENT_PRESSED
        } else {
            theme::ACCENT
        };

        RoundedRectangle::with_equal_corners(
            self.bounds,
            Size::new(BORDER_RADIUS_PX, BORDER_RADIUS_PX),
        )
        .into_styled(PrimitiveStyle::with_fill(fill))
        .draw(display)?;

        let text_style = TextStyleBuilder::new()
            .alignment(TextAlignment::Center)
            .baseline(Baseline::Middle)
            .build();

        Text::with_text_style(
            &self.label,
            self.bounds.center(),
            MonoTextStyle::new(&FONT_6X10, theme::FOREGROUND),
            text_style,
        )
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

impl Touchable for Button {
    fn contains_point(&self, point: TouchPoint) -> bool {
        self.bounds.contains(point.to_point())
    }

    fn handle_touch(&mut self, event: TouchEvent) -> TouchResult {
        let inside = self.contains_point(event.point());
        match event {
            TouchEvent::Press(_) if inside => {
                self.set_pressed(true);
                TouchResult::Action(self.action.clone())
            }
            TouchEvent::Press(_) => TouchResult::NotHandled,
            TouchEvent::Drag(_) => {
                let was_pressed = self.pressed;
                self.set_pressed(inside && was_pressed);
                if was_pressed {
                    TouchResult::Handled
                } else {
                    TouchResult::NotHandled
                }
            }
        }
    }
}
