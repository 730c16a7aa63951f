//! Decode error page
//!
//! Shown instead of the detail page when a route payload cannot be decoded,
//! so a bad deep link ends on a readable screen rather than a blank one.

use core::cell::Cell;

use crate::pages::Page;
use crate::pages::constants::{BACK_BUTTON_HEIGHT_PX, BACK_BUTTON_WIDTH_PX};
use crate::sensors::DecodeError;
use crate::ui::core::{Action, Drawable, PageId, TouchEvent, TouchResult, Touchable};
use crate::ui::{Button, TextComponent, TextSize, theme};
use embedded_graphics::{
    geometry::{Point, Size},
    pixelcolor::Rgb565,
    prelude::*,
    primitives::Rectangle,
    text::Alignment,
};

pub const DECODE_ERROR_HEADLINE: &str = "Invalid sensor data";

pub struct DecodeErrorPage {
    bounds: Rectangle,
    /// Whether the page needs to be redrawn
    dirty: Cell<bool>,
    error: DecodeError,
    headline: TextComponent,
    detail: TextComponent,
    back_button: Button,
}

impl DecodeErrorPage {
    pub fn new(bounds: Rectangle, error: DecodeError) -> Self {
        let back_button = Button::new(
            Rectangle::new(
                bounds.top_left + Point::new(4, 4),
                Size::new(BACK_BUTTON_WIDTH_PX, BACK_BUTTON_HEIGHT_PX),
            ),
            "< Back",
            Action::GoBack,
        );

        let center_y = bounds.center().y;
        let line_height = TextSize::Large.char_height();

        // Headline sits one line above center, the decoder message one below.
        let headline = TextComponent::new(
            Rectangle::new(
                Point::new(bounds.top_left.x, center_y - 2 * line_height as i32),
                Size::new(bounds.size.width, line_height),
            ),
            DECODE_ERROR_HEADLINE,
            TextSize::Large,
        )
        .with_color(theme::ERROR)
        .with_alignment(Alignment::Center);

        let detail = TextComponent::new(
            Rectangle::new(
                Point::new(bounds.top_left.x, center_y + line_height as i32 / 2),
                Size::new(bounds.size.width, TextSize::Small.char_height()),
            ),
            &error.to_string(),
            TextSize::Small,
        )
        .with_alignment(Alignment::Center);

        Self {
            bounds,
            dirty: Cell::new(true),
            error,
            headline,
            detail,
            back_button,
        }
    }

    pub fn error(&self) -> &DecodeError {
        &self.error
    }
}

impl Page for DecodeErrorPage {
    fn id(&self) -> PageId {
        PageId::DecodeError
    }

    fn title(&self) -> &str {
        "Invalid Sensor"
    }

    fn on_activate(&mut self) {
        self.dirty.set(true);
    }

    fn handle_touch(&mut self, event: TouchEvent) -> Option<Action> {
        match self.back_button.handle_touch(event) {
            TouchResult::Action(action) => Some(action),
            TouchResult::Handled | TouchResult::NotHandled => None,
        }
    }

    fn update(&mut self) {}

    fn draw_page<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        Drawable::draw(self, display)
    }

    fn bounds(&self) -> Rectangle {
        Drawable::bounds(self)
    }

    fn is_dirty(&self) -> bool {
        Drawable::is_dirty(self)
    }

    fn mark_clean(&mut self) {
        Drawable::mark_clean(self)
    }

    fn mark_dirty(&mut self) {
        Drawable::mark_dirty(self)
    }
}

impl Drawable for DecodeErrorPage {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        display.clear(theme::BACKGROUND)?;

        self.back_button.draw(display)?;
        self.headline.draw(display)?;
        self.detail.draw(display)?;

        self.dirty.set(false);
        Ok(())
    }

    fn bounds(&self) -> Rectangle {
        self.bounds
    }

    fn is_dirty(&self) -> bool {
        self.dirty.get() || self.back_button.is_dirty()
    }

    fn mark_clean(&mut self) {
        self.dirty.set(false);
        self.back_button.mark_clean();
    }

    fn mark_dirty(&mut self) {
        self.dirty.set(true);
    }
}
