// src/pages/page.rs
//! Core page abstraction and the enum wrapper the page manager stores.
//!
//! [`Page`] defines the lifecycle, rendering, and interaction contract for
//! every screen. [`PageWrapper`] is a concrete enum over the page types so the
//! [`PageManager`](super::page_manager::PageManager) can keep a
//! `heapless::Vec` of heterogeneous pages without trait objects.

use crate::sensors::SensorPlatform;
use crate::ui::core::{Action, PageId, TouchEvent};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::{DecodeErrorPage, SensorDetailPage, SensorListPage};

// ---------------------------------------------------------------------------
// Page trait
// ---------------------------------------------------------------------------

/// Trait that all navigable UI pages must implement.
///
/// The [`PageManager`](super::page_manager::PageManager) calls these methods
/// in a well-defined order:
///
/// 1. **`on_activate`** — when the page becomes the top of the stack.
/// 2. **`handle_touch`** / **`scroll`** — for input while on top.
/// 3. **`update`** — once per frame to pick up external state.
/// 4. **`draw_page`** — when `is_dirty()` is true.
/// 5. **`on_deactivate`** — when another page is pushed over it, or before
///    it is popped.
pub trait Page {
    /// Identifier of the page kind.
    fn id(&self) -> PageId;

    /// Human-readable title (used in logs).
    fn title(&self) -> &str;

    /// Called when this page becomes the active page.
    fn on_activate(&mut self) {}

    /// Called when this page is no longer the active page.
    fn on_deactivate(&mut self) {}

    /// Process a touch event and optionally return a navigation [`Action`].
    fn handle_touch(&mut self, event: TouchEvent) -> Option<Action>;

    /// Scroll content by whole rows. Pages without scrollable content ignore it.
    fn scroll(&mut self, _rows: i32) {}

    /// Advance per-frame state.
    fn update(&mut self);

    /// Render the entire page to the given display target.
    fn draw_page<D: DrawTarget<Color = Rgb565>>(&mut self, display: &mut D)
    -> Result<(), D::Error>;

    /// Bounding rectangle of this page (typically the full screen).
    fn bounds(&self) -> Rectangle;

    /// Whether the page needs redrawing.
    fn is_dirty(&self) -> bool;

    /// Clear the dirty flag after a successful draw.
    fn mark_clean(&mut self);

    /// Force the page to be redrawn on the next frame.
    fn mark_dirty(&mut self);
}

// ---------------------------------------------------------------------------
// Blanket impl: Box<T> where T: Page
// ---------------------------------------------------------------------------

impl<T: Page> Page for Box<T> {
    fn id(&self) -> PageId {
        (**self).id()
    }

    fn title(&self) -> &str {
        (**self).title()
    }

    fn on_activate(&mut self) {
        (**self).on_activate()
    }

    fn on_deactivate(&mut self) {
        (**self).on_deactivate()
    }

    fn handle_touch(&mut self, event: TouchEvent) -> Option<Action> {
        (**self).handle_touch(event)
    }

    fn scroll(&mut self, rows: i32) {
        (**self).scroll(rows)
    }

    fn update(&mut self) {
        (**self).update()
    }

    fn draw_page<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        (**self).draw_page(display)
    }

    fn bounds(&self) -> Rectangle {
        (**self).bounds()
    }

    fn is_dirty(&self) -> bool {
        (**self).is_dirty()
    }

    fn mark_clean(&mut self) {
        (**self).mark_clean()
    }

    fn mark_dirty(&mut self) {
        (**self).mark_dirty()
    }
}

// ---------------------------------------------------------------------------
// PageWrapper
// ---------------------------------------------------------------------------

/// Enum-based wrapper that stores one of the concrete page types.
///
/// Each variant boxes its page to keep the enum size uniform. When adding a
/// page, add a variant here and the delegation in the [`Page`] impl below.
pub enum PageWrapper<P: SensorPlatform> {
    SensorList(Box<SensorListPage>),
    SensorDetail(Box<SensorDetailPage<P>>),
    DecodeError(Box<DecodeErrorPage>),
}

impl<P: SensorPlatform> PageWrapper<P> {
    pub fn as_sensor_list(&self) -> Option<&SensorListPage> {
        match self {
            PageWrapper::SensorList(page) => Some(&**page),
            _ => None,
        }
    }

    pub fn as_sensor_detail(&self) -> Option<&SensorDetailPage<P>> {
        match self {
            PageWrapper::SensorDetail(page) => Some(&**page),
            _ => None,
        }
    }

    pub fn as_decode_error(&self) -> Option<&DecodeErrorPage> {
        match self {
            PageWrapper::DecodeError(page) => Some(&**page),
            _ => None,
        }
    }
}

impl<P: SensorPlatform> Page for PageWrapper<P> {
    fn id(&self) -> PageId {
        match self {
            PageWrapper::SensorList(page) => page.id(),
            PageWrapper::SensorDetail(page) => page.id(),
            PageWrapper::DecodeError(page) => page.id(),
        }
    }

    fn title(&self) -> &str {
        match self {
            PageWrapper::SensorList(page) => page.title(),
            PageWrapper::SensorDetail(page) => page.title(),
            PageWrapper::DecodeError(page) => page.title(),
        }
    }

    fn on_activate(&mut self) {
        match self {
            PageWrapper::SensorList(page) => page.on_activate(),
            PageWrapper::SensorDetail(page) => page.on_activate(),
            PageWrapper::DecodeError(page) => page.on_activate(),
        }
    }

    fn on_deactivate(&mut self) {
        match self {
            PageWrapper::SensorList(page) => page.on_deactivate(),
            PageWrapper::SensorDetail(page) => page.on_deactivate(),
            PageWrapper::DecodeError(page) => page.on_deactivate(),
        }
    }

    fn handle_touch(&mut self, event: TouchEvent) -> Option<Action> {
        match self {
            PageWrapper::SensorList(page) => page.handle_touch(event),
            PageWrapper::SensorDetail(page) => page.handle_touch(event),
            PageWrapper::DecodeError(page) => page.handle_touch(event),
        }
    }

    fn scroll(&mut self, rows: i32) {
        match self {
            PageWrapper::SensorList(page) => page.scroll(rows),
            PageWrapper::SensorDetail(page) => page.scroll(rows),
            PageWrapper::DecodeError(page) => page.scroll(rows),
        }
    }

    fn update(&mut self) {
        match self {
            PageWrapper::SensorList(page) => page.update(),
            PageWrapper::SensorDetail(page) => page.update(),
            PageWrapper::DecodeError(page) => page.update(),
        }
    }

    fn draw_page<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        match self {
            PageWrapper::SensorList(page) => page.draw_page(display),
            PageWrapper::SensorDetail(page) => page.draw_page(display),
            PageWrapper::DecodeError(page) => page.draw_page(display),
        }
    }

    fn bounds(&self) -> Rectangle {
        match self {
            PageWrapper::SensorList(page) => Page::bounds(page),
            PageWrapper::SensorDetail(page) => Page::bounds(page),
            PageWrapper::DecodeError(page) => Page::bounds(page),
        }
    }

    fn is_dirty(&self) -> bool {
        match self {
            PageWrapper::SensorList(page) => Page::is_dirty(page),
            PageWrapper::SensorDetail(page) => Page::is_dirty(page),
            PageWrapper::DecodeError(page) => Page::is_dirty(page),
        }
    }

    fn mark_clean(&mut self) {
        match self {
            PageWrapper::SensorList(page) => Page::mark_clean(page),
            PageWrapper::SensorDetail(page) => Page::mark_clean(page),
            PageWrapper::DecodeError(page) => Page::mark_clean(page),
        }
    }

    fn mark_dirty(&mut self) {
        match self {
            PageWrapper::SensorList(page) => Page::mark_dirty(page),
            PageWrapper::SensorDetail(page) => Page::mark_dirty(page),
            PageWrapper::DecodeError(page) => Page::mark_dirty(page),
        }
    }
}
