// src/pages/page_manager.rs
//! Page manager with stack navigation and input dispatching.
//!
//! The bottom of the stack is always the sensor list. Navigating pushes a new
//! page built from a [`Route`]; going back pops and drops the top page, which
//! releases whatever it owns (the detail page's sensor subscription).

use std::sync::Arc;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use heapless::Vec;
use log::{debug, error, info, warn};

use crate::pages::constants::MAX_NAV_DEPTH;
use crate::pages::page::{Page, PageWrapper};
use crate::pages::route::{Route, RouteError};
use crate::pages::{DecodeErrorPage, SensorDetailPage, SensorListPage};
use crate::sensors::SensorPlatform;
use crate::ui::core::{Action, PageId, TouchEvent};

/// Manages page navigation, rendering, and event dispatching.
pub struct PageManager<P: SensorPlatform> {
    platform: Arc<P>,
    stack: Vec<PageWrapper<P>, MAX_NAV_DEPTH>,
    display_bounds: Rectangle,
}

impl<P: SensorPlatform> PageManager<P> {
    /// Create a manager showing the platform's sensor list.
    pub fn new(platform: Arc<P>, display_bounds: Rectangle) -> Self {
        let mut manager = Self {
            platform,
            stack: Vec::new(),
            display_bounds,
        };

        let mut root = manager.build_page(Route::SensorList);
        root.on_activate();
        manager.stack.push(root).ok();
        manager
    }

    fn build_page(&self, route: Route) -> PageWrapper<P> {
        match route {
            Route::SensorList => {
                let sensors = self.platform.sensor_list();
                info!("Sensor list with {} sensors", sensors.len());
                PageWrapper::SensorList(Box::new(SensorListPage::new(
                    self.display_bounds,
                    sensors,
                )))
            }
            Route::SensorDetail { payload } => {
                match SensorDetailPage::new(self.display_bounds, self.platform.clone(), &payload) {
                    Ok(page) => PageWrapper::SensorDetail(Box::new(page)),
                    Err(e) => {
                        error!("Rejected sensor payload: {}", e);
                        PageWrapper::DecodeError(Box::new(DecodeErrorPage::new(
                            self.display_bounds,
                            e,
                        )))
                    }
                }
            }
        }
    }

    /// Push the page for `route`.
    ///
    /// Returns `false` if the stack is full; nothing changes in that case.
    pub fn navigate(&mut self, route: Route) -> bool {
        if self.stack.is_full() {
            warn!("Navigation stack full, ignoring {:?}", route.path());
            return false;
        }

        let mut page = self.build_page(route);

        if let Some(current) = self.stack.last_mut() {
            current.on_deactivate();
        }

        info!("Navigating to {:?} '{}'", page.id(), page.title());
        page.on_activate();
        self.stack.push(page).ok();
        true
    }

    /// Pop the current page and reactivate the one below it.
    ///
    /// Returns `false` when already at the sensor list.
    pub fn go_back(&mut self) -> bool {
        if self.stack.len() <= 1 {
            return false;
        }

        if let Some(mut popped) = self.stack.pop() {
            popped.on_deactivate();
            info!("Leaving {:?} '{}'", popped.id(), popped.title());
        }

        if let Some(page) = self.stack.last_mut() {
            page.on_activate();
        }
        true
    }

    /// Parse and open a route path such as `sensorDetail/%7B...%7D`.
    pub fn open_deep_link(&mut self, path: &str) -> Result<bool, RouteError> {
        let route = Route::parse(path)?;
        Ok(self.navigate(route))
    }

    /// Carry out an action produced by a page. Returns whether the visible
    /// page changed.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Navigate(route) => self.navigate(route),
            Action::GoBack => self.go_back(),
        }
    }

    /// Handle touch events, returns action if any
    pub fn handle_touch(&mut self, event: TouchEvent) -> Option<Action> {
        debug!("Processing touch event: {:?}", event);
        let page = self.stack.last_mut()?;
        let result = page.handle_touch(event);
        debug!("Touch result: {:?}", result);
        result
    }

    /// Scroll the current page by whole rows.
    pub fn scroll(&mut self, rows: i32) {
        if let Some(page) = self.stack.last_mut() {
            page.scroll(rows);
        }
    }

    /// Update current page state
    pub fn update(&mut self) {
        if let Some(page) = self.stack.last_mut() {
            page.update();
        }
    }

    /// Draw the current page (full redraw)
    pub fn draw<D: DrawTarget<Color = Rgb565>>(&mut self, display: &mut D) -> Result<(), D::Error> {
        if let Some(page) = self.stack.last_mut() {
            page.mark_dirty();
            page.draw_page(display)?;
            page.mark_clean();
        }
        Ok(())
    }

    /// Draw the current page only if it is dirty. Returns whether it drew.
    pub fn draw_dirty<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        display: &mut D,
    ) -> Result<bool, D::Error> {
        match self.stack.last_mut() {
            Some(page) if page.is_dirty() => {
                page.draw_page(display)?;
                page.mark_clean();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Check if current page is dirty
    pub fn is_dirty(&self) -> bool {
        self.stack.last().is_some_and(|page| page.is_dirty())
    }

    pub fn current_page(&self) -> Option<&PageWrapper<P>> {
        self.stack.last()
    }

    /// Get current page ID
    pub fn current_page_id(&self) -> PageId {
        self.stack
            .last()
            .map(|page| page.id())
            .unwrap_or(PageId::SensorList)
    }

    /// Number of pages on the stack, including the sensor list.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
