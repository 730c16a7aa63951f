//! Sensor list page
//!
//! Shows how many sensors the platform exposes and one row per sensor with
//! its name and vendor. Touching a row snapshots that sensor into a
//! [`SensorDescriptor`] and asks for the detail route.

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{ContainsPoint, Line, PrimitiveStyle, Rectangle};
use log::{error, info};

use crate::pages::Route;
use crate::pages::constants::{LIST_ROW_HEIGHT_PX, PAGE_MARGIN_PX, TITLE_BAR_HEIGHT_PX};
use crate::pages::page::Page;
use crate::sensors::{SensorDescriptor, SensorInfo};
use crate::ui::{Action, Drawable, PageId, TextComponent, TextSize, TouchEvent, TouchPoint, theme};

/// Offset of the vendor line below the row's top edge
const VENDOR_LINE_OFFSET_PX: i32 = 17;

/// Offset of the name line below the row's top edge
const NAME_LINE_OFFSET_PX: i32 = 4;

pub struct SensorListPage {
    bounds: Rectangle,
    sensors: Vec<SensorInfo>,
    scroll_offset: usize,
    dirty: bool,
}

impl SensorListPage {
    pub fn new(bounds: Rectangle, sensors: Vec<SensorInfo>) -> Self {
        Self {
            bounds,
            sensors,
            scroll_offset: 0,
            dirty: true,
        }
    }

    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }

    pub fn header_text(&self) -> String {
        format!("Detected {} sensors", self.sensors.len())
    }

    /// Name and vendor line for the sensor at `index`.
    pub fn row_text(&self, index: usize) -> Option<(String, String)> {
        self.sensors
            .get(index)
            .map(|s| (s.name.clone(), format!("Vendor: {}", s.vendor)))
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Number of rows that fit below the title bar.
    pub fn visible_rows(&self) -> usize {
        let list_height = self.bounds.size.height.saturating_sub(TITLE_BAR_HEIGHT_PX);
        (list_height / LIST_ROW_HEIGHT_PX) as usize
    }

    fn list_top(&self) -> i32 {
        self.bounds.top_left.y + TITLE_BAR_HEIGHT_PX as i32
    }

    /// Index of the sensor row under `point`, if any.
    pub fn row_at(&self, point: TouchPoint) -> Option<usize> {
        let p = point.to_point();
        let dy = p.y - self.list_top();
        if dy < 0 || !self.bounds.contains(p) {
            return None;
        }

        let visible_index = (dy as u32 / LIST_ROW_HEIGHT_PX) as usize;
        if visible_index >= self.visible_rows() {
            return None;
        }

        let index = self.scroll_offset + visible_index;
        (index < self.sensors.len()).then_some(index)
    }

    /// Build the navigation action for the sensor at `index`.
    pub fn select(&self, index: usize) -> Option<Action> {
        let sensor = self.sensors.get(index)?;
        let descriptor = SensorDescriptor::from(sensor);

        match Route::sensor_detail(&descriptor) {
            Ok(route) => {
                info!("Selected sensor '{}' (type {})", sensor.name, sensor.sensor_type);
                Some(Action::Navigate(route))
            }
            Err(e) => {
                error!("Cannot open '{}': {}", sensor.name, e);
                None
            }
        }
    }

    fn max_scroll_offset(&self) -> usize {
        self.sensors.len().saturating_sub(self.visible_rows())
    }
}

impl Page for SensorListPage {
    fn id(&self) -> PageId {
        PageId::SensorList
    }

    fn title(&self) -> &str {
        "Sensors"
    }

    fn on_activate(&mut self) {
        self.dirty = true;
    }

    fn handle_touch(&mut self, event: TouchEvent) -> Option<Action> {
        match event {
            TouchEvent::Press(point) => self.row_at(point).and_then(|i| self.select(i)),
            TouchEvent::Drag(_) => None,
        }
    }

    fn scroll(&mut self, rows: i32) {
        let target = (self.scroll_offset as i64 + rows as i64).max(0) as usize;
        let clamped = target.min(self.max_scroll_offset());
        if clamped != self.scroll_offset {
            self.scroll_offset = clamped;
            self.dirty = true;
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

impl Drawable for SensorListPage {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        self.bounds
            .into_styled(PrimitiveStyle::with_fill(theme::BACKGROUND))
            .draw(display)?;

        let left = self.bounds.top_left.x + PAGE_MARGIN_PX;
        let width = self.bounds.size.width - 2 * PAGE_MARGIN_PX as u32;

        let header_top = self.bounds.top_left.y
            + (TITLE_BAR_HEIGHT_PX - TextSize::Medium.char_height()) as i32 / 2;
        TextComponent::new(
            Rectangle::new(
                Point::new(left, header_top),
                Size::new(width, TextSize::Medium.char_height()),
            ),
            &self.header_text(),
            TextSize::Medium,
        )
        .draw(display)?;

        let rows = self
            .sensors
            .iter()
            .skip(self.scroll_offset)
            .take(self.visible_rows());

        for (i, sensor) in rows.enumerate() {
            let row_top = self.list_top() + (i as u32 * LIST_ROW_HEIGHT_PX) as i32;

            TextComponent::new(
                Rectangle::new(
                    Point::new(left, row_top + NAME_LINE_OFFSET_PX),
                    Size::new(width, TextSize::Medium.char_height()),
                ),
                &sensor.name,
                TextSize::Medium,
            )
            .draw(display)?;

            TextComponent::new(
                Rectangle::new(
                    Point::new(left, row_top + VENDOR_LINE_OFFSET_PX),
                    Size::new(width, TextSize::Small.char_height()),
                ),
                &format!("Vendor: {}", sensor.vendor),
                TextSize::Small,
            )
            .with_color(theme::MUTED)
            .draw(display)?;

            let divider_y = row_top + LIST_ROW_HEIGHT_PX as i32 - 1;
            Line::new(
                Point::new(left, divider_y),
                Point::new(left + width as i32, divider_y),
            )
            .into_styled(PrimitiveStyle::with_stroke(theme::DIVIDER, 1))
            .draw(display)?;
        }

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
    use crate::pages::test_display::CountingDisplay;
    use crate::sensors::{SensorPlatform, VirtualSensorPlatform};
    use crate::ui::screen_bounds;

    fn catalog_page() -> (SensorListPage, Vec<SensorInfo>) {
        let sensors = VirtualSensorPlatform::with_default_catalog().sensor_list();
        (SensorListPage::new(screen_bounds(), sensors.clone()), sensors)
    }

    fn row_center(page: &SensorListPage, visible_index: u32) -> TouchPoint {
        let y = page.list_top() as u32 + visible_index * LIST_ROW_HEIGHT_PX + LIST_ROW_HEIGHT_PX / 2;
        TouchPoint::new(100, y as u16)
    }

    #[test]
    fn test_header_counts_sensors() {
        let (page, _) = catalog_page();
        assert_eq!(page.header_text(), "Detected 12 sensors");

        let empty = SensorListPage::new(screen_bounds(), Vec::new());
        assert_eq!(empty.header_text(), "Detected 0 sensors");
    }

    #[test]
    fn test_row_text() {
        let (page, _) = catalog_page();
        let (name, vendor) = page.row_text(4).unwrap();
        assert_eq!(name, "BMP390 Pressure");
        assert_eq!(vendor, "Vendor: Bosch");
        assert!(page.row_text(99).is_none());
    }

    #[test]
    fn test_selecting_each_row_snapshots_that_sensor() {
        let (page, sensors) = catalog_page();
        for (i, sensor) in sensors.iter().enumerate() {
            let Some(Action::Navigate(Route::SensorDetail { payload })) = page.select(i) else {
                panic!("row {i} did not produce a detail route");
            };
            let decoded = SensorDescriptor::decode(&payload).unwrap();
            assert_eq!(decoded, SensorDescriptor::from(sensor));
        }
    }

    #[test]
    fn test_touch_maps_to_row() {
        let (mut page, sensors) = catalog_page();
        assert_eq!(page.row_at(row_center(&page, 0)), Some(0));
        assert_eq!(page.row_at(row_center(&page, 2)), Some(2));
        assert_eq!(page.row_at(TouchPoint::new(100, 5)), None);

        let action = page.handle_touch(TouchEvent::Press(row_center(&page, 1)));
        let Some(Action::Navigate(Route::SensorDetail { payload })) = action else {
            panic!("expected navigation");
        };
        assert_eq!(
            SensorDescriptor::decode(&payload).unwrap().name(),
            sensors[1].name
        );
    }

    #[test]
    fn test_scroll_is_clamped_and_shifts_rows() {
        let (mut page, _) = catalog_page();
        let visible = page.visible_rows();
        assert_eq!(visible, 6);

        page.scroll(-3);
        assert_eq!(page.scroll_offset(), 0);

        page.scroll(100);
        assert_eq!(page.scroll_offset(), 12 - visible);
        assert_eq!(page.row_at(row_center(&page, 0)), Some(12 - visible));
    }

    #[test]
    fn test_empty_list_has_no_rows() {
        let mut page = SensorListPage::new(screen_bounds(), Vec::new());
        assert_eq!(page.row_at(row_center(&page, 0)), None);
        assert!(page.handle_touch(TouchEvent::Press(row_center(&page, 0))).is_none());
        page.scroll(1);
        assert_eq!(page.scroll_offset(), 0);
    }

    #[test]
    fn test_draw_renders_rows() {
        let (mut page, _) = catalog_page();
        let mut display = CountingDisplay::default();
        page.draw_page(&mut display).unwrap();
        assert!(display.pixels > 0);
        assert!(Page::is_dirty(&page));
        Page::mark_clean(&mut page);
        assert!(!Page::is_dirty(&page));
    }
}
