//! Sensor detail page
//!
//! Shows a decoded [`SensorDescriptor`] and the latest reading from the
//! matching physical sensor. The page subscribes when it becomes active and
//! drops the subscription when it is deactivated or destroyed, so there is
//! never more than one live registration per page.

use std::sync::Arc;

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use log::debug;

use crate::pages::constants::{
    BACK_BUTTON_HEIGHT_PX, BACK_BUTTON_WIDTH_PX, PAGE_MARGIN_PX, SECTION_GAP_PX,
    TEXT_ROW_HEIGHT_PX, TITLE_BAR_HEIGHT_PX,
};
use crate::pages::page::Page;
use crate::sensors::{DecodeError, DeliveryRate, SensorDescriptor, SensorPlatform, Subscription};
use crate::ui::{
    Action, Button, Drawable, PageId, TextComponent, TextSize, TouchEvent, TouchResult, Touchable,
    theme,
};

pub const WAITING_TEXT: &str = "Waiting for sensor data...";
pub const LIVE_VALUES_HEADING: &str = "Live Values:";

const HEADER_LINE_COUNT: i32 = 6;

/// Observable subscription state of a detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Not active; holds no registration.
    Unmounted,
    /// Active, but the platform has no sensor for the type or refused the
    /// registration. No events will arrive.
    Waiting,
    /// Active with a live registration.
    Subscribed,
}

enum LiveState<P: SensorPlatform> {
    Unmounted,
    Waiting,
    Subscribed(Subscription<P>),
}

/// Render a value the way Android readouts print floats: shortest digits
/// that round-trip, always with a fractional part (`1.0`, `9.81`), and
/// `1.0E-4` style scientific notation outside `[1e-3, 1e7)`.
pub fn format_value(value: f32) -> String {
    if value.is_nan() {
        return "NaN".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.into();
    }

    let magnitude = value.abs();
    if value == 0.0 || (1e-3..1e7).contains(&magnitude) {
        let plain = format!("{value}");
        return if plain.contains('.') {
            plain
        } else {
            format!("{plain}.0")
        };
    }

    let scientific = format!("{value:e}");
    match scientific.split_once('e') {
        Some((mantissa, exponent)) if mantissa.contains('.') => format!("{mantissa}E{exponent}"),
        Some((mantissa, exponent)) => format!("{mantissa}.0E{exponent}"),
        None => scientific,
    }
}

pub struct SensorDetailPage<P: SensorPlatform> {
    bounds: Rectangle,
    platform: Arc<P>,
    descriptor: SensorDescriptor,
    state: LiveState<P>,
    values: Vec<f32>,
    /// One text line per visible value slot, updated in place.
    value_rows: Vec<TextComponent>,
    value_scroll: usize,
    back_button: Button,
    /// Whole page needs a redraw; value rows track their own changes.
    dirty: bool,
}

impl<P: SensorPlatform> SensorDetailPage<P> {
    /// Build the page from an encoded route payload.
    pub fn new(bounds: Rectangle, platform: Arc<P>, payload: &str) -> Result<Self, DecodeError> {
        let descriptor = SensorDescriptor::decode(payload)?;
        Ok(Self::from_descriptor(bounds, platform, descriptor))
    }

    pub fn from_descriptor(
        bounds: Rectangle,
        platform: Arc<P>,
        descriptor: SensorDescriptor,
    ) -> Self {
        let back_button = Button::new(
            Rectangle::new(
                bounds.top_left + Point::new(4, 4),
                Size::new(BACK_BUTTON_WIDTH_PX, BACK_BUTTON_HEIGHT_PX),
            ),
            "< Back",
            Action::GoBack,
        );

        let left = bounds.top_left.x + PAGE_MARGIN_PX;
        let width = bounds.size.width.saturating_sub(2 * PAGE_MARGIN_PX as u32);
        let top = value_rows_top(bounds);
        let bottom = bounds.top_left.y + bounds.size.height as i32;
        let row_count = ((bottom - top).max(0) / TEXT_ROW_HEIGHT_PX as i32) as usize;

        let value_rows = (0..row_count)
            .map(|i| {
                let y = top + (i as u32 * TEXT_ROW_HEIGHT_PX) as i32;
                TextComponent::new(
                    Rectangle::new(Point::new(left, y), Size::new(width, TEXT_ROW_HEIGHT_PX)),
                    "",
                    TextSize::Medium,
                )
            })
            .collect();

        let mut page = Self {
            bounds,
            platform,
            descriptor,
            state: LiveState::Unmounted,
            values: Vec::new(),
            value_rows,
            value_scroll: 0,
            back_button,
            dirty: true,
        };
        page.sync_value_rows();
        page
    }

    pub fn descriptor(&self) -> &SensorDescriptor {
        &self.descriptor
    }

    /// The latest reading vector; empty until the first event arrives.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn lifecycle(&self) -> Lifecycle {
        match self.state {
            LiveState::Unmounted => Lifecycle::Unmounted,
            LiveState::Waiting => Lifecycle::Waiting,
            LiveState::Subscribed(_) => Lifecycle::Subscribed,
        }
    }

    /// Static descriptor attributes, one per line.
    pub fn header_lines(&self) -> Vec<String> {
        let d = &self.descriptor;
        vec![
            format!("Vendor: {}", d.vendor()),
            format!("Type: {}", d.sensor_type()),
            format!("Version: {}", d.version()),
            format!("Power: {} mA", format_value(d.power())),
            format!("Resolution: {}", format_value(d.resolution())),
            format!("Max Range: {}", format_value(d.max_range())),
        ]
    }

    /// Either the waiting placeholder or one indexed line per value.
    pub fn value_lines(&self) -> Vec<String> {
        if self.values.is_empty() {
            return vec![WAITING_TEXT.into()];
        }

        self.values
            .iter()
            .enumerate()
            .map(|(i, v)| format!("Value[{i}]: {}", format_value(*v)))
            .collect()
    }

    /// Value lines currently on screen, after scrolling.
    pub fn visible_value_lines(&self) -> Vec<&str> {
        self.value_rows
            .iter()
            .map(|row| row.text())
            .filter(|text| !text.is_empty())
            .collect()
    }

    /// Index of the first value line on screen.
    pub fn value_scroll(&self) -> usize {
        self.value_scroll
    }

    fn max_value_scroll(&self) -> usize {
        self.values
            .len()
            .max(1)
            .saturating_sub(self.value_rows.len())
    }

    fn sync_value_rows(&mut self) {
        self.value_scroll = self.value_scroll.min(self.max_value_scroll());
        let lines = self.value_lines();
        for (i, row) in self.value_rows.iter_mut().enumerate() {
            row.set_text(lines.get(self.value_scroll + i).map_or("", String::as_str));
        }
    }

    fn release(&mut self) {
        // Dropping the subscription unregisters it.
        self.state = LiveState::Unmounted;
    }
}

impl<P: SensorPlatform> Page for SensorDetailPage<P> {
    fn id(&self) -> PageId {
        PageId::SensorDetail
    }

    fn title(&self) -> &str {
        self.descriptor.name()
    }

    fn on_activate(&mut self) {
        self.release();
        self.values.clear();
        self.value_scroll = 0;
        self.sync_value_rows();

        self.state = match Subscription::subscribe(
            &self.platform,
            self.descriptor.sensor_type(),
            DeliveryRate::Ui,
        ) {
            Some(subscription) => LiveState::Subscribed(subscription),
            None => LiveState::Waiting,
        };
        self.dirty = true;
    }

    fn on_deactivate(&mut self) {
        self.release();
    }

    fn handle_touch(&mut self, event: TouchEvent) -> Option<Action> {
        let result = self.back_button.handle_touch(event);
        if self.back_button.is_dirty() {
            self.dirty = true;
        }
        match result {
            TouchResult::Action(action) => Some(action),
            TouchResult::Handled | TouchResult::NotHandled => None,
        }
    }

    fn scroll(&mut self, rows: i32) {
        let target = (self.value_scroll as i64 + rows as i64).max(0) as usize;
        let clamped = target.min(self.max_value_scroll());
        if clamped != self.value_scroll {
            self.value_scroll = clamped;
            self.sync_value_rows();
        }
    }

    fn update(&mut self) {
        let latest = match &self.state {
            LiveState::Subscribed(subscription) => subscription.latest(),
            LiveState::Unmounted | LiveState::Waiting => None,
        };

        if let Some(event) = latest {
            debug!(
                "'{}' reading: {:?}",
                self.descriptor.name(),
                event.values
            );
            self.values = event.values;
            self.sync_value_rows();
        }
    }

    fn draw_page<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        if self.dirty {
            Drawable::draw(self, display)?;
        } else {
            for row in self.value_rows.iter().filter(|row| row.is_dirty()) {
                row.draw(display)?;
            }
        }
        Drawable::mark_clean(self);
        Ok(())
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

impl<P: SensorPlatform> Drawable for SensorDetailPage<P> {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        self.bounds
            .into_styled(PrimitiveStyle::with_fill(theme::BACKGROUND))
            .draw(display)?;

        let left = self.bounds.top_left.x + PAGE_MARGIN_PX;
        let width = self.bounds.size.width.saturating_sub(2 * PAGE_MARGIN_PX as u32);

        // Title bar: back button and sensor name
        self.back_button.draw(display)?;
        let title_left = self.back_button.bounds().top_left.x + BACK_BUTTON_WIDTH_PX as i32 + 8;
        let title_top = self.bounds.top_left.y
            + (TITLE_BAR_HEIGHT_PX - TextSize::Medium.char_height()) as i32 / 2;
        TextComponent::new(
            Rectangle::new(
                Point::new(title_left, title_top),
                Size::new(
                    (self.bounds.size.width as i32 - title_left - PAGE_MARGIN_PX).max(0) as u32,
                    TextSize::Medium.char_height(),
                ),
            ),
            self.descriptor.name(),
            TextSize::Medium,
        )
        .draw(display)?;

        // Static attributes
        let mut y = self.bounds.top_left.y + TITLE_BAR_HEIGHT_PX as i32 + SECTION_GAP_PX;
        for line in self.header_lines() {
            TextComponent::new(
                Rectangle::new(Point::new(left, y), Size::new(width, TEXT_ROW_HEIGHT_PX)),
                &line,
                TextSize::Medium,
            )
            .with_color(theme::MUTED)
            .draw(display)?;
            y += TEXT_ROW_HEIGHT_PX as i32;
        }

        y += SECTION_GAP_PX;
        Line::new(Point::new(left, y), Point::new(left + width as i32, y))
            .into_styled(PrimitiveStyle::with_stroke(theme::DIVIDER, 1))
            .draw(display)?;
        y += SECTION_GAP_PX;

        // Live values
        TextComponent::new(
            Rectangle::new(Point::new(left, y), Size::new(width, TEXT_ROW_HEIGHT_PX)),
            LIVE_VALUES_HEADING,
            TextSize::Medium,
        )
        .draw(display)?;

        for row in &self.value_rows {
            row.draw(display)?;
        }

        Ok(())
    }

    fn bounds(&self) -> Rectangle {
        self.bounds
    }

    fn is_dirty(&self) -> bool {
        self.dirty
            || self.back_button.is_dirty()
            || self.value_rows.iter().any(|row| row.is_dirty())
    }

    fn mark_clean(&mut self) {
        self.dirty = false;
        self.back_button.mark_clean();
        for row in &mut self.value_rows {
            row.mark_clean();
        }
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
        self.back_button.mark_dirty();
    }
}

/// Top edge of the first value row: title bar, attribute lines, divider and
/// the "Live Values:" heading come first.
fn value_rows_top(bounds: Rectangle) -> i32 {
    bounds.top_left.y
        + TITLE_BAR_HEIGHT_PX as i32
        + SECTION_GAP_PX
        + HEADER_LINE_COUNT * TEXT_ROW_HEIGHT_PX as i32
        + 2 * SECTION_GAP_PX
        + TEXT_ROW_HEIGHT_PX as i32
        + 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::test_display::CountingDisplay;
    use crate::sensors::{SensorKind, VirtualSensorPlatform};
    use crate::ui::{TouchPoint, screen_bounds};

    fn platform() -> Arc<VirtualSensorPlatform> {
        Arc::new(VirtualSensorPlatform::with_default_catalog())
    }

    fn accelerometer_page(
        platform: &Arc<VirtualSensorPlatform>,
    ) -> SensorDetailPage<VirtualSensorPlatform> {
        let info = platform
            .default_sensor(SensorKind::Accelerometer.type_id())
            .unwrap();
        let payload = SensorDescriptor::from(&info).encode().unwrap();
        SensorDetailPage::new(screen_bounds(), platform.clone(), &payload).unwrap()
    }

    fn accelerometer_handle(platform: &VirtualSensorPlatform) -> crate::sensors::SensorHandle {
        platform
            .default_sensor(SensorKind::Accelerometer.type_id())
            .unwrap()
            .handle
    }

    #[test]
    fn test_format_value_keeps_fraction() {
        assert_eq!(format_value(1.0), "1.0");
        assert_eq!(format_value(9.81), "9.81");
        assert_eq!(format_value(-0.5), "-0.5");
        assert_eq!(format_value(0.0), "0.0");
        assert_eq!(format_value(-0.0), "-0.0");
        assert_eq!(format_value(0.001), "0.001");
        assert_eq!(format_value(1_000_000.0), "1000000.0");
    }

    #[test]
    fn test_format_value_scientific_outside_plain_range() {
        assert_eq!(format_value(1e-4), "1.0E-4");
        assert_eq!(format_value(5.96e-8), "5.96E-8");
        assert_eq!(format_value(1e7), "1.0E7");
        assert_eq!(format_value(12_345_678.0), "1.2345678E7");
        assert_eq!(format_value(-2.5e-5), "-2.5E-5");
    }

    #[test]
    fn test_format_value_non_finite() {
        assert_eq!(format_value(f32::NAN), "NaN");
        assert_eq!(format_value(f32::INFINITY), "Infinity");
        assert_eq!(format_value(f32::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_header_lines() {
        let d = SensorDescriptor::new("Baro", "Bosch", 6, 3, 0.5, 0.01, 1100.0);
        let page = SensorDetailPage::from_descriptor(screen_bounds(), platform(), d);
        assert_eq!(
            page.header_lines(),
            vec![
                "Vendor: Bosch",
                "Type: 6",
                "Version: 3",
                "Power: 0.5 mA",
                "Resolution: 0.01",
                "Max Range: 1100.0",
            ]
        );
        assert_eq!(page.title(), "Baro");
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        let result = SensorDetailPage::new(screen_bounds(), platform(), "%7B%22name%22");
        assert!(matches!(result, Err(DecodeError::Malformed { .. })));

        let result = SensorDetailPage::new(screen_bounds(), platform(), "");
        assert!(matches!(result, Err(DecodeError::MissingPayload)));
    }

    #[test]
    fn test_waiting_before_first_event() {
        let platform = platform();
        let mut page = accelerometer_page(&platform);
        assert_eq!(page.lifecycle(), Lifecycle::Unmounted);

        page.on_activate();
        page.update();
        assert_eq!(page.lifecycle(), Lifecycle::Subscribed);
        assert!(page.values().is_empty());
        assert_eq!(page.value_lines(), vec![WAITING_TEXT]);
    }

    #[test]
    fn test_latest_event_replaces_values() {
        let platform = platform();
        let handle = accelerometer_handle(&platform);
        let mut page = accelerometer_page(&platform);
        page.on_activate();

        platform.deliver(handle, &[1.0, 2.0, 3.0]);
        page.update();
        assert_eq!(
            page.value_lines(),
            vec!["Value[0]: 1.0", "Value[1]: 2.0", "Value[2]: 3.0"]
        );

        platform.deliver(handle, &[9.0]);
        page.update();
        assert_eq!(page.value_lines(), vec!["Value[0]: 9.0"]);
        assert_eq!(page.values(), &[9.0]);
    }

    #[test]
    fn test_update_without_new_event_keeps_values() {
        let platform = platform();
        let handle = accelerometer_handle(&platform);
        let mut page = accelerometer_page(&platform);
        page.on_activate();

        platform.deliver(handle, &[4.0, 5.0, 6.0]);
        page.update();
        Page::mark_clean(&mut page);

        page.update();
        assert_eq!(page.values(), &[4.0, 5.0, 6.0]);
        assert!(!Page::is_dirty(&page));
    }

    #[test]
    fn test_activate_deactivate_registers_and_releases_once() {
        let platform = platform();
        let mut page = accelerometer_page(&platform);

        page.on_activate();
        assert_eq!(platform.registration_count(), 1);

        page.on_deactivate();
        assert_eq!(page.lifecycle(), Lifecycle::Unmounted);
        assert_eq!(platform.unregistration_count(), 1);

        // A second deactivate has nothing left to release.
        page.on_deactivate();
        assert_eq!(platform.unregistration_count(), 1);

        page.on_activate();
        assert_eq!(platform.registration_count(), 2);
        assert_eq!(platform.active_listener_count(), 1);
    }

    #[test]
    fn test_reactivation_resets_values() {
        let platform = platform();
        let handle = accelerometer_handle(&platform);
        let mut page = accelerometer_page(&platform);

        page.on_activate();
        platform.deliver(handle, &[1.0, 2.0, 3.0]);
        page.update();
        page.on_deactivate();

        page.on_activate();
        assert!(page.values().is_empty());
    }

    #[test]
    fn test_drop_releases_subscription() {
        let platform = platform();
        let mut page = accelerometer_page(&platform);
        page.on_activate();
        drop(page);

        assert_eq!(platform.unregistration_count(), 1);
        assert_eq!(platform.active_listener_count(), 0);
    }

    #[test]
    fn test_unresolvable_type_waits_forever() {
        let platform = platform();
        let d = SensorDescriptor::new("Ghost", "Nobody", 4_242, 1, 0.0, 1.0, 1.0);
        let mut page = SensorDetailPage::from_descriptor(screen_bounds(), platform.clone(), d);

        page.on_activate();
        platform.tick(embassy_time::Duration::from_secs(1));
        page.update();

        assert_eq!(page.lifecycle(), Lifecycle::Waiting);
        assert_eq!(page.value_lines(), vec![WAITING_TEXT]);
        assert_eq!(platform.registration_count(), 0);

        page.on_deactivate();
        assert_eq!(platform.unregistration_count(), 0);
    }

    #[test]
    fn test_back_button_yields_go_back() {
        let mut page = accelerometer_page(&platform());
        let action = page.handle_touch(TouchEvent::Press(TouchPoint::new(10, 10)));
        assert_eq!(action, Some(Action::GoBack));

        let action = page.handle_touch(TouchEvent::Press(TouchPoint::new(200, 200)));
        assert_eq!(action, None);
    }

    fn numbered(count: usize) -> Vec<f32> {
        (0..count).map(|i| i as f32).collect()
    }

    #[test]
    fn test_value_rows_fit_below_heading() {
        let page = accelerometer_page(&platform());
        assert_eq!(page.value_rows.len(), 9);
        assert_eq!(page.visible_value_lines(), vec![WAITING_TEXT]);
    }

    #[test]
    fn test_long_value_vector_shows_first_rows() {
        let platform = platform();
        let handle = accelerometer_handle(&platform);
        let mut page = accelerometer_page(&platform);
        page.on_activate();

        platform.deliver(handle, &numbered(16));
        page.update();

        let expected: Vec<String> = (0..9).map(|i| format!("Value[{i}]: {i}.0")).collect();
        assert_eq!(page.visible_value_lines(), expected);
        assert_eq!(page.value_lines().len(), 16);
    }

    #[test]
    fn test_scroll_reveals_remaining_values() {
        let platform = platform();
        let handle = accelerometer_handle(&platform);
        let mut page = accelerometer_page(&platform);
        page.on_activate();

        platform.deliver(handle, &numbered(16));
        page.update();

        page.scroll(100);
        assert_eq!(page.value_scroll(), 7);
        let expected: Vec<String> = (7..16).map(|i| format!("Value[{i}]: {i}.0")).collect();
        assert_eq!(page.visible_value_lines(), expected);

        page.scroll(-100);
        assert_eq!(page.value_scroll(), 0);
        assert_eq!(page.visible_value_lines()[0], "Value[0]: 0.0");
    }

    #[test]
    fn test_shorter_event_clears_stale_rows_and_scroll() {
        let platform = platform();
        let handle = accelerometer_handle(&platform);
        let mut page = accelerometer_page(&platform);
        page.on_activate();

        platform.deliver(handle, &numbered(16));
        page.update();
        page.scroll(5);

        platform.deliver(handle, &[1.5, 2.5, 3.5]);
        page.update();
        assert_eq!(page.value_scroll(), 0);
        assert_eq!(
            page.visible_value_lines(),
            vec!["Value[0]: 1.5", "Value[1]: 2.5", "Value[2]: 3.5"]
        );
    }

    #[test]
    fn test_scroll_without_overflow_is_noop() {
        let platform = platform();
        let handle = accelerometer_handle(&platform);
        let mut page = accelerometer_page(&platform);
        page.on_activate();
        platform.deliver(handle, &[1.0, 2.0, 3.0]);
        page.update();
        Page::mark_clean(&mut page);

        page.scroll(3);
        assert_eq!(page.value_scroll(), 0);
        assert!(!Page::is_dirty(&page));
    }

    #[test]
    fn test_new_reading_redraws_only_value_rows() {
        let platform = platform();
        let handle = accelerometer_handle(&platform);
        let mut page = accelerometer_page(&platform);
        page.on_activate();

        let mut full = CountingDisplay::default();
        page.draw_page(&mut full).unwrap();
        assert!(!Page::is_dirty(&page));

        platform.deliver(handle, &[1.0, 2.0, 3.0]);
        page.update();
        assert!(Page::is_dirty(&page));

        let mut partial = CountingDisplay::default();
        page.draw_page(&mut partial).unwrap();
        assert!(partial.pixels > 0);
        assert!(partial.pixels < full.pixels);
        assert!(!Page::is_dirty(&page));
    }
}
