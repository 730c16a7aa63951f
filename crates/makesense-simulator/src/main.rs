//! Desktop simulator for the makesense sensor browser.
//!
//! Renders makesense-core pages in an SDL2 window via
//! `embedded-graphics-simulator`. A [`VirtualSensorPlatform`] stands in for
//! the phone's sensor service and delivers readings from a background thread.
//!
//! # Key bindings
//!
//! | Key              | Action                 |
//! |------------------|------------------------|
//! | Up / Down        | Scroll list or values  |
//! | PageUp / PageDown| Scroll by a screen     |
//! | Backspace / Left | Back                   |
//! | Q / Escape       | Quit                   |
//!
//! Mouse clicks are forwarded as touch events.
//!
//! # Configuration
//!
//! `.env` is loaded first (so `RUST_LOG` may live there). If
//! `MAKESENSE_CONFIG` names a JSON file it is read as an [`AppConfig`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use log::{error, info, warn};

use makesense_core::config::AppConfig;
use makesense_core::pages::PageManager;
use makesense_core::sensors::{SensorPlatform, VirtualSensorPlatform};
use makesense_core::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX, TouchEvent, TouchPoint, screen_bounds};

/// Environment variable naming the JSON config file.
const CONFIG_ENV: &str = "MAKESENSE_CONFIG";

/// Interval at which the virtual platform checks for due deliveries.
const PLATFORM_TICK: Duration = Duration::from_millis(10);

/// Rows moved by PageUp / PageDown.
const PAGE_SCROLL_ROWS: i32 = 6;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

fn load_config() -> AppConfig {
    let Ok(path) = std::env::var(CONFIG_ENV) else {
        return AppConfig::default();
    };

    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => {
            warn!("Cannot read {}: {}, using defaults", path, e);
            return AppConfig::default();
        }
    };

    match AppConfig::from_json(&text) {
        Ok(config) => {
            info!("Loaded config from {}", path);
            config
        }
        Err(e) => {
            warn!("Invalid config {}: {}, using defaults", path, e);
            AppConfig::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor delivery thread
// ---------------------------------------------------------------------------

/// Drives [`VirtualSensorPlatform::tick`] off the UI thread, the way a real
/// sensor service calls listeners outside the render pass.
struct PlatformDriver {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl PlatformDriver {
    fn spawn(platform: Arc<VirtualSensorPlatform>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = stop.clone();

        let handle = thread::spawn(move || {
            let mut last = Instant::now();
            while !thread_stop.load(Ordering::Relaxed) {
                thread::sleep(PLATFORM_TICK);
                let now = Instant::now();
                let elapsed = embassy_time::Duration::from_micros(
                    now.duration_since(last).as_micros() as u64,
                );
                last = now;
                platform.tick(elapsed);
            }
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }
}

impl Drop for PlatformDriver {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Sensor delivery thread panicked");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();
    info!("Starting makesense simulator");

    let config = load_config();
    info!(
        "Display: {}×{} (scale {}×)",
        DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX, config.display.scale
    );
    info!("Keys: Up/Down=Scroll  Backspace=Back  Q=Quit");

    let platform = Arc::new(VirtualSensorPlatform::with_default_catalog());
    info!("Platform exposes {} sensors", platform.sensor_list().len());
    let driver = PlatformDriver::spawn(platform.clone());

    let mut manager = PageManager::new(platform.clone(), screen_bounds());
    if let Some(link) = config.deep_link.as_deref() {
        match manager.open_deep_link(link) {
            Ok(_) => info!("Opened deep link {}", link),
            Err(e) => warn!("Ignoring deep link: {}", e),
        }
    }

    // SDL2 display and window
    let mut display = SimulatorDisplay::<Rgb565>::new(Size::new(
        DISPLAY_WIDTH_PX as u32,
        DISPLAY_HEIGHT_PX as u32,
    ));
    let output_settings = OutputSettingsBuilder::new()
        .scale(config.display.scale)
        .build();
    let mut window = Window::new("makesense", &output_settings);
    let frame_duration = Duration::from_millis(config.display.frame_interval_ms);

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    let _ = display.clear(Rgb565::BLACK);
    if let Err(e) = manager.draw(&mut display) {
        error!("Draw error: {:?}", e);
    }
    window.update(&display);

    // -----------------------------------------------------------------------
    // Main loop
    // -----------------------------------------------------------------------
    'running: loop {
        let frame_start = Instant::now();

        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,

                SimulatorEvent::KeyDown { keycode, .. } => {
                    if keycode == Keycode::Q || keycode == Keycode::Escape {
                        break 'running;
                    }

                    if keycode == Keycode::Backspace || keycode == Keycode::Left {
                        manager.go_back();
                    } else if keycode == Keycode::Up {
                        manager.scroll(-1);
                    } else if keycode == Keycode::Down {
                        manager.scroll(1);
                    } else if keycode == Keycode::PageUp {
                        manager.scroll(-PAGE_SCROLL_ROWS);
                    } else if keycode == Keycode::PageDown {
                        manager.scroll(PAGE_SCROLL_ROWS);
                    }
                }

                SimulatorEvent::MouseButtonDown { point, .. } => {
                    let touch = TouchEvent::Press(TouchPoint::new(
                        point.x.max(0) as u16,
                        point.y.max(0) as u16,
                    ));

                    if let Some(action) = manager.handle_touch(touch) {
                        info!("Touch → {:?}", action);
                        manager.apply(action);
                    }
                }

                _ => {}
            }
        }

        // --- Pick up readings delivered since the last frame --------------
        manager.update();

        // --- Render -------------------------------------------------------
        if manager.is_dirty() {
            let _ = display.clear(Rgb565::BLACK);
            if let Err(e) = manager.draw(&mut display) {
                error!("Draw error: {:?}", e);
            }
        }

        window.update(&display);

        // --- Frame pacing -------------------------------------------------
        let elapsed = frame_start.elapsed();
        if elapsed < frame_duration {
            thread::sleep(frame_duration - elapsed);
        }
    }

    // Pages go first so their subscriptions are released while the platform
    // is still being driven.
    drop(manager);
    drop(driver);
    info!(
        "Simulator exiting ({} registrations, {} released)",
        platform.registration_count(),
        platform.unregistration_count()
    );
}
