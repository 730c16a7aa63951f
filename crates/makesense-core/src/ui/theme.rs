//! Color palette shared by all pages.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

pub const BACKGROUND: Rgb565 = Rgb565::BLACK;
pub const FOREGROUND: Rgb565 = Rgb565::WHITE;
/// Secondary text such as vendor names.
pub const MUTED: Rgb565 = Rgb565::new(20, 40, 20);
pub const ACCENT: Rgb565 = Rgb565::new(4, 40, 28);
pub const ACCENT_PRESSED: Rgb565 = Rgb565::new(2, 24, 16);
pub const ERROR: Rgb565 = Rgb565::RED;
pub const DIVIDER: Rgb565 = Rgb565::new(8, 16, 8);
