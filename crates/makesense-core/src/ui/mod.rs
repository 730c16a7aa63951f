//! Drawing and input primitives shared by every page.
//!
//! - Core traits for drawable and touchable elements
//! - Text and button components
//! - Display dimensions and the color palette

pub mod components;
pub mod core;
pub mod theme;

pub use components::{Button, TextComponent, TextSize};
pub use self::core::{
    Action, DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX, Drawable, PageId, TouchEvent, TouchPoint,
    TouchResult, Touchable, screen_bounds,
};
