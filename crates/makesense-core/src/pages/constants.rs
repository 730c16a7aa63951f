//! Shared layout constants for page components

/// Title bar height in pixels
pub const TITLE_BAR_HEIGHT_PX: u32 = 28;

/// Height of one sensor row on the list page
pub const LIST_ROW_HEIGHT_PX: u32 = 32;

/// Standard text row height for small/medium font in pixels
pub const TEXT_ROW_HEIGHT_PX: u32 = 12;

/// Horizontal page margin in pixels
pub const PAGE_MARGIN_PX: i32 = 8;

/// Gap between the header block and the live values block
pub const SECTION_GAP_PX: i32 = 6;

/// Back button size
pub const BACK_BUTTON_WIDTH_PX: u32 = 56;
pub const BACK_BUTTON_HEIGHT_PX: u32 = 20;

/// Maximum depth of the navigation stack
pub const MAX_NAV_DEPTH: usize = 8;
