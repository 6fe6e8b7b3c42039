//! Shared constants for sheet layout and rendering

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

// =============================================================================
// Default Layout
// =============================================================================

/// Width every barcode image is drawn at
pub const DEFAULT_IMAGE_WIDTH_MM: f32 = 45.0;

/// Margin on each side of the sheet
pub const DEFAULT_MARGIN_MM: f32 = 10.0;

/// Horizontal gap between images in a row
pub const DEFAULT_COLUMN_GAP_MM: f32 = 2.0;

/// Vertical gap between rows
pub const DEFAULT_ROW_GAP_MM: f32 = 5.0;

/// Directory scanned for barcodes when nothing else is configured
pub const DEFAULT_BARCODE_DIR: &str = "barcode_images";

/// File extensions recognised as barcode images (lowercase)
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

// =============================================================================
// Separators
// =============================================================================

/// Gray level of the rule drawn between item groups
pub const SEPARATOR_GRAY: f32 = 0.7;

/// Line width of the rule drawn between item groups (points)
pub const SEPARATOR_LINE_WIDTH: f32 = 0.5;

// =============================================================================
// Title
// =============================================================================

/// Font size for the page header (points)
pub const TITLE_FONT_SIZE: f32 = 10.0;

/// Approximate character width ratio for Helvetica
pub const HELVETICA_CHAR_WIDTH_RATIO: f32 = 0.5;
