//! Layout data types
//!
//! All coordinates are in millimeters with the origin at the bottom-left
//! corner of the page, matching PDF user space before unit conversion.

use crate::types::Margins;

/// A rectangular area in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (bottom edge)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Whether the interiors of two rectangles intersect
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.top()
            && other.y < self.top()
    }

    /// Whether `other` lies entirely inside this rectangle
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.top() <= self.top()
    }
}

/// One instance of an item drawn on a page
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedImage {
    /// Identifier of the item this instance belongs to
    pub id: String,
    pub rect: Rect,
}

/// Horizontal rule separating two item groups
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Separator {
    pub y: f32,
    pub x_start: f32,
    pub x_end: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetPage {
    pub images: Vec<PlacedImage>,
    pub separators: Vec<Separator>,
}

/// A laid-out document, ready to be serialized
#[derive(Debug, Clone, PartialEq)]
pub struct SheetDocument {
    /// Header printed on every page
    pub title: String,
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margins: Margins,
    pub pages: Vec<SheetPage>,
}

impl SheetDocument {
    pub fn placed_images(&self) -> usize {
        self.pages.iter().map(|page| page.images.len()).sum()
    }

    pub fn separators(&self) -> usize {
        self.pages.iter().map(|page| page.separators.len()).sum()
    }

    /// Distinct item identifiers in first-placement order
    pub fn image_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for image in self.pages.iter().flat_map(|page| &page.images) {
            if !ids.contains(&image.id.as_str()) {
                ids.push(&image.id);
            }
        }
        ids
    }
}

/// Result of a layout run
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOutput {
    pub document: SheetDocument,
    /// Identifiers dropped because their image could not be resolved,
    /// in input order
    pub skipped: Vec<String>,
}
