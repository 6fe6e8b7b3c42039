//! Grid placement of barcode images onto pages
//!
//! Images fill each row left to right and rows top to bottom. Every image
//! shares one draw box whose height comes from the aspect ratio of the
//! first resolvable item. Groups of different items are separated by a
//! forced row break and a horizontal rule, except where that row break
//! also starts a new page.

use super::types::*;
use crate::catalog::ImageResolver;
use crate::items::{Item, ItemList};
use crate::options::LayoutOptions;
use crate::types::*;
use log::{debug, info, warn};

/// Fixed page geometry for one layout run, in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Geometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub draw_width: f32,
    pub draw_height: f32,
    pub column_gap: f32,
    pub row_gap: f32,
}

impl Geometry {
    pub fn new(options: &LayoutOptions, aspect_ratio: f32) -> Self {
        let (page_width, page_height) = options.page_dimensions_mm();
        Self {
            page_width,
            page_height,
            margin_top: options.margins.top_mm,
            margin_bottom: options.margins.bottom_mm,
            margin_left: options.margins.left_mm,
            margin_right: options.margins.right_mm,
            draw_width: options.image_width_mm,
            draw_height: options.image_width_mm * aspect_ratio,
            column_gap: options.column_gap_mm,
            row_gap: options.row_gap_mm,
        }
    }

    /// Cursor position for the first image on a fresh page
    pub fn origin(&self) -> Cursor {
        Cursor {
            x: self.margin_left,
            y: self.page_height - self.margin_top - self.draw_height,
        }
    }

    pub fn printable_area(&self) -> Rect {
        Rect::new(
            self.margin_left,
            self.margin_bottom,
            self.page_width - self.margin_left - self.margin_right,
            self.page_height - self.margin_top - self.margin_bottom,
        )
    }
}

/// Next placement position: left edge of the next image and bottom edge
/// of the current row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Cursor {
    pub x: f32,
    pub y: f32,
}

impl Cursor {
    fn overflows_row(&self, geometry: &Geometry) -> bool {
        self.x + geometry.draw_width > geometry.page_width - geometry.margin_right
    }

    fn overflows_page(&self, geometry: &Geometry) -> bool {
        self.y < geometry.margin_bottom
    }

    fn at_row_start(&self, geometry: &Geometry) -> bool {
        self.x == geometry.margin_left
    }

    fn wrap(&mut self, geometry: &Geometry) {
        self.x = geometry.margin_left;
        self.y -= geometry.draw_height + geometry.row_gap;
    }

    fn advance(&mut self, geometry: &Geometry) {
        self.x += geometry.draw_width + geometry.column_gap;
    }
}

/// Owns the cursor and the pages produced so far for a single layout run
struct PageBuilder {
    geometry: Geometry,
    cursor: Cursor,
    current: SheetPage,
    pages: Vec<SheetPage>,
}

impl PageBuilder {
    fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            cursor: geometry.origin(),
            current: SheetPage::default(),
            pages: Vec::new(),
        }
    }

    fn break_page(&mut self) {
        debug!(
            "Page {} full with {} images",
            self.pages.len() + 1,
            self.current.images.len()
        );
        self.pages.push(std::mem::take(&mut self.current));
        self.cursor = self.geometry.origin();
    }

    fn place(&mut self, id: &str) {
        if self.cursor.overflows_row(&self.geometry) {
            self.cursor.wrap(&self.geometry);
        }
        if self.cursor.overflows_page(&self.geometry) {
            self.break_page();
        }

        self.current.images.push(PlacedImage {
            id: id.to_string(),
            rect: Rect::new(
                self.cursor.x,
                self.cursor.y,
                self.geometry.draw_width,
                self.geometry.draw_height,
            ),
        });
        self.cursor.advance(&self.geometry);
    }

    /// Close a group: start a fresh row and rule it off from the previous
    /// one. When the fresh row falls off the page the rule is dropped.
    fn end_group(&mut self) {
        if !self.cursor.at_row_start(&self.geometry) {
            self.cursor.wrap(&self.geometry);
        }

        if self.cursor.overflows_page(&self.geometry) {
            self.break_page();
            return;
        }

        let geometry = &self.geometry;
        self.current.separators.push(Separator {
            y: self.cursor.y + geometry.draw_height + geometry.row_gap / 2.0,
            x_start: geometry.margin_left,
            x_end: geometry.page_width - geometry.margin_right,
        });
    }

    fn finish(mut self) -> Vec<SheetPage> {
        self.pages.push(self.current);
        self.pages
    }
}

/// Lay out every instance of every item onto pages.
///
/// Items whose image cannot be resolved are skipped and reported in
/// [`LayoutOutput::skipped`]. Fails with [`LayoutError::InvalidQuantity`]
/// before resolving anything if any quantity is zero, and with
/// [`LayoutError::NoRenderableInput`] if no item resolves.
pub fn layout(
    items: &ItemList,
    resolver: &impl ImageResolver,
    options: &LayoutOptions,
) -> Result<LayoutOutput> {
    options.validate()?;

    if let Some(item) = items.iter().find(|item| item.quantity == 0) {
        return Err(LayoutError::InvalidQuantity {
            id: item.id.clone(),
            quantity: 0,
        });
    }

    let (groups, skipped) = resolve_items(items, resolver);
    let Some((_, first_size)) = groups.first() else {
        return Err(LayoutError::NoRenderableInput);
    };

    let geometry = Geometry::new(options, first_size.aspect_ratio());
    let printable = geometry.printable_area();
    if geometry.draw_height > printable.height {
        return Err(LayoutError::Config(format!(
            "Image height {:.1} mm exceeds printable height {:.1} mm",
            geometry.draw_height, printable.height
        )));
    }

    let mut builder = PageBuilder::new(geometry);
    let last = groups.len() - 1;
    for (index, (item, _)) in groups.iter().enumerate() {
        for _ in 0..item.quantity {
            builder.place(&item.id);
        }
        if index != last {
            builder.end_group();
        }
    }

    let document = SheetDocument {
        title: options.title.clone(),
        page_width_mm: geometry.page_width,
        page_height_mm: geometry.page_height,
        margins: options.margins,
        pages: builder.finish(),
    };

    info!(
        "Laid out {} images on {} pages ({} skipped)",
        document.placed_images(),
        document.pages.len(),
        skipped.len()
    );

    Ok(LayoutOutput { document, skipped })
}

/// Split items into those with a usable image and the identifiers to skip
fn resolve_items<'a>(
    items: &'a ItemList,
    resolver: &impl ImageResolver,
) -> (Vec<(&'a Item, ImageSize)>, Vec<String>) {
    let mut groups = Vec::new();
    let mut skipped = Vec::new();

    for item in items {
        match resolver.resolve(&item.id) {
            Ok(size) if !size.is_empty() => groups.push((item, size)),
            Ok(size) => {
                warn!(
                    "Skipping '{}': image has no pixels ({}x{})",
                    item.id, size.width_px, size.height_px
                );
                skipped.push(item.id.clone());
            }
            Err(e) => {
                warn!("Skipping '{}': {}", item.id, e);
                skipped.push(item.id.clone());
            }
        }
    }

    (groups, skipped)
}
