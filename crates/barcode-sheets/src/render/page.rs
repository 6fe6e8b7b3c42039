//! Output page rendering
//!
//! Builds the content stream for one sheet: placed images, group
//! separators and the title header.

use super::font::TitleText;
use crate::constants::{SEPARATOR_GRAY, SEPARATOR_LINE_WIDTH, TITLE_FONT_SIZE, mm_to_pt};
use crate::layout::{Rect, Separator, SheetDocument, SheetPage};
use crate::types::{LayoutError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Resources shared by every page of the output
pub(crate) struct SharedResources {
    /// Item identifier to (XObject name, object id)
    pub images: HashMap<String, (String, ObjectId)>,
    /// Absent for untitled documents
    pub title: Option<TitleText>,
}

/// Render one sheet to the output document and return the page object id.
pub(crate) fn render_page(
    output: &mut Document,
    document: &SheetDocument,
    page: &SheetPage,
    resources: &SharedResources,
    parent_pages_id: ObjectId,
) -> Result<ObjectId> {
    let width_pt = mm_to_pt(document.page_width_mm);
    let height_pt = mm_to_pt(document.page_height_mm);

    let mut content_ops = Vec::new();
    let mut xobjects = Dictionary::new();

    for placed in &page.images {
        let (name, id) = resources.images.get(&placed.id).ok_or_else(|| {
            LayoutError::ImageResolution {
                id: placed.id.clone(),
                reason: "image was not embedded".to_string(),
            }
        })?;
        xobjects.set(name.as_bytes(), Object::Reference(*id));
        content_ops.push(image_command(name, &placed.rect));
    }

    for separator in &page.separators {
        content_ops.push(separator_command(separator));
    }

    let mut page_resources = Dictionary::new();
    page_resources.set("XObject", Object::Dictionary(xobjects));

    if let Some(title) = &resources.title {
        content_ops.push(title_command(title, document, width_pt, height_pt));

        let mut fonts = Dictionary::new();
        fonts.set("F1", Object::Reference(title.font_id));
        page_resources.set("Font", Object::Dictionary(fonts));
    }

    let content = content_ops.join("");
    let content_id = output.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(parent_pages_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(width_pt),
            Object::Real(height_pt),
        ]),
    );
    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(page_resources));

    Ok(output.add_object(page_dict))
}

/// Image XObjects are drawn in the unit square, so the box is the matrix.
fn image_command(xobject_name: &str, rect: &Rect) -> String {
    format!(
        "q {} 0 0 {} {} {} cm /{} Do Q\n",
        mm_to_pt(rect.width),
        mm_to_pt(rect.height),
        mm_to_pt(rect.x),
        mm_to_pt(rect.y),
        xobject_name
    )
}

fn separator_command(separator: &Separator) -> String {
    let y = mm_to_pt(separator.y);
    format!(
        "q {gray} {gray} {gray} RG {width} w {} {y} m {} {y} l S Q\n",
        mm_to_pt(separator.x_start),
        mm_to_pt(separator.x_end),
        gray = SEPARATOR_GRAY,
        width = SEPARATOR_LINE_WIDTH,
    )
}

/// Title centered horizontally inside the top margin
fn title_command(
    title: &TitleText,
    document: &SheetDocument,
    width_pt: f32,
    height_pt: f32,
) -> String {
    let x = ((width_pt - title.width_pt) / 2.0).max(0.0);
    let y = height_pt - mm_to_pt(document.margins.top_mm) / 2.0 - TITLE_FONT_SIZE / 3.0;
    format!(
        "BT /F1 {} Tf {} {} Td {} Tj ET\n",
        TITLE_FONT_SIZE, x, y, title.operand
    )
}
