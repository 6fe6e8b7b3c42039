//! PDF rendering of laid-out sheets
//!
//! - Embedding each distinct barcode image once as an image XObject
//! - Choosing and embedding the title font
//! - Building one output page per sheet
//! - Assembling the page tree, catalog and document info

mod font;
mod page;
mod xobject;

pub use xobject::embed_image;

use crate::catalog::ImageSource;
use crate::layout::SheetDocument;
use crate::types::Result;
use font::prepare_title;
use lopdf::{Dictionary, Document, Object, StringFormat};
use page::{SharedResources, render_page};
use std::collections::HashMap;

/// Render a laid-out document to PDF, loading each placed image from `images`.
pub fn render_document(document: &SheetDocument, images: &dyn ImageSource) -> Result<Document> {
    let mut output = Document::with_version("1.7");
    let pages_tree_id = output.new_object_id();

    let mut embedded = HashMap::new();
    for (index, id) in document.image_ids().into_iter().enumerate() {
        let object_id = embed_image(&mut output, &images.load(id)?)?;
        embedded.insert(id.to_string(), (format!("Im{}", index), object_id));
    }
    let title = if document.title.is_empty() {
        None
    } else {
        Some(prepare_title(&mut output, &document.title)?)
    };
    let resources = SharedResources {
        images: embedded,
        title,
    };

    let mut page_refs = Vec::new();
    for page in &document.pages {
        let page_id = render_page(&mut output, document, page, &resources, pages_tree_id)?;
        page_refs.push(Object::Reference(page_id));
    }

    // Create pages tree
    let count = page_refs.len() as i64;
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(page_refs)),
        ("Count", Object::Integer(count)),
    ]);
    output
        .objects
        .insert(pages_tree_id, Object::Dictionary(pages_dict));

    // Create catalog
    let catalog_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_tree_id)),
    ]));
    output.trailer.set("Root", catalog_id);

    if !document.title.is_empty() {
        let info_id = output.add_object(Dictionary::from_iter(vec![(
            "Title",
            Object::String(utf16_text(&document.title), StringFormat::Hexadecimal),
        )]));
        output.trailer.set("Info", info_id);
    }

    Ok(output)
}

/// Text string with a UTF-16BE byte order mark, as used by the info dictionary
fn utf16_text(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    bytes
}
