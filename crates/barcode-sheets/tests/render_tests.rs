use barcode_sheets::*;
use image::DynamicImage;
use lopdf::{Document, Object};
use std::collections::HashMap;
use std::path::Path;

fn write_png(dir: &Path, name: &str, width: u32, height: u32) {
    image::RgbaImage::from_pixel(width, height, image::Rgba([0, 0, 0, 255]))
        .save(dir.join(name))
        .unwrap();
}

/// A noisy image, so the encoded pixel data is large enough to cut in half
fn write_truncated_png(dir: &Path, name: &str) {
    let path = dir.join(name);
    image::RgbImage::from_fn(200, 100, |x, y| {
        image::Rgb([x as u8, y as u8, (x ^ y).wrapping_mul(31) as u8])
    })
    .save(&path)
    .unwrap();
    let bytes = std::fs::read(&path).unwrap();
    std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();
}

fn small_page() -> LayoutOptions {
    LayoutOptions {
        paper_size: PaperSize::Custom {
            width_mm: 200.0,
            height_mm: 110.0,
        },
        margins: Margins::uniform(10.0),
        image_width_mm: 40.0,
        column_gap_mm: 5.0,
        row_gap_mm: 10.0,
        title: "Test PDF".to_string(),
        ..Default::default()
    }
}

fn page_content(doc: &Document, page_number: u32) -> String {
    let page_id = doc.get_pages()[&page_number];
    String::from_utf8(doc.get_page_content(page_id).unwrap()).unwrap()
}

#[test]
fn test_render_document_pages_and_content() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "a.png", 100, 50);
    write_png(dir.path(), "b.png", 100, 50);

    let items: ItemList = [("a.png", 3), ("b.png", 2)].into_iter().collect();
    let resolver = DirectoryResolver::new(dir.path());
    let output = layout(&items, &resolver, &small_page()).unwrap();

    let doc = render_document(&output.document, &resolver).unwrap();

    assert_eq!(doc.get_pages().len(), 1);
    let content = page_content(&doc, 1);
    assert_eq!(content.matches(" Do Q").count(), 5);
    assert_eq!(content.matches(" l S Q").count(), 1);
    assert!(content.contains("(Test PDF) Tj"));
    assert!(content.contains("/Im0 Do"));
    assert!(content.contains("/Im1 Do"));
}

#[test]
fn test_render_document_embeds_each_image_once() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "a.png", 30, 15);

    let items: ItemList = [("a.png", 30)].into_iter().collect();
    let resolver = DirectoryResolver::new(dir.path());
    let output = layout(&items, &resolver, &small_page()).unwrap();

    let doc = render_document(&output.document, &resolver).unwrap();

    assert_eq!(doc.get_pages().len(), 3);
    let image_objects = doc
        .objects
        .values()
        .filter(|object| match object.as_stream() {
            Ok(stream) => matches!(
                stream.dict.get(b"Subtype"),
                Ok(Object::Name(name)) if name.as_slice() == b"Image"
            ),
            Err(_) => false,
        })
        .count();
    assert_eq!(image_objects, 1);
}

#[tokio::test]
async fn test_generate_pdf_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "barcode1.png", 100, 50);
    write_png(dir.path(), "barcode2.png", 100, 50);
    let output_path = dir.path().join("output.pdf");

    let items: ItemList = [("barcode1.png", 2), ("barcode2.png", 1)]
        .into_iter()
        .collect();

    let summary = generate_pdf(&items, dir.path(), &small_page(), &output_path)
        .await
        .unwrap();

    assert_eq!(summary.pages, 1);
    assert_eq!(summary.placed_images, 3);
    assert_eq!(summary.separators, 1);
    assert!(summary.skipped.is_empty());

    let loaded = Document::load(&output_path).unwrap();
    assert_eq!(loaded.get_pages().len(), 1);
}

#[tokio::test]
async fn test_generate_pdf_no_images_found() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("output.pdf");

    let items: ItemList = [("non_existent_barcode.png", 1)].into_iter().collect();

    let result = generate_pdf(&items, dir.path(), &small_page(), &output_path).await;

    assert!(matches!(result, Err(LayoutError::NoRenderableInput)));
    assert!(!output_path.exists());
}

#[test]
fn test_render_from_in_memory_images() {
    let items: ItemList = [("a", 2), ("b", 1)].into_iter().collect();
    let sizes = |_: &str| Some(ImageSize::new(20, 10));
    let output = layout(&items, &sizes, &small_page()).unwrap();

    let mut images = HashMap::new();
    images.insert("a".to_string(), DynamicImage::new_rgb8(20, 10));
    images.insert("b".to_string(), DynamicImage::new_rgb8(20, 10));

    let doc = render_document(&output.document, &images).unwrap();
    let content = page_content(&doc, 1);
    assert_eq!(content.matches(" Do Q").count(), 3);

    images.remove("b");
    assert!(matches!(
        render_document(&output.document, &images),
        Err(LayoutError::ImageResolution { .. })
    ));
}

#[test]
fn test_cyrillic_title_reaches_content_stream() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "a.png", 100, 50);

    let items: ItemList = [("a.png", 1)].into_iter().collect();
    let options = LayoutOptions {
        title: "Этикетки".to_string(),
        ..small_page()
    };
    let resolver = DirectoryResolver::new(dir.path());
    let output = layout(&items, &resolver, &options).unwrap();

    let doc = render_document(&output.document, &resolver).unwrap();
    let content = page_content(&doc, 1);

    // Eight glyph ids, none of them .notdef
    let start = content.find("Td <").unwrap() + 4;
    let end = start + content[start..].find("> Tj").unwrap();
    let glyphs = &content[start..end];
    assert_eq!(glyphs.len(), 8 * 4);
    assert!(glyphs.as_bytes().chunks(4).all(|glyph| glyph != b"0000"));
    assert!(!content.contains('?'));

    // The page font is the embedded Type0 font, with a ToUnicode map
    let page_id = doc.get_pages()[&1];
    let fonts = doc
        .get_dictionary(page_id)
        .and_then(|page| page.get(b"Resources"))
        .and_then(Object::as_dict)
        .and_then(|resources| resources.get(b"Font"))
        .and_then(Object::as_dict)
        .unwrap();
    let font_id = fonts.get(b"F1").and_then(Object::as_reference).unwrap();
    let font = doc.get_dictionary(font_id).unwrap();
    assert!(matches!(font.get(b"Subtype"), Ok(Object::Name(name)) if name == b"Type0"));

    let to_unicode_id = font.get(b"ToUnicode").and_then(Object::as_reference).unwrap();
    let cmap = doc.get_object(to_unicode_id).and_then(Object::as_stream).unwrap();
    let cmap = String::from_utf8_lossy(&cmap.content);
    // Э
    assert!(cmap.contains("<042D>"));
}

#[tokio::test]
async fn test_generate_pdf_skips_undecodable_image() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "good.png", 100, 50);
    write_truncated_png(dir.path(), "broken.png");
    let output_path = dir.path().join("output.pdf");

    let items: ItemList = [("good.png", 2), ("broken.png", 1)].into_iter().collect();

    let summary = generate_pdf(&items, dir.path(), &small_page(), &output_path)
        .await
        .unwrap();

    assert_eq!(summary.placed_images, 2);
    assert_eq!(summary.skipped, vec!["broken.png".to_string()]);
    assert_eq!(summary.separators, 0);
    assert!(output_path.exists());
}
