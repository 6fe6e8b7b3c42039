use barcode_sheets::layout::Rect;
use barcode_sheets::*;

/// 200 x 110 mm page, 10 mm margins, 40 mm wide images.
/// With a 2:1 source image this fits four images per row and three rows.
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
        ..Default::default()
    }
}

fn wide_images(id: &str) -> Option<ImageSize> {
    match id {
        "missing.png" => None,
        "square.png" => Some(ImageSize::new(80, 80)),
        _ => Some(ImageSize::new(100, 50)),
    }
}

fn assert_within_margins(output: &LayoutOutput, options: &LayoutOptions) {
    let (width, height) = options.page_dimensions_mm();
    let printable = Rect::new(
        options.margins.left_mm,
        options.margins.bottom_mm,
        width - options.margins.left_mm - options.margins.right_mm,
        height - options.margins.top_mm - options.margins.bottom_mm,
    );
    for page in &output.document.pages {
        for image in &page.images {
            assert!(
                printable.contains(&image.rect),
                "{:?} outside {:?}",
                image.rect,
                printable
            );
        }
    }
}

fn assert_no_overlaps(output: &LayoutOutput) {
    for page in &output.document.pages {
        for (i, a) in page.images.iter().enumerate() {
            for b in &page.images[i + 1..] {
                assert!(!a.rect.overlaps(&b.rect), "{:?} overlaps {:?}", a, b);
            }
        }
    }
}

#[test]
fn test_two_groups_on_one_page() {
    let items: ItemList = [("a.png", 3), ("b.png", 2)].into_iter().collect();
    let options = small_page();

    let output = layout(&items, &wide_images, &options).unwrap();
    let document = &output.document;

    assert_eq!(document.pages.len(), 1);
    assert_eq!(document.placed_images(), 5);
    assert_eq!(document.separators(), 1);
    assert!(output.skipped.is_empty());

    let page = &document.pages[0];
    let ids: Vec<&str> = page.images.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["a.png", "a.png", "a.png", "b.png", "b.png"]);

    // Group a on the first row, group b starts a fresh row
    assert_eq!(page.images[0].rect, Rect::new(10.0, 80.0, 40.0, 20.0));
    assert_eq!(page.images[2].rect, Rect::new(100.0, 80.0, 40.0, 20.0));
    assert_eq!(page.images[3].rect, Rect::new(10.0, 50.0, 40.0, 20.0));
    assert_eq!(page.images[4].rect, Rect::new(55.0, 50.0, 40.0, 20.0));

    // Rule halfway through the gap between the rows
    let separator = page.separators[0];
    assert_eq!(separator.y, 75.0);
    assert_eq!(separator.x_start, 10.0);
    assert_eq!(separator.x_end, 190.0);

    assert_within_margins(&output, &options);
    assert_no_overlaps(&output);
}

#[test]
fn test_single_group_overflows_pages() {
    let items: ItemList = [("a.png", 200)].into_iter().collect();
    let options = small_page();

    let output = layout(&items, &wide_images, &options).unwrap();
    let document = &output.document;

    // 12 per page: 16 full pages and 8 left over
    assert_eq!(document.pages.len(), 17);
    assert_eq!(document.placed_images(), 200);
    assert_eq!(document.separators(), 0);
    for page in &document.pages[..16] {
        assert_eq!(page.images.len(), 12);
    }
    assert_eq!(document.pages[16].images.len(), 8);

    assert_within_margins(&output, &options);
    assert_no_overlaps(&output);
}

#[test]
fn test_missing_only_item_fails() {
    let items: ItemList = [("missing.png", 1)].into_iter().collect();

    let result = layout(&items, &wide_images, &small_page());
    match result {
        Err(LayoutError::NoRenderableInput) => {}
        other => panic!("Expected NoRenderableInput, got {:?}", other),
    }
}

#[test]
fn test_empty_list_fails() {
    let result = layout(&ItemList::new(), &wide_images, &small_page());
    assert!(matches!(result, Err(LayoutError::NoRenderableInput)));
}

#[test]
fn test_zero_quantity_rejected() {
    let items: ItemList = [("a.png", 2), ("b.png", 0)].into_iter().collect();

    match layout(&items, &wide_images, &small_page()) {
        Err(LayoutError::InvalidQuantity { id, quantity }) => {
            assert_eq!(id, "b.png");
            assert_eq!(quantity, 0);
        }
        other => panic!("Expected InvalidQuantity, got {:?}", other),
    }
}

#[test]
fn test_negative_quantity_rejected() {
    match parse_quantity("a.png", "-3") {
        Err(LayoutError::InvalidQuantity { id, quantity }) => {
            assert_eq!(id, "a.png");
            assert_eq!(quantity, -3);
        }
        other => panic!("Expected InvalidQuantity, got {:?}", other),
    }
    assert!(parse_quantity("a.png", "0").is_err());
    assert!(matches!(
        parse_quantity("a.png", "two"),
        Err(LayoutError::UnparsableQuantity { .. })
    ));
    assert_eq!(parse_quantity("a.png", " 7 ").unwrap(), 7);
}

#[test]
fn test_quantity_validated_before_resolution() {
    // Invalid quantity wins even when nothing resolves
    let items: ItemList = [("missing.png", 0)].into_iter().collect();
    let result = layout(&items, &wide_images, &small_page());
    assert!(matches!(result, Err(LayoutError::InvalidQuantity { .. })));
}

#[test]
fn test_missing_items_are_skipped() {
    let items: ItemList = [("a.png", 2), ("missing.png", 4), ("b.png", 1)]
        .into_iter()
        .collect();

    let output = layout(&items, &wide_images, &small_page()).unwrap();

    assert_eq!(output.skipped, vec!["missing.png".to_string()]);
    assert_eq!(output.document.placed_images(), 3);
    assert_eq!(output.document.separators(), 1);
}

#[test]
fn test_trailing_missing_item_adds_no_separator() {
    let items: ItemList = [("a.png", 2), ("b.png", 1), ("missing.png", 1)]
        .into_iter()
        .collect();

    let output = layout(&items, &wide_images, &small_page()).unwrap();

    assert_eq!(output.document.separators(), 1);
    assert_eq!(output.skipped, vec!["missing.png".to_string()]);
}

#[test]
fn test_group_boundary_page_break_drops_separator() {
    // Group a fills the first page exactly
    let items: ItemList = [("a.png", 12), ("b.png", 1)].into_iter().collect();

    let output = layout(&items, &wide_images, &small_page()).unwrap();
    let document = &output.document;

    assert_eq!(document.pages.len(), 2);
    assert_eq!(document.separators(), 0);
    assert_eq!(document.pages[1].images.len(), 1);
    assert_eq!(document.pages[1].images[0].id, "b.png");
    assert_eq!(
        document.pages[1].images[0].rect,
        Rect::new(10.0, 80.0, 40.0, 20.0)
    );
}

#[test]
fn test_separator_on_later_page() {
    let items: ItemList = [("a.png", 10), ("b.png", 5), ("c.png", 1)]
        .into_iter()
        .collect();

    let output = layout(&items, &wide_images, &small_page()).unwrap();
    let document = &output.document;

    // a ends mid-row 3; the boundary wrap falls off the page, so no rule.
    // b fills row 1 of page 2 and spills one image into row 2; the b|c rule
    // lands on page 2.
    assert_eq!(document.pages.len(), 2);
    assert_eq!(document.pages[0].separators.len(), 0);
    assert_eq!(document.pages[1].separators.len(), 1);
    assert_eq!(document.pages[1].separators[0].y, 45.0);
    assert_eq!(document.placed_images(), 16);
}

#[test]
fn test_aspect_ratio_comes_from_first_resolvable_item() {
    let items: ItemList = [("missing.png", 1), ("a.png", 1), ("square.png", 1)]
        .into_iter()
        .collect();

    let output = layout(&items, &wide_images, &small_page()).unwrap();

    // Every image uses the 2:1 box of a.png, including the square one
    for page in &output.document.pages {
        for image in &page.images {
            assert_eq!(image.rect.width, 40.0);
            assert_eq!(image.rect.height, 20.0);
        }
    }
}

#[test]
fn test_placement_order_follows_input_order() {
    let items: ItemList = [("c.png", 5), ("a.png", 7), ("b.png", 9)]
        .into_iter()
        .collect();

    let output = layout(&items, &wide_images, &small_page()).unwrap();

    let ids: Vec<&str> = output
        .document
        .pages
        .iter()
        .flat_map(|page| page.images.iter().map(|image| image.id.as_str()))
        .collect();
    let expected: Vec<&str> = std::iter::repeat_n("c.png", 5)
        .chain(std::iter::repeat_n("a.png", 7))
        .chain(std::iter::repeat_n("b.png", 9))
        .collect();
    assert_eq!(ids, expected);
    assert_eq!(output.document.image_ids(), ["c.png", "a.png", "b.png"]);
}

#[test]
fn test_total_matches_quantities_on_a4() {
    let items: ItemList = [("a.png", 17), ("b.png", 40), ("c.png", 3), ("d.png", 64)]
        .into_iter()
        .collect();
    let options = LayoutOptions::default();

    let output = layout(&items, &wide_images, &options).unwrap();

    assert_eq!(
        output.document.placed_images() as u64,
        items.total_quantity()
    );
    assert!(output.document.separators() <= 3);
    assert_within_margins(&output, &options);
    assert_no_overlaps(&output);
}

#[test]
fn test_landscape_fits_more_per_row() {
    let items: ItemList = [("a.png", 6)].into_iter().collect();
    let mut options = LayoutOptions::default();

    let portrait = layout(&items, &wide_images, &options).unwrap();
    options.orientation = Orientation::Landscape;
    let landscape = layout(&items, &wide_images, &options).unwrap();

    let first_row = |output: &LayoutOutput| {
        let page = &output.document.pages[0];
        page.images
            .iter()
            .filter(|image| image.rect.y == page.images[0].rect.y)
            .count()
    };
    assert_eq!(first_row(&portrait), 4);
    assert_eq!(first_row(&landscape), 5);
    assert_eq!(landscape.document.page_width_mm, 297.0);
    assert_eq!(landscape.document.page_height_mm, 210.0);
}

#[test]
fn test_image_taller_than_page_rejected() {
    let items: ItemList = [("tall.png", 1)].into_iter().collect();
    let tall = |_: &str| Some(ImageSize::new(10, 100));

    let result = layout(&items, &tall, &small_page());
    assert!(matches!(result, Err(LayoutError::Config(_))));
}

#[test]
fn test_title_carried_into_document() {
    let items: ItemList = [("a.png", 1)].into_iter().collect();
    let options = LayoutOptions {
        title: "Shelf labels".to_string(),
        ..small_page()
    };

    let output = layout(&items, &wide_images, &options).unwrap();
    assert_eq!(output.document.title, "Shelf labels");
    assert_eq!(output.document.margins, Margins::uniform(10.0));
}

#[test]
fn test_summary_reports_counts() {
    let items: ItemList = [("a.png", 3), ("missing.png", 1), ("b.png", 2)]
        .into_iter()
        .collect();

    let output = layout(&items, &wide_images, &small_page()).unwrap();
    let summary = summarize(&output);

    assert_eq!(summary.pages, 1);
    assert_eq!(summary.placed_images, 5);
    assert_eq!(summary.separators, 1);
    assert_eq!(summary.skipped, vec!["missing.png".to_string()]);
    assert_eq!(
        summary.to_string(),
        "created 1 pages / placed 5 images / skipped 1 identifiers"
    );
}
