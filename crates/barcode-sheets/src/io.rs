//! File-level operations: generating and saving barcode sheet PDFs

use crate::catalog::{DecodedImages, DirectoryResolver};
use crate::items::ItemList;
use crate::layout::layout;
use crate::options::LayoutOptions;
use crate::render::render_document;
use crate::stats::{LayoutSummary, summarize};
use crate::types::*;
use log::info;
use lopdf::Document;
use std::path::Path;

/// Lay out the items using images from `image_dir` and write the PDF.
pub async fn generate_pdf(
    items: &ItemList,
    image_dir: impl AsRef<Path>,
    options: &LayoutOptions,
    output_path: impl AsRef<Path>,
) -> Result<LayoutSummary> {
    let items = items.clone();
    let options = options.clone();
    let image_dir = image_dir.as_ref().to_owned();
    let output_path = output_path.as_ref().to_owned();

    // Decoding and compression are blocking work. Images are decoded while
    // resolving, so unreadable files become skips instead of render failures.
    let (document, summary) = tokio::task::spawn_blocking(move || {
        let images = DecodedImages::new(DirectoryResolver::new(&image_dir));
        let laid_out = layout(&items, &images, &options)?;
        let document = render_document(&laid_out.document, &images)?;
        Ok::<_, LayoutError>((document, summarize(&laid_out)))
    })
    .await??;

    save_pdf(document, &output_path).await?;
    info!("{} -> {}", summary, output_path.display());

    Ok(summary)
}

/// Save a rendered document
pub async fn save_pdf(mut doc: Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::task::spawn_blocking(move || {
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        Ok::<_, LayoutError>(writer)
    })
    .await??;
    tokio::fs::write(&path, bytes).await?;
    Ok(())
}
