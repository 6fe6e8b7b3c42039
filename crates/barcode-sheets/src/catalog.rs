//! Barcode image discovery and dimension lookup

use crate::constants::IMAGE_EXTENSIONS;
use crate::types::*;
use image::DynamicImage;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Looks up the pixel dimensions of the image behind an identifier.
///
/// Implementations must be side-effect free: resolving the same identifier
/// twice yields the same answer.
pub trait ImageResolver {
    fn resolve(&self, id: &str) -> Result<ImageSize>;
}

impl<F> ImageResolver for F
where
    F: Fn(&str) -> Option<ImageSize>,
{
    fn resolve(&self, id: &str) -> Result<ImageSize> {
        self(id).ok_or_else(|| LayoutError::ImageResolution {
            id: id.to_string(),
            reason: "not found".to_string(),
        })
    }
}

/// Supplies decoded pixels for an identifier at render time
pub trait ImageSource {
    fn load(&self, id: &str) -> Result<DynamicImage>;
}

impl ImageSource for HashMap<String, DynamicImage> {
    fn load(&self, id: &str) -> Result<DynamicImage> {
        self.get(id)
            .cloned()
            .ok_or_else(|| LayoutError::ImageResolution {
                id: id.to_string(),
                reason: "not found".to_string(),
            })
    }
}

/// Resolves identifiers as file names inside a directory
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    root: PathBuf,
}

impl DirectoryResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }
}

impl ImageResolver for DirectoryResolver {
    fn resolve(&self, id: &str) -> Result<ImageSize> {
        let path = self.path_for(id);
        if !path.is_file() {
            return Err(LayoutError::ImageResolution {
                id: id.to_string(),
                reason: format!("file not found: {}", path.display()),
            });
        }

        let (width, height) =
            image::image_dimensions(&path).map_err(|e| LayoutError::ImageResolution {
                id: id.to_string(),
                reason: e.to_string(),
            })?;
        Ok(ImageSize::new(width, height))
    }
}

impl ImageSource for DirectoryResolver {
    fn load(&self, id: &str) -> Result<DynamicImage> {
        let path = self.path_for(id);
        image::open(&path).map_err(|e| LayoutError::ImageResolution {
            id: id.to_string(),
            reason: format!("{}: {}", path.display(), e),
        })
    }
}

/// Decodes each image in full while resolving it, so files that only have a
/// readable header are skipped at layout time instead of failing the render.
///
/// Decoded pixels are kept until [`ImageSource::load`] hands them out. Each
/// cached image is handed out once; later loads go back to the source.
pub struct DecodedImages<S> {
    source: S,
    decoded: RefCell<HashMap<String, DynamicImage>>,
}

impl<S: ImageSource> DecodedImages<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            decoded: RefCell::new(HashMap::new()),
        }
    }
}

impl<S: ImageSource> ImageResolver for DecodedImages<S> {
    fn resolve(&self, id: &str) -> Result<ImageSize> {
        if let Some(image) = self.decoded.borrow().get(id) {
            return Ok(ImageSize::new(image.width(), image.height()));
        }
        let image = self.source.load(id)?;
        let size = ImageSize::new(image.width(), image.height());
        self.decoded.borrow_mut().insert(id.to_string(), image);
        Ok(size)
    }
}

impl<S: ImageSource> ImageSource for DecodedImages<S> {
    fn load(&self, id: &str) -> Result<DynamicImage> {
        let cached = self.decoded.borrow_mut().remove(id);
        match cached {
            Some(image) => Ok(image),
            None => self.source.load(id),
        }
    }
}

/// Whether a file name carries one of the recognised image extensions
pub fn is_barcode_image(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// List the barcode image file names in a directory, sorted by name
pub async fn list_barcode_images(dir: impl AsRef<Path>) -> Result<Vec<String>> {
    let dir = dir.as_ref();
    let is_dir = tokio::fs::metadata(dir)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false);
    if !is_dir {
        return Err(LayoutError::Config(format!(
            "Barcode directory '{}' not found",
            dir.display()
        )));
    }

    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if is_barcode_image(name) {
                names.push(name.to_string());
            }
        }
    }

    names.sort();
    Ok(names)
}

/// Case-insensitive substring filter; an empty term keeps every name
pub fn filter_images<'a>(names: &'a [String], term: &str) -> Vec<&'a str> {
    let term = term.trim().to_lowercase();
    names
        .iter()
        .filter(|name| term.is_empty() || name.to_lowercase().contains(&term))
        .map(String::as_str)
        .collect()
}
