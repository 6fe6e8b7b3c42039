use crate::constants::*;
use crate::types::*;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Page configuration for a barcode sheet document
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutOptions {
    // Page
    pub paper_size: PaperSize,
    pub orientation: Orientation,
    pub margins: Margins,

    // Draw box and spacing
    pub image_width_mm: f32,
    pub column_gap_mm: f32,
    pub row_gap_mm: f32,

    /// Header printed at the top of every page
    pub title: String,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            orientation: Orientation::Portrait,
            margins: Margins::default(),
            image_width_mm: DEFAULT_IMAGE_WIDTH_MM,
            column_gap_mm: DEFAULT_COLUMN_GAP_MM,
            row_gap_mm: DEFAULT_ROW_GAP_MM,
            title: String::new(),
        }
    }
}

impl LayoutOptions {
    /// Page (width, height) in millimeters with orientation applied
    pub fn page_dimensions_mm(&self) -> (f32, f32) {
        self.paper_size.dimensions_with_orientation(self.orientation)
    }

    /// Size of the area inside the margins
    pub fn printable_area_mm(&self) -> (f32, f32) {
        let (width, height) = self.page_dimensions_mm();
        (
            width - self.margins.left_mm - self.margins.right_mm,
            height - self.margins.top_mm - self.margins.bottom_mm,
        )
    }

    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| LayoutError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| LayoutError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        let (page_width, page_height) = self.page_dimensions_mm();
        if page_width <= 0.0 || page_height <= 0.0 {
            return Err(LayoutError::Config(format!(
                "Page dimensions must be positive, got {} x {} mm",
                page_width, page_height
            )));
        }

        let margins = [
            self.margins.top_mm,
            self.margins.bottom_mm,
            self.margins.left_mm,
            self.margins.right_mm,
        ];
        if margins.iter().any(|m| *m < 0.0) {
            return Err(LayoutError::Config("Margins cannot be negative".to_string()));
        }

        if self.image_width_mm <= 0.0 {
            return Err(LayoutError::Config(
                "Image width must be positive".to_string(),
            ));
        }

        if self.column_gap_mm < 0.0 || self.row_gap_mm < 0.0 {
            return Err(LayoutError::Config("Gaps cannot be negative".to_string()));
        }

        let (printable_width, printable_height) = self.printable_area_mm();
        if printable_height <= 0.0 {
            return Err(LayoutError::Config(
                "Margins leave no printable height".to_string(),
            ));
        }
        if self.image_width_mm > printable_width {
            return Err(LayoutError::Config(format!(
                "Image width {} mm exceeds printable width {} mm",
                self.image_width_mm, printable_width
            )));
        }

        Ok(())
    }
}

/// Persisted user settings
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings {
    /// Directory scanned for barcode images
    pub barcode_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            barcode_dir: PathBuf::from(DEFAULT_BARCODE_DIR),
        }
    }
}

#[cfg(feature = "serde")]
impl Settings {
    /// Load settings, falling back to defaults when the file does not exist
    pub async fn load_or_default(path: impl AsRef<std::path::Path>) -> Result<Self> {
        match tokio::fs::read(path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| LayoutError::Config(format!("Failed to parse settings: {}", e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| LayoutError::Config(format!("Failed to serialize settings: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}
