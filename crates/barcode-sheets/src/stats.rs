use crate::layout::LayoutOutput;
use std::fmt;

/// Summary of a layout run, as reported to the user
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSummary {
    pub pages: usize,
    pub placed_images: usize,
    pub separators: usize,
    /// Identifiers that were dropped because their image could not be resolved
    pub skipped: Vec<String>,
}

/// Calculate statistics for a laid-out document
pub fn summarize(output: &LayoutOutput) -> LayoutSummary {
    LayoutSummary {
        pages: output.document.pages.len(),
        placed_images: output.document.placed_images(),
        separators: output.document.separators(),
        skipped: output.skipped.clone(),
    }
}

impl fmt::Display for LayoutSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "created {} pages / placed {} images / skipped {} identifiers",
            self.pages,
            self.placed_images,
            self.skipped.len()
        )
    }
}
