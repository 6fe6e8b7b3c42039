//! Page layout for barcode sheets
//!
//! - Geometry and cursor handling for the placement grid
//! - Page breaking and group separators
//! - The document model handed to the renderer

mod engine;
mod types;

pub use engine::layout;
pub use types::*;
