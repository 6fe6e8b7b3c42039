pub mod catalog;
pub mod constants;
mod io;
pub mod items;
pub mod layout;
mod options;
pub mod render;
mod stats;
mod types;

pub use catalog::{
    DecodedImages, DirectoryResolver, ImageResolver, ImageSource, filter_images,
    list_barcode_images,
};
pub use io::{generate_pdf, save_pdf};
pub use items::{Item, ItemList, load_from_csv, parse_quantity};
pub use layout::{LayoutOutput, SheetDocument, SheetPage, layout};
pub use options::*;
pub use render::render_document;
pub use stats::{LayoutSummary, summarize};
pub use types::*;
