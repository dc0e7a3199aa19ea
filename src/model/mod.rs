//! Data model for semantic document reconstruction.
//!
//! This module defines both sides of the core's boundary: the input types
//! produced by the extraction layer (spans, images, raw table grids, links,
//! page metadata) and the output element list the document writer consumes.

mod element;
mod span;
mod table;

pub use element::{
    Alignment, BulletType, Formatting, LinkRange, Orientation, SemanticElement, TextRun,
};
pub use span::{
    DrawItem, Drawing, ExtractedDocument, Hyperlink, ImageBlock, Margins, PageMeta, Rect, Rgb,
    TextSpan,
};
pub use table::{BorderSide, Borders, CellStyle, RawTable, ResolvedTable};
