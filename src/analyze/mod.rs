//! Analysis passes: font classification, page layout, table resolution,
//! and the semantic orchestrator.

mod fonts;
mod layout;
mod semantic;
mod table;

pub use fonts::{map_to_fallback, BodyFont, FontClassifier, FontProfile, HeadingFont};
pub use layout::{Column, LayoutAnalyzer, PageLayout, SectionBreak};
pub use semantic::{
    attach_links, compute_content_margins, detect_headers_footers, estimate_body_x0,
    filter_spans_in_tables, SemanticAnalyzer,
};
pub use table::TableResolver;
