//! # redocx
//!
//! Semantic reconstruction of editable documents from extracted PDF
//! content.
//!
//! The hard part of PDF-to-document conversion is neither extraction nor
//! file writing but the layer in between: turning a flat stream of
//! positioned text spans, images, and noisy table grids into an ordered
//! document model. This crate is that layer. It classifies fonts into
//! body and heading roles, detects multi-column layouts, groups spans
//! into paragraphs with mixed-format runs, recognizes lists, filters
//! repeated headers and footers, resolves table structure, and attaches
//! hyperlinks.
//!
//! ## Quick Start
//!
//! ```
//! use redocx::{analyze, ExtractedDocument, PageMeta, Rect, TextSpan};
//!
//! let mut doc = ExtractedDocument::new();
//! doc.pages.push(PageMeta::letter(0));
//! doc.spans.push(TextSpan::new(
//!     "Hello from a PDF page.",
//!     Rect::new(72.0, 100.0, 540.0, 112.0),
//!     "Helvetica",
//!     12.0,
//! ));
//!
//! let elements = analyze(&doc);
//! assert_eq!(elements.len(), 1);
//! ```
//!
//! ## Features
//!
//! - **Font roles**: length-weighted body-font election, size-ratio
//!   heading levels, fallback family mapping
//! - **Layout**: column detection (up to three), section break detection,
//!   column-ordered output
//! - **Paragraphs**: style-aware line merging, alignment, indents, line
//!   spacing
//! - **Tables**: empty-column collapsing, width/height inference, header
//!   rows, per-cell styling from page drawings
//! - **Parallel processing**: uses Rayon across pages of large documents

pub mod analyze;
pub mod error;
pub mod model;
pub mod options;
pub mod util;

// Re-export commonly used types
pub use analyze::{
    detect_headers_footers, BodyFont, Column, FontClassifier, FontProfile, HeadingFont,
    LayoutAnalyzer, PageLayout, SectionBreak, SemanticAnalyzer, TableResolver,
};
pub use error::{Error, Result};
pub use model::{
    Alignment, BorderSide, Borders, BulletType, CellStyle, DrawItem, Drawing, ExtractedDocument,
    Formatting, Hyperlink, ImageBlock, LinkRange, Margins, Orientation, PageMeta, RawTable, Rect,
    ResolvedTable, Rgb, SemanticElement, TextRun, TextSpan,
};
pub use options::AnalyzeOptions;

/// Analyze extracted document content with default options.
///
/// # Example
///
/// ```
/// use redocx::{analyze, ExtractedDocument};
///
/// let elements = analyze(&ExtractedDocument::new());
/// assert!(elements.is_empty());
/// ```
pub fn analyze(doc: &ExtractedDocument) -> Vec<SemanticElement> {
    SemanticAnalyzer::new(AnalyzeOptions::default()).analyze(doc)
}

/// Analyze extracted document content with explicit options.
///
/// # Example
///
/// ```
/// use redocx::{analyze_with_options, AnalyzeOptions, ExtractedDocument};
///
/// let options = AnalyzeOptions::new().with_fallback_font("Calibri");
/// let elements = analyze_with_options(&ExtractedDocument::new(), options);
/// assert!(elements.is_empty());
/// ```
pub fn analyze_with_options(
    doc: &ExtractedDocument,
    options: AnalyzeOptions,
) -> Vec<SemanticElement> {
    SemanticAnalyzer::new(options).analyze(doc)
}
