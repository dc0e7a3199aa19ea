//! Output element types consumed by the document writer.

use serde::{Deserialize, Serialize};

use super::span::{Margins, Rect, Rgb};
use super::table::ResolvedTable;

/// A semantic document element, the unit the document writer consumes.
///
/// The final element list is ordered by page, then by vertical position
/// within a page (within-column, then column order, for multi-column pages).
/// Positional sort keys used during assembly are internal to the analyzer
/// and do not appear here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SemanticElement {
    /// A heading at levels 1–6
    Heading {
        /// Heading text
        text: String,
        /// Heading level, 1–6
        level: u8,
        /// 0-based page index
        page_num: usize,
        /// Representative formatting
        formatting: Formatting,
    },

    /// A body paragraph with mixed-format runs
    Paragraph {
        /// Merged paragraph text
        text: String,
        /// Styled fragments preserving per-span formatting
        runs: Vec<TextRun>,
        /// 0-based page index
        page_num: usize,
        /// Representative formatting
        formatting: Formatting,
        /// Hyperlink ranges attached to the text
        links: Vec<LinkRange>,
    },

    /// A bulleted or numbered list item
    ListItem {
        /// Item text with the bullet/number prefix stripped
        text: String,
        /// Nesting level, 0 = top level
        level: usize,
        /// Bullet or number marker kind
        bullet: BulletType,
        /// 0-based page index
        page_num: usize,
        /// Representative formatting
        formatting: Formatting,
    },

    /// A resolved table
    Table(ResolvedTable),

    /// A placed image
    Image {
        /// Path of the rendered image file
        path: String,
        /// Display width in points
        width: f32,
        /// Display height in points
        height: f32,
        /// 0-based page index
        page_num: usize,
        /// When true, this image vertically overlaps the preceding image
        /// element and the writer should place them side by side in one
        /// paragraph rather than stacking them.
        merge_up: bool,
    },

    /// A page boundary, carrying geometry for the upcoming page
    PageBreak {
        /// 0-based index of the page that starts after this break
        page_num: usize,
        /// Orientation of the upcoming page
        orientation: Orientation,
        /// Margins of the upcoming page, when known
        margins: Option<Margins>,
    },

    /// Repeated page-header text detected across the document
    Header {
        /// Header text, one line per distinct repeated string
        text: String,
    },

    /// Repeated page-footer text detected across the document
    Footer {
        /// Footer text, one line per distinct repeated string
        text: String,
    },
}

impl SemanticElement {
    /// Plain text of the element, empty for non-text variants.
    pub fn text(&self) -> &str {
        match self {
            SemanticElement::Heading { text, .. }
            | SemanticElement::Paragraph { text, .. }
            | SemanticElement::ListItem { text, .. }
            | SemanticElement::Header { text }
            | SemanticElement::Footer { text } => text,
            _ => "",
        }
    }

    /// Page index for content elements, `None` for header/footer.
    pub fn page_num(&self) -> Option<usize> {
        match self {
            SemanticElement::Heading { page_num, .. }
            | SemanticElement::Paragraph { page_num, .. }
            | SemanticElement::ListItem { page_num, .. }
            | SemanticElement::Image { page_num, .. }
            | SemanticElement::PageBreak { page_num, .. } => Some(*page_num),
            SemanticElement::Table(t) => Some(t.page_num),
            SemanticElement::Header { .. } | SemanticElement::Footer { .. } => None,
        }
    }

    /// Whether this is a paragraph.
    pub fn is_paragraph(&self) -> bool {
        matches!(self, SemanticElement::Paragraph { .. })
    }

    /// Whether this is a heading.
    pub fn is_heading(&self) -> bool {
        matches!(self, SemanticElement::Heading { .. })
    }
}

/// Representative formatting for a text element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formatting {
    /// Mapped (fallback) font family
    pub font: String,
    /// Font size in points
    pub size: f32,
    /// Bold
    pub bold: bool,
    /// Italic
    pub italic: bool,
    /// Text color
    pub color: Rgb,
    /// Horizontal alignment
    pub alignment: Alignment,
    /// Vertical gap since the previous element, clamped to [0, 72] pt
    pub spacing_before: f32,
    /// Indentation from the body left margin, 0 when under 5 pt
    pub indent_left: f32,
    /// Line spacing as a multiple of the font size, only when it clearly
    /// deviates from single spacing
    pub line_spacing: Option<f32>,
    /// First-line indent in points, only when the first line starts
    /// noticeably right of the rest of the group
    pub first_line_indent: Option<f32>,
}

impl Default for Formatting {
    fn default() -> Self {
        Self {
            font: "Arial".to_string(),
            size: 12.0,
            bold: false,
            italic: false,
            color: Rgb::BLACK,
            alignment: Alignment::Left,
            spacing_before: 0.0,
            indent_left: 0.0,
            line_spacing: None,
            first_line_indent: None,
        }
    }
}

/// A styled fragment of a paragraph, one per source span.
///
/// The bounding box is retained so hyperlink rectangles can be matched to
/// the exact runs they cover.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRun {
    /// Fragment text (a bare newline run separates visual lines)
    pub text: String,
    /// Mapped font family
    pub font: String,
    /// Font size in points
    pub size: f32,
    /// Bold
    pub bold: bool,
    /// Italic
    pub italic: bool,
    /// Underline
    pub underline: bool,
    /// Strikethrough
    pub strikethrough: bool,
    /// Superscript
    pub superscript: bool,
    /// Text color
    pub color: Rgb,
    /// Highlight color behind the text, if any
    pub highlight: Option<Rgb>,
    /// Source bounding box on the page
    pub bbox: Rect,
}

impl TextRun {
    /// A line-break run with no styling.
    pub fn line_break() -> Self {
        Self {
            text: "\n".to_string(),
            font: String::new(),
            size: 0.0,
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
            superscript: false,
            color: Rgb::BLACK,
            highlight: None,
            bbox: Rect::default(),
        }
    }
}

/// A hyperlink attached to a character range of an element's text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRange {
    /// The anchor text covered by the link
    pub text: String,
    /// Target URI
    pub uri: String,
    /// Byte offset of the anchor text within the element text
    pub start: usize,
    /// Byte offset one past the end of the anchor text
    pub end: usize,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
}

/// Marker kind for a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulletType {
    /// Unordered bullet marker
    Bullet,
    /// Ordered number/letter/roman marker
    Number,
}

/// Page orientation carried on a page break.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Portrait (default)
    #[default]
    Portrait,
    /// Landscape
    Landscape,
}
