//! Input boundary types produced by the extraction layer.
//!
//! Everything in this file is handed to the analyzers by an external PDF
//! extractor and is immutable once created. Coordinates follow the extractor
//! convention: the y axis grows downward, so `y0` is the top edge of a box
//! and `y1` the bottom.

use serde::{Deserialize, Serialize};

use super::table::RawTable;

/// An axis-aligned bounding box in page points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl Rect {
    /// Create a new rect from its edges.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the rect (zero when degenerate).
    pub fn width(&self) -> f32 {
        (self.x1 - self.x0).max(0.0)
    }

    /// Height of the rect (zero when degenerate).
    pub fn height(&self) -> f32 {
        (self.y1 - self.y0).max(0.0)
    }

    /// Area of the rect.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Whether this rect overlaps another (open intersection).
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x1 > other.x0 && self.x0 < other.x1 && self.y1 > other.y0 && self.y0 < other.y1
    }

    /// Area of the intersection with another rect.
    pub fn intersection_area(&self, other: &Rect) -> f32 {
        let w = self.x1.min(other.x1) - self.x0.max(other.x0);
        let h = self.y1.min(other.y1) - self.y0.max(other.y0);
        if w > 0.0 && h > 0.0 {
            w * h
        } else {
            0.0
        }
    }

    /// Whether a point lies inside the rect (edges inclusive).
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    /// Center point of the rect.
    pub fn center(&self) -> (f32, f32) {
        ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }
}

/// An RGB color with 0–255 components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Black, the default text color.
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    /// White, treated as "no fill" in background detection.
    pub const WHITE: Rgb = Rgb(255, 255, 255);
}

/// A positioned, styled text fragment extracted from a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// Bounding box in page points
    pub bbox: Rect,
    /// Raw PDF font name (possibly with a subset prefix)
    pub font: String,
    /// Font size in points
    pub size: f32,
    /// Bold flag from the extractor
    pub bold: bool,
    /// Italic flag from the extractor
    pub italic: bool,
    /// Underline detected by the extractor
    pub underline: bool,
    /// Strikethrough detected by the extractor
    pub strikethrough: bool,
    /// Superscript flag
    pub superscript: bool,
    /// Text color
    pub color: Rgb,
    /// Highlight color behind the text, if any
    pub highlight: Option<Rgb>,
    /// 0-based page index
    pub page_num: usize,
}

impl TextSpan {
    /// Create a plain span with default styling, mostly useful in tests.
    pub fn new(text: impl Into<String>, bbox: Rect, font: impl Into<String>, size: f32) -> Self {
        Self {
            text: text.into(),
            bbox,
            font: font.into(),
            size,
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
            superscript: false,
            color: Rgb::BLACK,
            highlight: None,
            page_num: 0,
        }
    }

    /// Character length of the span text, floored at 1 for weighting.
    pub fn weight(&self) -> usize {
        self.text.chars().count().max(1)
    }
}

/// Page content margins in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    /// Top margin
    pub top: f32,
    /// Bottom margin
    pub bottom: f32,
    /// Left margin
    pub left: f32,
    /// Right margin
    pub right: f32,
}

/// Per-page geometry metadata, one entry per page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    /// 0-based page index
    pub page_num: usize,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Whether the page is rotated into landscape orientation
    pub is_landscape: bool,
    /// Content margins, when the extractor provides them
    pub margins: Option<Margins>,
}

impl PageMeta {
    /// Create page metadata with the given dimensions.
    pub fn new(page_num: usize, width: f32, height: f32) -> Self {
        Self {
            page_num,
            width,
            height,
            is_landscape: width > height,
            margins: None,
        }
    }

    /// Standard US Letter page (612 × 792 pt).
    pub fn letter(page_num: usize) -> Self {
        Self::new(page_num, 612.0, 792.0)
    }
}

/// A pre-rendered raster image placed on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageBlock {
    /// Path of the rendered image file
    pub path: String,
    /// Display width in points
    pub width: f32,
    /// Display height in points
    pub height: f32,
    /// 0-based page index
    pub page_num: usize,
    /// Placement on the page
    pub bbox: Rect,
}

/// A hyperlink annotation with its active rectangle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hyperlink {
    /// Target URI
    pub uri: String,
    /// Active rectangle on the page
    pub bbox: Rect,
    /// 0-based page index
    pub page_num: usize,
}

/// A vector drawing command from the page content stream.
///
/// The table resolver inspects these for cell shading (filled rects) and
/// borders / underlines (stroked lines and rect edges).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drawing {
    /// Fill color, if the path is filled
    pub fill: Option<Rgb>,
    /// Stroke color, if the path is stroked
    pub stroke: Option<Rgb>,
    /// Stroke width in points
    pub stroke_width: f32,
    /// Path items making up the drawing
    pub items: Vec<DrawItem>,
    /// 0-based page index
    pub page_num: usize,
}

/// A single path item within a [`Drawing`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawItem {
    /// A line segment from `(x0, y0)` to `(x1, y1)`
    Line {
        /// Start x
        x0: f32,
        /// Start y
        y0: f32,
        /// End x
        x1: f32,
        /// End y
        y1: f32,
    },
    /// A rectangle path
    Rect(Rect),
}

/// The full input bundle handed over by the extraction layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// All text spans, all pages, in extraction order
    pub spans: Vec<TextSpan>,
    /// Placed raster images
    pub images: Vec<ImageBlock>,
    /// Raw table grids awaiting structure resolution
    pub tables: Vec<RawTable>,
    /// Vector drawings (fills and strokes) for table styling
    pub drawings: Vec<Drawing>,
    /// Hyperlink annotations
    pub links: Vec<Hyperlink>,
    /// Per-page geometry, indexed by page number
    pub pages: Vec<PageMeta>,
}

impl ExtractedDocument {
    /// Create an empty document bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages, from metadata or from the highest span page index.
    pub fn page_count(&self) -> usize {
        if !self.pages.is_empty() {
            return self.pages.len();
        }
        self.spans
            .iter()
            .map(|s| s.page_num + 1)
            .max()
            .unwrap_or(0)
    }

    /// Dimensions of a page, falling back to US Letter when unknown.
    pub fn page_dimensions(&self, page_num: usize) -> (f32, f32) {
        self.pages
            .get(page_num)
            .map(|p| (p.width, p.height))
            .unwrap_or((612.0, 792.0))
    }
}
