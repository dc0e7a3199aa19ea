//! Table types: the raw extracted grid and its resolved logical form.

use serde::{Deserialize, Serialize};

use super::element::{Alignment, TextRun};
use super::span::{Rect, Rgb};

/// A raw table grid as produced by the extraction layer.
///
/// Grid detection over-splits merged cells into many sub-columns, most of
/// them blank. The table resolver collapses this into logical structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTable {
    /// 0-based page index
    pub page_num: usize,
    /// Table bounding box on the page
    pub bbox: Rect,
    /// Cell text, row-major; blank strings for empty/merged cells
    pub rows: Vec<Vec<String>>,
    /// Cell rectangles in row-major order, when geometry is available
    pub cells: Option<Vec<Rect>>,
}

impl RawTable {
    /// Number of grid columns (widest row).
    pub fn num_cols(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// A table with resolved logical structure and styling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedTable {
    /// 0-based page index
    pub page_num: usize,
    /// Table bounding box on the page
    pub bbox: Rect,
    /// Logical cell text, row-major
    pub rows: Vec<Vec<String>>,
    /// Number of logical rows
    pub num_rows: usize,
    /// Number of logical columns
    pub num_cols: usize,
    /// Proportional column widths summing to 1.0
    pub col_widths: Option<Vec<f32>>,
    /// Proportional row heights summing to 1.0
    pub row_heights: Option<Vec<f32>>,
    /// Whether the first row is a header row
    pub header_row: bool,
    /// Per-cell style metadata matching `rows` dimensions
    pub cell_styles: Option<Vec<Vec<CellStyle>>>,
}

impl ResolvedTable {
    /// Plain text representation, tab-separated cells and newline rows.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether the table carries no text at all.
    pub fn is_empty(&self) -> bool {
        self.rows
            .iter()
            .all(|row| row.iter().all(|cell| cell.trim().is_empty()))
    }
}

/// Style metadata for one logical table cell.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CellStyle {
    /// Background fill color, `None` when unshaded or white
    pub bg_color: Option<Rgb>,
    /// Dominant font name inside the cell
    pub font: Option<String>,
    /// Dominant font size
    pub size: Option<f32>,
    /// Dominant text is bold
    pub bold: bool,
    /// Dominant text is italic
    pub italic: bool,
    /// Dominant text color
    pub color: Option<Rgb>,
    /// Text alignment within the cell
    pub alignment: Alignment,
    /// Underline detected from line drawings
    pub underline: bool,
    /// Strikethrough detected from line drawings
    pub strikethrough: bool,
    /// Per-side borders matched from line drawings
    pub borders: Borders,
    /// Mixed-format runs; omitted when the grid was collapsed and cell
    /// geometry is unreliable
    pub runs: Option<Vec<TextRun>>,
}

/// Per-side cell borders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Borders {
    /// Top border
    pub top: Option<BorderSide>,
    /// Bottom border
    pub bottom: Option<BorderSide>,
    /// Left border
    pub left: Option<BorderSide>,
    /// Right border
    pub right: Option<BorderSide>,
}

impl Borders {
    /// Whether any side has a matched border.
    pub fn any(&self) -> bool {
        self.top.is_some() || self.bottom.is_some() || self.left.is_some() || self.right.is_some()
    }
}

/// Stroke width and color of one matched border line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BorderSide {
    /// Stroke width in points
    pub width: f32,
    /// Stroke color
    pub color: Rgb,
}
