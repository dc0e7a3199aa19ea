//! Table resolution: collapsing over-split grids into logical tables and
//! inferring geometry and per-cell styling.
//!
//! Grid detection splits merged cells into many blank sub-columns. The
//! resolver removes those, merges complementary neighbors, infers column
//! widths and row heights, detects the header row, and matches page
//! drawings to cell backgrounds and borders.

use crate::error::{Error, Result};
use crate::model::{
    Alignment, BorderSide, Borders, CellStyle, DrawItem, Drawing, RawTable, Rect, ResolvedTable,
    Rgb, TextRun, TextSpan,
};

/// A horizontal or vertical line segment collected from page drawings.
///
/// `start`/`end` run along the segment axis, `pos` is the fixed coordinate
/// on the perpendicular axis.
#[derive(Debug, Clone, Copy)]
struct LineSeg {
    start: f32,
    end: f32,
    pos: f32,
    width: f32,
    color: Rgb,
}

/// Resolves raw table grids into their logical structure.
pub struct TableResolver;

impl TableResolver {
    /// Axis tolerance when classifying drawing segments as horizontal or
    /// vertical.
    const SEGMENT_TOLERANCE: f32 = 2.0;
    /// Distance tolerance when matching a segment to a cell edge.
    const BORDER_TOLERANCE: f32 = 3.0;
    /// Minimum fraction of an edge a segment must cover to count as its
    /// border.
    const BORDER_OVERLAP_MIN: f32 = 0.3;
    /// Minimum fraction of a cell a fill must cover to count as its
    /// background.
    const BG_OVERLAP_MIN: f32 = 0.5;

    /// Resolve a raw grid into a logical table.
    ///
    /// `spans` and `drawings` are the full document sets; only entries on
    /// the table's page and inside its bounding box are consulted. Fails
    /// with [`Error::EmptyTable`] when nothing remains after collapsing.
    pub fn resolve(
        raw: &RawTable,
        spans: &[TextSpan],
        drawings: &[Drawing],
    ) -> Result<ResolvedTable> {
        if raw.bbox.width() <= 0.0 || raw.bbox.height() <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "table on page {} has a degenerate bounding box",
                raw.page_num
            )));
        }

        let original_num_cols = raw.num_cols();

        let mut rows = collapse_empty_columns(raw.rows.clone());
        rows.retain(|row| row.iter().any(|cell| !cell.trim().is_empty()));

        let num_rows = rows.len();
        let num_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        if num_rows == 0 || num_cols == 0 {
            return Err(Error::EmptyTable(format!(
                "table on page {} has no content after collapsing",
                raw.page_num
            )));
        }

        let collapsed = num_cols != original_num_cols;
        if collapsed {
            log::debug!(
                "Table on page {} collapsed from {} to {} columns",
                raw.page_num,
                original_num_cols,
                num_cols
            );
        }

        let page_spans: Vec<&TextSpan> = spans
            .iter()
            .filter(|s| s.page_num == raw.page_num)
            .collect();
        let page_drawings: Vec<&Drawing> = drawings
            .iter()
            .filter(|d| d.page_num == raw.page_num)
            .collect();

        let col_widths = if collapsed {
            compute_col_widths_from_text(&raw.bbox, num_cols, &page_spans)
        } else {
            compute_col_widths(raw.cells.as_deref(), num_cols)
        };

        let row_heights = compute_row_heights(raw.cells.as_deref(), num_rows);
        let header_row = detect_header_row(raw, &rows, &page_spans);
        let cell_styles = extract_cell_styles(
            raw,
            num_rows,
            num_cols,
            &col_widths,
            collapsed,
            &page_spans,
            &page_drawings,
        );

        Ok(ResolvedTable {
            page_num: raw.page_num,
            bbox: raw.bbox,
            rows,
            num_rows,
            num_cols,
            col_widths: Some(col_widths),
            row_heights: Some(row_heights),
            header_row,
            cell_styles: Some(cell_styles),
        })
    }
}

/// Remove all-empty columns, then merge adjacent complementary columns.
///
/// Two neighboring columns are complementary when no row has content in
/// both; merging concatenates their cells. The merge loop is bounded by
/// the post-filter column count since each pass removes a column.
fn collapse_empty_columns(rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    if rows.is_empty() {
        return rows;
    }
    let num_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    if num_cols <= 1 {
        return rows;
    }

    let kept_indices: Vec<usize> = (0..num_cols)
        .filter(|&col| {
            rows.iter()
                .any(|row| row.get(col).is_some_and(|cell| !cell.trim().is_empty()))
        })
        .collect();
    if kept_indices.is_empty() {
        return rows;
    }

    let mut filtered: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            kept_indices
                .iter()
                .map(|&i| row.get(i).cloned().unwrap_or_default())
                .collect()
        })
        .collect();

    let max_passes = kept_indices.len();
    for _ in 0..max_passes {
        let cols = filtered.first().map_or(0, Vec::len);
        if cols <= 1 {
            break;
        }
        let Some(ci) = (0..cols - 1).find(|&ci| {
            !filtered.iter().any(|row| {
                let a = row.get(ci).map_or("", |c| c.trim());
                let b = row.get(ci + 1).map_or("", |c| c.trim());
                !a.is_empty() && !b.is_empty()
            })
        }) else {
            break;
        };
        for row in &mut filtered {
            let a = row.get(ci).map_or("", |c| c.trim()).to_string();
            let b = row.get(ci + 1).map_or("", |c| c.trim());
            let joined = format!("{} {}", a, b).trim().to_string();
            if let Some(cell) = row.get_mut(ci) {
                *cell = joined;
            }
            if ci + 1 < row.len() {
                row.remove(ci + 1);
            }
        }
    }

    filtered
}

/// Proportional column widths from first-row cell geometry.
///
/// Falls back to equal widths when geometry is missing or degenerate.
fn compute_col_widths(cells: Option<&[Rect]>, num_cols: usize) -> Vec<f32> {
    if num_cols == 0 {
        return Vec::new();
    }
    let equal = vec![1.0 / num_cols as f32; num_cols];
    let Some(cells) = cells else {
        return equal;
    };
    if cells.is_empty() {
        return equal;
    }

    let first_row = &cells[..num_cols.min(cells.len())];
    let mut x_edges: Vec<f32> = Vec::new();
    for cell in first_row {
        if !x_edges.iter().any(|&e| (e - cell.x0).abs() < f32::EPSILON) {
            x_edges.push(cell.x0);
        }
    }
    if let Some(last) = first_row.last() {
        x_edges.push(last.x1);
    }
    x_edges.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    if x_edges.len() < 2 {
        return equal;
    }
    let total_width = x_edges[x_edges.len() - 1] - x_edges[0];
    if total_width <= 0.0 {
        return equal;
    }

    let mut widths: Vec<f32> = x_edges
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) / total_width)
        .collect();
    // Merged cells can yield fewer edges than columns; pad with equal
    // splits and trim any excess.
    while widths.len() < num_cols {
        widths.push(1.0 / num_cols as f32);
    }
    widths.truncate(num_cols);

    let total: f32 = widths.iter().sum();
    if total > 0.0 {
        for w in &mut widths {
            *w /= total;
        }
    }
    widths
}

/// Infer proportional column widths from text positions inside the table.
///
/// Used when the grid was collapsed and cell geometry no longer maps to
/// logical columns. Merges span x-intervals, then takes the largest gaps
/// between intervals as column boundaries. Falls back to equal widths
/// when the clustering is inconclusive or yields a sliver column.
fn compute_col_widths_from_text(bbox: &Rect, num_cols: usize, spans: &[&TextSpan]) -> Vec<f32> {
    if num_cols == 0 {
        return Vec::new();
    }
    let equal = vec![1.0 / num_cols as f32; num_cols];
    let table_width = bbox.width();
    if table_width <= 0.0 {
        return equal;
    }

    let mut inside: Vec<&TextSpan> = spans
        .iter()
        .filter(|s| !s.text.trim().is_empty() && s.bbox.overlaps(bbox))
        .copied()
        .collect();
    if inside.is_empty() {
        return equal;
    }
    inside.sort_by(|a, b| {
        let ma = (a.bbox.x0 + a.bbox.x1) / 2.0;
        let mb = (b.bbox.x0 + b.bbox.x1) / 2.0;
        ma.partial_cmp(&mb).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut intervals: Vec<(f32, f32)> = Vec::new();
    for span in &inside {
        match intervals.last_mut() {
            Some(last) if span.bbox.x0 <= last.1 + 2.0 => {
                last.0 = last.0.min(span.bbox.x0);
                last.1 = last.1.max(span.bbox.x1);
            }
            _ => intervals.push((span.bbox.x0, span.bbox.x1)),
        }
    }
    if intervals.len() < 2 {
        return equal;
    }

    let mut gaps: Vec<(f32, f32, f32)> = intervals
        .windows(2)
        .filter_map(|pair| {
            let gap_start = pair[0].1;
            let gap_end = pair[1].0;
            let size = gap_end - gap_start;
            (size > 0.0).then_some((size, gap_start, gap_end))
        })
        .collect();
    gaps.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    if gaps.len() < num_cols - 1 {
        return equal;
    }

    let mut boundaries: Vec<f32> = gaps[..num_cols - 1]
        .iter()
        .map(|g| (g.1 + g.2) / 2.0)
        .collect();
    boundaries.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut edges = Vec::with_capacity(num_cols + 1);
    edges.push(bbox.x0);
    edges.extend(boundaries);
    edges.push(bbox.x1);

    let widths: Vec<f32> = edges
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) / table_width)
        .collect();
    if widths.iter().any(|&w| w < 0.01) {
        return equal;
    }

    let total: f32 = widths.iter().sum();
    if total > 0.0 {
        widths.iter().map(|w| w / total).collect()
    } else {
        equal
    }
}

/// Per-row fractional heights from unique cell y-boundaries.
///
/// Falls back to uniform heights when geometry is unavailable or the
/// boundary count disagrees with the row count (empty-row removal).
fn compute_row_heights(cells: Option<&[Rect]>, num_rows: usize) -> Vec<f32> {
    let uniform = vec![1.0 / num_rows.max(1) as f32; num_rows];
    let Some(cells) = cells else {
        return uniform;
    };
    if cells.is_empty() {
        return uniform;
    }

    // Decipoint keys make f32 boundaries hashable and deduplicated.
    let mut y_keys: Vec<i64> = cells
        .iter()
        .flat_map(|c| [(c.y0 * 10.0).round() as i64, (c.y1 * 10.0).round() as i64])
        .collect();
    y_keys.sort_unstable();
    y_keys.dedup();
    if y_keys.len() < 2 {
        return uniform;
    }

    let raw_heights: Vec<f32> = y_keys
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) as f32 / 10.0)
        .collect();
    if raw_heights.len() != num_rows {
        return uniform;
    }

    let total: f32 = raw_heights.iter().sum();
    if total <= 0.0 {
        return uniform;
    }
    raw_heights.iter().map(|h| h / total).collect()
}

/// Decide whether the first row is a header.
///
/// Requires at least two rows, then samples spans inside the first row's
/// cell geometry; the row is a header when over half the sample reads as
/// bold, by the extractor flag or by a bold/heavy/black font name.
fn detect_header_row(raw: &RawTable, rows: &[Vec<String>], spans: &[&TextSpan]) -> bool {
    if rows.len() < 2 {
        return false;
    }
    let Some(cells) = raw.cells.as_deref() else {
        return false;
    };
    let num_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    if cells.is_empty() || num_cols == 0 {
        return false;
    }

    let first_row = &cells[..num_cols.min(cells.len())];
    let header_rect = bounding_rect(first_row);

    let mut total = 0usize;
    let mut bold = 0usize;
    for span in spans {
        if !span.bbox.overlaps(&header_rect) {
            continue;
        }
        total += 1;
        if span.bold || crate::util::is_bold_font_name(&span.font) {
            bold += 1;
        }
    }

    total > 0 && bold as f32 / total as f32 > 0.5
}

fn bounding_rect(rects: &[Rect]) -> Rect {
    let mut out = Rect::new(f32::INFINITY, f32::INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY);
    for r in rects {
        out.x0 = out.x0.min(r.x0);
        out.y0 = out.y0.min(r.y0);
        out.x1 = out.x1.max(r.x1);
        out.y1 = out.y1.max(r.y1);
    }
    out
}

/// Extract per-cell styles matching the logical `rows` dimensions.
fn extract_cell_styles(
    raw: &RawTable,
    num_rows: usize,
    num_cols: usize,
    col_widths: &[f32],
    collapsed: bool,
    spans: &[&TextSpan],
    drawings: &[&Drawing],
) -> Vec<Vec<CellStyle>> {
    let raw_num_cols = raw.num_cols();
    let (h_lines, v_lines) = collect_page_lines(drawings);

    let mut styles = Vec::with_capacity(num_rows);
    for r_idx in 0..num_rows {
        let mut row_styles = Vec::with_capacity(num_cols);
        for c_idx in 0..num_cols {
            let cell_rect = cell_rect_for(
                raw, r_idx, c_idx, num_rows, num_cols, col_widths, collapsed, raw_num_cols,
            );
            let mut style = CellStyle::default();

            style.bg_color = detect_cell_background(&cell_rect, drawings);
            apply_cell_text_formatting(&mut style, &cell_rect, spans, drawings, collapsed);
            style.borders = match_borders(&cell_rect, &h_lines, &v_lines);

            row_styles.push(style);
        }
        styles.push(row_styles);
    }
    styles
}

/// Cell rectangle: direct geometry lookup on an uncollapsed grid,
/// otherwise approximated from proportional widths and equal row heights.
#[allow(clippy::too_many_arguments)]
fn cell_rect_for(
    raw: &RawTable,
    r_idx: usize,
    c_idx: usize,
    num_rows: usize,
    num_cols: usize,
    col_widths: &[f32],
    collapsed: bool,
    raw_num_cols: usize,
) -> Rect {
    if !collapsed {
        if let Some(cells) = raw.cells.as_deref() {
            let flat_idx = r_idx * raw_num_cols + c_idx;
            if let Some(rect) = cells.get(flat_idx) {
                return *rect;
            }
        }
    }

    let tbl = raw.bbox;
    let row_h = if num_rows > 0 {
        tbl.height() / num_rows as f32
    } else {
        tbl.height()
    };
    let (x0, col_w) = if col_widths.len() == num_cols {
        let offset: f32 = col_widths[..c_idx].iter().sum();
        (
            tbl.x0 + offset * tbl.width(),
            col_widths[c_idx] * tbl.width(),
        )
    } else {
        let col_w = if num_cols > 0 {
            tbl.width() / num_cols as f32
        } else {
            tbl.width()
        };
        (tbl.x0 + c_idx as f32 * col_w, col_w)
    };
    let y0 = tbl.y0 + r_idx as f32 * row_h;
    Rect::new(x0, y0, x0 + col_w, y0 + row_h)
}

/// Most-covering non-white fill behind the cell, if any.
fn detect_cell_background(cell_rect: &Rect, drawings: &[&Drawing]) -> Option<Rgb> {
    let cell_area = cell_rect.area();
    if cell_area <= 0.0 {
        return None;
    }

    let mut best_fill = None;
    let mut best_area = 0.0f32;
    for drawing in drawings {
        let Some(fill) = drawing.fill else {
            continue;
        };
        let Some(d_rect) = drawing_rect(drawing) else {
            continue;
        };
        let overlap = d_rect.intersection_area(cell_rect);
        if overlap / cell_area > TableResolver::BG_OVERLAP_MIN
            && overlap > best_area
            && fill != Rgb::WHITE
        {
            best_area = overlap;
            best_fill = Some(fill);
        }
    }
    best_fill
}

/// Bounding rect of a drawing's path items.
fn drawing_rect(drawing: &Drawing) -> Option<Rect> {
    let mut out: Option<Rect> = None;
    for item in &drawing.items {
        let r = match *item {
            DrawItem::Line { x0, y0, x1, y1 } => {
                Rect::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
            }
            DrawItem::Rect(r) => r,
        };
        out = Some(match out {
            Some(acc) => Rect::new(
                acc.x0.min(r.x0),
                acc.y0.min(r.y0),
                acc.x1.max(r.x1),
                acc.y1.max(r.y1),
            ),
            None => r,
        });
    }
    out
}

/// Fill in dominant text formatting, alignment, underline/strikethrough
/// and (for uncollapsed grids) per-span runs.
fn apply_cell_text_formatting(
    style: &mut CellStyle,
    cell_rect: &Rect,
    spans: &[&TextSpan],
    drawings: &[&Drawing],
    collapsed: bool,
) {
    let inside: Vec<&TextSpan> = spans
        .iter()
        .filter(|s| !s.text.trim().is_empty() && s.bbox.overlaps(cell_rect))
        .copied()
        .collect();
    let Some(dominant) = inside
        .iter()
        .max_by_key(|s| s.text.chars().count())
        .copied()
    else {
        return;
    };

    style.font = Some(dominant.font.clone());
    style.size = Some(dominant.size);
    style.bold = dominant.bold || dominant.font.to_lowercase().contains("bold");
    style.italic = dominant.italic || dominant.font.to_lowercase().contains("italic");
    style.color = Some(dominant.color);
    let (line_underline, line_strikethrough) = detect_line_decorations(cell_rect, drawings);
    style.underline = dominant.underline || line_underline;
    style.strikethrough = dominant.strikethrough || line_strikethrough;

    // Alignment from average span extents relative to the cell.
    let n = inside.len() as f32;
    let avg_x0: f32 = inside.iter().map(|s| s.bbox.x0).sum::<f32>() / n;
    let avg_x1: f32 = inside.iter().map(|s| s.bbox.x1).sum::<f32>() / n;
    let cell_center = (cell_rect.x0 + cell_rect.x1) / 2.0;
    let text_center = (avg_x0 + avg_x1) / 2.0;
    let left_gap = avg_x0 - cell_rect.x0;
    let right_gap = cell_rect.x1 - avg_x1;
    style.alignment = if (text_center - cell_center).abs() < 5.0 {
        Alignment::Center
    } else if right_gap < 5.0 && left_gap > 10.0 {
        Alignment::Right
    } else {
        Alignment::Left
    };

    // Collapsed grids have approximate cell rects that can span several
    // visual cells, so runs would carry garbled text.
    if inside.len() > 1 && !collapsed {
        let runs = inside
            .iter()
            .map(|s| TextRun {
                text: s.text.clone(),
                font: s.font.clone(),
                size: s.size,
                bold: s.bold || s.font.to_lowercase().contains("bold"),
                italic: s.italic || s.font.to_lowercase().contains("italic"),
                underline: s.underline,
                strikethrough: s.strikethrough,
                superscript: s.superscript,
                color: s.color,
                highlight: s.highlight,
                bbox: s.bbox,
            })
            .collect();
        style.runs = Some(runs);
    }
}

/// Detect underline and strikethrough from thin horizontal line drawings
/// inside the cell.
///
/// Most extractors do not flag underline on spans; the decoration shows up
/// only as a stroked line. An unfilled horizontal line at least 5pt long
/// within the cell's x-range counts: below the cell midline it reads as an
/// underline, at or above as a strikethrough.
fn detect_line_decorations(cell_rect: &Rect, drawings: &[&Drawing]) -> (bool, bool) {
    let mut underline = false;
    let mut strikethrough = false;
    let mid_y = (cell_rect.y0 + cell_rect.y1) / 2.0;

    for drawing in drawings {
        // Filled paths are backgrounds, not decorations.
        if drawing.fill.is_some() {
            continue;
        }
        for item in &drawing.items {
            let DrawItem::Line { x0, y0, x1, y1 } = *item else {
                continue;
            };
            if (y0 - y1).abs() > TableResolver::SEGMENT_TOLERANCE {
                continue;
            }
            if x0.min(x1) < cell_rect.x0 - 2.0 || x0.max(x1) > cell_rect.x1 + 2.0 {
                continue;
            }
            let pos = (y0 + y1) / 2.0;
            if pos < cell_rect.y0 || pos > cell_rect.y1 {
                continue;
            }
            if (x1 - x0).abs() < 5.0 {
                continue;
            }
            if pos > mid_y {
                underline = true;
            } else {
                strikethrough = true;
            }
        }
    }

    (underline, strikethrough)
}

/// Split stroked drawing items into horizontal and vertical segments.
///
/// Rectangle paths contribute their four edges; slivers under half a
/// point are skipped.
fn collect_page_lines(drawings: &[&Drawing]) -> (Vec<LineSeg>, Vec<LineSeg>) {
    let mut h_lines = Vec::new();
    let mut v_lines = Vec::new();
    let tol = TableResolver::SEGMENT_TOLERANCE;

    for drawing in drawings {
        let Some(color) = drawing.stroke else {
            continue;
        };
        let width = drawing.stroke_width;
        for item in &drawing.items {
            match *item {
                DrawItem::Line { x0, y0, x1, y1 } => {
                    if (y0 - y1).abs() <= tol {
                        h_lines.push(LineSeg {
                            start: x0.min(x1),
                            end: x0.max(x1),
                            pos: (y0 + y1) / 2.0,
                            width,
                            color,
                        });
                    } else if (x0 - x1).abs() <= tol {
                        v_lines.push(LineSeg {
                            start: y0.min(y1),
                            end: y0.max(y1),
                            pos: (x0 + x1) / 2.0,
                            width,
                            color,
                        });
                    }
                }
                DrawItem::Rect(r) => {
                    if r.width() < 0.5 || r.height() < 0.5 {
                        continue;
                    }
                    h_lines.push(LineSeg { start: r.x0, end: r.x1, pos: r.y0, width, color });
                    h_lines.push(LineSeg { start: r.x0, end: r.x1, pos: r.y1, width, color });
                    v_lines.push(LineSeg { start: r.y0, end: r.y1, pos: r.x0, width, color });
                    v_lines.push(LineSeg { start: r.y0, end: r.y1, pos: r.x1, width, color });
                }
            }
        }
    }

    (h_lines, v_lines)
}

/// Match collected segments against each side of a cell rectangle.
fn match_borders(cell_rect: &Rect, h_lines: &[LineSeg], v_lines: &[LineSeg]) -> Borders {
    let mut borders = Borders::default();
    let cell_w = cell_rect.width();
    let cell_h = cell_rect.height();

    let match_edge = |edge: f32, lines: &[LineSeg], span_lo: f32, span_hi: f32, span_len: f32| {
        let mut best_dist = TableResolver::BORDER_TOLERANCE + 1.0;
        let mut best = None;
        for seg in lines {
            let dist = (seg.pos - edge).abs();
            if dist <= TableResolver::BORDER_TOLERANCE && dist < best_dist {
                let overlap = seg.end.min(span_hi) - seg.start.max(span_lo);
                if span_len > 0.0 && overlap / span_len > TableResolver::BORDER_OVERLAP_MIN {
                    best_dist = dist;
                    best = Some(BorderSide {
                        width: seg.width,
                        color: seg.color,
                    });
                }
            }
        }
        best
    };

    borders.top = match_edge(cell_rect.y0, h_lines, cell_rect.x0, cell_rect.x1, cell_w);
    borders.bottom = match_edge(cell_rect.y1, h_lines, cell_rect.x0, cell_rect.x1, cell_w);
    borders.left = match_edge(cell_rect.x0, v_lines, cell_rect.y0, cell_rect.y1, cell_h);
    borders.right = match_edge(cell_rect.x1, v_lines, cell_rect.y0, cell_rect.y1, cell_h);
    borders
}
