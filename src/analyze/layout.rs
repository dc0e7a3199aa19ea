//! Page layout analysis: column detection and section breaks.
//!
//! Clusters span left edges to determine the column structure of a page
//! (capped at three columns) and reports large vertical gaps as section or
//! page break candidates.

use crate::model::TextSpan;

/// A detected reading column on a page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    /// Left boundary
    pub x_start: f32,
    /// Right boundary
    pub x_end: f32,
}

impl Column {
    /// Whether an x coordinate falls within this column.
    pub fn contains(&self, x: f32) -> bool {
        x >= self.x_start && x <= self.x_end
    }

    /// Distance from an x coordinate to the nearest column boundary.
    pub fn distance(&self, x: f32) -> f32 {
        (x - self.x_start).abs().min((x - self.x_end).abs())
    }
}

/// A large vertical gap between consecutive spans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionBreak {
    /// Bottom of the span above the gap
    pub y_start: f32,
    /// Top of the span below the gap
    pub y_end: f32,
    /// Gap height in points
    pub gap_size: f32,
}

/// Result of layout analysis for one page.
#[derive(Debug, Clone)]
pub struct PageLayout {
    /// Detected columns, left to right (1–3)
    pub columns: Vec<Column>,
    /// Spans assigned to each column, parallel to `columns`
    pub spans_by_column: Vec<Vec<TextSpan>>,
    /// Vertical gaps large enough to suggest a section break
    pub section_breaks: Vec<SectionBreak>,
}

impl PageLayout {
    /// Number of detected columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }
}

/// Analyzes the spatial layout of spans on a single page.
pub struct LayoutAnalyzer;

impl LayoutAnalyzer {
    /// Fraction of page width that constitutes a gap between columns.
    pub const COLUMN_GAP_THRESHOLD: f32 = 0.20;
    /// Fraction of page height that constitutes a section/page break.
    pub const VERTICAL_GAP_THRESHOLD: f32 = 0.30;
    /// Maximum number of supported columns.
    pub const MAX_COLUMNS: usize = 3;

    /// Analyze the layout of spans on a page.
    ///
    /// Degenerate input (no spans, non-positive page dimensions) yields a
    /// single full-width column holding all spans.
    pub fn analyze(spans: Vec<TextSpan>, page_width: f32, page_height: f32) -> PageLayout {
        if spans.is_empty() || page_width <= 0.0 || page_height <= 0.0 {
            log::debug!("No spans or invalid page dimensions; defaulting to single column");
            return Self::single_column(spans, page_width);
        }

        let section_breaks = Self::detect_section_breaks(&spans, page_height);

        // Cluster unique left edges by gap threshold.
        let mut x0_values: Vec<f32> = spans.iter().map(|s| s.bbox.x0).collect();
        x0_values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        x0_values.dedup_by(|a, b| (*a - *b).abs() < f32::EPSILON);

        let gap_threshold = Self::COLUMN_GAP_THRESHOLD * page_width;
        let mut clusters: Vec<Vec<f32>> = vec![vec![x0_values[0]]];
        for &x0 in &x0_values[1..] {
            let last = *clusters.last().unwrap().last().unwrap();
            if x0 - last > gap_threshold {
                clusters.push(vec![x0]);
            } else {
                clusters.last_mut().unwrap().push(x0);
            }
        }

        if clusters.len() > Self::MAX_COLUMNS {
            log::debug!(
                "Detected {} clusters; merging down to {} columns",
                clusters.len(),
                Self::MAX_COLUMNS
            );
            merge_clusters_to_max(&mut clusters, Self::MAX_COLUMNS);
        }

        let columns = compute_column_boundaries(&clusters, &spans, page_width);

        // Assign each span to the column containing its left edge, or the
        // nearest boundary for stray positions.
        let mut spans_by_column: Vec<Vec<TextSpan>> = vec![Vec::new(); columns.len()];
        for span in spans {
            let idx = assign_column(span.bbox.x0, &columns);
            spans_by_column[idx].push(span);
        }

        log::debug!(
            "Layout analysis complete: {} column(s), {} section break(s)",
            columns.len(),
            section_breaks.len()
        );

        PageLayout {
            columns,
            spans_by_column,
            section_breaks,
        }
    }

    fn single_column(spans: Vec<TextSpan>, page_width: f32) -> PageLayout {
        PageLayout {
            columns: vec![Column {
                x_start: 0.0,
                x_end: page_width.max(0.0),
            }],
            spans_by_column: vec![spans],
            section_breaks: Vec::new(),
        }
    }

    fn detect_section_breaks(spans: &[TextSpan], page_height: f32) -> Vec<SectionBreak> {
        if spans.len() < 2 {
            return Vec::new();
        }

        let gap_threshold = Self::VERTICAL_GAP_THRESHOLD * page_height;

        let mut sorted: Vec<&TextSpan> = spans.iter().collect();
        sorted.sort_by(|a, b| {
            a.bbox
                .y0
                .partial_cmp(&b.bbox.y0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    a.bbox
                        .x0
                        .partial_cmp(&b.bbox.x0)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
        });

        let mut breaks = Vec::new();
        for pair in sorted.windows(2) {
            let y_end_current = pair[0].bbox.y1;
            let y_start_next = pair[1].bbox.y0;
            let gap = y_start_next - y_end_current;
            if gap > gap_threshold {
                breaks.push(SectionBreak {
                    y_start: y_end_current,
                    y_end: y_start_next,
                    gap_size: gap,
                });
            }
        }
        breaks
    }
}

/// Merge the closest adjacent clusters until at most `max_columns` remain.
fn merge_clusters_to_max(clusters: &mut Vec<Vec<f32>>, max_columns: usize) {
    while clusters.len() > max_columns {
        let mut min_gap = f32::INFINITY;
        let mut merge_idx = 0;
        for i in 0..clusters.len() - 1 {
            let gap = clusters[i + 1][0] - *clusters[i].last().unwrap();
            if gap < min_gap {
                min_gap = gap;
                merge_idx = i;
            }
        }
        let merged = clusters.remove(merge_idx + 1);
        clusters[merge_idx].extend(merged);
    }
}

/// Compute `(x_start, x_end)` boundaries for each cluster.
///
/// `x_start` is the minimum x0 in the cluster; `x_end` is the maximum x1 of
/// any span whose x0 falls within the cluster range.
fn compute_column_boundaries(
    clusters: &[Vec<f32>],
    spans: &[TextSpan],
    page_width: f32,
) -> Vec<Column> {
    clusters
        .iter()
        .map(|cluster| {
            let x_start = cluster.iter().cloned().fold(f32::INFINITY, f32::min);
            let cluster_max = cluster.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
            let x_end = spans
                .iter()
                .filter(|s| s.bbox.x0 >= x_start && s.bbox.x0 <= cluster_max)
                .map(|s| s.bbox.x1)
                .fold(f32::NEG_INFINITY, f32::max);
            let x_end = if x_end.is_finite() {
                x_end
            } else {
                page_width.min(x_start + 100.0)
            };
            Column { x_start, x_end }
        })
        .collect()
}

/// Pick the column containing `x0`, or the one with the nearest boundary.
fn assign_column(x0: f32, columns: &[Column]) -> usize {
    let mut best_idx = 0;
    let mut best_dist = f32::INFINITY;
    for (idx, col) in columns.iter().enumerate() {
        if col.contains(x0) {
            return idx;
        }
        let dist = col.distance(x0);
        if dist < best_dist {
            best_dist = dist;
            best_idx = idx;
        }
    }
    best_idx
}
