//! Semantic analysis: the orchestration pass that turns extracted page
//! content into an ordered list of document elements.
//!
//! Combines font classification, per-page layout analysis, table
//! resolution, paragraph grouping, list and heading detection,
//! header/footer filtering, and hyperlink attachment.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use rayon::prelude::*;
use regex::Regex;

use crate::analyze::fonts::{FontClassifier, FontProfile};
use crate::analyze::layout::{Column, LayoutAnalyzer, PageLayout};
use crate::analyze::table::TableResolver;
use crate::model::{
    Alignment, BulletType, ExtractedDocument, Formatting, Hyperlink, ImageBlock, LinkRange,
    Margins, Orientation, PageMeta, RawTable, ResolvedTable, SemanticElement, TextRun, TextSpan,
};
use crate::options::AnalyzeOptions;
use crate::util::strip_subset_prefix;

/// Characters that mark an unordered list item.
const BULLET_CHARS: &str = "•●○■□-*▪";

/// Left-margin tolerance in points for alignment detection.
const ALIGNMENT_TOLERANCE: f32 = 10.0;

/// Upper clamp for inter-element spacing, in points.
const MAX_SPACING_BEFORE: f32 = 72.0;

/// A positioned element awaiting the final page sort; the sort keys are
/// stripped before emission.
struct Placed {
    y0: f32,
    x0: f32,
    col: usize,
    element: SemanticElement,
}

/// Orchestrates the analysis passes into a semantic element stream.
pub struct SemanticAnalyzer {
    options: AnalyzeOptions,
    ordered_list_re: Regex,
}

impl SemanticAnalyzer {
    /// A validated column must hold at least this many spans; otherwise a
    /// centered heading or stray text would read as a column.
    pub const MIN_SPANS_PER_COLUMN: usize = 3;

    /// Create an analyzer with the given options.
    pub fn new(options: AnalyzeOptions) -> Self {
        Self {
            options,
            // Digits, a single letter, or roman numerals followed by '.' or ')'.
            ordered_list_re: Regex::new(r"^(\d+|[a-zA-Z]|[ivxlcdmIVXLCDM]+)[.)]\s").unwrap(),
        }
    }

    /// Produce the ordered semantic element list for a document.
    pub fn analyze(&self, doc: &ExtractedDocument) -> Vec<SemanticElement> {
        // Resolve raw grids first; their bounding boxes drive the
        // text-in-table filter. A degenerate grid skips only itself.
        let tables: Vec<ResolvedTable> = doc
            .tables
            .iter()
            .filter_map(
                |raw| match TableResolver::resolve(raw, &doc.spans, &doc.drawings) {
                    Ok(table) => Some(table),
                    Err(err) => {
                        log::warn!("Skipping table on page {}: {}", raw.page_num, err);
                        None
                    }
                },
            )
            .collect();

        let spans = filter_spans_in_tables(&doc.spans, &tables);

        let mut pages = doc.pages.clone();
        compute_content_margins(&mut pages, &spans, &doc.images, &doc.tables);

        let profile = FontClassifier::classify(&spans);
        let body_size = profile.body_font.size;
        log::debug!(
            "Font analysis done. Body: {} @ {}pt",
            profile.body_font.name,
            body_size
        );

        let (header_texts, footer_texts, spans) = detect_headers_footers(&spans, &pages);
        if !header_texts.is_empty() {
            log::debug!("Detected header text(s): {:?}", header_texts);
        }
        if !footer_texts.is_empty() {
            log::debug!("Detected footer text(s): {:?}", footer_texts);
        }

        let mut spans_by_page: BTreeMap<usize, Vec<TextSpan>> = BTreeMap::new();
        for span in spans {
            spans_by_page.entry(span.page_num).or_default().push(span);
        }

        let mut page_nums: BTreeSet<usize> = spans_by_page.keys().copied().collect();
        page_nums.extend(doc.images.iter().map(|i| i.page_num));
        page_nums.extend(tables.iter().map(|t| t.page_num));

        let jobs: Vec<(usize, Vec<TextSpan>)> = page_nums
            .iter()
            .map(|&pn| (pn, spans_by_page.remove(&pn).unwrap_or_default()))
            .collect();

        let process = |(page_num, page_spans): (usize, Vec<TextSpan>)| {
            (
                page_num,
                self.process_page(
                    page_num,
                    page_spans,
                    &doc.images,
                    &tables,
                    &pages,
                    &profile,
                    body_size,
                ),
            )
        };
        let mut page_results: Vec<(usize, Vec<Placed>)> = if self.options.parallel {
            jobs.into_par_iter().map(process).collect()
        } else {
            jobs.into_iter().map(process).collect()
        };
        page_results.sort_by_key(|(pn, _)| *pn);

        let mut elements: Vec<SemanticElement> = Vec::new();
        let mut prev_page: Option<usize> = None;
        for (page_num, placed) in page_results {
            if prev_page.is_some_and(|p| p != page_num) {
                elements.push(page_break_for(page_num, &pages));
            }
            prev_page = Some(page_num);
            elements.extend(placed.into_iter().map(|p| p.element));
        }

        attach_links(&mut elements, &doc.links);

        if !footer_texts.is_empty() {
            elements.insert(
                0,
                SemanticElement::Footer {
                    text: footer_texts.join("\n"),
                },
            );
        }
        if !header_texts.is_empty() {
            elements.insert(
                0,
                SemanticElement::Header {
                    text: header_texts.join("\n"),
                },
            );
        }

        log::info!("Semantic analysis complete: {} elements", elements.len());
        elements
    }

    /// Analyze one page: layout, grouping, image/table placement, sort.
    #[allow(clippy::too_many_arguments)]
    fn process_page(
        &self,
        page_num: usize,
        page_spans: Vec<TextSpan>,
        images: &[ImageBlock],
        tables: &[ResolvedTable],
        pages: &[PageMeta],
        profile: &FontProfile,
        body_size: f32,
    ) -> Vec<Placed> {
        let (page_width, page_height) = page_dimensions(pages, page_num);
        let layout = LayoutAnalyzer::analyze(page_spans, page_width, page_height);
        let multi_column = validate_columns(&layout);

        let mut placed: Vec<Placed> = Vec::new();
        if multi_column {
            log::debug!(
                "Page {}: multi-column layout ({} columns)",
                page_num,
                layout.num_columns()
            );
            for (col_idx, col_spans) in layout.spans_by_column.iter().enumerate() {
                let body_x0 = estimate_body_x0(col_spans);
                placed.extend(self.group_spans(
                    col_spans, page_num, body_size, body_x0, profile, page_width, col_idx,
                ));
            }
        } else {
            let all_spans: Vec<TextSpan> =
                layout.spans_by_column.into_iter().flatten().collect();
            let body_x0 = estimate_body_x0(&all_spans);
            placed.extend(self.group_spans(
                &all_spans, page_num, body_size, body_x0, profile, page_width, 0,
            ));
        }

        let columns = &layout.columns;
        for img in images.iter().filter(|i| i.page_num == page_num) {
            placed.push(Placed {
                y0: img.bbox.y0,
                x0: img.bbox.x0,
                col: placement_column(img.bbox.x0, columns, multi_column),
                element: SemanticElement::Image {
                    path: img.path.clone(),
                    width: img.width,
                    height: img.height,
                    page_num,
                    merge_up: false,
                },
            });
        }
        for table in tables.iter().filter(|t| t.page_num == page_num) {
            placed.push(Placed {
                y0: table.bbox.y0,
                x0: table.bbox.x0,
                col: placement_column(table.bbox.x0, columns, multi_column),
                element: SemanticElement::Table(table.clone()),
            });
        }

        // Within-column vertical order, columns left to right.
        placed.sort_by(|a, b| {
            a.col
                .cmp(&b.col)
                .then_with(|| {
                    a.y0.partial_cmp(&b.y0)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .then_with(|| {
                    a.x0.partial_cmp(&b.x0)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
        });

        flag_image_merges(&mut placed);
        placed
    }

    /// Group sorted spans into finalized elements.
    #[allow(clippy::too_many_arguments)]
    fn group_spans(
        &self,
        spans: &[TextSpan],
        page_num: usize,
        body_size: f32,
        body_x0: f32,
        profile: &FontProfile,
        page_width: f32,
        col: usize,
    ) -> Vec<Placed> {
        if spans.is_empty() {
            return Vec::new();
        }

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

        let mut elements = Vec::new();
        let mut group: Vec<&TextSpan> = vec![sorted[0]];
        let mut prev_y1 = 0.0f32;

        for &span in &sorted[1..] {
            if self.should_merge(group[group.len() - 1], span, body_size, page_width) {
                group.push(span);
            } else {
                let group_y1 = group[group.len() - 1].bbox.y1;
                elements.push(self.finalize_group(
                    &group, page_num, body_size, body_x0, profile, page_width, prev_y1, col,
                ));
                prev_y1 = group_y1;
                group = vec![span];
            }
        }
        elements.push(self.finalize_group(
            &group, page_num, body_size, body_x0, profile, page_width, prev_y1, col,
        ));
        elements
    }

    /// List items never merge; otherwise spans merge when style matches,
    /// the vertical gap is under 1.5x the font size, and the previous line
    /// reached far enough right to look like a wrapped continuation.
    fn should_merge(
        &self,
        prev: &TextSpan,
        curr: &TextSpan,
        body_size: f32,
        page_width: f32,
    ) -> bool {
        if self.is_list_start(&curr.text) {
            return false;
        }
        if prev.font != curr.font
            || prev.size != curr.size
            || prev.bold != curr.bold
            || prev.italic != curr.italic
        {
            return false;
        }

        let size = if curr.size > 0.0 { curr.size } else { body_size };
        let y_gap = curr.bbox.y0 - prev.bbox.y1;
        if y_gap >= 1.5 * size {
            return false;
        }

        // A line that stops short of the right margin ended deliberately
        // (address block, signature), not because the text wrapped.
        let line_width = prev.bbox.x1 - prev.bbox.x0;
        let content_width = (page_width - 144.0).max(page_width * 0.6);
        if content_width > 0.0 && line_width < content_width * 0.6 {
            return false;
        }

        true
    }

    fn is_list_start(&self, text: &str) -> bool {
        let stripped = text.trim_start();
        let Some(first) = stripped.chars().next() else {
            return false;
        };
        BULLET_CHARS.contains(first) || self.ordered_list_re.is_match(stripped)
    }

    /// Convert a merged group into a single placed element, classified as
    /// heading, list item, or paragraph in that priority order.
    #[allow(clippy::too_many_arguments)]
    fn finalize_group(
        &self,
        group: &[&TextSpan],
        page_num: usize,
        body_size: f32,
        body_x0: f32,
        profile: &FontProfile,
        page_width: f32,
        prev_y1: f32,
        col: usize,
    ) -> Placed {
        let rep = group[0];
        let clean_font = strip_subset_prefix(&rep.font);
        let size = if rep.size > 0.0 { rep.size } else { body_size };
        let fallback_font = self.mapped_font(profile, clean_font);

        // Merged text: line gaps wider than the font size become hard
        // breaks, anything tighter joins with a space.
        let mut merged_text = String::new();
        for (i, span) in group.iter().enumerate() {
            if i > 0 {
                let y_gap = span.bbox.y0 - group[i - 1].bbox.y1;
                merged_text.push(if y_gap > size { '\n' } else { ' ' });
            }
            merged_text.push_str(&span.text);
        }
        let merged_text = merged_text.trim().to_string();

        let runs = self.build_runs(group, profile, body_size, size);

        let y0 = rep.bbox.y0;
        let x0 = rep.bbox.x0;
        let alignment = detect_alignment(group, body_x0, page_width);
        let spacing_before = (y0 - prev_y1).clamp(0.0, MAX_SPACING_BEFORE);
        let mut indent_left = (x0 - body_x0).max(0.0);
        if indent_left < 5.0 {
            indent_left = 0.0;
        }
        let line_spacing = detect_line_spacing(group, size);
        let first_line_indent = detect_first_line_indent(group);

        let formatting = Formatting {
            font: fallback_font,
            size,
            bold: rep.bold,
            italic: rep.italic,
            color: rep.color,
            alignment,
            spacing_before,
            indent_left,
            line_spacing,
            first_line_indent: None,
        };

        if let Some(level) = profile.heading_level(clean_font, size) {
            return Placed {
                y0,
                x0,
                col,
                element: SemanticElement::Heading {
                    text: merged_text,
                    level,
                    page_num,
                    formatting,
                },
            };
        }

        if let Some((text, level, bullet)) = self.detect_list(&merged_text, x0, body_x0) {
            return Placed {
                y0,
                x0,
                col,
                element: SemanticElement::ListItem {
                    text,
                    level,
                    bullet,
                    page_num,
                    formatting,
                },
            };
        }

        Placed {
            y0,
            x0,
            col,
            element: SemanticElement::Paragraph {
                text: merged_text,
                runs,
                page_num,
                formatting: Formatting {
                    first_line_indent,
                    ..formatting
                },
                links: Vec::new(),
            },
        }
    }

    /// Per-span runs preserving mixed formatting and source geometry.
    fn build_runs(
        &self,
        group: &[&TextSpan],
        profile: &FontProfile,
        body_size: f32,
        size: f32,
    ) -> Vec<TextRun> {
        let mut runs = Vec::with_capacity(group.len());
        for (i, span) in group.iter().enumerate() {
            let mut text = span.text.clone();
            if i > 0 {
                let y_gap = span.bbox.y0 - group[i - 1].bbox.y1;
                if y_gap > size {
                    runs.push(TextRun::line_break());
                } else {
                    text.insert(0, ' ');
                }
            }
            let clean = strip_subset_prefix(&span.font);
            runs.push(TextRun {
                text,
                font: self.mapped_font(profile, clean),
                size: if span.size > 0.0 { span.size } else { body_size },
                bold: span.bold,
                italic: span.italic,
                underline: span.underline,
                strikethrough: span.strikethrough,
                superscript: span.superscript,
                color: span.color,
                highlight: span.highlight,
                bbox: span.bbox,
            });
        }
        runs
    }

    fn mapped_font(&self, profile: &FontProfile, clean_font: &str) -> String {
        profile
            .font_map
            .get(clean_font)
            .cloned()
            .unwrap_or_else(|| self.options.fallback_font.clone())
    }

    /// Detect a list marker; returns the stripped text, nesting level,
    /// and marker kind.
    fn detect_list(
        &self,
        text: &str,
        x0: f32,
        body_x0: f32,
    ) -> Option<(String, usize, BulletType)> {
        let stripped = text.trim_start();
        let first = stripped.chars().next()?;

        let indent_pts = (x0 - body_x0).max(0.0);
        let level = (indent_pts / 20.0) as usize;

        if BULLET_CHARS.contains(first) {
            let rest = stripped[first.len_utf8()..].trim_start().to_string();
            return Some((rest, level, BulletType::Bullet));
        }

        if let Some(m) = self.ordered_list_re.find(stripped) {
            let rest = stripped[m.end()..].trim_start().to_string();
            return Some((rest, level, BulletType::Number));
        }

        None
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzeOptions::default())
    }
}

/// Whether the detected multi-column layout holds up: at least two
/// columns must each carry enough spans.
fn validate_columns(layout: &PageLayout) -> bool {
    if layout.num_columns() <= 1 {
        return false;
    }
    let real_cols = layout
        .spans_by_column
        .iter()
        .filter(|spans| spans.len() >= SemanticAnalyzer::MIN_SPANS_PER_COLUMN)
        .count();
    real_cols >= 2
}

/// Column index for a non-text element; single-column pages use 0.
fn placement_column(x0: f32, columns: &[Column], multi_column: bool) -> usize {
    if !multi_column || columns.len() <= 1 {
        return 0;
    }
    let mut best_idx = 0;
    let mut best_dist = f32::INFINITY;
    for (idx, column) in columns.iter().enumerate() {
        if column.contains(x0) {
            return idx;
        }
        let dist = column.distance(x0);
        if dist < best_dist {
            best_dist = dist;
            best_idx = idx;
        }
    }
    best_idx
}

/// Mark image elements that vertically overlap the preceding image so the
/// writer can place them side by side in one paragraph.
fn flag_image_merges(placed: &mut [Placed]) {
    let mut i = 0;
    while i < placed.len() {
        let SemanticElement::Image { height, .. } = placed[i].element else {
            i += 1;
            continue;
        };
        let run_y0 = placed[i].y0;
        let mut run_y1 = run_y0 + height;
        let mut j = i + 1;
        while j < placed.len() {
            let next_y0 = placed[j].y0;
            let SemanticElement::Image {
                height: next_height,
                ref mut merge_up,
                ..
            } = placed[j].element
            else {
                break;
            };
            let next_y1 = next_y0 + next_height;
            if next_y0 < run_y1 && next_y1 > run_y0 {
                *merge_up = true;
                run_y1 = run_y1.max(next_y1);
                j += 1;
            } else {
                break;
            }
        }
        i = j;
    }
}

/// Page break element carrying the geometry of the upcoming page.
fn page_break_for(page_num: usize, pages: &[PageMeta]) -> SemanticElement {
    let meta = pages.iter().find(|p| p.page_num == page_num);
    SemanticElement::PageBreak {
        page_num,
        orientation: match meta {
            Some(m) if m.is_landscape => Orientation::Landscape,
            _ => Orientation::Portrait,
        },
        margins: meta.and_then(|m| m.margins),
    }
}

/// `(width, height)` for a page, defaulting to US Letter.
fn page_dimensions(pages: &[PageMeta], page_num: usize) -> (f32, f32) {
    pages
        .iter()
        .find(|p| p.page_num == page_num)
        .map(|p| (p.width, p.height))
        .unwrap_or((612.0, 792.0))
}

/// Detect repeated header/footer text across pages.
///
/// Text whose box sits entirely in the top 8% zone of the page on enough
/// pages (at least half of them, and never fewer than three) is a header;
/// the bottom 8% zone likewise yields footers. Documents under three
/// pages are left untouched. Returns the texts in first-seen order plus
/// the remaining spans.
pub fn detect_headers_footers(
    spans: &[TextSpan],
    pages: &[PageMeta],
) -> (Vec<String>, Vec<String>, Vec<TextSpan>) {
    const ZONE: f32 = 0.08;
    const MIN_PAGE_RATIO: f32 = 0.50;
    const MIN_PAGE_COUNT: usize = 3;

    let page_count = if pages.is_empty() {
        spans.iter().map(|s| s.page_num).max().map_or(0, |m| m + 1)
    } else {
        pages.len()
    };
    if page_count < 3 || spans.is_empty() {
        return (Vec::new(), Vec::new(), spans.to_vec());
    }

    let page_height = |page_num: usize| -> f32 {
        pages
            .iter()
            .find(|p| p.page_num == page_num)
            .map_or(792.0, |p| p.height)
    };

    let mut top_pages: HashMap<&str, HashSet<usize>> = HashMap::new();
    let mut bottom_pages: HashMap<&str, HashSet<usize>> = HashMap::new();
    for span in spans {
        let text = span.text.trim();
        if text.is_empty() {
            continue;
        }
        let ph = page_height(span.page_num);
        if span.bbox.y1 <= ph * ZONE {
            top_pages.entry(text).or_default().insert(span.page_num);
        } else if span.bbox.y0 >= ph * (1.0 - ZONE) {
            bottom_pages.entry(text).or_default().insert(span.page_num);
        }
    }

    let needed = (page_count as f32 * MIN_PAGE_RATIO).max(MIN_PAGE_COUNT as f32);
    let header_set: HashSet<&str> = top_pages
        .iter()
        .filter(|(_, pages)| pages.len() as f32 >= needed)
        .map(|(text, _)| *text)
        .collect();
    let footer_set: HashSet<&str> = bottom_pages
        .iter()
        .filter(|(_, pages)| pages.len() as f32 >= needed)
        .map(|(text, _)| *text)
        .collect();

    if header_set.is_empty() && footer_set.is_empty() {
        return (Vec::new(), Vec::new(), spans.to_vec());
    }

    let mut headers: Vec<String> = Vec::new();
    let mut footers: Vec<String> = Vec::new();
    let mut remaining: Vec<TextSpan> = Vec::new();
    for span in spans {
        let text = span.text.trim();
        if header_set.contains(text) {
            if !headers.iter().any(|h| h == text) {
                headers.push(text.to_string());
            }
            continue;
        }
        if footer_set.contains(text) {
            if !footers.iter().any(|f| f == text) {
                footers.push(text.to_string());
            }
            continue;
        }
        remaining.push(span.clone());
    }

    (headers, footers, remaining)
}

/// Alignment from average block positions: centered when the text
/// midpoint sits near the page center, right-aligned when the text hugs
/// the right margin while starting clear of the body margin.
fn detect_alignment(group: &[&TextSpan], body_x0: f32, page_width: f32) -> Alignment {
    if group.is_empty() || page_width <= 0.0 {
        return Alignment::Left;
    }

    let n = group.len() as f32;
    let avg_x0: f32 = group.iter().map(|s| s.bbox.x0).sum::<f32>() / n;
    let avg_x1: f32 = group.iter().map(|s| s.bbox.x1).sum::<f32>() / n;

    let text_center = (avg_x0 + avg_x1) / 2.0;
    let page_center = page_width / 2.0;
    if (text_center - page_center).abs() < ALIGNMENT_TOLERANCE {
        return Alignment::Center;
    }

    let right_margin = page_width * 0.95;
    if avg_x1 >= right_margin && avg_x0 > body_x0 + ALIGNMENT_TOLERANCE {
        return Alignment::Right;
    }

    Alignment::Left
}

/// Line-spacing ratio from average top-edge gaps within a group, rounded
/// to one decimal. Only ratios meaningfully away from single spacing in
/// the 0.8–3.0 window are reported.
fn detect_line_spacing(group: &[&TextSpan], size: f32) -> Option<f32> {
    if group.len() < 2 || size <= 0.0 {
        return None;
    }
    let gaps: Vec<f32> = group
        .windows(2)
        .map(|pair| pair[1].bbox.y0 - pair[0].bbox.y0)
        .filter(|gap| *gap > 0.0)
        .collect();
    if gaps.is_empty() {
        return None;
    }
    let avg_gap = gaps.iter().sum::<f32>() / gaps.len() as f32;
    let ratio = (avg_gap / size * 10.0).round() / 10.0;
    ((0.8..=3.0).contains(&ratio) && (ratio - 1.0).abs() > 0.15).then_some(ratio)
}

/// First-line indent when the opening line starts noticeably right of the
/// following lines.
fn detect_first_line_indent(group: &[&TextSpan]) -> Option<f32> {
    if group.len() < 2 {
        return None;
    }
    let first_x0 = group[0].bbox.x0;
    let rest_avg =
        group[1..].iter().map(|s| s.bbox.x0).sum::<f32>() / (group.len() - 1) as f32;
    let diff = first_x0 - rest_avg;
    (diff > 8.0).then_some(diff)
}

/// Most common span left edge, weighted by text length, as the body left
/// margin. Ties resolve to the leftmost candidate.
pub fn estimate_body_x0(spans: &[TextSpan]) -> f32 {
    if spans.is_empty() {
        return 0.0;
    }
    let mut weights: HashMap<i64, usize> = HashMap::new();
    for span in spans {
        let key = (span.bbox.x0 * 10.0).round() as i64;
        *weights.entry(key).or_insert(0) += span.weight();
    }
    let mut ranked: Vec<(i64, usize)> = weights.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked[0].0 as f32 / 10.0
}

/// Drop spans whose center point falls inside a same-page table, so cell
/// text is not duplicated as body paragraphs.
pub fn filter_spans_in_tables(spans: &[TextSpan], tables: &[ResolvedTable]) -> Vec<TextSpan> {
    if tables.is_empty() {
        return spans.to_vec();
    }
    spans
        .iter()
        .filter(|span| {
            let (cx, cy) = span.bbox.center();
            !tables
                .iter()
                .any(|t| t.page_num == span.page_num && t.bbox.contains(cx, cy))
        })
        .cloned()
        .collect()
}

/// Derive per-page margins from the content bounding box, with a 14pt
/// floor, filling in pages whose extractor metadata carried none.
pub fn compute_content_margins(
    pages: &mut [PageMeta],
    spans: &[TextSpan],
    images: &[ImageBlock],
    tables: &[RawTable],
) {
    const MIN_MARGIN: f32 = 14.0;
    if pages.is_empty() {
        return;
    }

    let mut bounds: HashMap<usize, (f32, f32, f32, f32)> = HashMap::new();
    let mut extend = |page_num: usize, bbox: &crate::model::Rect| {
        if bbox.x1 <= bbox.x0 || bbox.y1 <= bbox.y0 {
            return;
        }
        let entry = bounds.entry(page_num).or_insert((
            f32::INFINITY,
            f32::INFINITY,
            f32::NEG_INFINITY,
            f32::NEG_INFINITY,
        ));
        entry.0 = entry.0.min(bbox.x0);
        entry.1 = entry.1.min(bbox.y0);
        entry.2 = entry.2.max(bbox.x1);
        entry.3 = entry.3.max(bbox.y1);
    };
    for span in spans {
        extend(span.page_num, &span.bbox);
    }
    for img in images {
        extend(img.page_num, &img.bbox);
    }
    for table in tables {
        extend(table.page_num, &table.bbox);
    }

    for page in pages.iter_mut() {
        if page.margins.is_some() {
            continue;
        }
        let Some(&(min_x, min_y, max_x, max_y)) = bounds.get(&page.page_num) else {
            continue;
        };
        page.margins = Some(Margins {
            top: min_y.max(MIN_MARGIN),
            bottom: (page.height - max_y).max(MIN_MARGIN),
            left: min_x.max(MIN_MARGIN),
            right: (page.width - max_x).max(MIN_MARGIN),
        });
    }
}

/// Attach hyperlinks to paragraphs by run-bbox overlap.
///
/// The anchor range uses the first occurrence of the overlapped text;
/// when the anchor repeats within a paragraph the earliest occurrence
/// wins, even if the link sat on a later one.
pub fn attach_links(elements: &mut [SemanticElement], links: &[Hyperlink]) {
    if links.is_empty() {
        return;
    }

    let mut links_by_page: HashMap<usize, Vec<&Hyperlink>> = HashMap::new();
    for link in links {
        links_by_page.entry(link.page_num).or_default().push(link);
    }

    for element in elements.iter_mut() {
        let SemanticElement::Paragraph {
            text,
            runs,
            page_num,
            links: elem_links,
            ..
        } = element
        else {
            continue;
        };
        let Some(page_links) = links_by_page.get(page_num) else {
            continue;
        };
        if text.is_empty() || runs.is_empty() {
            continue;
        }

        for link in page_links {
            let parts: Vec<&str> = runs
                .iter()
                .filter(|run| run.bbox.overlaps(&link.bbox))
                .map(|run| run.text.as_str())
                .collect();
            if parts.is_empty() {
                continue;
            }
            let link_text = parts.join(" ").trim().to_string();
            if let Some(start) = text.find(&link_text) {
                elem_links.push(LinkRange {
                    end: start + link_text.len(),
                    start,
                    text: link_text,
                    uri: link.uri.clone(),
                });
            }
        }
    }
}
