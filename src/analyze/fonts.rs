//! Font classification: body font election, heading levels, fallback mapping.
//!
//! Examines every text span's font metadata to determine the document's body
//! font, classify larger/bolder font+size combinations into heading levels,
//! and build a map from embedded PDF font names to standard word-processor
//! font families.

use std::collections::HashMap;

use crate::model::TextSpan;
use crate::util::{size_key, strip_subset_prefix, normalize_font_name};

// Known font family names checked after the generic substrings.
const SERIF_FONTS: [&str; 5] = ["times", "georgia", "garamond", "cambria", "palatino"];
const MONO_FONTS: [&str; 3] = ["courier", "consolas", "monaco"];
const SANS_FONTS: [&str; 5] = ["helvetica", "arial", "calibri", "verdana", "tahoma"];

/// Font usage profile of a document, computed once per conversion run.
#[derive(Debug, Clone, PartialEq)]
pub struct FontProfile {
    /// The dominant body font
    pub body_font: BodyFont,
    /// Heading font+size combinations, sorted by (level, -size)
    pub heading_fonts: Vec<HeadingFont>,
    /// Map from cleaned font names to fallback families
    pub font_map: HashMap<String, String>,
}

/// The document body font.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyFont {
    /// Cleaned font name
    pub name: String,
    /// Font size in points
    pub size: f32,
}

/// A font+size combination classified as a heading.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingFont {
    /// Cleaned font name
    pub name: String,
    /// Font size in points
    pub size: f32,
    /// Heading level, 1–3
    pub level: u8,
}

impl FontProfile {
    /// The default profile returned for documents with no usable spans.
    pub fn default_profile() -> Self {
        Self {
            body_font: BodyFont {
                name: "Arial".to_string(),
                size: 12.0,
            },
            heading_fonts: Vec::new(),
            font_map: HashMap::new(),
        }
    }

    /// Heading level for a cleaned font name and size, if classified.
    pub fn heading_level(&self, font: &str, size: f32) -> Option<u8> {
        let key = size_key(size);
        self.heading_fonts
            .iter()
            .find(|h| h.name == font && size_key(h.size) == key)
            .map(|h| h.level)
    }
}

/// Classifies font usage across all spans of a document.
pub struct FontClassifier;

impl FontClassifier {
    /// Heading size thresholds relative to the body font size.
    pub const HEADING1_RATIO: f32 = 1.4;
    /// Level 2 threshold.
    pub const HEADING2_RATIO: f32 = 1.2;
    /// Level 3 threshold; additionally requires bold.
    pub const HEADING3_RATIO: f32 = 1.05;

    /// Classify all spans into a [`FontProfile`].
    ///
    /// Each (font, size) combination is weighted by the character length of
    /// its text (minimum 1), so short labels cannot outweigh body prose. The
    /// body font is the highest-weighted combination; ties resolve by name
    /// then size so repeated runs are deterministic.
    pub fn classify(spans: &[TextSpan]) -> FontProfile {
        if spans.is_empty() {
            log::debug!("No spans provided; returning default font profile");
            return FontProfile::default_profile();
        }

        // Weighted occurrence count per (font, decipoint size), plus a bold
        // marker used for level-3 heading detection.
        let mut weights: HashMap<(String, i32), usize> = HashMap::new();
        let mut sizes: HashMap<(String, i32), f32> = HashMap::new();
        let mut bold: HashMap<(String, i32), bool> = HashMap::new();

        for span in spans {
            let clean = strip_subset_prefix(&span.font).to_string();
            let key = (clean, size_key(span.size));
            *weights.entry(key.clone()).or_insert(0) += span.weight();
            sizes.entry(key.clone()).or_insert(span.size);
            let entry = bold.entry(key).or_insert(false);
            *entry = *entry || span.bold;
        }

        let mut ranked: Vec<(&(String, i32), &usize)> = weights.iter().collect();
        ranked.sort_by(|a, b| {
            b.1.cmp(a.1)
                .then_with(|| a.0 .0.cmp(&b.0 .0))
                .then_with(|| a.0 .1.cmp(&b.0 .1))
        });

        let (body_key, _) = ranked[0];
        let body_size = sizes[body_key];
        let body_font = BodyFont {
            name: body_key.0.clone(),
            size: body_size,
        };
        log::debug!("Body font detected: {} @ {:.1}pt", body_font.name, body_size);

        // Heading candidates: strictly larger than body, level by size ratio.
        let mut heading_fonts = Vec::new();
        if body_size > 0.0 {
            for (key, _) in &ranked {
                let size = sizes[*key];
                if size <= body_size {
                    continue;
                }
                let ratio = size / body_size;
                let is_bold = bold.get(*key).copied().unwrap_or(false);
                let level = if ratio >= Self::HEADING1_RATIO {
                    1
                } else if ratio >= Self::HEADING2_RATIO {
                    2
                } else if ratio >= Self::HEADING3_RATIO && is_bold {
                    3
                } else {
                    continue;
                };
                log::debug!(
                    "Heading level {}: {} @ {:.1}pt (ratio {:.2})",
                    level,
                    key.0,
                    size,
                    ratio
                );
                heading_fonts.push(HeadingFont {
                    name: key.0.clone(),
                    size,
                    level,
                });
            }
        }
        heading_fonts.sort_by(|a, b| {
            a.level
                .cmp(&b.level)
                .then_with(|| size_key(b.size).cmp(&size_key(a.size)))
        });

        // Fallback mapping for every distinct cleaned font name.
        let font_map = weights
            .keys()
            .map(|(name, _)| (name.clone(), map_to_fallback(name).to_string()))
            .collect();

        FontProfile {
            body_font,
            heading_fonts,
            font_map,
        }
    }
}

/// Map a PDF font name to a word-processor fallback family.
///
/// Rules are evaluated in order: serif (but not sans-serif) or a known serif
/// family maps to Times New Roman; monospace to Courier New; sans-serif to
/// Arial; anything else defaults to Arial.
pub fn map_to_fallback(font_name: &str) -> &'static str {
    let lower = normalize_font_name(font_name);

    if lower.contains("serif") && !lower.contains("sans") {
        return "Times New Roman";
    }
    if SERIF_FONTS.iter().any(|f| lower.contains(f)) {
        return "Times New Roman";
    }

    if lower.contains("mono") || MONO_FONTS.iter().any(|f| lower.contains(f)) {
        return "Courier New";
    }

    if lower.contains("sans") || SANS_FONTS.iter().any(|f| lower.contains(f)) {
        return "Arial";
    }

    "Arial"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rect;

    fn span(text: &str, font: &str, size: f32, bold: bool) -> TextSpan {
        let mut s = TextSpan::new(text, Rect::new(0.0, 0.0, 100.0, 12.0), font, size);
        s.bold = bold;
        s
    }

    #[test]
    fn test_empty_input_returns_default() {
        let profile = FontClassifier::classify(&[]);
        assert_eq!(profile.body_font.name, "Arial");
        assert_eq!(profile.body_font.size, 12.0);
        assert!(profile.heading_fonts.is_empty());
        assert!(profile.font_map.is_empty());
    }

    #[test]
    fn test_body_font_is_length_weighted() {
        // Many short labels in a large font vs. one long prose span: the
        // prose span must win on character weight.
        let mut spans = Vec::new();
        for _ in 0..20 {
            spans.push(span("Fig.", "Helvetica", 18.0, false));
        }
        spans.push(span(
            "A long paragraph of body text that dominates the document by \
             sheer character count and therefore decides the body font.",
            "TimesNewRoman",
            11.0,
            false,
        ));
        let profile = FontClassifier::classify(&spans);
        assert_eq!(profile.body_font.name, "TimesNewRoman");
        assert_eq!(size_key(profile.body_font.size), size_key(11.0));
    }

    #[test]
    fn test_heading_levels_by_ratio() {
        let mut spans = vec![span(
            "body text body text body text body text body text",
            "Times",
            10.0,
            false,
        )];
        spans.push(span("Chapter", "Times", 14.0, false)); // 1.4 → level 1
        spans.push(span("Section", "Times", 12.0, false)); // 1.2 → level 2
        spans.push(span("Sub", "Times", 10.5, true)); // 1.05 + bold → level 3

        let profile = FontClassifier::classify(&spans);
        assert_eq!(profile.heading_level("Times", 14.0), Some(1));
        assert_eq!(profile.heading_level("Times", 12.0), Some(2));
        assert_eq!(profile.heading_level("Times", 10.5), Some(3));
        // Body size itself is never a heading.
        assert_eq!(profile.heading_level("Times", 10.0), None);
    }

    #[test]
    fn test_slightly_larger_non_bold_is_not_heading() {
        let mut spans = vec![span(
            "body text body text body text body text",
            "Times",
            10.0,
            false,
        )];
        spans.push(span("note", "Times", 10.5, false));
        let profile = FontClassifier::classify(&spans);
        assert_eq!(profile.heading_level("Times", 10.5), None);
    }

    #[test]
    fn test_heading_sort_order() {
        let mut spans = vec![span(
            "body body body body body body body body body",
            "Times",
            10.0,
            false,
        )];
        spans.push(span("H2 small", "Times", 12.0, false));
        spans.push(span("H2 big", "Times", 13.0, false));
        spans.push(span("H1", "Times", 20.0, false));

        let profile = FontClassifier::classify(&spans);
        let levels: Vec<(u8, i32)> = profile
            .heading_fonts
            .iter()
            .map(|h| (h.level, size_key(h.size)))
            .collect();
        assert_eq!(levels, vec![(1, 200), (2, 130), (2, 120)]);
    }

    #[test]
    fn test_subset_prefix_stripped_before_counting() {
        let spans = vec![
            span("first half of the text", "ABCDEF+Georgia", 11.0, false),
            span("second half of the text", "Georgia", 11.0, false),
        ];
        let profile = FontClassifier::classify(&spans);
        assert_eq!(profile.body_font.name, "Georgia");
        assert_eq!(profile.font_map.len(), 1);
    }

    #[test]
    fn test_fallback_mapping_rules() {
        assert_eq!(map_to_fallback("DejaVu Serif"), "Times New Roman");
        assert_eq!(map_to_fallback("Garamond-Italic"), "Times New Roman");
        assert_eq!(map_to_fallback("JetBrains Mono"), "Courier New");
        assert_eq!(map_to_fallback("Consolas"), "Courier New");
        assert_eq!(map_to_fallback("DejaVu Sans"), "Arial");
        assert_eq!(map_to_fallback("Helvetica-Bold"), "Arial");
        // "sans-serif" must match sans, not serif.
        assert_eq!(map_to_fallback("PT Sans-Serif"), "Arial");
        assert_eq!(map_to_fallback("MysteryFont"), "Arial");
    }

    #[test]
    fn test_determinism_on_tied_weights() {
        let spans = vec![
            span("aaaa", "FontB", 12.0, false),
            span("bbbb", "FontA", 12.0, false),
        ];
        let a = FontClassifier::classify(&spans);
        let b = FontClassifier::classify(&spans);
        assert_eq!(a.body_font, b.body_font);
        // Tie resolves by name order.
        assert_eq!(a.body_font.name, "FontA");
    }
}
