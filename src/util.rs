//! Shared font-name normalization helpers.
//!
//! The font classifier and the semantic analyzer must agree exactly on how a
//! PDF font name is cleaned up before comparison, otherwise heading lookups
//! built from classified names will miss at grouping time. All normalization
//! lives here so there is a single definition.

/// Strip a PDF subset prefix from a font name.
///
/// Embedded font subsets are named with a six-letter uppercase tag and a
/// plus sign (e.g. `ABCDEF+TimesNewRoman`). Returns the name unchanged when
/// no such prefix is present.
pub fn strip_subset_prefix(name: &str) -> &str {
    let bytes = name.as_bytes();
    if bytes.len() > 7 && bytes[6] == b'+' && bytes[..6].iter().all(|b| b.is_ascii_uppercase()) {
        &name[7..]
    } else {
        name
    }
}

/// Lowercase a font name and remove hyphens and spaces for fuzzy matching.
pub fn normalize_font_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-' && *c != ' ')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Quantize a font size to tenths of a point for use as a map key.
///
/// Font sizes arrive as floats; keying on the raw `f32` would make equality
/// checks fragile. Tenth-point resolution is more than enough to tell font
/// size combinations apart.
pub fn size_key(size: f32) -> i32 {
    (size * 10.0).round() as i32
}

/// Whether a font name denotes a bold face.
///
/// Many PDFs select a separate bold font family (e.g. `Helvetica-Bold`)
/// instead of setting a bold flag on the span.
pub fn is_bold_font_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("bold") || lower.contains("heavy") || lower.contains("black")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_subset_prefix() {
        assert_eq!(strip_subset_prefix("ABCDEF+TimesNewRoman"), "TimesNewRoman");
        assert_eq!(strip_subset_prefix("TimesNewRoman"), "TimesNewRoman");
        // Prefix must be exactly six uppercase letters.
        assert_eq!(strip_subset_prefix("ABC+Times"), "ABC+Times");
        assert_eq!(strip_subset_prefix("abcdef+Times"), "abcdef+Times");
        assert_eq!(strip_subset_prefix("ABCDEF+"), "ABCDEF+");
    }

    #[test]
    fn test_normalize_font_name() {
        assert_eq!(normalize_font_name("Times-New Roman"), "timesnewroman");
        assert_eq!(normalize_font_name("DejaVu Sans"), "dejavusans");
    }

    #[test]
    fn test_size_key() {
        assert_eq!(size_key(12.0), 120);
        assert_eq!(size_key(11.96), 120);
        assert_ne!(size_key(11.5), size_key(12.0));
    }

    #[test]
    fn test_is_bold_font_name() {
        assert!(is_bold_font_name("Helvetica-Bold"));
        assert!(is_bold_font_name("Arial Black"));
        assert!(is_bold_font_name("SomeFont-Heavy"));
        assert!(!is_bold_font_name("Helvetica-Oblique"));
    }
}
