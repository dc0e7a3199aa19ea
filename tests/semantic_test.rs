//! Integration tests for the full analysis pipeline.

use redocx::{
    analyze, analyze_with_options, AnalyzeOptions, BulletType, ExtractedDocument, Hyperlink,
    ImageBlock, PageMeta, RawTable, Rect, SemanticElement, TextSpan,
};

fn span_on(page_num: usize, text: &str, x0: f32, y0: f32, x1: f32, y1: f32) -> TextSpan {
    let mut span = TextSpan::new(text, Rect::new(x0, y0, x1, y1), "Helvetica", 12.0);
    span.page_num = page_num;
    span
}

fn letter_doc(page_count: usize) -> ExtractedDocument {
    let mut doc = ExtractedDocument::new();
    for page_num in 0..page_count {
        doc.pages.push(PageMeta::letter(page_num));
    }
    doc
}

#[test]
fn test_single_paragraph_roundtrip() {
    let mut doc = letter_doc(1);
    doc.spans
        .push(span_on(0, "One line of text.", 72.0, 100.0, 300.0, 112.0));

    let elements = analyze(&doc);
    assert_eq!(elements.len(), 1);
    let SemanticElement::Paragraph { text, page_num, links, runs, .. } = &elements[0] else {
        panic!("expected a paragraph, got {:?}", elements[0]);
    };
    assert_eq!(text, "One line of text.");
    assert_eq!(*page_num, 0);
    assert!(links.is_empty());
    assert_eq!(runs.len(), 1);

    // Elements survive a serialize/deserialize cycle intact.
    let json = serde_json::to_string(&elements).unwrap();
    let back: Vec<SemanticElement> = serde_json::from_str(&json).unwrap();
    assert_eq!(back.len(), 1);
    assert_eq!(back[0].text(), "One line of text.");
}

#[test]
fn test_heading_then_body_classification() {
    let mut doc = letter_doc(1);
    let mut heading = span_on(0, "Introduction", 72.0, 60.0, 220.0, 84.0);
    heading.font = "Helvetica-Bold".to_string();
    heading.size = 20.0;
    heading.bold = true;
    doc.spans.push(heading);
    // Enough body mass at 12pt for the heading ratio to clear 1.4.
    for line in 0..6 {
        let y0 = 100.0 + line as f32 * 14.0;
        doc.spans.push(span_on(
            0,
            "Body copy that runs most of the width of the page, as body copy does.",
            72.0,
            y0,
            540.0,
            y0 + 12.0,
        ));
    }

    let elements = analyze(&doc);
    let SemanticElement::Heading { level, text, .. } = &elements[0] else {
        panic!("expected the heading first, got {:?}", elements[0]);
    };
    assert_eq!(*level, 1);
    assert_eq!(text, "Introduction");
    assert!(elements[1..].iter().all(|e| e.is_paragraph()));
}

#[test]
fn test_list_items_stay_separate() {
    let mut doc = letter_doc(1);
    doc.spans
        .push(span_on(0, "• first item", 72.0, 100.0, 540.0, 112.0));
    doc.spans
        .push(span_on(0, "• second item", 72.0, 114.0, 540.0, 126.0));
    doc.spans
        .push(span_on(0, "1. third item", 72.0, 128.0, 540.0, 140.0));

    let elements = analyze(&doc);
    assert_eq!(elements.len(), 3);

    let SemanticElement::ListItem { text, bullet, level, .. } = &elements[0] else {
        panic!("expected a list item");
    };
    assert_eq!(text, "first item");
    assert_eq!(*bullet, BulletType::Bullet);
    assert_eq!(*level, 0);

    let SemanticElement::ListItem { text, bullet, .. } = &elements[2] else {
        panic!("expected a list item");
    };
    assert_eq!(text, "third item");
    assert_eq!(*bullet, BulletType::Number);
}

#[test]
fn test_wrapped_lines_merge_into_one_paragraph() {
    let mut doc = letter_doc(1);
    doc.spans.push(span_on(
        0,
        "A paragraph whose first line reaches all the way to the right margin",
        72.0,
        100.0,
        540.0,
        112.0,
    ));
    doc.spans
        .push(span_on(0, "and then wraps.", 72.0, 114.0, 200.0, 126.0));

    let elements = analyze(&doc);
    assert_eq!(elements.len(), 1);
    let SemanticElement::Paragraph { text, runs, .. } = &elements[0] else {
        panic!("expected a paragraph");
    };
    assert_eq!(
        text,
        "A paragraph whose first line reaches all the way to the right margin and then wraps."
    );
    assert_eq!(runs.len(), 2);
}

#[test]
fn test_paragraph_grouping_is_idempotent() {
    // Feeding a merged paragraph's own runs back through analysis must
    // reproduce the same single paragraph, not split or re-merge it.
    let mut doc = letter_doc(1);
    doc.spans.push(span_on(
        0,
        "A paragraph whose first line reaches all the way to the right margin",
        72.0,
        100.0,
        540.0,
        112.0,
    ));
    doc.spans
        .push(span_on(0, "and then wraps.", 72.0, 114.0, 200.0, 126.0));

    let elements = analyze(&doc);
    assert_eq!(elements.len(), 1);
    let SemanticElement::Paragraph { text, runs, .. } = &elements[0] else {
        panic!("expected a paragraph");
    };

    let mut rebuilt = letter_doc(1);
    for run in runs {
        if run.text == "\n" {
            continue;
        }
        let mut span = TextSpan::new(run.text.trim_start(), run.bbox, &run.font, run.size);
        span.page_num = 0;
        rebuilt.spans.push(span);
    }

    let again = analyze(&rebuilt);
    assert_eq!(again.len(), 1);
    let SemanticElement::Paragraph { text: text2, runs: runs2, .. } = &again[0] else {
        panic!("expected a paragraph on the second pass");
    };
    assert_eq!(text2, text);
    assert_eq!(runs2.len(), runs.len());
}

#[test]
fn test_header_footer_threshold() {
    // A string in the top zone on 5 of 10 pages is a header; one on 4 of
    // 10 pages is not.
    let mut doc = letter_doc(10);
    for page_num in 0..10 {
        doc.spans.push(span_on(
            page_num,
            "Ordinary body text for this page, long enough to look like body.",
            72.0,
            300.0,
            540.0,
            312.0,
        ));
    }
    for page_num in 0..5 {
        doc.spans
            .push(span_on(page_num, "Acme Quarterly", 72.0, 20.0, 220.0, 32.0));
    }
    for page_num in 0..4 {
        doc.spans
            .push(span_on(page_num, "Draft", 400.0, 20.0, 460.0, 32.0));
    }

    let elements = analyze(&doc);
    let SemanticElement::Header { text } = &elements[0] else {
        panic!("expected a header element first, got {:?}", elements[0]);
    };
    assert_eq!(text, "Acme Quarterly");
    // "Draft" stays in the body flow.
    assert!(elements
        .iter()
        .any(|e| matches!(e, SemanticElement::Paragraph { text, .. } if text == "Draft")));
    assert!(!elements
        .iter()
        .any(|e| matches!(e, SemanticElement::Header { text } if text.contains("Draft"))));
}

#[test]
fn test_link_attachment_offsets() {
    let mut doc = letter_doc(1);
    doc.spans
        .push(span_on(0, "Visit our", 72.0, 100.0, 136.0, 112.0));
    doc.spans
        .push(span_on(0, "website", 140.0, 100.0, 190.0, 112.0));
    doc.spans
        .push(span_on(0, "today", 194.0, 100.0, 230.0, 112.0));
    doc.links.push(Hyperlink {
        uri: "https://example.com".to_string(),
        bbox: Rect::new(141.0, 101.0, 189.0, 111.0),
        page_num: 0,
    });

    let elements = analyze(&doc);
    let para = elements
        .iter()
        .find_map(|e| match e {
            SemanticElement::Paragraph { text, links, .. } if text.contains("website") => {
                Some((text.clone(), links.clone()))
            }
            _ => None,
        });
    // Short spans on one baseline stay separate paragraphs; the link
    // binds to the one whose run overlaps its rectangle.
    let (text, links) = para.expect("expected a paragraph containing the anchor");
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].uri, "https://example.com");
    let range = &links[0];
    assert_eq!(&text[range.start..range.end], range.text.as_str());
    assert_eq!(range.text, "website");
}

#[test]
fn test_table_column_collapse() {
    // A 2x4 grid with two blank columns: blanks drop, then the remaining
    // complementary pair merges down to one column.
    let mut doc = letter_doc(1);
    doc.tables.push(RawTable {
        page_num: 0,
        bbox: Rect::new(72.0, 200.0, 540.0, 260.0),
        rows: vec![
            vec!["Name".into(), "".into(), "".into(), "".into()],
            vec!["".into(), "".into(), "Alice".into(), "".into()],
        ],
        cells: None,
    });

    let elements = analyze(&doc);
    let SemanticElement::Table(table) = &elements[0] else {
        panic!("expected a table, got {:?}", elements[0]);
    };
    assert_eq!(table.num_cols, 1);
    assert_eq!(table.rows, vec![vec!["Name".to_string()], vec!["Alice".to_string()]]);

    // Non-complementary survivors keep two columns.
    let mut doc2 = letter_doc(1);
    doc2.tables.push(RawTable {
        page_num: 0,
        bbox: Rect::new(72.0, 200.0, 540.0, 260.0),
        rows: vec![
            vec!["Name".into(), "".into(), "Age".into(), "".into()],
            vec!["Alice".into(), "".into(), "30".into(), "".into()],
        ],
        cells: None,
    });
    let elements = analyze(&doc2);
    let SemanticElement::Table(table) = &elements[0] else {
        panic!("expected a table");
    };
    assert_eq!(table.num_cols, 2);
    assert_eq!(table.num_rows, 2);
}

#[test]
fn test_table_text_not_duplicated() {
    let mut doc = letter_doc(1);
    doc.tables.push(RawTable {
        page_num: 0,
        bbox: Rect::new(72.0, 200.0, 540.0, 260.0),
        rows: vec![
            vec!["Name".into(), "Age".into()],
            vec!["Alice".into(), "30".into()],
        ],
        cells: None,
    });
    // The cell text also appears as extracted spans inside the bbox.
    doc.spans.push(span_on(0, "Name", 80.0, 205.0, 130.0, 217.0));
    doc.spans.push(span_on(0, "Alice", 80.0, 235.0, 130.0, 247.0));
    doc.spans
        .push(span_on(0, "Body text outside the table.", 72.0, 100.0, 400.0, 112.0));

    let elements = analyze(&doc);
    let paragraphs: Vec<&SemanticElement> =
        elements.iter().filter(|e| e.is_paragraph()).collect();
    assert_eq!(paragraphs.len(), 1);
    assert_eq!(paragraphs[0].text(), "Body text outside the table.");
    assert!(elements
        .iter()
        .any(|e| matches!(e, SemanticElement::Table(_))));
}

#[test]
fn test_page_breaks_carry_margins() {
    let mut doc = letter_doc(2);
    doc.spans
        .push(span_on(0, "First page body text line.", 72.0, 100.0, 400.0, 112.0));
    doc.spans
        .push(span_on(1, "Second page body text line.", 72.0, 100.0, 400.0, 112.0));

    let elements = analyze(&doc);
    assert_eq!(elements.len(), 3);
    let SemanticElement::PageBreak { page_num, margins, .. } = &elements[1] else {
        panic!("expected a page break, got {:?}", elements[1]);
    };
    assert_eq!(*page_num, 1);
    // Margins derive from the content box with a 14pt floor.
    let margins = (*margins).expect("computed margins");
    assert_eq!(margins.left, 72.0);
    assert_eq!(margins.top, 100.0);
}

#[test]
fn test_images_sorted_and_flagged() {
    let mut doc = letter_doc(1);
    doc.spans
        .push(span_on(0, "Caption above the figures.", 72.0, 80.0, 400.0, 92.0));
    doc.images.push(ImageBlock {
        path: "fig-a.png".to_string(),
        width: 180.0,
        height: 120.0,
        page_num: 0,
        bbox: Rect::new(72.0, 200.0, 252.0, 320.0),
    });
    doc.images.push(ImageBlock {
        path: "fig-b.png".to_string(),
        width: 180.0,
        height: 120.0,
        page_num: 0,
        bbox: Rect::new(300.0, 210.0, 480.0, 330.0),
    });

    let elements = analyze(&doc);
    assert_eq!(elements.len(), 3);
    let SemanticElement::Image { path, merge_up, .. } = &elements[1] else {
        panic!("expected the first image, got {:?}", elements[1]);
    };
    assert_eq!(path, "fig-a.png");
    assert!(!merge_up);
    let SemanticElement::Image { path, merge_up, .. } = &elements[2] else {
        panic!("expected the second image");
    };
    assert_eq!(path, "fig-b.png");
    // Overlapping vertical ranges: render side by side.
    assert!(merge_up);
}

#[test]
fn test_parallel_matches_sequential() {
    let mut doc = letter_doc(4);
    for page_num in 0..4 {
        for line in 0..10 {
            let y0 = 100.0 + line as f32 * 14.0;
            doc.spans.push(span_on(
                page_num,
                "Repeatable body text that reaches across most of the page width.",
                72.0,
                y0,
                540.0,
                y0 + 12.0,
            ));
        }
    }

    let sequential = analyze_with_options(&doc, AnalyzeOptions::new().sequential());
    let parallel = analyze_with_options(&doc, AnalyzeOptions::new());
    let seq_json = serde_json::to_string(&sequential).unwrap();
    let par_json = serde_json::to_string(&parallel).unwrap();
    assert_eq!(seq_json, par_json);
}

#[test]
fn test_two_column_page_reads_column_major() {
    let mut doc = letter_doc(1);
    // Four lines per column, well separated horizontally.
    for line in 0..4 {
        let y0 = 100.0 + line as f32 * 14.0;
        doc.spans.push(span_on(
            0,
            &format!("left column line {}", line),
            50.0,
            y0,
            280.0,
            y0 + 12.0,
        ));
        doc.spans.push(span_on(
            0,
            &format!("right column line {}", line),
            330.0,
            y0,
            560.0,
            y0 + 12.0,
        ));
    }

    let elements = analyze(&doc);
    let texts: Vec<&str> = elements.iter().map(|e| e.text()).collect();
    let first_right = texts
        .iter()
        .position(|t| t.contains("right column"))
        .expect("right column text present");
    // Every left-column element precedes every right-column element.
    assert!(texts[..first_right]
        .iter()
        .all(|t| t.contains("left column")));
    assert!(texts[first_right..]
        .iter()
        .all(|t| t.contains("right column")));
}
