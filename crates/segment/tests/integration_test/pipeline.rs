use deepread_core::BoundarySource;
use deepread_segment::{chunk, parse_raw_pages, render_segmented_md, resolve_segments};

use crate::helpers::{hint, raw_md};

#[test]
fn parse_resolve_render_roundtrip() {
    let raw = raw_md(&[
        (1, "Abstract\nWe study X..."),
        (2, "1 Introduction\nThis paper..."),
    ]);
    let pages = parse_raw_pages(&raw).unwrap();

    let hints = vec![
        hint(1, "Abstract", 1, "Abstract", 0),
        hint(2, "Introduction", 2, "1 Introduction", 1),
    ];
    let segments = resolve_segments(&pages, &hints);
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].boundary_source, BoundarySource::Marker);
    assert_eq!(segments[1].boundary_source, BoundarySource::Marker);
    assert!(segments[0].text.contains("We study X..."));
    assert!(segments[1].text.contains("This paper..."));

    let md = render_segmented_md("paper_raw.md", &segments, &[]);
    assert!(md.contains("## 1. Abstract"));
    assert!(md.contains("## 2. Introduction"));
    assert!(md.contains("- boundary_source: marker"));
}

#[test]
fn segments_survive_chunking_intact() {
    // A section large enough to need two chunks at a tiny budget.
    let body = (0..40)
        .map(|i| format!("Paragraph {i} with some words."))
        .collect::<Vec<_>>()
        .join("\n\n");
    let raw = raw_md(&[(1, &format!("Methods\n{body}"))]);
    let pages = parse_raw_pages(&raw).unwrap();
    let segments = resolve_segments(&pages, &[hint(1, "Methods", 1, "Methods", 0)]);

    let chunks = chunk(&segments[0].text, 50); // max 150 chars per chunk
    assert!(chunks.len() > 1);
    let rejoined = chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    assert_eq!(rejoined, segments[0].text);
}

#[test]
fn marker_wrapped_across_lines_is_tolerated() {
    // OCR wraps the heading across a line break mid-page.
    let raw = raw_md(&[
        (1, "Abstract\nWe study X."),
        (2, "2 Institutional Background\nand Data Description\nBody text."),
    ]);
    let pages = parse_raw_pages(&raw).unwrap();
    let segments = resolve_segments(
        &pages,
        &[
            hint(1, "Abstract", 1, "Abstract", 0),
            hint(
                2,
                "Background and Data",
                2,
                "2 Institutional Background and Data Description",
                1,
            ),
        ],
    );
    assert_eq!(segments[1].boundary_source, BoundarySource::Marker);
    assert!(segments[1].text.contains("Body text."));
}

#[test]
fn wrong_page_estimate_recovers() {
    let raw = raw_md(&[
        (1, "Abstract\nWe study X."),
        (2, "1 Introduction\nThis paper."),
        (3, "References\n[1] Someone 2020."),
    ]);
    let pages = parse_raw_pages(&raw).unwrap();
    // Hint claims page 3, but the introduction is on page 2.
    let segments = resolve_segments(
        &pages,
        &[
            hint(1, "Abstract", 1, "Abstract", 0),
            hint(2, "Introduction", 3, "1 Introduction", 1),
        ],
    );
    assert_eq!(segments[1].boundary_source, BoundarySource::Marker);
    assert!(segments[1].text.contains("This paper."));
}
