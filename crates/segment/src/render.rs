//! Rendering resolved segments back to an annotated markdown document.

use deepread_core::ResolvedSegment;

/// Render segments as a labeled markdown document, one fenced block per
/// section, with the boundary provenance recorded for human audit.
pub fn render_segmented_md(source: &str, segments: &[ResolvedSegment], notes: &[String]) -> String {
    let now = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S");
    let mut out: Vec<String> = vec![
        "# Structured paper segmentation".to_string(),
        String::new(),
        format!("- Source: {source}"),
        format!("- Generated At: {now}"),
        String::new(),
    ];

    if !notes.is_empty() {
        out.push("## Notes".to_string());
        for n in notes {
            out.push(format!("- {n}"));
        }
        out.push(String::new());
    }

    for seg in segments {
        out.push(format!("## {}. {}", seg.section_id, seg.section_name));
        out.push(String::new());
        out.push(format!("- start_page: {}", seg.start_page));
        out.push(format!("- start_marker: {}", seg.start_marker));
        out.push(format!("- boundary_source: {}", seg.boundary_source.as_str()));
        out.push(String::new());
        out.push("```text".to_string());
        out.push(seg.text.clone());
        out.push("```".to_string());
        out.push(String::new());
    }

    let mut rendered = out.join("\n");
    rendered.truncate(rendered.trim_end().len());
    rendered.push('\n');
    rendered
}

#[cfg(test)]
mod tests {
    use deepread_core::BoundarySource;

    use super::*;

    #[test]
    fn renders_sections_with_provenance() {
        let segments = vec![ResolvedSegment {
            section_id: 1,
            section_name: "Abstract".to_string(),
            start_page: 1,
            start_marker: "Abstract".to_string(),
            boundary_source: BoundarySource::Marker,
            text: "We study X.".to_string(),
        }];
        let md = render_segmented_md("paper_raw.md", &segments, &["one note".to_string()]);
        assert!(md.contains("## 1. Abstract"));
        assert!(md.contains("- boundary_source: marker"));
        assert!(md.contains("- one note"));
        assert!(md.contains("```text\nWe study X.\n```"));
        assert!(md.ends_with('\n'));
    }
}
