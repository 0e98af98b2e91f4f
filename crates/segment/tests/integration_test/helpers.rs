use deepread_core::BoundaryHint;

/// Build a raw per-page markdown document from (page number, body) pairs.
pub fn raw_md(pages: &[(usize, &str)]) -> String {
    let mut out = String::new();
    for (number, body) in pages {
        out.push_str(&format!("## Page {number}\n```text\n{body}\n```\n\n"));
    }
    out
}

pub fn hint(id: i64, name: &str, start_page: i64, marker: &str, seq: usize) -> BoundaryHint {
    BoundaryHint {
        section_id: id,
        section_name: name.to_string(),
        start_page,
        start_marker: marker.to_string(),
        sequence_index: seq,
    }
}
