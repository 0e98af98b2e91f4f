//! Extracting section headings from extractor markdown.

use deepread_core::Heading;
use tracing::info;

/// Minimum number of level-3 headings for them to win the level choice.
const LEVEL3_MIN: usize = 3;

/// Extract section headings with byte offsets into `content`.
///
/// The level choice is document-wide: level-3 headings are preferred when at
/// least three exist (extractors nest real sections under container `##`
/// blocks like "Text Content"), otherwise level-2 headings are used. Each
/// heading's `end_offset` is the next heading's start or the document end.
pub fn extract_headings(content: &str) -> Vec<Heading> {
    let h3 = collect_level(content, 3);
    let mut headings = if h3.len() >= LEVEL3_MIN {
        info!(count = h3.len(), "using level-3 headings");
        h3
    } else {
        let h2 = collect_level(content, 2);
        info!(count = h2.len(), "using level-2 headings");
        h2
    };

    let starts: Vec<usize> = headings.iter().map(|h| h.start_offset).collect();
    for (i, h) in headings.iter_mut().enumerate() {
        h.end_offset = starts.get(i + 1).copied().unwrap_or(content.len());
    }
    headings
}

fn collect_level(content: &str, level: usize) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut offset = 0usize;
    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if let Some(title) = heading_title(trimmed, level) {
            headings.push(Heading {
                level: level as u8,
                title,
                start_offset: offset,
                end_offset: 0,
            });
        }
        offset += line.len();
    }
    headings
}

/// A heading line has exactly `level` leading hashes followed by whitespace
/// and a non-empty title.
fn heading_title(line: &str, level: usize) -> Option<String> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if hashes != level {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let title = rest.trim();
    if title.is_empty() {
        return None;
    }
    Some(title.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_level3_when_three_or_more() {
        let content = "## Text Content\n\n### 1 Introduction\na\n\n### 2 Data\nb\n\n### 3 Conclusion\nc\n";
        let headings = extract_headings(content);
        assert_eq!(headings.len(), 3);
        assert!(headings.iter().all(|h| h.level == 3));
        assert_eq!(headings[0].title, "1 Introduction");
    }

    #[test]
    fn falls_back_to_level2_when_too_few_level3() {
        let content = "## Abstract\nx\n\n### Lone subsection\ny\n\n## Conclusion\nz\n";
        let headings = extract_headings(content);
        assert_eq!(headings.len(), 2);
        assert!(headings.iter().all(|h| h.level == 2));
    }

    #[test]
    fn offsets_cover_document_end_to_end() {
        let content = "## A\nalpha\n## B\nbeta\n";
        let headings = extract_headings(content);
        assert_eq!(headings[0].start_offset, 0);
        assert_eq!(headings[0].end_offset, headings[1].start_offset);
        assert_eq!(headings[1].end_offset, content.len());
        assert_eq!(&content[headings[1].start_offset..headings[1].end_offset], "## B\nbeta\n");
    }

    #[test]
    fn exact_level_match_only() {
        let content = "#### Deep\n\n## Real\nbody\n";
        let headings = extract_headings(content);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].title, "Real");
    }

    #[test]
    fn no_headings_yields_empty() {
        assert!(extract_headings("plain text without structure\n").is_empty());
    }
}
