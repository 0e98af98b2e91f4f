//! Combining routed sections into per-stage text bundles.

use deepread_core::Heading;
use indexmap::IndexMap;
use tracing::{info, warn};

use crate::router::RoutingTable;

/// Slice the document by heading offsets and combine each stage's sections
/// into one labeled bundle, in stage order.
///
/// Section text is taken straight from the source (never through the
/// classifier), heading lines stripped, OCR line wrapping repaired. A stage
/// whose titles produced no text borrows the nearest non-empty neighbour
/// (previous preferred), so no stage emits empty input.
pub fn bundle_stages(
    content: &str,
    headings: &[Heading],
    table: &RoutingTable,
) -> IndexMap<String, String> {
    let by_title: IndexMap<&str, &Heading> =
        headings.iter().map(|h| (h.title.as_str(), h)).collect();

    let mut bundles: IndexMap<String, String> = IndexMap::new();
    for (stage_id, titles) in &table.stages {
        let mut combined: Vec<String> = Vec::new();
        for title in titles {
            let Some(h) = by_title.get(title.as_str()) else {
                warn!(title = %title, "routed title not found among headings");
                continue;
            };
            let section = &content[h.start_offset..h.end_offset.min(content.len())];
            let body = strip_heading_lines(section);
            if !body.is_empty() {
                combined.push(format!("[Section: {title}]\n{}", merge_broken_lines(&body)));
            }
        }
        info!(stage = %stage_id, sections = combined.len(), "stage bundled");
        bundles.insert(stage_id.clone(), combined.join("\n\n---\n\n"));
    }

    fill_empty_bundles(&mut bundles);
    bundles
}

/// Drop heading lines, keep content.
fn strip_heading_lines(section: &str) -> String {
    section
        .lines()
        .filter(|l| !l.starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Repair OCR line wrapping: inside a paragraph, a line not ending in
/// terminal punctuation continues on the next line. CJK text joins without a
/// space, Latin text with one. Paragraph breaks are preserved.
fn merge_broken_lines(text: &str) -> String {
    text.split("\n\n")
        .map(merge_paragraph)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn merge_paragraph(para: &str) -> String {
    let mut merged: Vec<String> = Vec::new();
    let mut current = String::new();

    for line in para.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if current.is_empty() {
            current = line.to_string();
        } else if ends_with_terminal(&current) {
            merged.push(std::mem::take(&mut current));
            current = line.to_string();
        } else if ends_with_cjk(&current) {
            current.push_str(line);
        } else {
            current.push(' ');
            current.push_str(line);
        }
    }
    if !current.is_empty() {
        merged.push(current);
    }
    merged.join("\n")
}

fn ends_with_terminal(s: &str) -> bool {
    s.ends_with(['。', '？', '！', '.', '?', '!'])
}

fn ends_with_cjk(s: &str) -> bool {
    s.chars()
        .last()
        .is_some_and(|c| ('\u{4e00}'..='\u{9fa5}').contains(&c))
}

/// Borrow neighbouring content for stages whose titles yielded nothing.
fn fill_empty_bundles(bundles: &mut IndexMap<String, String>) {
    let order: Vec<String> = bundles.keys().cloned().collect();
    for (i, id) in order.iter().enumerate() {
        if !bundles[id].trim().is_empty() {
            continue;
        }
        let prev = order[..i]
            .iter()
            .rev()
            .find(|p| !bundles[p.as_str()].trim().is_empty());
        let next = order[i + 1..]
            .iter()
            .find(|n| !bundles[n.as_str()].trim().is_empty());

        let filled = match (prev, next) {
            (Some(p), _) => {
                info!(stage = %id, from = %p, "empty stage borrowed preceding content");
                format!(
                    "[No dedicated section; borrowed from adjacent stage]\n\n{}",
                    bundles[p.as_str()]
                )
            }
            (None, Some(n)) => {
                info!(stage = %id, from = %n, "empty stage borrowed following content");
                format!(
                    "[No dedicated section; borrowed from adjacent stage]\n\n{}",
                    bundles[n.as_str()]
                )
            }
            (None, None) => {
                warn!(stage = %id, "no content available for any stage");
                "[No content available]".to_string()
            }
        };
        bundles[id.as_str()] = filled;
    }
}

#[cfg(test)]
mod tests {
    use deepread_core::ReadingMode;
    use indexmap::IndexMap;

    use crate::router::{RouteTier, RoutingTable};

    use super::*;

    fn table(mode: ReadingMode, stages: &[(&str, &[&str])]) -> RoutingTable {
        RoutingTable {
            mode,
            stages: stages
                .iter()
                .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
                .collect(),
            sources: IndexMap::from_iter([("1".to_string(), RouteTier::Llm)]),
            notes: vec![],
        }
    }

    fn heading(title: &str, start: usize, end: usize) -> Heading {
        Heading {
            level: 2,
            title: title.to_string(),
            start_offset: start,
            end_offset: end,
        }
    }

    #[test]
    fn bundles_section_text_with_labels() {
        let content = "## Intro\nFirst body.\n## Data\nSecond body.\n";
        let headings = vec![heading("Intro", 0, 21), heading("Data", 21, content.len())];
        let t = table(
            ReadingMode::Qual,
            &[("L1", &["Intro"]), ("L2", &["Data"])],
        );
        let bundles = bundle_stages(content, &headings, &t);
        assert!(bundles["L1"].contains("[Section: Intro]"));
        assert!(bundles["L1"].contains("First body."));
        assert!(!bundles["L1"].contains("## Intro"));
        assert!(bundles["L2"].contains("Second body."));
    }

    #[test]
    fn one_title_appears_in_many_stages() {
        let content = "## Design\nShared body.\n";
        let headings = vec![heading("Design", 0, content.len())];
        let t = table(
            ReadingMode::Qual,
            &[("L1", &["Design"]), ("L2", &["Design"])],
        );
        let bundles = bundle_stages(content, &headings, &t);
        assert!(bundles["L1"].contains("Shared body."));
        assert!(bundles["L2"].contains("Shared body."));
    }

    #[test]
    fn empty_stage_borrows_previous_neighbour() {
        let content = "## Intro\nIntro body.\n";
        let headings = vec![heading("Intro", 0, content.len())];
        // L2's title does not exist in the document.
        let t = table(
            ReadingMode::Qual,
            &[("L1", &["Intro"]), ("L2", &["Ghost Section"])],
        );
        let bundles = bundle_stages(content, &headings, &t);
        assert!(bundles["L2"].contains("borrowed from adjacent stage"));
        assert!(bundles["L2"].contains("Intro body."));
    }

    #[test]
    fn first_stage_borrows_following_neighbour() {
        let content = "## Tail\nTail body.\n";
        let headings = vec![heading("Tail", 0, content.len())];
        let t = table(
            ReadingMode::Qual,
            &[("L1", &["Ghost"]), ("L2", &["Tail"])],
        );
        let bundles = bundle_stages(content, &headings, &t);
        assert!(bundles["L1"].contains("Tail body."));
    }

    #[test]
    fn merges_wrapped_latin_lines_with_space() {
        assert_eq!(
            merge_paragraph("This line wraps\nonto the next one."),
            "This line wraps onto the next one."
        );
    }

    #[test]
    fn merges_wrapped_cjk_lines_without_space() {
        assert_eq!(merge_paragraph("这一行被换行\n打断了。"), "这一行被换行打断了。");
    }

    #[test]
    fn terminal_punctuation_keeps_line_breaks() {
        assert_eq!(
            merge_paragraph("First sentence.\nSecond sentence."),
            "First sentence.\nSecond sentence."
        );
    }
}
