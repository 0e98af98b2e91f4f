//! Locating approximate section markers and slicing the document into
//! contiguous segments.

use deepread_core::{BoundaryHint, BoundarySource, Page, ResolvedSegment};
use regex::Regex;
use tracing::{debug, warn};

use crate::pages::normalize_newlines;

/// A located anchor: (page index, byte offset within that page's text).
type Anchor = (usize, usize);

/// Locate `marker` in the page sequence, tolerant of whitespace drift and
/// wrong page estimates.
///
/// Search order: exact substring from the hinted page to the end of the
/// document; a whitespace-tolerant regex over the same range; then both over
/// the pages before the hinted page.
pub(crate) fn locate_marker(pages: &[Page], start_page: i64, marker: &str) -> Option<Anchor> {
    if marker.is_empty() {
        return None;
    }
    let start_idx = usize::try_from(start_page - 1).unwrap_or(0).min(pages.len());
    let pattern = whitespace_tolerant_pattern(marker);

    let search_range = |i0: usize, i1: usize| -> Option<Anchor> {
        for (i, page) in pages.iter().enumerate().take(i1).skip(i0) {
            if let Some(pos) = page.text.find(marker) {
                return Some((i, pos));
            }
            if let Some(re) = &pattern {
                if let Some(m) = re.find(&page.text) {
                    return Some((i, m.start()));
                }
            }
        }
        None
    };

    search_range(start_idx, pages.len()).or_else(|| search_range(0, start_idx))
}

/// Escape the marker and collapse whitespace runs to `\s+` so a snippet still
/// matches across OCR line wrapping. Single-token markers gain nothing over
/// the exact search and return None.
fn whitespace_tolerant_pattern(marker: &str) -> Option<Regex> {
    let tokens: Vec<String> = marker.split_whitespace().map(|t| regex::escape(t)).collect();
    if tokens.len() < 2 {
        return None;
    }
    Regex::new(&tokens.join(r"\s+")).ok()
}

/// Resolve boundary hints into contiguous, ordered segments covering the
/// document from the first anchor to the end.
///
/// Every hint yields exactly one segment. Unresolved hints inherit the next
/// resolved anchor (`FilledToNext`); an unresolved hint with no resolved hint
/// after it pins to end of document (`PageFallback`). Zero hints produce an
/// empty result — the caller must treat that as "segmentation unavailable",
/// not as an empty document.
pub fn resolve_segments(pages: &[Page], hints: &[BoundaryHint]) -> Vec<ResolvedSegment> {
    if pages.is_empty() || hints.is_empty() {
        return Vec::new();
    }

    // The proposal's order is not trusted; page estimate then sequence index
    // is authoritative.
    let mut sorted: Vec<BoundaryHint> = hints.to_vec();
    sorted.sort_by_key(|h| (h.start_page, h.sequence_index));

    let located_raw: Vec<Option<Anchor>> = sorted
        .iter()
        .map(|h| locate_marker(pages, h.start_page, &h.start_marker))
        .collect();

    let last_page = pages.len() - 1;
    let end_anchor: Anchor = (last_page, pages[last_page].text.len());

    // Trailing unresolved hint pins to end of document, then unresolved hints
    // inherit their successor's anchor scanning backward.
    let mut located = located_raw.clone();
    if let Some(last) = located.last_mut() {
        if last.is_none() {
            *last = Some(end_anchor);
        }
    }
    for i in (0..located.len().saturating_sub(1)).rev() {
        if located[i].is_none() {
            located[i] = located[i + 1];
        }
    }

    let mut segments = Vec::with_capacity(sorted.len());
    for (idx, hint) in sorted.iter().enumerate() {
        let boundary_source = if located_raw[idx].is_some() {
            BoundarySource::Marker
        } else if located_raw[idx + 1..].iter().any(|l| l.is_some()) {
            BoundarySource::FilledToNext
        } else {
            BoundarySource::PageFallback
        };
        if boundary_source != BoundarySource::Marker {
            warn!(
                section = %hint.section_name,
                source = boundary_source.as_str(),
                "marker not located, anchor inherited"
            );
        }

        let (start_page_idx, start_pos) = located[idx].unwrap_or(end_anchor);
        let (end_page_idx, end_pos) = match located.get(idx + 1).copied().flatten() {
            Some(anchor) => anchor,
            None => end_anchor,
        };

        let mut parts: Vec<&str> = Vec::new();
        for p_i in start_page_idx..=end_page_idx.min(last_page) {
            let t = pages[p_i].text.as_str();
            let piece = if p_i == start_page_idx && p_i == end_page_idx {
                if start_pos <= end_pos {
                    &t[start_pos..end_pos]
                } else {
                    ""
                }
            } else if p_i == start_page_idx {
                &t[start_pos..]
            } else if p_i == end_page_idx {
                &t[..end_pos]
            } else {
                t
            };
            parts.push(piece);
        }

        let text = normalize_newlines(&parts.join("\n"));
        debug!(
            section = %hint.section_name,
            chars = text.len(),
            "segment sliced"
        );

        segments.push(ResolvedSegment {
            section_id: hint.section_id,
            section_name: hint.section_name.clone(),
            start_page: hint.start_page,
            start_marker: hint.start_marker.clone(),
            boundary_source,
            text,
        });
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(number: usize, text: &str) -> Page {
        Page {
            number,
            text: text.to_string(),
        }
    }

    fn hint(id: i64, name: &str, start_page: i64, marker: &str, seq: usize) -> BoundaryHint {
        BoundaryHint {
            section_id: id,
            section_name: name.to_string(),
            start_page,
            start_marker: marker.to_string(),
            sequence_index: seq,
        }
    }

    #[test]
    fn locates_exact_marker_on_hinted_page() {
        let pages = vec![page(1, "Abstract\nbody"), page(2, "1 Introduction\nmore")];
        assert_eq!(locate_marker(&pages, 2, "1 Introduction"), Some((1, 0)));
    }

    #[test]
    fn locates_marker_despite_whitespace_drift() {
        let pages = vec![page(1, "1  Introduction\nand so on")];
        assert_eq!(locate_marker(&pages, 1, "1 Introduction"), Some((0, 0)));
    }

    #[test]
    fn locates_marker_wrapped_across_lines() {
        let pages = vec![page(1, "2 Institutional Background\nand Data\nbody")];
        assert_eq!(
            locate_marker(&pages, 1, "2 Institutional Background and Data"),
            Some((0, 0))
        );
    }

    #[test]
    fn searches_before_hinted_page_on_miss() {
        let pages = vec![page(1, "Appendix A starts here"), page(2, "other text")];
        assert_eq!(locate_marker(&pages, 2, "Appendix A"), Some((0, 0)));
    }

    #[test]
    fn empty_marker_never_matches() {
        let pages = vec![page(1, "anything")];
        assert_eq!(locate_marker(&pages, 1, ""), None);
    }

    #[test]
    fn two_markers_two_segments() {
        let pages = vec![
            page(1, "Abstract\nWe study X...\n"),
            page(2, "1 Introduction\nThis paper...\n"),
        ];
        let hints = vec![
            hint(1, "Abstract", 1, "Abstract", 0),
            hint(2, "Introduction", 2, "1 Introduction", 1),
        ];
        let segments = resolve_segments(&pages, &hints);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].boundary_source, BoundarySource::Marker);
        assert_eq!(segments[1].boundary_source, BoundarySource::Marker);
        assert!(segments[0].text.starts_with("Abstract"));
        assert!(segments[0].text.contains("We study X..."));
        assert!(!segments[0].text.contains("This paper"));
        assert!(segments[1].text.starts_with("1 Introduction"));
        assert!(segments[1].text.contains("This paper..."));
    }

    #[test]
    fn concatenation_covers_document_without_gaps() {
        let pages = vec![
            page(1, "Abstract\nalpha\n"),
            page(2, "1 Introduction\nbeta\n"),
            page(3, "2 Conclusion\ngamma\n"),
        ];
        let hints = vec![
            hint(1, "Abstract", 1, "Abstract", 0),
            hint(2, "Introduction", 2, "1 Introduction", 1),
            hint(3, "Conclusion", 3, "2 Conclusion", 2),
        ];
        let segments = resolve_segments(&pages, &hints);
        // Segment texts are outer-trimmed; page texts end in a single newline,
        // so page boundaries normalize to a blank line.
        let joined = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let full = normalize_newlines(
            &pages
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        );
        assert_eq!(joined, full);
    }

    #[test]
    fn unresolved_middle_hint_fills_to_next() {
        let pages = vec![
            page(1, "Abstract\nalpha\n"),
            page(2, "3 Results\nbeta\n"),
        ];
        let hints = vec![
            hint(1, "Abstract", 1, "Abstract", 0),
            hint(2, "Missing", 1, "nowhere to be found", 1),
            hint(3, "Results", 2, "3 Results", 2),
        ];
        let segments = resolve_segments(&pages, &hints);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1].boundary_source, BoundarySource::FilledToNext);
        // Inherits the Results anchor, so the middle segment is empty.
        assert!(segments[1].text.is_empty());
        assert_eq!(segments[2].boundary_source, BoundarySource::Marker);
    }

    #[test]
    fn unresolved_trailing_hint_pins_to_document_end() {
        let pages = vec![page(1, "Abstract\nalpha\n")];
        let hints = vec![
            hint(1, "Abstract", 1, "Abstract", 0),
            hint(2, "References", 1, "not in this document", 1),
        ];
        let segments = resolve_segments(&pages, &hints);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].boundary_source, BoundarySource::PageFallback);
        assert!(segments[1].text.is_empty());
        assert!(segments[0].text.contains("alpha"));
    }

    #[test]
    fn out_of_order_hints_are_sorted_by_page() {
        let pages = vec![
            page(1, "Abstract\nalpha\n"),
            page(2, "1 Introduction\nbeta\n"),
        ];
        let hints = vec![
            hint(2, "Introduction", 2, "1 Introduction", 0),
            hint(1, "Abstract", 1, "Abstract", 1),
        ];
        let segments = resolve_segments(&pages, &hints);
        assert_eq!(segments[0].section_name, "Abstract");
        assert_eq!(segments[1].section_name, "Introduction");
    }

    #[test]
    fn zero_hints_yield_empty_result() {
        let pages = vec![page(1, "text")];
        assert!(resolve_segments(&pages, &[]).is_empty());
    }

    #[test]
    fn every_hint_yields_exactly_one_segment() {
        let pages = vec![page(1, "only page\n")];
        let hints = vec![
            hint(1, "A", 1, "missing one", 0),
            hint(2, "B", 1, "missing two", 1),
            hint(3, "C", 1, "missing three", 2),
        ];
        let segments = resolve_segments(&pages, &hints);
        assert_eq!(segments.len(), 3);
        for seg in &segments {
            assert_ne!(seg.boundary_source, BoundarySource::Marker);
        }
    }
}
