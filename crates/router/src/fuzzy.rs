//! Fuzzy title matching: resolving collaborator-returned heading strings
//! against the headings actually parsed from the document.

use strsim::normalized_levenshtein;

/// Find `candidate` among `known` titles, tolerating the small punctuation
/// and whitespace drift a classifier introduces.
///
/// Order: exact match; match after normalizing both sides; best similarity
/// ratio at or above `threshold`. Returns None when nothing clears the bar —
/// callers must not assume a match.
pub fn match_title<'a>(candidate: &str, known: &'a [String], threshold: f64) -> Option<&'a str> {
    if let Some(t) = known.iter().find(|t| t.as_str() == candidate) {
        return Some(t);
    }

    let cand_norm = normalize(candidate);
    if !cand_norm.is_empty() {
        if let Some(t) = known.iter().find(|t| normalize(t) == cand_norm) {
            return Some(t);
        }
    }

    let mut best: Option<(&String, f64)> = None;
    for t in known {
        let score = normalized_levenshtein(candidate, t);
        if best.map_or(true, |(_, b)| score > b) {
            best = Some((t, score));
        }
    }
    best.and_then(|(t, score)| (score >= threshold).then_some(t.as_str()))
}

/// Lowercase, keeping only alphanumerics (which covers CJK) and underscores.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .flat_map(char::to_lowercase)
        .collect()
}
