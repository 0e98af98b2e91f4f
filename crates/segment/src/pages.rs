//! Parsing per-page raw markdown produced by the text extraction step.

use deepread_core::{DeepreadError, Page};

/// Parse per-page raw markdown into an ordered page sequence.
///
/// The expected shape is a `## Page N` marker line followed by a ```` ```text ````
/// fenced block. Text outside fences is ignored; an unterminated fence
/// accumulates to end of input. Fails if zero pages result — every downstream
/// component assumes at least one page.
pub fn parse_raw_pages(raw: &str) -> Result<Vec<Page>, DeepreadError> {
    let mut pages: Vec<Page> = Vec::new();
    let mut current: Option<usize> = None;
    let mut in_text_block = false;
    let mut buf = String::new();

    fn flush(pages: &mut Vec<Page>, current: Option<usize>, buf: &mut String) {
        let text = std::mem::take(buf);
        if let Some(number) = current {
            pages.push(Page { number, text });
        }
    }

    for line in raw.lines() {
        let stripped = line.trim();

        if let Some(number) = parse_page_marker(stripped) {
            flush(&mut pages, current.take(), &mut buf);
            current = Some(number);
            in_text_block = false;
            continue;
        }

        if stripped == "```text" {
            in_text_block = true;
            continue;
        }

        if stripped == "```" && in_text_block {
            in_text_block = false;
            continue;
        }

        if in_text_block && current.is_some() {
            buf.push_str(line);
            buf.push('\n');
        }
    }
    flush(&mut pages, current, &mut buf);

    if pages.is_empty() {
        return Err(DeepreadError::EmptyDocument(
            "no pages parsed from raw markdown".to_string(),
        ));
    }
    Ok(pages)
}

/// Match a `## Page N` marker line (already trimmed).
fn parse_page_marker(line: &str) -> Option<usize> {
    let rest = line.strip_prefix("##")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start().strip_prefix("Page")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let digits = rest.trim_start();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// CRLF → LF, runs of 3+ newlines collapsed to 2, outer newlines trimmed.
pub fn normalize_newlines(text: &str) -> String {
    let text = text.replace("\r\n", "\n");
    let mut out = String::with_capacity(text.len());
    let mut run = 0usize;
    for ch in text.chars() {
        if ch == '\n' {
            run += 1;
            if run <= 2 {
                out.push(ch);
            }
        } else {
            run = 0;
            out.push(ch);
        }
    }
    out.trim_matches('\n').to_string()
}

/// Concatenate pages into one text with `[PAGE N]` tags, the form the
/// classification collaborator receives.
pub fn full_text_with_page_tags(pages: &[Page]) -> String {
    let mut out = String::new();
    for p in pages {
        out.push_str(&format!("[PAGE {}]\n", p.number));
        out.push_str(&p.text);
        if !p.text.ends_with('\n') {
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

/// Extract a compact skeleton of the document for long-context boundary
/// detection: `[PAGE N]` tags, short lines, header-like lines, and a few
/// context lines per page. Long paragraph text is discarded.
pub fn extract_skeleton(pages: &[Page]) -> String {
    let mut out = String::new();
    for p in pages {
        out.push_str(&format!("[PAGE {}]\n", p.number));

        let lines: Vec<&str> = p.text.lines().collect();
        for (i, line) in lines.iter().enumerate() {
            let stripped = line.trim();
            if stripped.is_empty() {
                continue;
            }

            let is_short = stripped.chars().count() < 150;
            let is_header_like = stripped.starts_with(|c: char| {
                c.is_ascii_digit() || c.is_ascii_uppercase()
            }) || is_all_caps(stripped)
                || stripped.ends_with(':');
            let is_context = i < 3 || i + 3 > lines.len();

            if is_short || is_header_like || is_context {
                out.push_str(line);
                out.push('\n');
            }
        }
        out.push('\n');
    }
    out
}

fn is_all_caps(s: &str) -> bool {
    s.chars().any(char::is_alphabetic) && !s.chars().any(char::is_lowercase)
}
