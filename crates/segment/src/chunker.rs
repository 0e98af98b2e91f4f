//! Paragraph-aware splitting of long text for size-limited downstream calls.

use deepread_core::Chunk;

/// Split `text` into chunks of at most `max_tokens * 3` chars.
///
/// The 3-chars-per-token factor is a fixed heuristic for the mixed
/// Chinese/English academic text this pipeline handles, not a universal
/// token count. Splitting prefers paragraph boundaries (`\n\n`); a paragraph
/// alone exceeding the budget is first split at sentence terminators. Pure
/// and deterministic; rejoining all chunks with `\n\n` reproduces the source
/// modulo split points.
pub fn chunk(text: &str, max_tokens: usize) -> Vec<Chunk> {
    let max_chars = max_tokens * 3;
    if char_len(text) <= max_chars {
        return vec![Chunk {
            index: 0,
            text: text.to_string(),
        }];
    }

    let mut pieces: Vec<String> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_len = 0usize;

    fn flush(current: &mut Vec<String>, current_len: &mut usize, pieces: &mut Vec<String>) {
        if !current.is_empty() {
            pieces.push(current.join("\n\n"));
            current.clear();
            *current_len = 0;
        }
    }

    for para in text.split("\n\n") {
        let para_len = char_len(para);
        if para_len > max_chars {
            // Oversized paragraph: flush what we have and fall back to
            // sentence-level accumulation.
            flush(&mut current, &mut current_len, &mut pieces);
            for sent in split_sentences(para) {
                let sent_len = char_len(&sent);
                if current_len + sent_len > max_chars && !current.is_empty() {
                    pieces.push(current.join("\n\n"));
                    current_len = sent_len;
                    current = vec![sent];
                } else {
                    current.push(sent);
                    current_len += sent_len;
                }
            }
        } else if current_len + para_len > max_chars && !current.is_empty() {
            pieces.push(current.join("\n\n"));
            current_len = para_len;
            current = vec![para.to_string()];
        } else {
            current.push(para.to_string());
            current_len += para_len + 2;
        }
    }
    if !current.is_empty() {
        pieces.push(current.join("\n\n"));
    }

    pieces
        .into_iter()
        .enumerate()
        .map(|(index, text)| Chunk { index, text })
        .collect()
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split at sentence terminators: CJK `。？！` anywhere, Latin `.?!` only when
/// followed by a space (which is consumed as the split point).
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut buf = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        buf.push(ch);
        let boundary = match ch {
            '。' | '？' | '！' => true,
            '.' | '?' | '!' => matches!(chars.peek(), Some(' ')),
            _ => false,
        };
        if boundary {
            if matches!(chars.peek(), Some(' ')) {
                chars.next();
            }
            if !buf.is_empty() {
                sentences.push(std::mem::take(&mut buf));
            }
        }
    }
    if !buf.is_empty() {
        sentences.push(buf);
    }
    sentences
}
