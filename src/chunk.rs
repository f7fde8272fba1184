//! Size-bounded splitting of translatable text.

const PARAGRAPH_BREAK: &str = "\n\n";

/// Split `text` into pieces of at most `max_chars` characters.
///
/// Each window holds up to `max_chars` characters. The cut goes just after the
/// last blank line inside the window, as long as that blank line does not start
/// the window; without one the cut falls at the window end, mid-paragraph if
/// need be. The last window is cut the same way.
/// The pieces concatenate back to `text`. A zero budget disables splitting.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<&str> {
    if max_chars == 0 {
        return if text.is_empty() { Vec::new() } else { vec![text] };
    }

    let mut chunks = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let window_end = rest
            .char_indices()
            .nth(max_chars)
            .map_or(rest.len(), |(idx, _)| idx);

        let cut = match rest[..window_end].rfind(PARAGRAPH_BREAK) {
            Some(pos) if pos > 0 => pos + PARAGRAPH_BREAK.len(),
            _ => window_end,
        };

        let (chunk, tail) = rest.split_at(cut);
        chunks.push(chunk);
        rest = tail;
    }

    chunks
}
