//! Protected span detection for markdown text.
//!
//! This is pattern matching over byte ranges, not a markdown parser. Three
//! constructs pass through untranslated:
//!
//! - a single leading frontmatter block delimited by `---` lines
//! - fenced code blocks (triple backticks, non-greedy)
//! - `<script>` blocks (case-insensitive, non-greedy)
//!
//! Everything else becomes a translate span. Overlapping protected matches
//! (for example a fence that opens inside a `<script>` block) are merged into
//! their union, so the resulting spans always partition the text exactly.

use regex::Regex;
use std::sync::OnceLock;

const FRONTMATTER_DELIMITER: &str = "---\n";
const FRONTMATTER_CLOSE: &str = "\n---\n";

static FENCE_REGEX: OnceLock<Regex> = OnceLock::new();
static SCRIPT_REGEX: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    /// Passed through unchanged
    Keep,
    /// Sent through chunking and translation
    Translate,
}

/// A tagged byte range `[start, end)` over a file's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub kind: SpanKind,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn keep(start: usize, end: usize) -> Self {
        Self {
            kind: SpanKind::Keep,
            start,
            end,
        }
    }

    pub fn translate(start: usize, end: usize) -> Self {
        Self {
            kind: SpanKind::Translate,
            start,
            end,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The slice of `text` this span covers
    pub fn text<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// Find the protected spans in `text`, sorted by start offset.
///
/// Matches are reported as found; overlaps are left for [`segment`] to merge.
pub fn find_protected_spans(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();

    if let Some(end) = frontmatter_end(text) {
        spans.push(Span::keep(0, end));
    }

    let fence = FENCE_REGEX.get_or_init(|| Regex::new(r"(?s)```.*?```").unwrap());
    spans.extend(fence.find_iter(text).map(|m| Span::keep(m.start(), m.end())));

    let script = SCRIPT_REGEX.get_or_init(|| Regex::new(r"(?is)<script.*?</script>").unwrap());
    spans.extend(script.find_iter(text).map(|m| Span::keep(m.start(), m.end())));

    spans.sort_by_key(|s| s.start);
    spans
}

/// End offset of the leading frontmatter block, closing delimiter included.
fn frontmatter_end(text: &str) -> Option<usize> {
    if !text.starts_with(FRONTMATTER_DELIMITER) {
        return None;
    }
    let search_from = FRONTMATTER_DELIMITER.len();
    text[search_from..]
        .find(FRONTMATTER_CLOSE)
        .map(|pos| search_from + pos + FRONTMATTER_CLOSE.len())
}

/// Split `text` into an ordered, gap-free list of keep and translate spans.
pub fn segment(text: &str) -> Vec<Span> {
    let protected = merge_overlapping(find_protected_spans(text));

    let mut spans = Vec::with_capacity(protected.len() * 2 + 1);
    let mut last = 0;
    for keep in protected {
        if last < keep.start {
            spans.push(Span::translate(last, keep.start));
        }
        spans.push(keep);
        last = keep.end;
    }
    if last < text.len() {
        spans.push(Span::translate(last, text.len()));
    }
    spans
}

/// Collapse sorted spans that overlap into their union. Adjacent spans stay separate.
fn merge_overlapping(sorted: Vec<Span>) -> Vec<Span> {
    let mut merged: Vec<Span> = Vec::with_capacity(sorted.len());
    for span in sorted {
        match merged.last_mut() {
            Some(prev) if span.start < prev.end => {
                prev.end = prev.end.max(span.end);
            }
            _ => merged.push(span),
        }
    }
    merged
}

/// Concatenate the text of `spans` in order.
pub fn reassemble(text: &str, spans: &[Span]) -> String {
    spans.iter().map(|s| s.text(text)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kinds_and_text<'a>(text: &'a str, spans: &[Span]) -> Vec<(SpanKind, &'a str)> {
        spans.iter().map(|s| (s.kind, s.text(text))).collect()
    }

    // ==================== Frontmatter Tests ====================

    #[test]
    fn test_frontmatter_detected() {
        let text = "---\ntitle: x\n---\nHello **world**.\n";
        let spans = find_protected_spans(text);
        assert_eq!(spans, vec![Span::keep(0, 17)]);
        assert_eq!(spans[0].text(text), "---\ntitle: x\n---\n");
    }

    #[test]
    fn test_frontmatter_requires_leading_delimiter() {
        let text = "\n---\ntitle: x\n---\nbody";
        assert!(find_protected_spans(text).is_empty());
    }

    #[test]
    fn test_frontmatter_requires_closing_delimiter() {
        let text = "---\ntitle: x\nbody without close";
        assert!(find_protected_spans(text).is_empty());
    }

    #[test]
    fn test_frontmatter_closing_must_be_own_line() {
        // "---" at the end of the text has no trailing newline
        let text = "---\ntitle: x\n---";
        assert!(find_protected_spans(text).is_empty());
    }

    #[test]
    fn test_only_first_frontmatter_block() {
        let text = "---\na: 1\n---\ntext\n---\nb: 2\n---\nmore";
        let spans = find_protected_spans(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text(text), "---\na: 1\n---\n");
    }

    // ==================== Fence and Script Tests ====================

    #[test]
    fn test_fenced_code_non_greedy() {
        let text = "a\n```\none\n```\nb\n```rust\ntwo\n```\nc";
        let spans = find_protected_spans(text);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text(text), "```\none\n```");
        assert_eq!(spans[1].text(text), "```rust\ntwo\n```");
    }

    #[test]
    fn test_unclosed_fence_not_protected() {
        let text = "intro\n```\nnever closed";
        assert!(find_protected_spans(text).is_empty());
    }

    #[test]
    fn test_script_case_insensitive() {
        let text = "before <SCRIPT setup>let x = 1</Script> after";
        let spans = find_protected_spans(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text(text), "<SCRIPT setup>let x = 1</Script>");
    }

    #[test]
    fn test_multiple_scripts_non_greedy() {
        let text = "<script>a</script> mid <script>b</script>";
        let spans = find_protected_spans(text);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[1].text(text), "<script>b</script>");
    }

    #[test]
    fn test_spans_sorted_by_start() {
        let text = "<script>s</script>\n```\nc\n```\n";
        let spans = find_protected_spans(text);
        assert!(spans.windows(2).all(|w| w[0].start <= w[1].start));
    }

    // ==================== Segmentation Tests ====================

    #[test]
    fn test_segment_end_to_end_example() {
        let text = "---\ntitle: x\n---\nHello **world**.\n```\ncode\n```\n";
        let spans = segment(text);

        assert_eq!(
            kinds_and_text(text, &spans),
            vec![
                (SpanKind::Keep, "---\ntitle: x\n---\n"),
                (SpanKind::Translate, "Hello **world**.\n"),
                (SpanKind::Keep, "```\ncode\n```"),
                (SpanKind::Translate, "\n"),
            ]
        );
        assert_eq!(spans[0], Span::keep(0, 17));
    }

    #[test]
    fn test_segment_plain_text() {
        let text = "Just prose.\n\nMore prose.";
        assert_eq!(segment(text), vec![Span::translate(0, text.len())]);
    }

    #[test]
    fn test_segment_empty_text() {
        assert!(segment("").is_empty());
    }

    #[test]
    fn test_segment_all_protected() {
        let text = "```\nonly code\n```";
        assert_eq!(segment(text), vec![Span::keep(0, text.len())]);
    }

    #[test]
    fn test_segment_merges_fence_inside_script() {
        let text = "x <script>\nconst s = `\n```\n`;\n</script> y ``` z";
        let spans = segment(text);

        // The fence match starts inside the script and ends after it
        let keeps: Vec<_> = spans.iter().filter(|s| s.kind == SpanKind::Keep).collect();
        assert_eq!(keeps.len(), 1);
        assert_eq!(keeps[0].text(text), "<script>\nconst s = `\n```\n`;\n</script> y ```");
        assert_eq!(reassemble(text, &spans), text);
    }

    #[test]
    fn test_segment_merges_script_inside_fence() {
        let text = "a\n```html\n<script>go()</script>\n```\nb";
        let spans = segment(text);
        assert_eq!(
            kinds_and_text(text, &spans),
            vec![
                (SpanKind::Translate, "a\n"),
                (SpanKind::Keep, "```html\n<script>go()</script>\n```"),
                (SpanKind::Translate, "\nb"),
            ]
        );
    }

    #[test]
    fn test_segment_adjacent_keeps_stay_separate() {
        let text = "```\na\n``````\nb\n```";
        let spans = segment(text);
        assert_eq!(spans.len(), 2);
        assert!(spans.iter().all(|s| s.kind == SpanKind::Keep));
    }

    #[test]
    fn test_segment_multibyte_text() {
        let text = "---\nt: 标题\n---\n你好，世界\n```\n代码\n```\n结束";
        let spans = segment(text);
        assert_eq!(reassemble(text, &spans), text);
        assert_eq!(spans[1].text(text), "你好，世界\n");
    }

    proptest! {
        #[test]
        fn prop_segment_is_lossless_partition(
            text in r"((---\n)|(```)|(<script>)|(</script>)|(<SCRIPT)|\n|[a-z ]|é|中){0,60}"
        ) {
            let spans = segment(&text);

            prop_assert_eq!(reassemble(&text, &spans), text.clone());

            let mut pos = 0;
            for span in &spans {
                prop_assert_eq!(span.start, pos);
                prop_assert!(!span.is_empty());
                pos = span.end;
            }
            prop_assert_eq!(pos, text.len());
        }

        #[test]
        fn prop_translate_spans_never_adjacent(text in r"(```|<script>|</script>|[ab\n]){0,40}") {
            let spans = segment(&text);
            for w in spans.windows(2) {
                let both_translate =
                    w[0].kind == SpanKind::Translate && w[1].kind == SpanKind::Translate;
                prop_assert!(!both_translate);
            }
        }
    }
}
