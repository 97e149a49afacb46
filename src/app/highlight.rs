//! Viewport-scoped pattern scanning.
//!
//! Everything here is pure data-in/data-out so the scan can run on a worker
//! thread and be unit tested without a live UI. Styles use FLTK's parallel
//! style-buffer model: one ASCII style char per text byte, mapped through the
//! style table built in `ui::theme`.

use std::sync::OnceLock;

use regex_lite::Regex;

use super::document::DocumentId;

pub const STYLE_PLAIN: u8 = b'A';
pub const STYLE_KEYWORD: u8 = b'B';
pub const STYLE_STRING: u8 = b'C';
pub const STYLE_COMMENT: u8 = b'D';
pub const STYLE_SEARCH: u8 = b'E';

/// The closed keyword list scanned by the keyword pass.
pub const KEYWORDS: [&str; 20] = [
    "def", "class", "if", "else", "elif", "for", "while", "try", "except", "import", "from", "as",
    "with", "return", "break", "continue", "pass", "True", "False", "None",
];

fn keyword_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(r"\b(?:{})\b", KEYWORDS.join("|"));
        Regex::new(&pattern).expect("keyword pattern is valid")
    })
}

fn string_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""[^"]*"|'[^']*'"#).expect("string pattern is valid"))
}

fn comment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#[^\n]*").expect("comment pattern is valid"))
}

/// A snapshot of everything one scan needs, handed to the worker thread.
#[derive(Debug, Clone)]
pub struct ScanJob {
    pub doc: DocumentId,
    pub text: String,
    /// Line the caret is on (0-based), used to approximate the viewport.
    pub caret_line: usize,
    /// Lines per screenful; the scan covers one screenful either side.
    pub rows: usize,
    pub search_spans: Vec<(usize, usize)>,
}

/// Style chars for one scanned byte range, posted back to the dispatch loop.
#[derive(Debug, Clone)]
pub struct HighlightResult {
    pub doc: DocumentId,
    pub byte_start: usize,
    pub style: String,
    /// Buffer length at snapshot time; a mismatch on arrival means the text
    /// changed underneath the scan and the result is stale.
    pub buffer_len: usize,
}

impl ScanJob {
    pub fn run(self) -> HighlightResult {
        let total_lines = line_count(&self.text);
        let (first, last) = viewport_lines(self.caret_line, self.rows, total_lines);
        let (start, end) = line_span_bytes(&self.text, first, last);
        let style = scan_range(&self.text, start, end, &self.search_spans);
        HighlightResult {
            doc: self.doc,
            byte_start: start,
            style,
            buffer_len: self.text.len(),
        }
    }
}

pub fn line_count(text: &str) -> usize {
    if text.is_empty() {
        0
    } else {
        text.bytes().filter(|&b| b == b'\n').count() + 1
    }
}

/// Visible line range approximated around the caret: one screenful either
/// side, clamped to the buffer. Lines are 0-based, range is inclusive.
pub fn viewport_lines(caret_line: usize, rows: usize, total_lines: usize) -> (usize, usize) {
    if total_lines == 0 {
        return (0, 0);
    }
    let first = caret_line.saturating_sub(rows);
    let last = (caret_line + rows).min(total_lines - 1);
    (first.min(last), last)
}

/// Byte span `[start, end)` covering lines `first_line..=last_line`
/// (including the trailing newline of the last line).
pub fn line_span_bytes(text: &str, first_line: usize, last_line: usize) -> (usize, usize) {
    let mut offset = 0;
    let mut start = None;
    let mut end = text.len();
    for (idx, line) in text.split_inclusive('\n').enumerate() {
        if idx == first_line {
            start = Some(offset);
        }
        offset += line.len();
        if idx == last_line {
            end = offset;
            break;
        }
    }
    let start = start.unwrap_or(text.len());
    (start, end.max(start))
}

/// Scan `text[range_start..range_end]` and return one style char per byte.
///
/// Resets the range to plain, then three passes in fixed priority order with
/// later passes overwriting earlier ones: keywords, quoted strings,
/// end-of-line comments. Stored search spans are overlaid last. Re-running on
/// unchanged text yields identical output.
pub fn scan_range(
    text: &str,
    range_start: usize,
    range_end: usize,
    search_spans: &[(usize, usize)],
) -> String {
    let slice = &text[range_start..range_end];
    let mut style = vec![STYLE_PLAIN; slice.len()];

    for m in keyword_regex().find_iter(slice) {
        fill(&mut style, m.start(), m.end(), STYLE_KEYWORD);
    }
    for m in string_regex().find_iter(slice) {
        fill(&mut style, m.start(), m.end(), STYLE_STRING);
    }
    for m in comment_regex().find_iter(slice) {
        fill(&mut style, m.start(), m.end(), STYLE_COMMENT);
    }
    for &(s, e) in search_spans {
        let s = s.max(range_start);
        let e = e.min(range_end);
        if s < e {
            fill(&mut style, s - range_start, e - range_start, STYLE_SEARCH);
        }
    }

    style.into_iter().map(char::from).collect()
}

/// Non-overlapping literal occurrences of `needle`, case-sensitive.
pub fn search_spans(text: &str, needle: &str) -> Vec<(usize, usize)> {
    if needle.is_empty() {
        return Vec::new();
    }
    text.match_indices(needle)
        .map(|(i, m)| (i, i + m.len()))
        .collect()
}

/// Rewrite search styling in a full-buffer style string: previous search
/// chars revert to plain, then the given spans are tagged.
pub fn apply_search_spans(style: &mut [u8], spans: &[(usize, usize)]) {
    for b in style.iter_mut() {
        if *b == STYLE_SEARCH {
            *b = STYLE_PLAIN;
        }
    }
    let len = style.len();
    for &(s, e) in spans {
        if s < len {
            style[s..e.min(len)].fill(STYLE_SEARCH);
        }
    }
}

fn fill(style: &mut [u8], start: usize, end: usize, ch: u8) {
    style[start..end].fill(ch);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styles(text: &str) -> String {
        scan_range(text, 0, text.len(), &[])
    }

    #[test]
    fn test_keyword_detection() {
        let text = "def foo():\n    return None";
        let style = styles(text);
        // "def" tagged, "foo" not
        assert_eq!(&style[0..3], "BBB");
        assert_eq!(&style[4..7], "AAA");
        // "return" and "None"
        assert_eq!(&style[15..21], "BBBBBB");
        assert_eq!(&style[22..26], "BBBB");
    }

    #[test]
    fn test_keyword_requires_word_boundary() {
        let style = styles("define pretrying");
        assert!(!style.contains('B'));
    }

    #[test]
    fn test_string_detection_both_quotes() {
        let text = r#"x = "abc" + 'd'"#;
        let style = styles(text);
        assert_eq!(&style[4..9], "CCCCC");
        assert_eq!(&style[12..15], "CCC");
        assert_eq!(&style[0..1], "A");
    }

    #[test]
    fn test_string_non_greedy_to_matching_quote() {
        let text = r#""a" b "c""#;
        let style = styles(text);
        // the gap between the two strings stays plain
        assert_eq!(&style[3..6], "A".repeat(3));
    }

    #[test]
    fn test_comment_to_end_of_line() {
        let text = "x = 1  # note\ny = 2";
        let style = styles(text);
        assert_eq!(&style[7..13], "DDDDDD");
        assert_eq!(&style[14..15], "A");
    }

    #[test]
    fn test_comment_pass_has_highest_priority() {
        // A '#' inside quotes still wins from that point on: the three
        // passes are independent and the comment pass runs last.
        let text = "'a#b'";
        let style = styles(text);
        assert_eq!(style, "CCDDD");
    }

    #[test]
    fn test_scan_idempotent() {
        let text = "def f():\n    return 'x'  # done\n";
        let first = scan_range(text, 0, text.len(), &[]);
        let second = scan_range(text, 0, text.len(), &[]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_search_spans_literal_case_sensitive() {
        let spans = search_spans("cat bat cat", "cat");
        assert_eq!(spans, vec![(0, 3), (8, 11)]);
        assert!(search_spans("cat bat cat", "CAT").is_empty());
        assert!(search_spans("cat", "").is_empty());
    }

    #[test]
    fn test_search_overlay_in_scan() {
        let text = "cat bat cat";
        let style = scan_range(text, 0, text.len(), &search_spans(text, "cat"));
        assert_eq!(style, "EEEAAAAAEEE");
    }

    #[test]
    fn test_search_overlay_clipped_to_range() {
        let text = "cat\nbat\ncat";
        let (start, end) = line_span_bytes(text, 1, 1);
        let style = scan_range(text, start, end, &search_spans(text, "cat"));
        assert!(!style.contains('E'));
    }

    #[test]
    fn test_viewport_lines_clamped() {
        assert_eq!(viewport_lines(5, 2, 100), (3, 7));
        assert_eq!(viewport_lines(0, 10, 100), (0, 10));
        assert_eq!(viewport_lines(99, 10, 100), (89, 99));
        assert_eq!(viewport_lines(0, 10, 0), (0, 0));
        assert_eq!(viewport_lines(3, 10, 2), (0, 1));
    }

    #[test]
    fn test_line_span_bytes() {
        let text = "aa\nbbb\ncccc";
        assert_eq!(line_span_bytes(text, 0, 0), (0, 3));
        assert_eq!(line_span_bytes(text, 1, 1), (3, 7));
        assert_eq!(line_span_bytes(text, 1, 2), (3, 11));
        assert_eq!(line_span_bytes(text, 0, 99), (0, 11));
        assert_eq!(line_span_bytes(text, 99, 100), (11, 11));
        assert_eq!(line_span_bytes("", 0, 0), (0, 0));
    }

    #[test]
    fn test_scan_job_covers_only_viewport() {
        let doc = DocumentId(1);
        let text = "one\ntwo\ndef x\nfour\nfive\n".to_string();
        let job = ScanJob {
            doc,
            text: text.clone(),
            caret_line: 2,
            rows: 1,
            search_spans: Vec::new(),
        };
        let result = job.run();
        // lines 1..=3 ("two\ndef x\nfour\n")
        assert_eq!(result.byte_start, 4);
        assert_eq!(result.style.len(), "two\ndef x\nfour\n".len());
        assert_eq!(result.buffer_len, text.len());
        assert_eq!(&result.style[4..7], "BBB");
    }

    #[test]
    fn test_apply_search_spans_rewrites_old_tags() {
        let mut style = b"AAEEAA".to_vec();
        apply_search_spans(&mut style, &[(0, 2)]);
        assert_eq!(style, b"EEAAAA");
        apply_search_spans(&mut style, &[]);
        assert_eq!(style, b"AAAAAA");
    }

    #[test]
    fn test_multibyte_text_styles_per_byte() {
        let text = "x = 'привет'";
        let style = styles(text);
        assert_eq!(style.len(), text.len());
        assert_eq!(&style[4..5], "C");
    }
}
