//! Shared utility functions.

/// Truncate a string to approximately `max_bytes` without splitting a UTF-8
/// character boundary.
///
/// Returns a sub-slice of the original string. If the string is shorter than
/// `max_bytes`, the entire string is returned unchanged.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Truncate a string to at most `max_bytes`, keeping the head and tail and
/// replacing the middle with a marker.
///
/// Head+tail keeps both the lead-in and the conclusion of long step output,
/// which is usually where the useful content is. Falls back to plain head
/// truncation when the budget is too small to fit the marker.
pub fn truncate_head_tail(s: &str, max_bytes: usize) -> String {
    const MARKER: &str = "\n... [truncated] ...\n";

    if s.len() <= max_bytes {
        return s.to_string();
    }
    if max_bytes <= MARKER.len() {
        return truncate_str(s, max_bytes).to_string();
    }

    let keep = max_bytes - MARKER.len();
    let head_budget = keep / 2;
    let tail_budget = keep - head_budget;

    let head = truncate_str(s, head_budget);

    let mut tail_start = s.len() - tail_budget;
    while tail_start < s.len() && !s.is_char_boundary(tail_start) {
        tail_start += 1;
    }

    format!("{head}{MARKER}{}", &s[tail_start..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_ascii() {
        assert_eq!(truncate_str("hello world", 5), "hello");
    }

    #[test]
    fn truncate_no_op_when_short() {
        assert_eq!(truncate_str("hi", 10), "hi");
    }

    #[test]
    fn truncate_multibyte_boundary() {
        // 'の' is 3 bytes (U+306E): bytes 0xe3 0x81 0xae
        let s = "あのね"; // 9 bytes: 3+3+3
        // Cutting at byte 4 would land inside 'の', should back up to 3
        assert_eq!(truncate_str(s, 4), "あ");
        assert_eq!(truncate_str(s, 6), "あの");
    }

    #[test]
    fn truncate_empty() {
        assert_eq!(truncate_str("", 10), "");
    }

    #[test]
    fn head_tail_no_op_when_short() {
        assert_eq!(truncate_head_tail("short", 100), "short");
    }

    #[test]
    fn head_tail_keeps_both_ends() {
        let s = format!("START{}END", "x".repeat(500));
        let out = truncate_head_tail(&s, 100);
        assert!(out.len() <= 100);
        assert!(out.starts_with("START"));
        assert!(out.ends_with("END"));
        assert!(out.contains("[truncated]"));
    }

    #[test]
    fn head_tail_tiny_budget_degrades_to_head() {
        let out = truncate_head_tail("abcdefghij", 4);
        assert_eq!(out, "abcd");
    }

    #[test]
    fn head_tail_multibyte_safety() {
        let s = "テスト結果: ".repeat(50);
        let out = truncate_head_tail(&s, 64);
        assert!(out.len() <= 64);
        // Must be valid UTF-8 end to end (String construction would panic otherwise)
        assert!(!out.is_empty());
    }
}
