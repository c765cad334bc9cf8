//! UTF-8 safe string helpers.
//!
//! Take the first N Unicode scalar values (chars) from a string without
//! slicing by byte index, which can panic on multibyte characters.

/// Return the first `n` characters of `s` as a `String` (no ellipsis).
pub fn prefix_chars(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

/// Return a preview of `s` up to `n` characters. If `s` is longer than `n`
/// characters, the returned string will include a trailing ellipsis `...`.
pub fn preview(s: &str, n: usize) -> String {
    let mut prefix = prefix_chars(s, n);
    if s.chars().nth(n).is_some() {
        prefix.push_str("...");
    }
    prefix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_shorter_than_budget() {
        assert_eq!(prefix_chars("abc", 10), "abc");
        assert_eq!(prefix_chars("", 3), "");
    }

    #[test]
    fn prefix_counts_chars_not_bytes() {
        let s = "éèàçù";
        assert_eq!(prefix_chars(s, 2), "éè");
        assert_eq!(prefix_chars(s, 2).chars().count(), 2);
    }

    #[test]
    fn preview_basic_ascii() {
        let s = "hello world";
        assert_eq!(preview(s, 5), "hello...");
        assert_eq!(preview(s, 20), "hello world");
        assert_eq!(preview(s, 11), "hello world");
    }

    #[test]
    fn preview_cjk_characters() {
        let s = "宇树科技是最强的选手";
        assert_eq!(preview(s, 4), "宇树科技...");
    }
}
