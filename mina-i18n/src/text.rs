//! Natural-language text detection.
//!
//! The classifier decides whether a string literal is worth wrapping, and the
//! segmenter finds the runs of CJK text inside template text. Both use the
//! same `\p{Han}` character class, so they always agree on what counts as
//! natural language.

use std::sync::LazyLock;

use regex::Regex;

/// One or more Han ideographs, optionally padded with whitespace.
static NATURAL_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\p{Han}+\s*").expect("natural text pattern is valid"));

/// Same class as [`NATURAL_TEXT`], with the padding captured separately so it
/// can be kept outside of the generated call.
static NATURAL_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\s*)(\p{Han}+)(\s*)").expect("natural segment pattern is valid")
});

/// Characters the escape normalizer is allowed to restore.
static NATURAL_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{Han}\u{3000}-\u{303F}\u{FF00}-\u{FFEF}]+$")
        .expect("natural chars pattern is valid")
});

/// Returns true when `text` contains at least one CJK ideograph anywhere.
///
/// # Example
///
/// ```
/// use mina_i18n::text::is_natural_text;
///
/// assert!(is_natural_text("你好"));
/// assert!(is_natural_text("共 3 条"));
/// assert!(!is_natural_text("hello"));
/// ```
pub fn is_natural_text(text: &str) -> bool {
    NATURAL_TEXT.is_match(text)
}

/// Returns true when every character of `text` is a Han ideograph, a CJK
/// symbol or a full-width form.
pub fn is_natural_chars(text: &str) -> bool {
    NATURAL_CHARS.is_match(text)
}

/// A run of CJK text found inside a literal template span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub leading: &'a str,
    pub text: &'a str,
    pub trailing: &'a str,
    /// Byte range of the whole match, padding included
    pub range: std::ops::Range<usize>,
}

/// Finds every run of CJK text in `text`, in order.
pub fn natural_segments(text: &str) -> Vec<Segment<'_>> {
    NATURAL_SEGMENT
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(Segment {
                leading: caps.get(1).map_or("", |m| m.as_str()),
                text: caps.get(2)?.as_str(),
                trailing: caps.get(3).map_or("", |m| m.as_str()),
                range: whole.range(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_pure_cjk() {
        assert!(is_natural_text("你好"));
        assert!(is_natural_text("  欢迎  "));
    }

    #[test]
    fn test_accepts_mixed_content() {
        assert!(is_natural_text("Total: 3 个"));
        assert!(is_natural_text("error 错误 code"));
    }

    #[test]
    fn test_rejects_text_without_cjk() {
        assert!(!is_natural_text(""));
        assert!(!is_natural_text("hello world"));
        assert!(!is_natural_text("   "));
        assert!(!is_natural_text("123 !@#"));
    }

    #[test]
    fn test_rejects_punctuation_only() {
        // Full-width punctuation alone is not natural language
        assert!(!is_natural_text("，。！"));
    }

    #[test]
    fn test_segments_keep_padding() {
        let segments = natural_segments("  欢迎  ");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].leading, "  ");
        assert_eq!(segments[0].text, "欢迎");
        assert_eq!(segments[0].trailing, "  ");
        assert_eq!(segments[0].range, 0.."  欢迎  ".len());
    }

    #[test]
    fn test_segments_split_on_punctuation() {
        let segments = natural_segments("你好，世界");
        let texts: Vec<&str> = segments.iter().map(|s| s.text).collect();
        assert_eq!(texts, vec!["你好", "世界"]);
    }

    #[test]
    fn test_segments_skip_latin() {
        let segments = natural_segments("count: 3 条记录");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "条记录");
        assert_eq!(segments[0].leading, " ");
    }

    #[test]
    fn test_natural_chars() {
        assert!(is_natural_chars("你好"));
        assert!(is_natural_chars("你好！"));
        assert!(is_natural_chars("。"));
        assert!(!is_natural_chars("'"));
        assert!(!is_natural_chars("a你"));
        assert!(!is_natural_chars(""));
    }
}
