//! Restores CJK text that was written as `\uXXXX` escape sequences.
//!
//! Dictionary keys are always literal text, so generated source must carry
//! the literal characters too. Only runs that decode to natural-language
//! characters are restored; anything else (quotes, control characters,
//! latin text) stays escaped so the surrounding literal keeps its meaning.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::text::is_natural_chars;

static ESCAPE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\\u[0-9a-fA-F]{4}|\\u\{[0-9a-fA-F]{1,6}\})+")
        .expect("escape run pattern is valid")
});

static ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\u(?:([0-9a-fA-F]{4})|\{([0-9a-fA-F]{1,6})\})").expect("escape pattern is valid")
});

/// Decodes every run of unicode escapes in `source` that spells CJK text.
///
/// # Example
///
/// ```
/// use mina_i18n::escape::normalize;
///
/// assert_eq!(normalize(r#"i18n.t('\u4F60\u597D')"#), "i18n.t('你好')");
/// assert_eq!(normalize(r#"'\u0027'"#), r#"'\u0027'"#);
/// ```
pub fn normalize(source: &str) -> String {
    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;

    for run in ESCAPE_RUN.find_iter(source) {
        output.push_str(&source[cursor..run.start()]);
        cursor = run.end();

        // An odd number of backslashes before the run means the first
        // backslash is itself escaped, so the run is not an escape at all.
        if preceding_backslashes(&source[..run.start()]) % 2 == 1 {
            output.push_str(run.as_str());
            continue;
        }

        match decode_run(run.as_str()) {
            Some(decoded) if is_natural_chars(&decoded) => output.push_str(&decoded),
            _ => output.push_str(run.as_str()),
        }
    }

    output.push_str(&source[cursor..]);
    output
}

fn preceding_backslashes(prefix: &str) -> usize {
    prefix.bytes().rev().take_while(|b| *b == b'\\').count()
}

/// Decodes one run of escapes. Surrogate pairs written as two `\uXXXX`
/// escapes are combined; lone surrogates make the whole run undecodable.
fn decode_run(run: &str) -> Option<String> {
    let mut units: Vec<u16> = Vec::new();
    for caps in ESCAPE.captures_iter(run) {
        push_escape(&caps, &mut units)?;
    }
    char::decode_utf16(units.iter().copied())
        .collect::<Result<String, _>>()
        .ok()
}

fn push_escape(caps: &Captures<'_>, units: &mut Vec<u16>) -> Option<()> {
    if let Some(hex) = caps.get(1) {
        units.push(u16::from_str_radix(hex.as_str(), 16).ok()?);
    } else {
        let code = u32::from_str_radix(caps.get(2)?.as_str(), 16).ok()?;
        let ch = char::from_u32(code)?;
        let mut buf = [0u16; 2];
        units.extend_from_slice(ch.encode_utf16(&mut buf));
    }
    Some(())
}
