//! The provider seam and the locale helpers providers share.

use async_trait::async_trait;
use icu_locale::Locale;

use crate::error::{MtError, MtResult};

/// A machine translation backend.
///
/// One call translates one text. Implementations report every failure as an
/// error; retrying is the job of [`crate::TranslationClient`].
#[async_trait]
pub trait MachineTranslator: Send + Sync {
    /// Translates `text` from `source_locale` to `target_locale`, both BCP 47
    /// codes such as `zh-CN` or `en-US`.
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String>;

    /// Name used in log lines.
    fn provider_name(&self) -> &str;
}

/// Parses a BCP 47 locale code.
///
/// Both `-` and `_` separators are accepted.
///
/// # Example
///
/// ```
/// use mina_i18n_mt::translator::parse_locale;
///
/// assert_eq!(parse_locale("zh_TW").unwrap().to_string(), "zh-TW");
/// assert!(parse_locale("invalid@code").is_err());
/// ```
pub fn parse_locale(locale: &str) -> MtResult<Locale> {
    if locale.trim().is_empty() {
        return Err(MtError::InvalidLocale("locale code is empty".to_string()));
    }
    locale
        .replace('_', "-")
        .parse::<Locale>()
        .map_err(|e| MtError::InvalidLocale(format!("{}: {}", locale, e)))
}

/// Checks that `locale` parses, see [`parse_locale`].
pub fn validate_locale(locale: &str) -> MtResult<()> {
    parse_locale(locale).map(|_| ())
}

/// Chinese script a locale is written in: `Hant` for Traditional, `Hans`
/// otherwise. Returns `None` for locales that are not Chinese.
pub fn chinese_script(locale: &Locale) -> Option<&'static str> {
    if locale.id.language.as_str() != "zh" {
        return None;
    }
    let traditional_script = locale.id.script.is_some_and(|s| s.as_str() == "Hant");
    let traditional_region = locale
        .id
        .region
        .is_some_and(|r| matches!(r.as_str(), "TW" | "HK" | "MO"));
    if traditional_script || traditional_region {
        Some("Hant")
    } else {
        Some("Hans")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locale_accepts_underscore() {
        let locale = parse_locale("zh_Hant_TW").unwrap();
        assert_eq!(locale.id.language.as_str(), "zh");
        assert_eq!(locale.id.region.map(|r| r.as_str().to_string()), Some("TW".to_string()));
    }

    #[test]
    fn test_validate_locale_valid_codes() {
        assert!(validate_locale("en").is_ok());
        assert!(validate_locale("zh-CN").is_ok());
        assert!(validate_locale("zh-Hant-TW").is_ok());
        assert!(validate_locale("de_DE").is_ok());
    }

    #[test]
    fn test_validate_locale_invalid_codes() {
        assert!(validate_locale("").is_err());
        assert!(validate_locale("en@invalid").is_err());
        assert!(validate_locale("fr#bad").is_err());
    }

    #[test]
    fn test_invalid_locale_error_names_the_code() {
        let result = validate_locale("en@US");
        assert!(matches!(result, Err(MtError::InvalidLocale(msg)) if msg.contains("en@US")));
    }

    #[test]
    fn test_chinese_script() {
        let script = |code: &str| chinese_script(&parse_locale(code).unwrap());
        assert_eq!(script("zh-CN"), Some("Hans"));
        assert_eq!(script("zh"), Some("Hans"));
        assert_eq!(script("zh-TW"), Some("Hant"));
        assert_eq!(script("zh-HK"), Some("Hant"));
        assert_eq!(script("zh-Hant"), Some("Hant"));
        assert_eq!(script("en-US"), None);
    }
}
