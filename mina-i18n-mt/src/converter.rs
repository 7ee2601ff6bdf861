//! Script conversion for locales that share a language with the base locale.
//!
//! Simplified and Traditional Chinese differ mostly character by character,
//! so a script variant is produced locally instead of through a provider.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{MtError, MtResult};

/// Converts text between two scripts of the same language.
pub trait ScriptConverter: Send + Sync {
    fn convert(&self, text: &str) -> String;
}

/// Character-for-character conversion driven by a lookup table.
///
/// Characters missing from the table are kept as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharTableConverter {
    table: HashMap<char, char>,
}

impl CharTableConverter {
    pub fn new(table: HashMap<char, char>) -> Self {
        Self { table }
    }

    /// Loads a table from a JSON object of single-character strings, e.g.
    /// `{"简": "簡", "体": "體"}`.
    ///
    /// # Example
    ///
    /// ```
    /// use mina_i18n_mt::{CharTableConverter, ScriptConverter};
    ///
    /// let converter = CharTableConverter::from_json(r#"{"简": "簡", "体": "體"}"#).unwrap();
    /// assert_eq!(converter.convert("简体中文"), "簡體中文");
    /// ```
    pub fn from_json(json: &str) -> MtResult<Self> {
        let entries: HashMap<String, String> = serde_json::from_str(json)?;
        let mut table = HashMap::with_capacity(entries.len());
        for (from, to) in entries {
            table.insert(single_char(&from)?, single_char(&to)?);
        }
        Ok(Self { table })
    }

    pub fn from_file(path: impl AsRef<Path>) -> MtResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl ScriptConverter for CharTableConverter {
    fn convert(&self, text: &str) -> String {
        text.chars()
            .map(|c| self.table.get(&c).copied().unwrap_or(c))
            .collect()
    }
}

fn single_char(entry: &str) -> MtResult<char> {
    let mut chars = entry.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(MtError::ConfigError(format!(
            "conversion table entries must be single characters, got {:?}",
            entry
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_characters_pass_through() {
        let converter = CharTableConverter::from_json(r#"{"门": "門"}"#).unwrap();
        assert_eq!(converter.convert("大门 open"), "大門 open");
        assert_eq!(converter.len(), 1);
    }

    #[test]
    fn test_rejects_multi_character_entries() {
        let result = CharTableConverter::from_json(r#"{"中文": "中文"}"#);
        assert!(matches!(result, Err(MtError::ConfigError(_))));
    }

    #[test]
    fn test_rejects_invalid_json() {
        let result = CharTableConverter::from_json("[1, 2]");
        assert!(matches!(result, Err(MtError::Json(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = CharTableConverter::from_file("/nonexistent/table.json");
        assert!(matches!(result, Err(MtError::Io(_))));
    }

    #[test]
    fn test_empty_table_is_identity() {
        let converter = CharTableConverter::default();
        assert!(converter.is_empty());
        assert_eq!(converter.convert("简体"), "简体");
    }
}
