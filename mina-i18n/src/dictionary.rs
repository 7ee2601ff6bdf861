//! The run-wide bilingual dictionary.
//!
//! A [`Dictionary`] is created once per run and passed by `&mut` to every
//! rewriter call. Recording a text writes the base-locale entry immediately
//! and queues one [`PendingTranslation`] per derived locale; whoever drives
//! the run drains that queue and feeds the results back through
//! [`Dictionary::record_translated`].

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

/// How a derived locale gets its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocaleKind {
    /// A different language, resolved through a translation provider
    Translated,
    /// Same language in another script, resolved by character conversion
    ScriptVariant,
}

/// A locale the dictionary fills in addition to the base locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TargetLocale {
    pub code: String,
    pub kind: LocaleKind,
}

impl TargetLocale {
    pub fn translated(code: &str) -> Self {
        TargetLocale {
            code: code.to_string(),
            kind: LocaleKind::Translated,
        }
    }

    pub fn script_variant(code: &str) -> Self {
        TargetLocale {
            code: code.to_string(),
            kind: LocaleKind::ScriptVariant,
        }
    }
}

/// A text waiting for its value in one derived locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTranslation {
    pub text: String,
    pub locale: TargetLocale,
    /// Provider attempts made so far
    pub attempts: u32,
}

/// Locale code → original text → translated text.
pub type LocaleTables = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug)]
pub struct Dictionary {
    base_locale: String,
    targets: Vec<TargetLocale>,
    tables: LocaleTables,
    pending: Vec<PendingTranslation>,
}

impl Dictionary {
    pub fn new(base_locale: &str, targets: Vec<TargetLocale>) -> Self {
        let mut tables = LocaleTables::new();
        tables.insert(base_locale.to_string(), BTreeMap::new());
        for target in &targets {
            tables.insert(target.code.clone(), BTreeMap::new());
        }
        Dictionary {
            base_locale: base_locale.to_string(),
            targets,
            tables,
            pending: Vec::new(),
        }
    }

    pub fn base_locale(&self) -> &str {
        &self.base_locale
    }

    pub fn targets(&self) -> &[TargetLocale] {
        &self.targets
    }

    /// Records a text found by a rewriter: base entry now, derived entries
    /// queued. Identical texts queue again; the table assignment that
    /// eventually follows is idempotent per key.
    pub fn record(&mut self, text: &str) {
        self.record_base(text);
        for target in &self.targets {
            self.pending.push(PendingTranslation {
                text: text.to_string(),
                locale: target.clone(),
                attempts: 0,
            });
        }
        debug!(text, queued = self.targets.len(), "recorded text");
    }

    /// Maps `text` to itself in the base locale. Recording the same text
    /// twice has no observable effect.
    pub fn record_base(&mut self, text: &str) {
        self.tables
            .entry(self.base_locale.clone())
            .or_default()
            .insert(text.to_string(), text.to_string());
    }

    pub fn record_translated(&mut self, text: &str, locale: &str, value: &str) {
        self.tables
            .entry(locale.to_string())
            .or_default()
            .insert(text.to_string(), value.to_string());
    }

    /// Drains the queue of texts still waiting for derived-locale values.
    pub fn take_pending(&mut self) -> Vec<PendingTranslation> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn get(&self, locale: &str, text: &str) -> Option<&str> {
        self.tables
            .get(locale)
            .and_then(|table| table.get(text))
            .map(String::as_str)
    }

    pub fn contains(&self, text: &str) -> bool {
        self.get(&self.base_locale, text).is_some()
    }

    pub fn len(&self) -> usize {
        self.tables.get(&self.base_locale).map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn table(&self, locale: &str) -> Option<&BTreeMap<String, String>> {
        self.tables.get(locale)
    }

    pub fn tables(&self) -> &LocaleTables {
        &self.tables
    }

    /// Locale the generated runtime looks texts up in when a call names
    /// none: the first translated target, then any target, then the base.
    pub fn runtime_locale(&self) -> &str {
        self.targets
            .iter()
            .find(|target| target.kind == LocaleKind::Translated)
            .or_else(|| self.targets.first())
            .map_or(self.base_locale.as_str(), |target| target.code.as_str())
    }

    /// Every configured locale code, base first.
    pub fn locales(&self) -> Vec<&str> {
        std::iter::once(self.base_locale.as_str())
            .chain(self.targets.iter().map(|t| t.code.as_str()))
            .collect()
    }

    /// Renders one locale's table as JSON indented with four spaces.
    pub fn to_pretty_json(&self, locale: &str) -> Result<String, serde_json::Error> {
        let empty = BTreeMap::new();
        to_pretty_json(self.tables.get(locale).unwrap_or(&empty))
    }
}

/// Serializes `value` as JSON indented with four spaces.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
