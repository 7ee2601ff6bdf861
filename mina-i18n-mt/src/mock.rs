//! Offline translator for tests and dry runs.
//!
//! `--provider mock` selects it from the command line, so a whole project
//! can be converted without network access. Answers are deterministic, see
//! [`MockMode`].

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{MtError, MtResult};
use crate::translator::MachineTranslator;

/// How a [`MockTranslator`] answers.
#[derive(Debug, Clone)]
pub enum MockMode {
    /// `"你好"` to `"en-US"` gives `"你好_en-US"`
    Suffix,
    /// Fixed answers keyed by `(text, target)`; anything else as [`MockMode::Suffix`]
    Mappings(HashMap<(String, String), String>),
    /// Every call fails with this message
    Error(String),
    /// The first N calls fail, later ones answer as [`MockMode::Suffix`]
    FailFirst(usize),
    /// Echoes the text back
    NoOp,
}

/// Clones share one call counter, so a test can keep a handle while the code
/// under test owns another.
#[derive(Debug, Clone)]
pub struct MockTranslator {
    mode: MockMode,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl MockTranslator {
    pub fn new(mode: MockMode) -> Self {
        Self::with_delay(mode, 0)
    }

    /// Sleeps `delay_ms` before every answer.
    pub fn with_delay(mode: MockMode, delay_ms: u64) -> Self {
        Self {
            mode,
            delay: Duration::from_millis(delay_ms),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn answer(&self, text: &str, target: &str, call: usize) -> MtResult<String> {
        let suffixed = || format!("{}_{}", text, target);
        match &self.mode {
            MockMode::Suffix => Ok(suffixed()),
            MockMode::Mappings(answers) => Ok(answers
                .get(&(text.to_string(), target.to_string()))
                .cloned()
                .unwrap_or_else(suffixed)),
            MockMode::Error(message) => Err(MtError::TranslationError(message.clone())),
            MockMode::FailFirst(failures) if call < *failures => Err(MtError::TranslationError(
                format!("mock failure {} of {}", call + 1, failures),
            )),
            MockMode::FailFirst(_) => Ok(suffixed()),
            MockMode::NoOp => Ok(text.to_string()),
        }
    }
}

#[async_trait]
impl MachineTranslator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        _source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.answer(text, target_locale, call)
    }

    fn provider_name(&self) -> &str {
        "Mock Translator"
    }
}
