use std::sync::Arc;

use mina_i18n::PendingTranslation;
use tracing::{debug, warn};

use crate::translator::MachineTranslator;

/// Wraps a provider with retries and an empty-string fallback.
///
/// Every provider error counts as a failed attempt, whatever its kind.
/// Attempts follow each other without delay. When the last one fails the
/// translation resolves to `""`, so a run always finishes with a value for
/// every text.
#[derive(Clone)]
pub struct TranslationClient {
    translator: Arc<dyn MachineTranslator>,
    source_locale: String,
    /// Maximum number of attempts (including the first one)
    max_attempts: u32,
}

impl TranslationClient {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

    pub fn new(translator: Arc<dyn MachineTranslator>, source_locale: &str) -> Self {
        Self {
            translator,
            source_locale: source_locale.to_string(),
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Set the maximum number of attempts. Values below 1 are raised to 1.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn provider_name(&self) -> &str {
        self.translator.provider_name()
    }

    /// Resolves one pending translation. Never fails.
    ///
    /// Attempts already recorded on `pending` count towards the limit.
    pub async fn translate(&self, pending: &PendingTranslation) -> String {
        let target = &pending.locale.code;
        let mut attempt = pending.attempts;

        while attempt < self.max_attempts {
            attempt += 1;
            match self
                .translator
                .translate(&pending.text, &self.source_locale, target)
                .await
            {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(
                            text = %pending.text,
                            target = %target,
                            "succeeded on attempt {}/{}",
                            attempt,
                            self.max_attempts
                        );
                    }
                    return value;
                }
                Err(e) => {
                    debug!(
                        text = %pending.text,
                        target = %target,
                        error = %e,
                        "attempt {}/{} failed",
                        attempt,
                        self.max_attempts
                    );
                }
            }
        }

        warn!(
            text = %pending.text,
            target = %target,
            provider = self.provider_name(),
            "giving up after {} attempts, storing an empty translation",
            self.max_attempts
        );
        String::new()
    }
}

impl std::fmt::Debug for TranslationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationClient")
            .field("provider", &self.provider_name())
            .field("source_locale", &self.source_locale)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}
