//! Background translation of recorded texts.
//!
//! [`TranslationQueue::dispatch`] drains the dictionary's pending entries
//! after each file and starts a task per entry; [`TranslationQueue::finish`]
//! is the single barrier where results are written back. Tasks never touch
//! the dictionary themselves.

use std::sync::Arc;

use mina_i18n::{Dictionary, LocaleKind, PendingTranslation};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::client::TranslationClient;
use crate::converter::ScriptConverter;

/// Result of one background translation.
#[derive(Debug)]
struct Resolved {
    text: String,
    locale: String,
    value: String,
}

pub struct TranslationQueue {
    client: TranslationClient,
    converter: Option<Arc<dyn ScriptConverter>>,
    /// Caps the number of provider requests in flight
    permits: Arc<Semaphore>,
    tasks: JoinSet<Resolved>,
}

impl TranslationQueue {
    pub const DEFAULT_CONCURRENCY: usize = 8;

    /// Creates a queue that runs at most `concurrency` translations at once.
    /// A concurrency of 0 is treated as 1.
    pub fn new(client: TranslationClient, concurrency: usize) -> Self {
        Self {
            client,
            converter: None,
            permits: Arc::new(Semaphore::new(concurrency.max(1))),
            tasks: JoinSet::new(),
        }
    }

    /// Resolves script-variant locales with `converter`.
    pub fn with_converter(mut self, converter: Arc<dyn ScriptConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Number of translations started and not yet collected.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Drains the dictionary's pending entries. Script variants are converted
    /// on the spot; everything else is started in the background.
    ///
    /// Must be called from within a tokio runtime. Returns the number of
    /// tasks started.
    pub fn dispatch(&mut self, dictionary: &mut Dictionary) -> usize {
        let mut started = 0;
        for pending in dictionary.take_pending() {
            match pending.locale.kind {
                LocaleKind::ScriptVariant => {
                    let value = self.convert(&pending);
                    dictionary.record_translated(&pending.text, &pending.locale.code, &value);
                }
                LocaleKind::Translated => {
                    self.spawn(pending);
                    started += 1;
                }
            }
        }
        if started > 0 {
            debug!(started, in_flight = self.in_flight(), "dispatched translations");
        }
        started
    }

    fn convert(&self, pending: &PendingTranslation) -> String {
        match &self.converter {
            Some(converter) => converter.convert(&pending.text),
            None => {
                warn!(
                    locale = %pending.locale.code,
                    "no script converter configured, keeping the original text"
                );
                pending.text.clone()
            }
        }
    }

    fn spawn(&mut self, pending: PendingTranslation) {
        let client = self.client.clone();
        let permits = Arc::clone(&self.permits);
        self.tasks.spawn(async move {
            // The semaphore is never closed, so acquiring cannot fail
            let _permit = permits.acquire_owned().await.ok();
            let value = client.translate(&pending).await;
            Resolved {
                text: pending.text,
                locale: pending.locale.code,
                value,
            }
        });
    }

    /// Waits for every started translation and records the results. Returns
    /// the number of values recorded.
    pub async fn finish(&mut self, dictionary: &mut Dictionary) -> usize {
        let total = self.tasks.len();
        if total > 0 {
            info!(total, provider = self.client.provider_name(), "waiting for translations");
        }

        let mut recorded = 0;
        while let Some(result) = self.tasks.join_next().await {
            match result {
                Ok(resolved) => {
                    dictionary.record_translated(&resolved.text, &resolved.locale, &resolved.value);
                    recorded += 1;
                }
                Err(e) => warn!(error = %e, "translation task did not complete"),
            }
        }
        recorded
    }
}

impl std::fmt::Debug for TranslationQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationQueue")
            .field("client", &self.client)
            .field("has_converter", &self.converter.is_some())
            .field("in_flight", &self.tasks.len())
            .finish()
    }
}
