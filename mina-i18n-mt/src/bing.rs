//! Bing web translator provider
//!
//! Talks to the form endpoint the Bing Translator web page uses. It needs no
//! credentials, answers quickly and throttles aggressively, so requests are
//! short-lived and failures are expected to be retried by the caller.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{MtError, MtResult};
use crate::translator::{MachineTranslator, chinese_script, parse_locale};

/// Bing Translator web endpoint provider
#[derive(Debug, Clone)]
pub struct BingTranslateProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl BingTranslateProvider {
    pub const ENDPOINT: &'static str = "https://cn.bing.com/ttranslatev3";

    /// Per-request timeout
    pub const TIMEOUT: Duration = Duration::from_secs(2);

    pub fn new() -> MtResult<Self> {
        Self::with_endpoint(Self::ENDPOINT)
    }

    /// Create a provider that posts to `endpoint` instead of Bing
    pub fn with_endpoint(endpoint: impl Into<String>) -> MtResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Self::TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Maps a BCP 47 locale to the language code Bing expects.
    ///
    /// Chinese is split by script (`zh-Hans` / `zh-Hant`); every other
    /// language is reduced to its language subtag.
    ///
    /// # Example
    ///
    /// ```
    /// use mina_i18n_mt::BingTranslateProvider;
    ///
    /// assert_eq!(BingTranslateProvider::language_code("zh-CN").unwrap(), "zh-Hans");
    /// assert_eq!(BingTranslateProvider::language_code("zh-TW").unwrap(), "zh-Hant");
    /// assert_eq!(BingTranslateProvider::language_code("en-US").unwrap(), "en");
    /// ```
    pub fn language_code(locale: &str) -> MtResult<String> {
        let locale = parse_locale(locale)?;
        Ok(match chinese_script(&locale) {
            Some(script) => format!("zh-{}", script),
            None => locale.id.language.as_str().to_string(),
        })
    }
}

#[async_trait]
impl MachineTranslator for BingTranslateProvider {
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String> {
        let from = Self::language_code(source_locale)?;
        let to = Self::language_code(target_locale)?;

        if text.is_empty() {
            return Ok(String::new());
        }

        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("fromLang", from.as_str()), ("to", to.as_str()), ("text", text)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MtError::TranslationError(format!(
                "Bing answered with status {}",
                status
            )));
        }

        let json: serde_json::Value = response.json().await?;
        let translation = json[0]["translations"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                MtError::MalformedResponse(format!(
                    "missing '[0].translations[0].text' in {}",
                    json
                ))
            })?;

        debug!(from = %from, to = %to, text, translation, "bing translation");
        Ok(translation.to_string())
    }

    fn provider_name(&self) -> &str {
        "Bing Translator"
    }
}
