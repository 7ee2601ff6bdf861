//! Cloud Translation v2 provider.
//!
//! Needs an API key, read from `GOOGLE_TRANSLATE_API_KEY` by
//! [`GoogleTranslateProvider::from_env`]. Chinese locales are sent as
//! `zh-CN` or `zh-TW`; every other locale is reduced to its language.
//!
//! ```ignore
//! use mina_i18n_mt::{GoogleTranslateProvider, MachineTranslator};
//!
//! let provider = GoogleTranslateProvider::from_env()?;
//! let english = provider.translate("你好", "zh-CN", "en-US").await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::error::{MtError, MtResult};
use crate::translator::{MachineTranslator, chinese_script, parse_locale};

pub const API_KEY_VAR: &str = "GOOGLE_TRANSLATE_API_KEY";

#[derive(Clone)]
pub struct GoogleTranslateProvider {
    api_key: String,
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleTranslateProvider {
    pub const ENDPOINT: &'static str = "https://translation.googleapis.com/language/translate/v2";

    /// The API refuses single strings above this many bytes.
    const MAX_TEXT_BYTES: usize = 30_000;

    const TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(api_key: impl Into<String>) -> MtResult<Self> {
        Self::with_endpoint(api_key, Self::ENDPOINT)
    }

    /// Sends requests to `endpoint` instead of the public API.
    pub fn with_endpoint(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> MtResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(MtError::ConfigError(format!("{} is empty", API_KEY_VAR)));
        }
        let client = reqwest::Client::builder().timeout(Self::TIMEOUT).build()?;
        Ok(Self {
            api_key,
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_env() -> MtResult<Self> {
        match std::env::var(API_KEY_VAR) {
            Ok(key) => Self::new(key),
            Err(_) => Err(MtError::ConfigError(format!(
                "set {} to use the google provider",
                API_KEY_VAR
            ))),
        }
    }

    pub fn language_code(locale: &str) -> MtResult<String> {
        let locale = parse_locale(locale)?;
        Ok(match chinese_script(&locale) {
            Some("Hant") => "zh-TW".to_string(),
            Some(_) => "zh-CN".to_string(),
            None => locale.id.language.as_str().to_string(),
        })
    }
}

impl std::fmt::Debug for GoogleTranslateProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleTranslateProvider")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[async_trait]
impl MachineTranslator for GoogleTranslateProvider {
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
        if text.len() > Self::MAX_TEXT_BYTES {
            return Err(MtError::TranslationError(format!(
                "{} bytes is over the {} byte limit",
                text.len(),
                Self::MAX_TEXT_BYTES
            )));
        }

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({ "q": [text], "source": from, "target": to, "format": "text" }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            // 4xx means the key or the request is wrong; retrying will not help
            return Err(if status.is_client_error() {
                MtError::ConfigError(format!(
                    "google rejected the request ({}): {}",
                    status, detail
                ))
            } else {
                MtError::TranslationError(format!("google returned {}: {}", status, detail))
            });
        }

        let body: serde_json::Value = response.json().await?;
        let translated = body
            .pointer("/data/translations/0/translatedText")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| MtError::MalformedResponse(body.to_string()))?;
        debug!(from = %from, to = %to, "google translated {} bytes", text.len());
        Ok(translated.to_string())
    }

    fn provider_name(&self) -> &str {
        "Google Translate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn provider_for(server: &MockServer) -> GoogleTranslateProvider {
        GoogleTranslateProvider::with_endpoint("secret", server.uri()).unwrap()
    }

    #[test]
    fn test_blank_key_is_rejected() {
        let result = GoogleTranslateProvider::new("  ");
        assert!(matches!(result, Err(MtError::ConfigError(_))));
    }

    #[test]
    fn test_key_is_not_printed() {
        let provider = GoogleTranslateProvider::new("secret").unwrap();
        let printed = format!("{:?}", provider);
        assert!(printed.contains("<redacted>"));
        assert!(!printed.contains("secret"));
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(GoogleTranslateProvider::language_code("zh").unwrap(), "zh-CN");
        assert_eq!(GoogleTranslateProvider::language_code("zh_HK").unwrap(), "zh-TW");
        assert_eq!(GoogleTranslateProvider::language_code("ja-JP").unwrap(), "ja");
    }

    #[tokio::test]
    async fn test_request_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(query_param("key", "secret"))
            .and(body_partial_json(json!({ "q": ["你好"], "source": "zh-CN", "target": "en" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "translations": [{ "translatedText": "Hello" }] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        assert_eq!(provider.translate("你好", "zh-CN", "en-US").await.unwrap(), "Hello");
    }

    #[tokio::test]
    async fn test_forbidden_is_a_config_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let result = provider_for(&server).await.translate("你好", "zh-CN", "en").await;
        assert!(
            matches!(result, Err(MtError::ConfigError(msg)) if msg.contains("API key not valid"))
        );
    }

    #[tokio::test]
    async fn test_server_error_is_a_translation_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = provider_for(&server).await.translate("你好", "zh-CN", "en").await;
        assert!(matches!(result, Err(MtError::TranslationError(_))));
    }

    #[tokio::test]
    async fn test_unexpected_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
            .mount(&server)
            .await;

        let result = provider_for(&server).await.translate("你好", "zh-CN", "en").await;
        assert!(matches!(result, Err(MtError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_empty_text_skips_the_request() {
        let provider = GoogleTranslateProvider::new("secret").unwrap();
        assert_eq!(provider.translate("", "zh-CN", "en").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_oversized_text() {
        let provider = GoogleTranslateProvider::new("secret").unwrap();
        let text = "字".repeat(GoogleTranslateProvider::MAX_TEXT_BYTES);
        let result = provider.translate(&text, "zh-CN", "en").await;
        assert!(matches!(result, Err(MtError::TranslationError(_))));
    }

    #[tokio::test]
    async fn test_bad_target_locale() {
        let provider = GoogleTranslateProvider::new("secret").unwrap();
        let result = provider.translate("你好", "zh-CN", "not a locale").await;
        assert!(matches!(result, Err(MtError::InvalidLocale(_))));
    }

    #[tokio::test]
    #[ignore] // needs GOOGLE_TRANSLATE_API_KEY
    async fn test_live_api() {
        let provider = GoogleTranslateProvider::from_env().unwrap();
        let english = provider.translate("你好", "zh-CN", "en-US").await.unwrap();
        assert!(!english.is_empty());
    }
}
