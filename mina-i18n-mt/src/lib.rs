//! Machine translation for mina-i18n
//!
//! Fills the derived locales of a [`mina_i18n::Dictionary`]: translated
//! locales through a [`MachineTranslator`] wrapped in a retrying
//! [`TranslationClient`], script variants through a [`ScriptConverter`].
//!
//! # Workflow Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use mina_i18n::{Dictionary, TargetLocale};
//! use mina_i18n_mt::{BingTranslateProvider, TranslationClient, TranslationQueue};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut dictionary = Dictionary::new("zh-CN", vec![TargetLocale::translated("en-US")]);
//!     dictionary.record("你好");
//!
//!     let client = TranslationClient::new(Arc::new(BingTranslateProvider::new()?), "zh-CN");
//!     let mut queue = TranslationQueue::new(client, 8);
//!     queue.dispatch(&mut dictionary);
//!     queue.finish(&mut dictionary).await;
//!
//!     println!("{:?}", dictionary.get("en-US", "你好"));
//!     Ok(())
//! }
//! ```

pub mod bing;
pub mod client;
pub mod converter;
pub mod error;
pub mod google_translate;
pub mod mock;
pub mod queue;
pub mod translator;

// Re-export main types for convenient access
pub use bing::BingTranslateProvider;
pub use client::TranslationClient;
pub use converter::{CharTableConverter, ScriptConverter};
pub use error::{MtError, MtResult};
pub use google_translate::GoogleTranslateProvider;
pub use mock::{MockMode, MockTranslator};
pub use queue::TranslationQueue;
pub use translator::MachineTranslator;
