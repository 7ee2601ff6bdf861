//! Source rewriting for mini-program internationalization.
//!
//! Scripts and WXML templates are rewritten so every piece of CJK text goes
//! through a runtime lookup (`i18n.t(...)`), and each text found is recorded
//! in a [`Dictionary`] that later receives its translations.
//!
//! ```
//! use mina_i18n::{Dictionary, Runtime, ScriptOptions, TargetLocale, rewrite_script};
//!
//! let runtime = Runtime::default();
//! let mut dictionary = Dictionary::new("zh-CN", vec![TargetLocale::translated("en-US")]);
//!
//! let output = rewrite_script(
//!     "wx.showToast({ title: '保存成功' })",
//!     &runtime,
//!     &ScriptOptions::default(),
//!     &mut dictionary,
//! )
//! .unwrap();
//!
//! assert!(output.contains("wx.showToast({ title: i18n.t('保存成功') })"));
//! assert_eq!(dictionary.pending_len(), 1);
//! ```

pub mod dictionary;
pub mod error;
pub mod escape;
pub mod markup;
pub mod runtime;
pub mod script;
pub mod template;
pub mod text;

pub use dictionary::{Dictionary, LocaleKind, LocaleTables, PendingTranslation, TargetLocale};
pub use error::{ParseError, ParseResult};
pub use runtime::Runtime;
pub use script::{ScriptOptions, rewrite_expression, rewrite_script};
pub use template::{TemplateOptions, rewrite_template, runtime_src};
