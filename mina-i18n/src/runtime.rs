//! Names and glue code shared between the generated call sites and the
//! runtime module they resolve against.

use crate::dictionary::{LocaleTables, to_pretty_json};

const PRELUDE_BEGIN: &str = "/*------- auto generated code by mina-i18n begin -------*/";
const PRELUDE_END: &str = "/*-------- auto generated code by mina-i18n end --------*/";
const PRELUDE_RULE: &str = "/*------------------------------------------------------*/";

/// Identifiers the rewriters emit and the runtime provides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Runtime {
    /// Name the runtime instance is bound to in scripts and templates
    pub alias: String,
    /// Lookup function: `alias.translate_fn(text, locale?)`
    pub translate_fn: String,
    /// Current-locale getter: `alias.locale_getter()`
    pub locale_getter: String,
    /// Page registration call recognized in scripts
    pub page_fn: String,
    /// Localized replacement for `page_fn`
    pub localized_page_fn: String,
    /// Module the script prelude imports from
    pub script_module: String,
    /// File name of the generated WXS module, relative to the output root
    pub wxs_file: String,
    /// Property injected into page data by the locale-data rewrite
    pub locale_key: String,
}

impl Default for Runtime {
    fn default() -> Self {
        Runtime {
            alias: "i18n".to_string(),
            translate_fn: "t".to_string(),
            locale_getter: "getLocale".to_string(),
            page_fn: "Page".to_string(),
            localized_page_fn: "I18nPage".to_string(),
            script_module: "@miniprogram-i18n/core".to_string(),
            wxs_file: "mina-i18n.wxs".to_string(),
            locale_key: "$language".to_string(),
        }
    }
}

impl Runtime {
    /// `i18n.t(<argument>)`
    pub fn call(&self, argument: &str) -> String {
        format!("{}.{}({})", self.alias, self.translate_fn, argument)
    }

    /// `{{ i18n.t('<text>') }}`, the template form of [`Runtime::call`].
    pub fn template_call(&self, text: &str) -> String {
        format!("{{{{ {} }}}}", self.call(&format!("'{}'", text)))
    }

    /// `i18n.getLocale()`
    pub fn locale_call(&self) -> String {
        format!("{}.{}()", self.alias, self.locale_getter)
    }

    /// Imports that bind the runtime alias at the top of every script.
    pub fn script_prelude(&self) -> String {
        format!(
            "{rule}\n{begin}\nimport {{ {page} }} from '{module}'\nimport {{ getI18nInstance }} from '{module}'\nconst {alias} = getI18nInstance()\n{end}\n{rule}\n",
            rule = PRELUDE_RULE,
            begin = PRELUDE_BEGIN,
            end = PRELUDE_END,
            page = self.localized_page_fn,
            module = self.script_module,
            alias = self.alias,
        )
    }

    /// Prepends [`Runtime::script_prelude`] unless `source` already has it.
    pub fn with_script_prelude(&self, source: &str) -> String {
        if source.contains(PRELUDE_BEGIN) {
            source.to_string()
        } else {
            format!("{}{}", self.script_prelude(), source)
        }
    }

    /// `<wxs src="..." module="i18n"></wxs>`
    pub fn wxs_reference(&self, src: &str) -> String {
        format!("<wxs src=\"{}\" module=\"{}\"></wxs>", src, self.alias)
    }

    /// Renders the WXS module templates resolve `i18n.t` against, with every
    /// locale table embedded.
    pub fn render_wxs_module(
        &self,
        tables: &LocaleTables,
        default_locale: &str,
    ) -> Result<String, serde_json::Error> {
        let json = to_pretty_json(tables)?;
        Ok(format!(
            r#"var dictionary = {json};
var defaultLocale = '{default_locale}';

function {lookup}(text, locale) {{
    var table = dictionary[locale || defaultLocale];
    if (table && table[text]) {{
        return table[text];
    }}
    return text;
}}

function {getter}() {{
    return defaultLocale;
}}

module.exports = {{
    {lookup}: {lookup},
    {getter}: {getter}
}};
"#,
            lookup = self.translate_fn,
            getter = self.locale_getter,
        ))
    }
}
