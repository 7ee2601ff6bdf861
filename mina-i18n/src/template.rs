//! WXML template rewriting.
//!
//! Text nodes and attribute values are split into literal spans and `{{ }}`
//! expression spans. CJK runs in literal spans become `{{ i18n.t('...') }}`
//! interpolations; expression spans go through the script rewriter in
//! expression mode. The tree is then written back out with the mini-program
//! serialization rules (no `wx-` prefixes, a fixed set of self-closing
//! components).

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::dictionary::Dictionary;
use crate::error::ParseResult;
use crate::markup::{Attribute, Document, Element, MarkupNode, is_raw_text_element, parse_markup};
use crate::runtime::Runtime;
use crate::script::rewrite_expression;
use crate::text::natural_segments;

/// Components written as `<name ... />` when they have no children.
const SELF_CLOSING: &[&str] = &[
    "progress",
    "icon",
    "checkbox",
    "input",
    "radio",
    "slider",
    "switch",
    "textarea",
    "live-player",
    "live-pusher",
    "import",
    "include",
    "template",
];

static EXPRESSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{[^}]*\}\}").expect("expression pattern is valid"));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateOptions {
    /// Path of the runtime module relative to the template's directory. When
    /// set, a module reference is prepended unless one is already declared.
    pub runtime_src: Option<String>,
}

/// Rewrites a WXML document.
///
/// # Errors
///
/// Returns [`crate::ParseError`] when the markup cannot be parsed. No text is
/// recorded in that case.
///
/// # Example
///
/// ```
/// use mina_i18n::{Dictionary, Runtime, TemplateOptions, rewrite_template};
///
/// let mut dictionary = Dictionary::new("zh-CN", vec![]);
/// let output = rewrite_template(
///     "<text>  欢迎  </text>",
///     &Runtime::default(),
///     &TemplateOptions::default(),
///     &mut dictionary,
/// )
/// .unwrap();
/// assert_eq!(output, "<text>  {{ i18n.t('欢迎') }}  </text>");
/// ```
pub fn rewrite_template(
    markup: &str,
    runtime: &Runtime,
    options: &TemplateOptions,
    dictionary: &mut Dictionary,
) -> ParseResult<String> {
    let document = parse_markup(markup)?;

    let mut rewriter = TemplateRewriter {
        runtime,
        dictionary,
        output: String::with_capacity(markup.len()),
    };
    for node in &document.children {
        rewriter.write_node(node, false);
    }

    match &options.runtime_src {
        Some(src) if !declares_runtime(&document, runtime) => Ok(format!(
            "{}\n{}",
            runtime.wxs_reference(src),
            rewriter.output
        )),
        _ => Ok(rewriter.output),
    }
}

/// Path from a template `depth` directories below the output root to the
/// runtime module at the root.
pub fn runtime_src(runtime: &Runtime, depth: usize) -> String {
    if depth == 0 {
        format!("./{}", runtime.wxs_file)
    } else {
        format!("{}{}", "../".repeat(depth), runtime.wxs_file)
    }
}

fn declares_runtime(document: &Document, runtime: &Runtime) -> bool {
    document
        .children
        .iter()
        .filter_map(MarkupNode::as_element)
        .any(|element| {
            element.name == "wxs" && element.attribute("module") == Some(runtime.alias.as_str())
        })
}

fn is_self_closing(name: &str, element: &Element) -> bool {
    element.children.is_empty() && SELF_CLOSING.contains(&name)
}

struct TemplateRewriter<'a> {
    runtime: &'a Runtime,
    dictionary: &'a mut Dictionary,
    output: String,
}

impl TemplateRewriter<'_> {
    fn write_node(&mut self, node: &MarkupNode, raw: bool) {
        match node {
            MarkupNode::Element(element) => self.write_element(element),
            MarkupNode::Text { data } if raw => self.output.push_str(data),
            MarkupNode::Text { data } => {
                let text = self.rewrite_segment(data);
                self.output.push_str(&text);
            }
            MarkupNode::Comment { data } => {
                self.output.push_str("<!--");
                self.output.push_str(data);
                self.output.push_str("-->");
            }
        }
    }

    fn write_element(&mut self, element: &Element) {
        let name = element.name.strip_prefix("wx-").unwrap_or(&element.name);

        self.output.push('<');
        self.output.push_str(name);
        for attribute in &element.attributes {
            self.write_attribute(attribute);
        }

        if is_self_closing(name, element) {
            self.output.push_str(" />");
            return;
        }

        self.output.push('>');
        let raw = is_raw_text_element(name);
        for child in &element.children {
            self.write_node(child, raw);
        }
        self.output.push_str("</");
        self.output.push_str(name);
        self.output.push('>');
    }

    fn write_attribute(&mut self, attribute: &Attribute) {
        self.output.push(' ');
        self.output.push_str(&attribute.name);
        let Some(value) = &attribute.value else {
            return;
        };

        let value = self.rewrite_segment(value);
        // Wrapped text always brings single quotes, so only a value without
        // them can switch to single quoting
        let (quote, value) = match (value.contains('"'), value.contains('\'')) {
            (true, false) => ('\'', value),
            (true, true) => ('"', value.replace('"', "&quot;")),
            _ => ('"', value),
        };
        self.output.push('=');
        self.output.push(quote);
        self.output.push_str(&value);
        self.output.push(quote);
    }

    /// Rewrites one text node or attribute value.
    fn rewrite_segment(&mut self, text: &str) -> String {
        let mut output = String::with_capacity(text.len());
        let mut cursor = 0;
        for expression in EXPRESSION.find_iter(text) {
            self.rewrite_literal(&text[cursor..expression.start()], &mut output);

            let inner = &expression.as_str()[2..expression.len() - 2];
            output.push_str("{{");
            output.push_str(&rewrite_expression(inner, self.runtime, self.dictionary));
            output.push_str("}}");
            cursor = expression.end();
        }
        self.rewrite_literal(&text[cursor..], &mut output);
        output
    }

    fn rewrite_literal(&mut self, literal: &str, output: &mut String) {
        let mut cursor = 0;
        for segment in natural_segments(literal) {
            debug!(text = segment.text, "wrapping template text");
            output.push_str(&literal[cursor..segment.range.start]);
            output.push_str(segment.leading);
            output.push_str(&self.runtime.template_call(segment.text));
            output.push_str(segment.trailing);
            self.dictionary.record(segment.text);
            cursor = segment.range.end;
        }
        output.push_str(&literal[cursor..]);
    }
}
