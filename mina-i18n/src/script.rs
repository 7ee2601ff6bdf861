//! Script rewriting on top of tree-sitter-javascript.
//!
//! The rewriter walks the syntax tree once and records byte-range edits:
//!
//! - string literals carrying CJK text become `i18n.t(<literal>)`
//! - `Page(...)` becomes `I18nPage(...)`
//! - optionally, `data` of a page gets the current locale merged in
//!
//! Edits are applied to the original text after traversal, so everything the
//! rewriter does not touch keeps its formatting byte for byte. Every rule
//! checks the shape of its surroundings before firing, which makes a second
//! run over rewritten output a no-op.

use std::ops::Range;

use tree_sitter::{Node, Parser, Tree};
use tracing::{debug, warn};

use crate::dictionary::Dictionary;
use crate::error::{ParseError, ParseResult};
use crate::escape::normalize;
use crate::runtime::Runtime;
use crate::text::is_natural_text;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptOptions {
    /// Merge the current locale into the `data` object of page registrations
    pub inject_locale_data: bool,
}

/// Rewrites a whole script file.
///
/// # Errors
///
/// Returns [`ParseError`] when the grammar cannot be loaded or the source
/// contains a syntax error. Nothing is rewritten in that case.
///
/// # Example
///
/// ```
/// use mina_i18n::{Dictionary, Runtime, ScriptOptions, rewrite_script};
///
/// let mut dictionary = Dictionary::new("zh-CN", vec![]);
/// let output = rewrite_script(
///     "var a = \"你好\"",
///     &Runtime::default(),
///     &ScriptOptions::default(),
///     &mut dictionary,
/// )
/// .unwrap();
/// assert!(output.ends_with("var a = i18n.t(\"你好\")"));
/// assert_eq!(dictionary.get("zh-CN", "你好"), Some("你好"));
/// ```
pub fn rewrite_script(
    source: &str,
    runtime: &Runtime,
    options: &ScriptOptions,
    dictionary: &mut Dictionary,
) -> ParseResult<String> {
    let tree = parse(source)?;
    let root = tree.root_node();
    if root.has_error() {
        return Err(first_syntax_error(root));
    }

    let mut rewriter = ScriptRewriter {
        source,
        runtime,
        options: *options,
        mode: Mode::Script,
        dictionary,
        edits: Vec::new(),
    };
    rewriter.visit(root);
    let code = apply_edits(source, rewriter.edits);

    Ok(normalize(&runtime.with_script_prelude(&code)))
}

/// Wraps CJK string literals inside a template mini-expression.
///
/// Mini-expressions are not guaranteed to be standalone JavaScript (object
/// spreads, template data shorthands), so anything that does not parse
/// cleanly is returned unchanged.
pub fn rewrite_expression(source: &str, runtime: &Runtime, dictionary: &mut Dictionary) -> String {
    let tree = match parse(source) {
        Ok(tree) => tree,
        Err(e) => {
            warn!(expression = source, error = %e, "could not parse expression");
            return source.to_string();
        }
    };
    let root = tree.root_node();
    if root.has_error() {
        debug!(expression = source, "expression is not plain JavaScript, keeping it");
        return source.to_string();
    }

    let mut rewriter = ScriptRewriter {
        source,
        runtime,
        options: ScriptOptions::default(),
        mode: Mode::Expression,
        dictionary,
        edits: Vec::new(),
    };
    rewriter.visit(root);
    normalize(&apply_edits(source, rewriter.edits))
}

fn parse(source: &str) -> ParseResult<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_javascript::LANGUAGE.into())
        .map_err(|e| ParseError::Grammar {
            grammar: "javascript",
            message: e.to_string(),
        })?;
    parser.parse(source, None).ok_or(ParseError::NoTree)
}

/// Locates the first ERROR or MISSING node, depth first.
fn first_syntax_error(root: Node<'_>) -> ParseError {
    fn find(node: Node<'_>) -> Option<Node<'_>> {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if !node.has_error() {
            return None;
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
        children.into_iter().find_map(find)
    }

    let position = find(root).unwrap_or(root).start_position();
    ParseError::Syntax {
        line: position.row + 1,
        column: position.column + 1,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Literal wrapping plus page registration rewrites
    Script,
    /// Literal wrapping only
    Expression,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Edit {
    range: Range<usize>,
    replacement: String,
}

impl Edit {
    fn insert(at: usize, text: String) -> Self {
        Edit {
            range: at..at,
            replacement: text,
        }
    }
}

/// Applies non-overlapping edits to `source`. An edit overlapping one that
/// starts earlier is dropped.
fn apply_edits(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|edit| (edit.range.start, edit.range.end));

    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in edits {
        if edit.range.start < cursor {
            warn!(range = ?edit.range, "dropping overlapping edit");
            continue;
        }
        output.push_str(&source[cursor..edit.range.start]);
        output.push_str(&edit.replacement);
        cursor = edit.range.end;
    }
    output.push_str(&source[cursor..]);
    output
}

struct ScriptRewriter<'s, 'd> {
    source: &'s str,
    runtime: &'s Runtime,
    options: ScriptOptions,
    mode: Mode,
    dictionary: &'d mut Dictionary,
    edits: Vec<Edit>,
}

impl ScriptRewriter<'_, '_> {
    fn text(&self, node: Node<'_>) -> &str {
        &self.source[node.byte_range()]
    }

    fn visit(&mut self, node: Node<'_>) {
        match node.kind() {
            // Strings never contain other strings
            "string" => return self.visit_string(node),
            "call_expression" if self.mode == Mode::Script => self.visit_call(node),
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit(child);
        }
    }

    fn visit_string(&mut self, node: Node<'_>) {
        if self.is_wrapped(node) || is_outside_expression(node) || self.is_require_path(node) {
            return;
        }

        let value = string_value(node, self.source);
        if !is_natural_text(&value) {
            return;
        }

        debug!(text = %value, line = node.start_position().row + 1, "wrapping literal");
        let replacement = self.runtime.call(self.text(node));
        self.edits.push(Edit {
            range: node.byte_range(),
            replacement,
        });
        self.dictionary.record(&value);
    }

    /// True when the literal is already an argument of `i18n.t(...)`.
    fn is_wrapped(&self, node: Node<'_>) -> bool {
        let Some(callee) = enclosing_callee(node) else {
            return false;
        };
        if callee.kind() != "member_expression" {
            return false;
        }
        let object = callee.child_by_field_name("object");
        let property = callee.child_by_field_name("property");
        matches!(
            (object, property),
            (Some(object), Some(property))
                if object.kind() == "identifier"
                    && self.text(object) == self.runtime.alias
                    && self.text(property) == self.runtime.translate_fn
        )
    }

    fn is_require_path(&self, node: Node<'_>) -> bool {
        enclosing_callee(node)
            .is_some_and(|callee| callee.kind() == "identifier" && self.text(callee) == "require")
    }

    fn visit_call(&mut self, node: Node<'_>) {
        let Some(callee) = node.child_by_field_name("function") else {
            return;
        };
        if callee.kind() != "identifier" {
            return;
        }

        let name = self.text(callee);
        let is_page = name == self.runtime.page_fn;
        let is_localized_page = name == self.runtime.localized_page_fn;

        if is_page {
            debug!(line = callee.start_position().row + 1, "localizing page registration");
            self.edits.push(Edit {
                range: callee.byte_range(),
                replacement: self.runtime.localized_page_fn.clone(),
            });
        }
        if self.options.inject_locale_data && (is_page || is_localized_page) {
            self.inject_locale_data(node);
        }
    }

    /// Wraps the value of `data` in `Page({ data: ... })` so the current
    /// locale is merged into the page's initial data.
    fn inject_locale_data(&mut self, call: Node<'_>) {
        let Some(options) = call
            .child_by_field_name("arguments")
            .and_then(first_named)
            .filter(|arg| arg.kind() == "object")
        else {
            return;
        };

        let mut cursor = options.walk();
        let data = options
            .named_children(&mut cursor)
            .filter(|child| child.kind() == "pair")
            .find(|pair| {
                pair.child_by_field_name("key")
                    .is_some_and(|key| property_key(key, self.source) == "data")
            })
            .and_then(|pair| pair.child_by_field_name("value"));

        let Some(value) = data else {
            return;
        };
        if self.is_locale_merge(value) {
            return;
        }

        let prefix = format!(
            "Object.assign({{ {}: {} }}, ",
            self.runtime.locale_key,
            self.runtime.locale_call()
        );
        self.edits.push(Edit::insert(value.start_byte(), prefix));
        self.edits.push(Edit::insert(value.end_byte(), ")".to_string()));
    }

    /// True when `value` is a call whose first argument is an object literal
    /// that starts with the injected locale key.
    fn is_locale_merge(&self, value: Node<'_>) -> bool {
        if value.kind() != "call_expression" {
            return false;
        }
        value
            .child_by_field_name("arguments")
            .and_then(first_named)
            .filter(|arg| arg.kind() == "object")
            .and_then(first_named)
            .filter(|property| property.kind() == "pair")
            .and_then(|pair| pair.child_by_field_name("key"))
            .is_some_and(|key| property_key(key, self.source) == self.runtime.locale_key)
    }
}

/// The callee of the call whose argument list directly contains `node`.
fn enclosing_callee(node: Node<'_>) -> Option<Node<'_>> {
    let arguments = node.parent().filter(|parent| parent.kind() == "arguments")?;
    let call = arguments
        .parent()
        .filter(|parent| parent.kind() == "call_expression")?;
    call.child_by_field_name("function")
}

/// True for literals in positions where a call expression is not allowed:
/// property keys, method names and module specifiers.
fn is_outside_expression(node: Node<'_>) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    let field = match parent.kind() {
        "pair" | "pair_pattern" => "key",
        "method_definition" => "name",
        "field_definition" => "property",
        // `export default '...'` is an expression, only the module path is not
        "export_statement" => "source",
        "import_statement" | "import_specifier" | "export_specifier" | "namespace_export" => {
            return true;
        }
        _ => return false,
    };
    parent.child_by_field_name(field) == Some(node)
}

fn first_named(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .find(|child| child.kind() != "comment")
}

/// The name of an object key, whether written as an identifier or a string.
fn property_key(key: Node<'_>, source: &str) -> String {
    match key.kind() {
        "string" => string_value(key, source),
        _ => source[key.byte_range()].to_string(),
    }
}

/// The runtime value of a string literal, with escape sequences decoded.
fn string_value(node: Node<'_>, source: &str) -> String {
    let mut units: Vec<u16> = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        let text = &source[child.byte_range()];
        match child.kind() {
            "string_fragment" => units.extend(text.encode_utf16()),
            "escape_sequence" => push_escape_sequence(text, &mut units),
            _ => {}
        }
    }
    String::from_utf16_lossy(&units)
}

fn push_escape_sequence(sequence: &str, units: &mut Vec<u16>) {
    let body = sequence.strip_prefix('\\').unwrap_or(sequence);
    let mut chars = body.chars();
    let Some(first) = chars.next() else {
        return;
    };
    let rest = chars.as_str();

    let braced = first == 'u' && rest.starts_with('{');
    let decoded: Option<u32> = match first {
        'u' if braced => {
            let hex = rest.trim_start_matches('{').trim_end_matches('}');
            u32::from_str_radix(hex, 16).ok()
        }
        'u' | 'x' => u32::from_str_radix(rest, 16).ok(),
        '0'..='7' => u32::from_str_radix(body, 8).ok(),
        'n' => Some(0x0A),
        't' => Some(0x09),
        'r' => Some(0x0D),
        'b' => Some(0x08),
        'f' => Some(0x0C),
        'v' => Some(0x0B),
        // Line continuations contribute nothing to the value
        '\r' | '\n' | '\u{2028}' | '\u{2029}' => None,
        other => Some(other as u32),
    };

    let Some(code) = decoded else {
        return;
    };
    if (first == 'u' && !braced) || first == 'x' || first.is_ascii_digit() {
        // Code units, possibly half of a surrogate pair
        units.push(code as u16);
    } else if let Some(ch) = char::from_u32(code) {
        let mut buf = [0u16; 2];
        units.extend_from_slice(ch.encode_utf16(&mut buf));
    }
}
