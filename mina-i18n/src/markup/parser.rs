use tracing::debug;

use super::ast::{Attribute, Document, Element, MarkupNode};
use crate::error::{ParseError, ParseResult};

/// Elements that never have content. A start tag closes them immediately and
/// a matching end tag is ignored.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "br", "col", "command", "embed", "frame", "hr", "image", "img",
    "input", "isindex", "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Elements whose content is kept as a single verbatim text node.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "wxs"];

pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

pub fn is_raw_text_element(name: &str) -> bool {
    RAW_TEXT_ELEMENTS.iter().any(|r| r.eq_ignore_ascii_case(name))
}

/// Parses a WXML document.
///
/// # Example
///
/// ```
/// use mina_i18n::markup::{MarkupNode, parse_markup};
///
/// let document = parse_markup("<view class=\"a\">你好</view>").unwrap();
/// let view = document.children[0].as_element().unwrap();
/// assert_eq!(view.name, "view");
/// assert_eq!(view.attribute("class"), Some("a"));
/// assert_eq!(view.children, vec![MarkupNode::text("你好")]);
/// ```
pub fn parse_markup(input: &str) -> ParseResult<Document> {
    Parser::new(input).parse()
}

/// A forgiving tag-soup parser for WXML.
///
/// Like browsers, it tolerates stray `<`, unmatched end tags and elements
/// left open at the end of input. Only constructs whose end cannot be found
/// at all (comments, tags, quoted attribute values and raw-text elements)
/// are errors.
pub struct Parser<'a> {
    input: &'a str,
    position: usize,
    /// Elements opened but not yet closed, innermost last
    open: Vec<Element>,
    roots: Vec<MarkupNode>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser {
            input,
            position: 0,
            open: Vec::new(),
            roots: Vec::new(),
        }
    }

    pub fn parse(mut self) -> ParseResult<Document> {
        while self.peek().is_some() {
            if self.starts_with("<!--") {
                self.parse_comment()?;
            } else if self.at_end_tag() {
                self.parse_end_tag()?;
            } else if self.at_start_tag() {
                self.parse_element()?;
            } else {
                self.parse_text();
            }
        }

        while let Some(element) = self.open.pop() {
            debug!(element = %element.name, "closing element left open at end of input");
            self.attach(MarkupNode::Element(element));
        }
        Ok(Document {
            children: self.roots,
        })
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consumes the current character and advances the position.
    /// Returns the character that was consumed, or None if at the end of input.
    fn consume(&mut self) -> Option<char> {
        let c = self.peek();
        if let Some(c) = c {
            self.position += c.len_utf8();
        }
        c
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.consume();
        }
    }

    /// Consumes characters while `keep` holds and returns them.
    fn consume_while(&mut self, keep: impl Fn(char) -> bool) -> &'a str {
        let start = self.position;
        while self.peek().is_some_and(&keep) {
            self.consume();
        }
        &self.input[start..self.position]
    }

    fn at_start_tag(&self) -> bool {
        let mut chars = self.rest().chars();
        chars.next() == Some('<') && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
    }

    fn at_end_tag(&self) -> bool {
        let mut chars = self.rest().chars();
        chars.next() == Some('<')
            && chars.next() == Some('/')
            && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
    }

    fn attach(&mut self, node: MarkupNode) {
        match self.open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.roots.push(node),
        }
    }

    fn parse_text(&mut self) {
        let start = self.position;
        // A '<' that does not open anything is plain text
        self.consume();
        while self.peek().is_some()
            && !(self.starts_with("<!--") || self.at_start_tag() || self.at_end_tag())
        {
            self.consume();
        }
        let text = &self.input[start..self.position];
        self.attach(MarkupNode::text(text));
    }

    fn parse_comment(&mut self) -> ParseResult<()> {
        let start = self.position;
        self.position += "<!--".len();
        let Some(end) = self.rest().find("-->") else {
            return Err(ParseError::Unterminated {
                construct: "comment",
                offset: start,
            });
        };
        let data = &self.rest()[..end];
        self.position += end + "-->".len();
        self.attach(MarkupNode::comment(data));
        Ok(())
    }

    fn tag_name(&mut self) -> &'a str {
        self.consume_while(|c| !c.is_whitespace() && c != '/' && c != '>')
    }

    fn parse_end_tag(&mut self) -> ParseResult<()> {
        let start = self.position;
        self.position += "</".len();
        let name = self.tag_name();
        let Some(end) = self.rest().find('>') else {
            return Err(ParseError::Unterminated {
                construct: "end tag",
                offset: start,
            });
        };
        self.position += end + 1;

        if is_void_element(name) {
            return Ok(());
        }
        let Some(index) = self
            .open
            .iter()
            .rposition(|element| element.name.eq_ignore_ascii_case(name))
        else {
            debug!(element = name, "ignoring unmatched end tag");
            return Ok(());
        };

        // Everything opened inside the matched element closes with it
        while self.open.len() > index {
            if let Some(element) = self.open.pop() {
                self.attach(MarkupNode::Element(element));
            }
        }
        Ok(())
    }

    fn parse_element(&mut self) -> ParseResult<()> {
        let start = self.position;
        self.consume(); // Consume '<'
        let mut element = Element::new(self.tag_name());

        let self_closing = loop {
            self.skip_whitespace();
            match self.peek() {
                None => {
                    return Err(ParseError::Unterminated {
                        construct: "start tag",
                        offset: start,
                    });
                }
                Some('>') => {
                    self.consume();
                    break false;
                }
                Some('/') => {
                    self.consume();
                    if self.peek() == Some('>') {
                        self.consume();
                        break true;
                    }
                }
                Some(_) => {
                    if let Some(attribute) = self.parse_attribute()? {
                        element.attributes.push(attribute);
                    }
                }
            }
        };

        if self_closing || is_void_element(&element.name) {
            self.attach(MarkupNode::Element(element));
        } else if is_raw_text_element(&element.name) {
            self.parse_raw_text(&mut element, start)?;
            self.attach(MarkupNode::Element(element));
        } else {
            self.open.push(element);
        }
        Ok(())
    }

    fn parse_attribute(&mut self) -> ParseResult<Option<Attribute>> {
        let name = self.consume_while(|c| !c.is_whitespace() && !matches!(c, '=' | '>' | '/'));
        if name.is_empty() {
            // A stray '=' with no name in front of it
            self.consume();
            return Ok(None);
        }

        self.skip_whitespace();
        if self.peek() != Some('=') {
            return Ok(Some(Attribute::new(name, None)));
        }
        self.consume(); // Consume '='
        self.skip_whitespace();

        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                let start = self.position;
                self.consume();
                let Some(end) = self.rest().find(quote) else {
                    return Err(ParseError::Unterminated {
                        construct: "attribute value",
                        offset: start,
                    });
                };
                let value = &self.rest()[..end];
                self.position += end + 1;
                value
            }
            _ => self.consume_while(|c| !c.is_whitespace() && c != '>'),
        };
        Ok(Some(Attribute::new(name, Some(value))))
    }

    fn parse_raw_text(&mut self, element: &mut Element, start: usize) -> ParseResult<()> {
        let closing = format!("</{}", element.name.to_ascii_lowercase());
        let Some(end) = self.rest().to_ascii_lowercase().find(&closing) else {
            return Err(ParseError::Unterminated {
                construct: "raw text element",
                offset: start,
            });
        };
        let content = &self.rest()[..end];
        if !content.is_empty() {
            element.children.push(MarkupNode::text(content));
        }
        self.position += end;

        let Some(close) = self.rest().find('>') else {
            return Err(ParseError::Unterminated {
                construct: "end tag",
                offset: self.position,
            });
        };
        self.position += close + 1;
        Ok(())
    }
}
