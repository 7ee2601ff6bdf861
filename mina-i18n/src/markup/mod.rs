//! WXML document model and parser.

pub mod ast;
pub mod parser;

pub use ast::{Attribute, Document, Element, MarkupNode};
pub use parser::{Parser, is_raw_text_element, is_void_element, parse_markup};
