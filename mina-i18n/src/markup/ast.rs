use serde::Serialize;

/// A parsed WXML document: the top-level nodes in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pub children: Vec<MarkupNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MarkupNode {
    Element(Element),
    Text { data: String },
    Comment { data: String },
}

impl MarkupNode {
    pub fn text(data: &str) -> Self {
        MarkupNode::Text {
            data: data.to_string(),
        }
    }

    pub fn comment(data: &str) -> Self {
        MarkupNode::Comment {
            data: data.to_string(),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            MarkupNode::Element(element) => Some(element),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<MarkupNode>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Element {
            name: name.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Value of the first attribute called `name`. Valueless attributes
    /// yield `None` just like missing ones.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .and_then(|attr| attr.value.as_deref())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|attr| attr.name == name)
    }
}

/// An attribute as written. `value` is `None` for a bare `<input disabled>`
/// and `Some("")` for `disabled=""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub value: Option<String>,
}

impl Attribute {
    pub fn new(name: &str, value: Option<&str>) -> Self {
        Attribute {
            name: name.to_string(),
            value: value.map(str::to_string),
        }
    }
}
