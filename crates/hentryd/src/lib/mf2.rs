//! Microformats2 tree as produced by an mf2 parser.
//!
//! The shapes (de)serialize as standard mf2 JSON, so a [`Document`] can come
//! either from [`crate::parser::html::HtmlParser`] or from any external parser
//! that emits `{"items": [...], "rels": {...}}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub rels: BTreeMap<String, Vec<String>>,
}

impl Document {
    /// URLs declared under the given link relation, empty when the page has none.
    pub fn rel(&self, name: &str) -> &[String] {
        self.rels.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every item of the given type, depth-first in document order. Nested
    /// property values are visited before structural children.
    pub fn find_all(&self, kind: &str) -> Vec<&Item> {
        let mut found = Vec::new();
        for item in &self.items {
            collect(item, kind, &mut found);
        }
        found
    }

    pub fn first(&self, kind: &str) -> Option<&Item> {
        self.find_all(kind).into_iter().next()
    }
}

fn collect<'a>(item: &'a Item, kind: &str, found: &mut Vec<&'a Item>) {
    if item.has_type(kind) {
        found.push(item);
    }
    for value in item.properties.values().flatten() {
        if let PropertyValue::Item(nested) = value {
            collect(nested, kind, found);
        }
    }
    for child in &item.children {
        collect(child, kind, found);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "type")]
    pub kind: Vec<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, Vec<PropertyValue>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Item>,
    /// Plain value of an item embedded as a property.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Item {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: vec![kind.to_owned()],
            ..Default::default()
        }
    }

    pub fn has_type(&self, kind: &str) -> bool {
        self.kind.iter().any(|k| k == kind)
    }

    /// Values of a property; absent properties read as the empty slice.
    pub fn property(&self, name: &str) -> &[PropertyValue] {
        self.properties
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Plain text of every value of a property, in source order.
    pub fn texts(&self, name: &str) -> Vec<String> {
        self.property(name)
            .iter()
            .filter_map(PropertyValue::as_text)
            .map(str::to_owned)
            .collect()
    }

    pub fn first_text(&self, name: &str) -> Option<String> {
        self.property(name)
            .iter()
            .find_map(PropertyValue::as_text)
            .map(str::to_owned)
    }

    pub fn push(&mut self, name: &str, value: PropertyValue) {
        self.properties
            .entry(name.to_owned())
            .or_default()
            .push(value);
    }

    /// Chaining form of [`Item::push`].
    pub fn with(mut self, name: &str, value: impl Into<PropertyValue>) -> Self {
        self.push(name, value.into());
        self
    }

    pub fn with_child(mut self, child: Item) -> Self {
        self.children.push(child);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Item(Item),
    Embedded {
        html: String,
        value: String,
    },
    /// A `u-*` value carrying extra attributes, such as an image with `alt`.
    Value {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
    Text(String),
}

impl PropertyValue {
    /// The plain value of any variant. An embedded item falls back to its
    /// first `name`, then its first `url`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Embedded { value, .. } | Self::Value { value, .. } => Some(value),
            Self::Item(item) => item.value.as_deref().or_else(|| {
                item.property("name")
                    .iter()
                    .chain(item.property("url"))
                    .find_map(PropertyValue::as_text)
            }),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Item> for PropertyValue {
    fn from(item: Item) -> Self {
        Self::Item(item)
    }
}
