use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    entry::EntryError,
    mf2::{Item, PropertyValue},
};

/// An author identity. Every field is list-valued as in mf2; consumers normally
/// read the first value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    #[serde(default)]
    name: Vec<String>,
    #[serde(default)]
    photo: Vec<String>,
    #[serde(default)]
    url: Vec<String>,
    #[serde(default)]
    uid: Vec<String>,
}

impl Card {
    pub fn from_tree(item: &Item) -> Self {
        Self {
            name: item.texts("name"),
            photo: item.texts("photo"),
            url: item.texts("url"),
            uid: item.texts("uid"),
        }
    }

    /// A card known only by a plain `author` value: an absolute URL becomes the
    /// card's `url`, anything else its `name`.
    pub fn from_text(text: &str) -> Self {
        if Url::parse(text).is_ok() {
            Self {
                url: vec![text.to_owned()],
                ..Default::default()
            }
        } else {
            Self {
                name: vec![text.to_owned()],
                ..Default::default()
            }
        }
    }

    pub fn from_property(value: &PropertyValue) -> Self {
        match value {
            PropertyValue::Item(item) => Self::from_tree(item),
            PropertyValue::Embedded { value, .. }
            | PropertyValue::Value { value, .. }
            | PropertyValue::Text(value) => Self::from_text(value),
        }
    }

    pub fn from_record(record: serde_json::Value) -> Result<Self, EntryError> {
        Ok(serde_json::from_value(record)?)
    }

    pub fn name(&self) -> &[String] {
        &self.name
    }

    pub fn photo(&self) -> &[String] {
        &self.photo
    }

    pub fn url(&self) -> &[String] {
        &self.url
    }

    pub fn uid(&self) -> &[String] {
        &self.uid
    }
}
