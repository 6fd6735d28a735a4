use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    card::Card,
    micropub::MicropubDraft,
    mf2::{Item, PropertyValue},
    util::{auto_link, escape_html},
};

#[derive(Debug, Error)]
pub enum EntryError {
    #[error("url is required")]
    MissingUrl,
    #[error("malformed record: {0}")]
    Record(#[from] serde_json::Error),
}

/// Content of a post. `html` is never taken from author-supplied plain text
/// without escaping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichText {
    pub value: String,
    pub html: String,
}

impl RichText {
    pub fn from_plain(value: impl Into<String>) -> Self {
        let value = value.into();
        let html = auto_link(&escape_html(&value));
        Self { value, html }
    }

    fn from_property(value: &PropertyValue) -> Self {
        match value {
            PropertyValue::Embedded { html, value } => Self {
                value: value.clone(),
                html: html.clone(),
            },
            PropertyValue::Value { value, .. } | PropertyValue::Text(value) => {
                Self::from_plain(value.as_str())
            }
            PropertyValue::Item(_) => Self::from_plain(value.as_text().unwrap_or_default()),
        }
    }
}

/// A published or draft post.
///
/// `reply_to`, `like_of` and `repost_of` stay list-valued: mf2 allows several
/// values even though a post normally references one target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    published: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<RichText>,
    #[serde(default)]
    photo: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    author: Option<Card>,
    #[serde(default)]
    syndication: Vec<String>,
    #[serde(default)]
    reply_to: Vec<Entry>,
    #[serde(default)]
    like_of: Vec<Entry>,
    #[serde(default)]
    repost_of: Vec<Entry>,
    #[serde(default)]
    children: Vec<Entry>,
}

/// The shapes an [`Entry`] can be built from.
#[derive(Debug)]
pub enum EntrySource<'a> {
    /// Only the target URL is known, e.g. a bare `u-in-reply-to` link.
    Stub(&'a str),
    Draft(&'a MicropubDraft),
    Tree(&'a Item),
    /// A previously serialized entry.
    Record(serde_json::Value),
}

impl Entry {
    pub fn build(source: EntrySource<'_>) -> Result<Self, EntryError> {
        match source {
            EntrySource::Stub(url) => Ok(Self::from_stub(url)),
            EntrySource::Draft(draft) => Self::from_draft(draft),
            EntrySource::Tree(item) => Ok(Self::from_tree(item)),
            EntrySource::Record(record) => Self::from_record(record),
        }
    }

    pub fn from_stub(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn from_draft(draft: &MicropubDraft) -> Result<Self, EntryError> {
        let url = draft.url.clone().ok_or(EntryError::MissingUrl)?;
        let published = draft.published.clone().unwrap_or_else(now);
        let content = RichText::from_plain(draft.content.clone().unwrap_or_default());
        // Drafts need a title before they are persisted.
        let name = draft
            .name
            .clone()
            .unwrap_or_else(|| content.value.clone());

        Ok(Self {
            name: Some(name),
            published: Some(published),
            content: Some(content),
            url: Some(url),
            ..Default::default()
        })
    }

    pub fn from_tree(item: &Item) -> Self {
        let references = |name: &str| -> Vec<Entry> {
            item.property(name)
                .iter()
                .map(Self::from_property)
                .collect()
        };

        let children = item
            .children
            .iter()
            .map(Self::from_tree)
            .chain(item.property("comment").iter().map(Self::from_property))
            .collect();

        Self {
            name: item.first_text("name"),
            published: item.first_text("published"),
            content: item.property("content").first().map(RichText::from_property),
            photo: item.texts("photo"),
            url: item.first_text("url"),
            author: item.property("author").first().map(Card::from_property),
            syndication: item.texts("syndication"),
            reply_to: references("in-reply-to"),
            like_of: references("like-of"),
            repost_of: references("repost-of"),
            children,
        }
    }

    /// A reference value is either a nested item or a bare URL.
    pub fn from_property(value: &PropertyValue) -> Self {
        match value {
            PropertyValue::Item(item) => Self::from_tree(item),
            PropertyValue::Embedded { value, .. }
            | PropertyValue::Value { value, .. }
            | PropertyValue::Text(value) => Self::from_stub(value.as_str()),
        }
    }

    pub fn from_record(record: serde_json::Value) -> Result<Self, EntryError> {
        Ok(serde_json::from_value(record)?)
    }

    pub fn from_json(json: &str) -> Result<Self, EntryError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_record(&self) -> Result<serde_json::Value, EntryError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json(&self) -> Result<String, EntryError> {
        Ok(serde_json::to_string(self)?)
    }

    /// The same entry attributed to another author.
    pub fn with_author(self, author: Card) -> Self {
        Self {
            author: Some(author),
            ..self
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn published(&self) -> Option<&str> {
        self.published.as_deref()
    }

    pub fn content(&self) -> Option<&RichText> {
        self.content.as_ref()
    }

    pub fn photo(&self) -> &[String] {
        &self.photo
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn author(&self) -> Option<&Card> {
        self.author.as_ref()
    }

    pub fn syndication(&self) -> &[String] {
        &self.syndication
    }

    pub fn reply_to(&self) -> &[Entry] {
        &self.reply_to
    }

    pub fn like_of(&self) -> &[Entry] {
        &self.like_of
    }

    pub fn repost_of(&self) -> &[Entry] {
        &self.repost_of
    }

    pub fn children(&self) -> &[Entry] {
        &self.children
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
