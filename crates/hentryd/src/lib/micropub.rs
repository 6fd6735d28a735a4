use serde::{Deserialize, Serialize};

/// A post as submitted through micropub (`h=entry`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MicropubDraft {
    #[serde(default = "default_kind")]
    pub h: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

fn default_kind() -> String {
    "entry".to_owned()
}

impl MicropubDraft {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            h: default_kind(),
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn is_entry(&self) -> bool {
        self.h == "entry"
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_published(mut self, published: impl Into<String>) -> Self {
        self.published = Some(published.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_defaults_to_entry() {
        let draft: MicropubDraft =
            serde_json::from_str(r#"{"url": "https://example.com/1", "content": "hi"}"#).unwrap();
        assert!(draft.is_entry());
        assert_eq!(draft.content.as_deref(), Some("hi"));

        let event: MicropubDraft = serde_json::from_str(r#"{"h": "event"}"#).unwrap();
        assert!(!event.is_entry());
        assert_eq!(event.url, None);
    }
}
