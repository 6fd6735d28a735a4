//! Post-kind predicates derived from an [`Entry`]. Nothing here is cached; every
//! call reads the entry as built.

use crate::{entry::Entry, util::extract_links};

impl Entry {
    /// URLs of every referenced post: replies, then reposts, then likes. A
    /// reference without a URL contributes an empty string so the result stays
    /// aligned with the reference lists.
    pub fn references(&self) -> Vec<&str> {
        self.reply_to()
            .iter()
            .chain(self.repost_of())
            .chain(self.like_of())
            .map(|r| r.url().unwrap_or_default())
            .collect()
    }

    /// [`Entry::references`] followed by every link in the content html.
    pub fn all_links(&self) -> Vec<String> {
        let mut links: Vec<String> = self.references().into_iter().map(str::to_owned).collect();
        if let Some(content) = self.content() {
            links.extend(extract_links(&content.html));
        }
        links
    }

    pub fn is_reply(&self) -> bool {
        !self.reply_to().is_empty()
    }

    pub fn is_repost(&self) -> bool {
        !self.repost_of().is_empty()
    }

    pub fn is_like(&self) -> bool {
        !self.like_of().is_empty()
    }

    pub fn is_photo(&self) -> bool {
        !self.photo().is_empty()
    }

    pub fn is_reply_to(&self, url: &str) -> bool {
        self.references().contains(&url)
    }

    /// A titled long-form post. A note whose name is just its body is not an
    /// article.
    pub fn is_article(&self) -> bool {
        if self.is_reply() || self.is_repost() || self.is_like() || self.is_photo() {
            return false;
        }
        match (self.name(), self.content()) {
            (Some(name), Some(content)) => name != content.value,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        micropub::MicropubDraft,
        mf2::{Item, PropertyValue},
    };

    use super::*;

    fn embedded(html: &str, value: &str) -> PropertyValue {
        PropertyValue::Embedded {
            html: html.into(),
            value: value.into(),
        }
    }

    #[test]
    fn references_keep_reply_repost_like_order() {
        let item = Item::new("h-entry")
            .with("like-of", "https://c.example/")
            .with("repost-of", "https://b.example/")
            .with("in-reply-to", "https://a.example/")
            .with("in-reply-to", Item::new("h-cite").with("name", "no url"));
        let entry = Entry::from_tree(&item);

        assert_eq!(
            entry.references(),
            ["https://a.example/", "", "https://b.example/", "https://c.example/"]
        );
        assert!(entry.is_reply_to("https://b.example/"));
        assert!(!entry.is_reply_to("https://d.example/"));
    }

    #[test]
    fn all_links_appends_content_links() {
        let item = Item::new("h-entry")
            .with("in-reply-to", "https://a.example/")
            .with("content", embedded(r#"<a href="https://x.example/">x</a>"#, "x"));
        let entry = Entry::from_tree(&item);
        assert_eq!(entry.all_links(), ["https://a.example/", "https://x.example/"]);

        let bare = Entry::from_stub("https://s.example/");
        assert!(bare.all_links().is_empty());
    }

    #[test]
    fn kinds() {
        let reply = Entry::from_tree(&Item::new("h-entry").with("in-reply-to", "https://a.example/"));
        assert!(reply.is_reply() && !reply.is_like() && !reply.is_repost());

        let like = Entry::from_tree(&Item::new("h-entry").with("like-of", "https://a.example/"));
        assert!(like.is_like());

        let repost = Entry::from_tree(&Item::new("h-entry").with("repost-of", "https://a.example/"));
        assert!(repost.is_repost());

        let photo = Entry::from_tree(&Item::new("h-entry").with("photo", "https://a.example/p.jpg"));
        assert!(photo.is_photo());
    }

    #[test]
    fn article_needs_distinct_title() {
        let article = Entry::from_tree(
            &Item::new("h-entry")
                .with("name", "On Rust")
                .with("content", embedded("<p>Long text</p>", "Long text")),
        );
        assert!(article.is_article());

        let note = Entry::from_draft(&MicropubDraft::new("https://example.com/n").with_content("short"))
            .unwrap();
        assert!(!note.is_article());

        let untitled = Entry::from_tree(&Item::new("h-entry").with("content", "Long text"));
        assert!(!untitled.is_article());
    }

    #[test]
    fn titled_reply_is_not_article() {
        let reply = Entry::from_tree(
            &Item::new("h-entry")
                .with("name", "Re: something")
                .with("content", embedded("<p>text</p>", "text"))
                .with("in-reply-to", "https://a.example/"),
        );
        assert!(reply.is_reply());
        assert!(!reply.is_article());
    }
}
