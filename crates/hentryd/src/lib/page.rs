use tracing::debug;
use url::Url;

use crate::{
    card::Card,
    entry::Entry,
    mf2::Document,
    parser::{ParserError, parse_html},
    repcard::rep_card,
};

/// A parsed page and the URL it was published at.
#[derive(Debug, Clone)]
pub struct Page {
    url: Url,
    document: Document,
}

impl Page {
    pub fn new(url: Url, document: Document) -> Self {
        Self { url, document }
    }

    pub fn parse(html: &str, url: Url) -> Result<Self, ParserError> {
        let document = parse_html(html, &url)?;
        Ok(Self::new(url, document))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The page's first h-entry.
    pub fn entry(&self) -> Result<Entry, ParserError> {
        let item = self
            .document
            .first("h-entry")
            .ok_or_else(|| ParserError::NoEntry {
                url: self.url.to_string(),
            })?;
        Ok(Entry::from_tree(item))
    }

    pub fn rep_card(&self) -> Option<Card> {
        rep_card(&self.document, self.url.as_str())
    }

    /// [`Page::entry`] authored by the page's representative h-card when one
    /// resolves, whether or not the entry named an author itself.
    pub fn entry_with_card(&self) -> Result<Entry, ParserError> {
        let entry = self.entry()?;
        match self.rep_card() {
            Some(card) => {
                debug!(url = %self.url, "author set to representative h-card");
                Ok(entry.with_author(card))
            }
            None => Ok(entry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST: &str = r#"<html><body>
<div class="h-card">
  <a class="u-url u-uid p-name" href="/">Ann Example</a>
  <img class="u-photo" src="/ann.jpg" alt="">
</div>
<article class="h-entry">
  <span class="p-name">Re: Bob</span>
  <a class="p-author" href="/">Ann</a>
  <a class="u-in-reply-to" href="https://bob.example/post">Bob</a>
  <div class="e-content">Agreed</div>
  <a class="u-url" href="/2015/reply">#</a>
</article>
</body></html>"#;

    fn page(html: &str, url: &str) -> Page {
        Page::parse(html, Url::parse(url).unwrap()).unwrap()
    }

    #[test]
    fn entry_is_first_h_entry() {
        let entry = page(POST, "https://ann.example/2015/reply").entry().unwrap();
        assert_eq!(entry.name(), Some("Re: Bob"));
        assert_eq!(entry.url(), Some("https://ann.example/2015/reply"));
        assert!(entry.is_reply_to("https://bob.example/post"));
    }

    #[test]
    fn page_without_entry() {
        let page = page("<p>nothing here</p>", "https://ann.example/");
        assert!(matches!(page.entry(), Err(ParserError::NoEntry { .. })));
    }

    #[test]
    fn author_replaced_by_rep_card() {
        let home = page(POST, "https://ann.example/");
        let entry = home.entry_with_card().unwrap();
        let author = entry.author().unwrap();

        assert_eq!(author.name(), ["Ann Example"]);
        assert_eq!(author.photo(), ["https://ann.example/ann.jpg"]);
    }

    #[test]
    fn author_kept_without_rep_card() {
        // The card's url/uid point at the home page, not at the permalink.
        let permalink = page(POST, "https://ann.example/2015/reply");
        assert!(permalink.rep_card().is_none());

        let entry = permalink.entry_with_card().unwrap();
        assert_eq!(entry.author(), Some(&Card::from_text("Ann")));
    }

    #[test]
    fn entry_without_author_gets_rep_card() {
        let html = r#"<div class="h-card"><a class="u-url u-uid p-name" href="/">Ann</a></div>
<div class="h-entry"><p class="p-name">note</p></div>"#;
        let home = page(html, "https://ann.example/");
        assert!(home.entry().unwrap().author().is_none());

        let entry = home.entry_with_card().unwrap();
        assert_eq!(entry.author().unwrap().name(), ["Ann"]);
        assert_eq!(entry.author().unwrap().url(), ["https://ann.example/"]);
    }

    #[test]
    fn entry_without_author_and_no_rep_card() {
        let html = r#"<div class="h-entry"><p class="p-name">note</p></div>"#;
        let entry = page(html, "https://ann.example/").entry_with_card().unwrap();
        assert!(entry.author().is_none());
    }
}
