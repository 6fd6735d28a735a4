//! Representative h-card discovery: which h-card on a page stands for the
//! page's own author.
//!
//! Rules are tried in order and the first card matching a rule wins:
//!
//! 1. a card whose `url` and `uid` both equal the page URL;
//! 2. a card whose `url` is one of the page's `rel=me` links;
//! 3. the page's only card, if its `url` equals the page URL.

use tracing::debug;
use url::Url;

use crate::{card::Card, mf2::Document};

pub fn rep_card(document: &Document, page_url: &str) -> Option<Card> {
    let cards: Vec<Card> = document
        .find_all("h-card")
        .into_iter()
        .map(Card::from_tree)
        .collect();
    debug!(cards = cards.len(), page_url, "resolving representative h-card");

    if let Some(card) = cards
        .iter()
        .find(|c| any_equal(c.url(), page_url) && any_equal(c.uid(), page_url))
    {
        debug!(rule = "uid+url", "representative h-card found");
        return Some(card.clone());
    }

    let me = document.rel("me");
    if !me.is_empty()
        && let Some(card) = cards
            .iter()
            .find(|c| me.iter().any(|target| any_equal(c.url(), target)))
    {
        debug!(rule = "rel=me", "representative h-card found");
        return Some(card.clone());
    }

    if let [card] = cards.as_slice()
        && any_equal(card.url(), page_url)
    {
        debug!(rule = "sole card", "representative h-card found");
        return Some(card.clone());
    }

    debug!("no representative h-card");
    None
}

fn any_equal(urls: &[String], target: &str) -> bool {
    urls.iter().any(|u| urls_equal(u, target))
}

/// Equal scheme, host, port and path. Query and fragment are ignored; scheme
/// and host case are normalized by parsing. Unparseable URLs never match.
pub fn urls_equal(a: &str, b: &str) -> bool {
    match (Url::parse(a), Url::parse(b)) {
        (Ok(a), Ok(b)) => {
            a.scheme() == b.scheme()
                && a.host_str() == b.host_str()
                && a.port() == b.port()
                && a.path() == b.path()
        }
        _ => false,
    }
}
