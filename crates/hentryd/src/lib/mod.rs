//! Canonical post model for IndieWeb pages.
//!
//! Posts arrive as micropub drafts, as microformats2 trees parsed from
//! published HTML, or as previously serialized records; all of them become an
//! [`Entry`]. [`Page::rep_card`] picks the [`Card`] that represents a page's
//! author.

use once_cell::sync::Lazy;
use reqwest::Client;
use url::Url;

pub mod card;
pub mod classify;
pub mod content;
pub mod entry;
pub mod handler;
pub mod mf2;
pub mod micropub;
pub mod page;
pub mod parser;
pub mod repcard;
pub mod store;
pub mod util;

pub use card::Card;
pub use entry::{Entry, EntryError, EntrySource, RichText};
pub use micropub::MicropubDraft;
pub use page::Page;
pub use repcard::{rep_card, urls_equal};

const USER_AGENT: &str = concat!("hentryd/", env!("CARGO_PKG_VERSION"));
pub static HTTP_CLIENT: Lazy<Client> =
    Lazy::new(|| Client::builder().user_agent(USER_AGENT).build().unwrap());

/// Host and path of a URL, for log fields.
pub fn url_host_and_path(url: &Url) -> (String, String) {
    (
        url.host_str().unwrap_or_default().to_owned(),
        url.path().to_owned(),
    )
}
