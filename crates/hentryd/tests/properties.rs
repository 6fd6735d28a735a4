use libhentry::{
    Entry, EntryError, MicropubDraft,
    mf2::{Item, PropertyValue},
};
use proptest::{collection::vec, option, prelude::*};
use proptest_derive::Arbitrary;

#[derive(Debug, Clone, Arbitrary)]
struct DraftFields {
    #[proptest(strategy = "option::of(\"[a-zA-Z ]{1,16}\")")]
    name: Option<String>,
    content: Option<String>,
    #[proptest(strategy = "option::of(Just(\"2015-06-01T10:00:00Z\".to_owned()))")]
    published: Option<String>,
}

impl DraftFields {
    fn into_draft(self, url: Option<String>) -> MicropubDraft {
        MicropubDraft {
            h: "entry".to_owned(),
            url,
            published: self.published,
            content: self.content,
            name: self.name,
        }
    }
}

fn url() -> impl Strategy<Value = String> {
    "[a-z]{1,8}(/[a-z0-9]{1,6})?".prop_map(|s| format!("https://{s}"))
}

fn reference() -> impl Strategy<Value = PropertyValue> {
    prop_oneof![
        url().prop_map(PropertyValue::Text),
        (url(), "[a-z ]{0,12}").prop_map(|(u, n)| {
            PropertyValue::Item(Item::new("h-cite").with("url", u).with("name", n))
        }),
        "[a-z ]{1,12}".prop_map(|n| PropertyValue::Item(Item::new("h-cite").with("name", n))),
    ]
}

fn entry_leaf() -> impl Strategy<Value = Item> {
    (
        option::of("[a-zA-Z ]{0,16}"),
        option::of("[a-zA-Z ]{0,32}"),
        vec(url(), 0..2),
        vec(reference(), 0..3),
        vec(reference(), 0..3),
        vec(reference(), 0..3),
        option::of("[A-Z][a-z]{0,8}"),
    )
        .prop_map(|(name, content, photos, replies, reposts, likes, author)| {
            let mut item = Item::new("h-entry");
            if let Some(name) = name {
                item.push("name", name.into());
            }
            if let Some(content) = content {
                item.push(
                    "content",
                    PropertyValue::Embedded {
                        html: format!("<p>{content}</p>"),
                        value: content,
                    },
                );
            }
            if let Some(author) = author {
                item.push("author", Item::new("h-card").with("name", author).into());
            }
            for photo in photos {
                item.push("photo", photo.into());
            }
            for r in replies {
                item.push("in-reply-to", r);
            }
            for r in reposts {
                item.push("repost-of", r);
            }
            for r in likes {
                item.push("like-of", r);
            }
            item
        })
}

fn entry_tree() -> impl Strategy<Value = Item> {
    entry_leaf().prop_recursive(3, 24, 3, |inner| {
        (entry_leaf(), vec(inner.clone(), 0..3), vec(inner, 0..2)).prop_map(
            |(mut item, children, comments)| {
                item.children = children;
                for comment in comments {
                    item.push("comment", comment.into());
                }
                item
            },
        )
    })
}

fn reference_url(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Item(item) => item.first_text("url").unwrap_or_default(),
        other => other.as_text().unwrap_or_default().to_owned(),
    }
}

proptest! {
    #[test]
    fn draft_with_url_keeps_it(fields in any::<DraftFields>(), permalink in url()) {
        let entry = Entry::from_draft(&fields.into_draft(Some(permalink.clone()))).unwrap();
        prop_assert_eq!(entry.url(), Some(permalink.as_str()));
        prop_assert!(entry.published().is_some());
        prop_assert!(entry.name().is_some());
    }

    #[test]
    fn draft_without_url_fails(fields in any::<DraftFields>()) {
        let result = Entry::from_draft(&fields.into_draft(None));
        prop_assert!(matches!(result, Err(EntryError::MissingUrl)));
    }

    #[test]
    fn references_concatenate_in_order(item in entry_tree()) {
        let entry = Entry::from_tree(&item);
        let expected: Vec<String> = ["in-reply-to", "repost-of", "like-of"]
            .iter()
            .flat_map(|name| item.property(name).iter().map(reference_url))
            .collect();

        let references = entry.references();
        prop_assert_eq!(
            references.len(),
            entry.reply_to().len() + entry.repost_of().len() + entry.like_of().len()
        );
        prop_assert_eq!(references, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn article_excludes_other_kinds(item in entry_tree()) {
        let entry = Entry::from_tree(&item);
        if entry.is_reply() || entry.is_repost() || entry.is_like() || entry.is_photo() {
            prop_assert!(!entry.is_article());
        }
    }

    #[test]
    fn record_round_trip(item in entry_tree()) {
        let entry = Entry::from_tree(&item);
        let rebuilt = Entry::from_record(entry.to_record().unwrap()).unwrap();
        prop_assert_eq!(rebuilt, entry);
    }

    #[test]
    fn children_include_comments(item in entry_tree()) {
        let entry = Entry::from_tree(&item);
        prop_assert_eq!(
            entry.children().len(),
            item.children.len() + item.property("comment").len()
        );
    }
}
