use std::collections::BTreeMap;

use bytes::Bytes;
use mime::Mime;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::{
    mf2::{Document, Item, PropertyValue},
    parser::{Parser, ParserError},
};

/// Microformats2 parser over a `scraper` DOM.
///
/// Text values are the element's full text, `<script>` and `<style>` contents
/// included. The value-class pattern is not supported for `p-*` or `dt-*`.
pub struct HtmlParser {
    url: Url,
    bytes: Bytes,
    content_type: Option<Mime>,
}

impl Parser for HtmlParser {
    fn new(bytes: &Bytes, content_type: Option<&Mime>, url: &Url) -> Option<Box<Self>>
    where
        Self: Sized,
    {
        // Accept text/html and application/xhtml+xml
        let is_html_mime = content_type.is_some_and(|m| {
            (m.type_() == mime::TEXT && m.subtype() == mime::HTML)
                || m.essence_str()
                    .eq_ignore_ascii_case("application/xhtml+xml")
        });

        if is_html_mime || looks_like_html(bytes) {
            Some(Box::new(Self {
                url: url.clone(),
                bytes: bytes.clone(),
                content_type: content_type.cloned(),
            }))
        } else {
            debug!("Body does not look like HTML; skipping HtmlParser.");
            None
        }
    }

    fn parse(&self) -> Result<Document, ParserError> {
        let (url_host, url_path) = crate::url_host_and_path(&self.url);
        debug!(parser = "html", %url_host, %url_path, "parse");

        // Prefer header charset if present; otherwise fall back to lossy UTF-8.
        let decoded = match charset_from_mime(self.content_type.as_ref()) {
            Some(cs) => decode_with_charset(&self.bytes, &cs),
            None => String::from_utf8_lossy(&self.bytes).into_owned(),
        };
        debug!(decoded_len = decoded.len());

        let html = Html::parse_document(&decoded);
        let base = base_url(&html, &self.url);

        let mut items = Vec::new();
        collect_roots(html.root_element(), &base, &mut items);
        let rels = collect_rels(&html, &base);
        debug!(items = items.len(), rels = rels.len(), "microformats parsed");

        Ok(Document { items, rels })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Prefix {
    P,
    U,
    Dt,
    E,
}

/// Which explicit properties an item carried, for the implied-property rules.
#[derive(Default)]
struct Seen {
    text: bool,
    url: bool,
    nested: bool,
}

impl Seen {
    fn mark(&mut self, prefix: Prefix) {
        match prefix {
            Prefix::P | Prefix::E => self.text = true,
            Prefix::U => self.url = true,
            Prefix::Dt => {}
        }
    }
}

fn collect_roots(el: ElementRef<'_>, base: &Url, items: &mut Vec<Item>) {
    if !item_types(el).is_empty() {
        items.push(parse_item(el, base));
        return;
    }
    for child in el.children().filter_map(ElementRef::wrap) {
        collect_roots(child, base, items);
    }
}

fn parse_item(el: ElementRef<'_>, base: &Url) -> Item {
    let mut item = Item {
        kind: item_types(el),
        ..Default::default()
    };
    let mut seen = Seen::default();
    walk(el, base, &mut item, &mut seen);
    imply(el, base, &mut item, &seen);
    item
}

fn walk(el: ElementRef<'_>, base: &Url, item: &mut Item, seen: &mut Seen) {
    for child in el.children().filter_map(ElementRef::wrap) {
        let props = property_classes(child);

        if !item_types(child).is_empty() {
            seen.nested = true;
            let nested = parse_item(child, base);
            if props.is_empty() {
                item.children.push(nested);
                continue;
            }
            for (prefix, name) in props {
                seen.mark(prefix);
                let mut embedded = nested.clone();
                embedded.value = Some(embedded_value(prefix, &nested, child, base));
                item.push(&name, PropertyValue::Item(embedded));
            }
            continue;
        }

        for (prefix, name) in props {
            seen.mark(prefix);
            item.push(&name, property_value(prefix, child, base));
        }
        walk(child, base, item, seen);
    }
}

fn imply(el: ElementRef<'_>, base: &Url, item: &mut Item, seen: &Seen) {
    if seen.nested {
        return;
    }
    if !seen.text && !item.properties.contains_key("name") {
        item.push("name", PropertyValue::Text(implied_name(el)));
    }
    if seen.url {
        return;
    }
    if !item.properties.contains_key("photo")
        && let Some(photo) = implied_photo(el, base)
    {
        item.push("photo", PropertyValue::Text(photo));
    }
    if !item.properties.contains_key("url")
        && let Some(url) = implied_url(el, base)
    {
        item.push("url", PropertyValue::Text(url));
    }
}

fn implied_name(el: ElementRef<'_>) -> String {
    let own = match el.value().name() {
        "img" | "area" => el.value().attr("alt"),
        "abbr" => el.value().attr("title"),
        _ => only_child(el, "img")
            .and_then(|img| img.value().attr("alt"))
            .or_else(|| only_child(el, "abbr").and_then(|abbr| abbr.value().attr("title"))),
    };
    own.map(|s| s.trim().to_owned())
        .unwrap_or_else(|| text_of(el))
}

fn implied_photo(el: ElementRef<'_>, base: &Url) -> Option<String> {
    let raw = match el.value().name() {
        "img" => el.value().attr("src"),
        "object" => el.value().attr("data"),
        _ => only_child(el, "img")
            .and_then(|img| img.value().attr("src"))
            .or_else(|| only_child(el, "object").and_then(|obj| obj.value().attr("data"))),
    };
    raw.map(|raw| resolve(raw, base))
}

fn implied_url(el: ElementRef<'_>, base: &Url) -> Option<String> {
    let raw = match el.value().name() {
        "a" | "area" => el.value().attr("href"),
        _ => only_child(el, "a")
            .or_else(|| only_child(el, "area"))
            .and_then(|a| a.value().attr("href")),
    };
    raw.map(|raw| resolve(raw, base))
}

/// The single non-item child element with the given tag.
fn only_child<'a>(el: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    let mut matching = el
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|c| c.value().name() == tag && item_types(*c).is_empty());
    let first = matching.next()?;
    matching.next().is_none().then_some(first)
}

fn embedded_value(prefix: Prefix, nested: &Item, el: ElementRef<'_>, base: &Url) -> String {
    match prefix {
        Prefix::P => nested.first_text("name").unwrap_or_else(|| text_of(el)),
        Prefix::U => nested
            .first_text("url")
            .unwrap_or_else(|| u_value(el, base)),
        Prefix::Dt | Prefix::E => text_of(el),
    }
}

fn property_value(prefix: Prefix, el: ElementRef<'_>, base: &Url) -> PropertyValue {
    match prefix {
        Prefix::P => PropertyValue::Text(p_value(el)),
        Prefix::U => PropertyValue::Text(u_value(el, base)),
        Prefix::Dt => PropertyValue::Text(dt_value(el)),
        Prefix::E => PropertyValue::Embedded {
            html: el.inner_html().trim().to_owned(),
            value: text_of(el),
        },
    }
}

fn p_value(el: ElementRef<'_>) -> String {
    let attr = match el.value().name() {
        "abbr" | "link" => "title",
        "data" | "input" => "value",
        "img" | "area" => "alt",
        _ => return text_of(el),
    };
    el.value()
        .attr(attr)
        .map(str::to_owned)
        .unwrap_or_else(|| text_of(el))
}

fn u_value(el: ElementRef<'_>, base: &Url) -> String {
    let node = el.value();
    let link = match node.name() {
        "a" | "area" | "link" => node.attr("href"),
        "img" | "audio" | "source" | "iframe" => node.attr("src"),
        "video" => node.attr("src").or_else(|| node.attr("poster")),
        "object" => node.attr("data"),
        _ => None,
    };
    if let Some(raw) = link {
        return resolve(raw, base);
    }
    let fallback = match node.name() {
        "abbr" => node.attr("title"),
        "data" | "input" => node.attr("value"),
        _ => None,
    };
    fallback
        .map(str::to_owned)
        .unwrap_or_else(|| text_of(el))
}

fn dt_value(el: ElementRef<'_>) -> String {
    let node = el.value();
    let attr = match node.name() {
        "time" | "ins" | "del" => node.attr("datetime"),
        "abbr" => node.attr("title"),
        "data" | "input" => node.attr("value"),
        _ => None,
    };
    attr.map(str::to_owned).unwrap_or_else(|| text_of(el))
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_owned()
}

fn resolve(raw: &str, base: &Url) -> String {
    base.join(raw.trim())
        .map(String::from)
        .unwrap_or_else(|_| raw.to_owned())
}

/// `name` of an mf2 class such as `p-name` or `h-entry`, when well formed.
fn mf_name<'a>(class: &'a str, prefix: &str) -> Option<&'a str> {
    let name = class.strip_prefix(prefix)?;
    let valid = name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');
    (valid && !name.is_empty() && !name.starts_with('-')).then_some(name)
}

fn item_types(el: ElementRef<'_>) -> Vec<String> {
    let mut types: Vec<String> = el
        .value()
        .classes()
        .filter(|c| mf_name(c, "h-").is_some())
        .map(str::to_owned)
        .collect();
    types.sort();
    types.dedup();
    types
}

fn property_classes(el: ElementRef<'_>) -> Vec<(Prefix, String)> {
    const PREFIXES: [(&str, Prefix); 4] = [
        ("p-", Prefix::P),
        ("u-", Prefix::U),
        ("dt-", Prefix::Dt),
        ("e-", Prefix::E),
    ];
    let mut props = Vec::new();
    for class in el.value().classes() {
        let found = PREFIXES
            .iter()
            .find_map(|(p, kind)| mf_name(class, p).map(|name| (*kind, name.to_owned())));
        if let Some(prop) = found
            && !props.contains(&prop)
        {
            props.push(prop);
        }
    }
    props
}

fn collect_rels(html: &Html, base: &Url) -> BTreeMap<String, Vec<String>> {
    let mut rels: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let Ok(links) = Selector::parse("a[rel][href], link[rel][href]") else {
        return rels;
    };
    for el in html.select(&links) {
        let (Some(rel), Some(href)) = (el.value().attr("rel"), el.value().attr("href")) else {
            continue;
        };
        let href = resolve(href, base);
        for name in rel.split_ascii_whitespace() {
            let urls = rels.entry(name.to_ascii_lowercase()).or_default();
            if !urls.contains(&href) {
                urls.push(href.clone());
            }
        }
    }
    rels
}

fn base_url(html: &Html, page: &Url) -> Url {
    let Ok(selector) = Selector::parse("base[href]") else {
        return page.clone();
    };
    let href = html
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("href"));
    href.and_then(|href| page.join(href).ok())
        .unwrap_or_else(|| page.clone())
}

fn looks_like_html(bytes: &Bytes) -> bool {
    let probe = &bytes[..bytes.len().min(2048)];
    let lower = probe
        .iter()
        .map(|b| b.to_ascii_lowercase())
        .collect::<Vec<_>>();
    let hay = lower.as_slice();
    hay.windows(14).any(|w| w == b"<!doctype html".as_ref())
        || hay.windows(5).any(|w| w == b"<html".as_ref())
}

fn charset_from_mime(mime: Option<&Mime>) -> Option<String> {
    mime.and_then(|m| m.get_param(mime::CHARSET).map(|v| v.to_string()))
}

fn decode_with_charset(bytes: &Bytes, charset: &str) -> String {
    if charset.eq_ignore_ascii_case("utf-8") || charset.eq_ignore_ascii_case("utf8") {
        match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => String::from_utf8_lossy(bytes).into_owned(),
        }
    } else {
        // Other charsets are decoded lossily rather than rejected.
        String::from_utf8_lossy(bytes).into_owned()
    }
}
