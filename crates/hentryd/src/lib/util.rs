use once_cell::sync::Lazy;
use regex::Regex;

static BARE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r#"https?://[^\s<>"']+"#).unwrap());

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Wraps bare `http(s)://` URLs of already-escaped text in anchors. URLs sitting
/// in an attribute value are left alone.
pub fn auto_link(html: &str) -> String {
    let mut linked = String::with_capacity(html.len());
    let mut last = 0;
    for found in BARE_URL.find_iter(html) {
        let preceding = html[..found.start()].chars().next_back();
        if matches!(preceding, Some('"' | '\'' | '=')) {
            continue;
        }
        // Escaped quotes and angle brackets end a URL; sentence punctuation
        // after it is not part of it.
        let mut url = found.as_str();
        for entity in ["&quot;", "&#39;", "&lt;", "&gt;"] {
            if let Some(end) = url.find(entity) {
                url = &url[..end];
            }
        }
        let url = url
            .trim_end_matches(['.', ',', ':', '!', '?', ')'])
            .trim_end_matches("&amp;");
        if url.ends_with("://") {
            continue;
        }
        linked.push_str(&html[last..found.start()]);
        linked.push_str(&format!(r#"<a href="{url}">{url}</a>"#));
        last = found.start() + url.len();
    }
    linked.push_str(&html[last..]);
    linked
}

/// `href` of every anchor in an HTML fragment, in document order.
pub fn extract_links(html: &str) -> Vec<String> {
    let Ok(anchors) = scraper::Selector::parse("a[href]") else {
        return Vec::new();
    };
    scraper::Html::parse_fragment(html)
        .select(&anchors)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_owned)
        .collect()
}
