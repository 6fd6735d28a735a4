use axum::{Json, http::StatusCode};
use serde::Deserialize;
use tracing::info;
use url::Url;

use crate::{entry::Entry, page::Page};

/// Parses HTML supplied by the client instead of fetching it.
pub async fn handle_parse(
    Json(payload): Json<HandleParse>,
) -> Result<(StatusCode, Json<Entry>), (StatusCode, String)> {
    let HandleParse { url, html } = payload;
    let (url_host, url_path) = crate::url_host_and_path(&url);
    info!(%url_host, %url_path, html_len = html.len(), "parse html");
    let entry = Page::parse(&html, url)
        .and_then(|page| page.entry_with_card())
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, format!("parse error: {e}")))?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[derive(Deserialize, Debug)]
pub struct HandleParse {
    url: Url,
    html: String,
}
