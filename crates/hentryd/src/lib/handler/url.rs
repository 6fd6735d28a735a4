use axum::{Json, http::StatusCode};
use serde::Deserialize;
use tracing::info;
use url::Url;

use crate::{
    content::{Content, Unfetched},
    entry::Entry,
};

pub async fn handle_url(
    Json(payload): Json<HandleUrl>,
) -> Result<(StatusCode, Json<Entry>), (StatusCode, String)> {
    let url = payload.url;
    let (url_host, url_path) = crate::url_host_and_path(&url);
    info!(%url_host, %url_path, "process url");
    let page = Content::<Unfetched>::new(url)
        .fetch()
        .await
        .map_err(|e| (StatusCode::BAD_GATEWAY, format!("fetch error: {e}")))?
        .parse()
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, format!("parse error: {e}")))?;
    let entry = page
        .entry_with_card()
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, format!("parse error: {e}")))?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[derive(Deserialize, Debug)]
pub struct HandleUrl {
    url: Url,
}
