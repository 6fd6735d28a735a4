use axum::{Json, http::StatusCode};
use tracing::{info, warn};

use crate::{entry::Entry, micropub::MicropubDraft};

pub async fn handle_micropub(
    Json(draft): Json<MicropubDraft>,
) -> Result<(StatusCode, Json<Entry>), (StatusCode, String)> {
    info!(h = %draft.h, url = ?draft.url, "micropub draft");
    if !draft.is_entry() {
        return Err((StatusCode::BAD_REQUEST, format!("unsupported type: h-{}", draft.h)));
    }
    let entry = Entry::from_draft(&draft).map_err(|e| {
        warn!(error = %e, "rejected draft");
        (StatusCode::BAD_REQUEST, e.to_string())
    })?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, header},
    };
    use tower::ServiceExt;

    use crate::handler::router;

    async fn post(body: serde_json::Value) -> (u16, String) {
        let request = Request::post("/micropub")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router().oneshot(request).await.unwrap();
        let status = response.status().as_u16();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[tokio::test]
    async fn creates_entry() {
        let (status, body) = post(serde_json::json!({
            "h": "entry",
            "url": "https://ann.example/notes/1",
            "content": "hello <world>"
        }))
        .await;
        assert_eq!(status, 201);

        let entry: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(entry["url"], "https://ann.example/notes/1");
        assert_eq!(entry["name"], "hello <world>");
        assert_eq!(entry["content"]["html"], "hello &lt;world&gt;");
    }

    #[tokio::test]
    async fn rejects_draft_without_url() {
        let (status, body) = post(serde_json::json!({"h": "entry", "content": "hi"})).await;
        assert_eq!(status, 400);
        assert_eq!(body, "url is required");
    }

    #[tokio::test]
    async fn rejects_other_types() {
        let (status, _) = post(serde_json::json!({"h": "event", "url": "https://ann.example/e"})).await;
        assert_eq!(status, 400);
    }
}
