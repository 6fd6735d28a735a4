use axum::{Router, routing::post};
use tower_http::trace::TraceLayer;

pub mod micropub;
pub mod parse;
pub mod url;

pub fn router() -> Router {
    Router::new()
        .route("/url", post(url::handle_url))
        .route("/parse", post(parse::handle_parse))
        .route("/micropub", post(micropub::handle_micropub))
        .layer(TraceLayer::new_for_http())
}
