//! Embedded chat page.
//!
//! The HTML and JS under `static/` are compiled into the binary so the server
//! ships as a single file.

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};

const INDEX_HTML: &str = include_str!("../../static/index.html");
const INDEX_JS: &str = include_str!("../../static/index.js");

pub(super) async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub(super) async fn js_handler() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        INDEX_JS,
    )
        .into_response()
}
