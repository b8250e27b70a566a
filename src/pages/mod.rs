//! HTML Pages
//!
//! Server-rendered views handed the data computed by the route handlers.
//! Templates live in `templates/` and are compiled in by askama.

mod analytics;
mod sign_up;

pub use analytics::{AnalyticsPage, PropertyBar};
pub use sign_up::{SignUpAppearance, SignUpElements, SignUpPage, SignUpSettings};

use askama::Template;
use axum::response::Html;

use crate::api::{ApiError, ApiResult};

/// `<title>` and meta description for a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    pub title: &'static str,
    pub description: &'static str,
}

/// Render a template into an HTML response
pub fn render<T: Template>(template: &T) -> ApiResult<Html<String>> {
    template
        .render()
        .map(Html)
        .map_err(|e| ApiError::Render(e.to_string()))
}

/// Serialize a value for embedding inside a `<script>` element
pub(crate) fn script_json<T: serde::Serialize>(value: &T) -> ApiResult<String> {
    let json = serde_json::to_string(value).map_err(|e| ApiError::Render(e.to_string()))?;
    Ok(json.replace("</", "<\\/"))
}
