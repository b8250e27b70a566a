//! Sign-up Routes
//!
//! - GET /sign-up and GET /sign-up/* - Hosted sign-up widget

use axum::{extract::State, response::Html};
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::pages::{render, SignUpPage};

/// GET /sign-up
///
/// The widget drives its own multi-step flow under `/sign-up/*`, so every
/// sub-path serves the same page.
pub async fn sign_up_page(State(state): State<Arc<AppState>>) -> ApiResult<Html<String>> {
    render(&SignUpPage::new(&state.auth)?)
}
