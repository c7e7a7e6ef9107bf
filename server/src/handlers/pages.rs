use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::state::AppState;
use crate::utils::error::AppError;
use crate::views;

pub async fn events_index(State(state): State<AppState>) -> Result<Response, AppError> {
    let events = state.records().list_events().await?;
    Ok(Html(views::events_page(&events)).into_response())
}

pub async fn event_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let response = match state.records().find_event_by_slug(&slug).await? {
        Some(event) => Html(views::event_page(&event)).into_response(),
        None => (StatusCode::NOT_FOUND, Html(views::not_found_page())).into_response(),
    };
    Ok(response)
}
