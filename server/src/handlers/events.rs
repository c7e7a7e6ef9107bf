use axum::extract::State;
use axum::response::Response;
use uuid::Uuid;

use crate::models::{EventChanges, NewEvent};
use crate::state::AppState;
use crate::store;
use crate::utils::error::AppError;
use crate::utils::extract::{Json, Path};
use crate::utils::response::{created, empty_success, success};

pub async fn list_events(State(state): State<AppState>) -> Result<Response, AppError> {
    let events = state.records().list_events().await?;
    Ok(success(events, "Events fetched successfully"))
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(input): Json<NewEvent>,
) -> Result<Response, AppError> {
    let event = store::create_event(state.records(), input).await?;
    Ok(created(event, "Event created successfully"))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let event = state
        .records()
        .find_event_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event with slug '{}' was not found", slug)))?;
    Ok(success(event, "Event fetched successfully"))
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(changes): Json<EventChanges>,
) -> Result<Response, AppError> {
    let event = store::update_event(state.records(), id, changes).await?;
    Ok(success(event, "Event updated successfully"))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    store::delete_event(state.records(), id).await?;
    Ok(empty_success("Event deleted successfully"))
}
