use axum::extract::State;
use axum::response::Response;
use uuid::Uuid;

use crate::models::NewBooking;
use crate::state::AppState;
use crate::store::{self, event_not_found};
use crate::utils::error::AppError;
use crate::utils::extract::{Json, Path};
use crate::utils::response::{created, success};

pub async fn create_booking(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(input): Json<NewBooking>,
) -> Result<Response, AppError> {
    let booking = store::create_booking(state.records(), event_id, input).await?;
    Ok(created(booking, "Booking created successfully"))
}

pub async fn list_bookings(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let records = state.records();
    if records.find_event(event_id).await?.is_none() {
        return Err(event_not_found(event_id));
    }

    let bookings = records.list_bookings(event_id).await?;
    Ok(success(bookings, "Bookings fetched successfully"))
}
