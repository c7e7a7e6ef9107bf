use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::error::AppError;
use crate::utils::extract::null_as_default;
use crate::utils::normalize::normalize_email;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub event_id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewBooking {
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
}

impl Booking {
    /// Builds a booking with a normalized email. Whether `event_id` refers to
    /// an existing event is checked by the store's write path.
    pub fn from_new(event_id: Uuid, input: NewBooking, now: DateTime<Utc>) -> Result<Self, AppError> {
        Ok(Self {
            id: Uuid::new_v4(),
            event_id,
            email: normalize_email(&input.email)?,
            created_at: now,
            updated_at: now,
        })
    }
}
