use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{event_not_found, Records, DUPLICATE_BOOKING, DUPLICATE_SLUG};
use crate::models::{Booking, Event};
use crate::utils::error::AppError;

/// Unique index names from the migrations.
const SLUG_INDEX: &str = "uniq_event_slug";
const BOOKING_INDEX: &str = "uniq_event_email";

const EVENT_COLUMNS: &str = r#"id, title, slug, description, overview, image, venue, location,
    "date", "time", mode, audience, agenda, organizer, tags, created_at, updated_at"#;

#[derive(Clone)]
pub struct PgRecords {
    pool: PgPool,
}

impl PgRecords {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn duplicate_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(SLUG_INDEX) => DUPLICATE_SLUG,
        Some(BOOKING_INDEX) => DUPLICATE_BOOKING,
        _ => "Record already exists",
    }
}

/// Turns a unique-index violation into the matching duplicate-key error.
fn map_write_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let message = duplicate_message(db_err.constraint());
            return AppError::DuplicateKey(message.to_string());
        }
    }
    AppError::DatabaseError(err)
}

#[async_trait]
impl Records for PgRecords {
    async fn insert_event(&self, event: &Event) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO events
                (id, title, slug, description, overview, image, venue, location,
                 "date", "time", mode, audience, agenda, organizer, tags, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.slug)
        .bind(&event.description)
        .bind(&event.overview)
        .bind(&event.image)
        .bind(&event.venue)
        .bind(&event.location)
        .bind(&event.date)
        .bind(&event.time)
        .bind(&event.mode)
        .bind(&event.audience)
        .bind(&event.agenda)
        .bind(&event.organizer)
        .bind(&event.tags)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn update_event(&self, event: &Event) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET title = $2,
                slug = $3,
                description = $4,
                overview = $5,
                image = $6,
                venue = $7,
                location = $8,
                "date" = $9,
                "time" = $10,
                mode = $11,
                audience = $12,
                agenda = $13,
                organizer = $14,
                tags = $15,
                updated_at = $16
            WHERE id = $1
            "#,
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.slug)
        .bind(&event.description)
        .bind(&event.overview)
        .bind(&event.image)
        .bind(&event.venue)
        .bind(&event.location)
        .bind(&event.date)
        .bind(&event.time)
        .bind(&event.mode)
        .bind(&event.audience)
        .bind(&event.agenda)
        .bind(&event.organizer)
        .bind(&event.tags)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(event_not_found(event.id));
        }
        Ok(())
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, AppError> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    async fn find_event_by_slug(&self, slug: &str) -> Result<Option<Event>, AppError> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM events WHERE slug = $1");
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at DESC");
        let events = sqlx::query_as::<_, Event>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }

    async fn insert_booking(&self, booking: &Booking) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO bookings (id, event_id, email, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(booking.id)
        .bind(booking.event_id)
        .bind(&booking.email)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn find_booking(&self, event_id: Uuid, email: &str) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, event_id, email, created_at, updated_at
            FROM bookings
            WHERE event_id = $1 AND email = $2
            "#,
        )
        .bind(event_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(booking)
    }

    async fn list_bookings(&self, event_id: Uuid) -> Result<Vec<Booking>, AppError> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, event_id, email, created_at, updated_at
            FROM bookings
            WHERE event_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIGRATIONS: &[&str] = &[
        include_str!("../../migrations/20240601000001_create_events.sql"),
        include_str!("../../migrations/20240601000002_create_bookings.sql"),
    ];

    #[test]
    fn test_duplicate_message_per_index() {
        assert_eq!(duplicate_message(Some("uniq_event_slug")), DUPLICATE_SLUG);
        assert_eq!(duplicate_message(Some("uniq_event_email")), DUPLICATE_BOOKING);
        assert_eq!(duplicate_message(Some("events_pkey")), "Record already exists");
        assert_eq!(duplicate_message(None), "Record already exists");
    }

    #[test]
    fn test_index_names_match_migrations() {
        let sql = MIGRATIONS.concat();
        assert!(sql.contains(&format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS {SLUG_INDEX} ON events (slug)"
        )));
        assert!(sql.contains(&format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS {BOOKING_INDEX} ON bookings (event_id, email)"
        )));
    }

    #[test]
    fn test_non_database_errors_are_not_duplicates() {
        let err = map_write_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::DatabaseError(_)));
    }
}
