//! Persistence for event and booking records.
//!
//! [`Records`] is the storage capability shared by both record kinds. The
//! write paths in this module run validation and normalization before asking
//! the store to commit; uniqueness of event slugs and of (event, email)
//! booking pairs is left to the store, which must reject a duplicate
//! atomically with [`AppError::DuplicateKey`].

use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use crate::models::{Booking, Event, EventChanges, NewBooking, NewEvent};
use crate::utils::error::AppError;

pub mod memory;
pub mod postgres;

pub use memory::MemoryRecords;
pub use postgres::PgRecords;

pub const DUPLICATE_SLUG: &str = "An event with this slug already exists";
pub const DUPLICATE_BOOKING: &str = "This email has already booked this event";

#[async_trait]
pub trait Records: Send + Sync {
    async fn insert_event(&self, event: &Event) -> Result<(), AppError>;

    /// Overwrites the stored event with the same id.
    async fn update_event(&self, event: &Event) -> Result<(), AppError>;

    /// Returns whether a record was removed.
    async fn delete_event(&self, id: Uuid) -> Result<bool, AppError>;

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, AppError>;

    async fn find_event_by_slug(&self, slug: &str) -> Result<Option<Event>, AppError>;

    /// All events, newest first.
    async fn list_events(&self) -> Result<Vec<Event>, AppError>;

    async fn insert_booking(&self, booking: &Booking) -> Result<(), AppError>;

    async fn find_booking(&self, event_id: Uuid, email: &str) -> Result<Option<Booking>, AppError>;

    /// Bookings for one event, oldest first.
    async fn list_bookings(&self, event_id: Uuid) -> Result<Vec<Booking>, AppError>;
}

pub async fn create_event(records: &dyn Records, input: NewEvent) -> Result<Event, AppError> {
    let event = Event::from_new(input, Utc::now())?;
    records.insert_event(&event).await?;

    info!(event_id = %event.id, slug = %event.slug, "Event created");
    Ok(event)
}

pub async fn update_event(
    records: &dyn Records,
    id: Uuid,
    changes: EventChanges,
) -> Result<Event, AppError> {
    let current = records
        .find_event(id)
        .await?
        .ok_or_else(|| event_not_found(id))?;

    let next = current.apply(changes, Utc::now())?;
    records.update_event(&next).await?;

    info!(event_id = %next.id, slug = %next.slug, "Event updated");
    Ok(next)
}

pub async fn delete_event(records: &dyn Records, id: Uuid) -> Result<(), AppError> {
    if !records.delete_event(id).await? {
        return Err(event_not_found(id));
    }

    info!(event_id = %id, "Event deleted");
    Ok(())
}

pub async fn create_booking(
    records: &dyn Records,
    event_id: Uuid,
    input: NewBooking,
) -> Result<Booking, AppError> {
    let booking = Booking::from_new(event_id, input, Utc::now())?;
    verify_event_reference(records, event_id).await?;
    records.insert_booking(&booking).await?;

    info!(booking_id = %booking.id, event_id = %event_id, "Booking created");
    Ok(booking)
}

/// Distinguishes a missing event from a lookup that could not be answered.
async fn verify_event_reference(records: &dyn Records, event_id: Uuid) -> Result<(), AppError> {
    match records.find_event(event_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(AppError::ReferenceNotFound),
        Err(err) => {
            error!(error = %err, event_id = %event_id, "Failed to look up referenced event");
            Err(AppError::ReferenceLookupFailed)
        }
    }
}

pub(crate) fn event_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Event with id '{}' was not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::tests::sample_input;

    /// Store whose lookups always fail, for the reference-check error path.
    struct UnreachableRecords;

    #[async_trait]
    impl Records for UnreachableRecords {
        async fn insert_event(&self, _: &Event) -> Result<(), AppError> {
            Err(AppError::InternalServerError("unreachable".into()))
        }
        async fn update_event(&self, _: &Event) -> Result<(), AppError> {
            Err(AppError::InternalServerError("unreachable".into()))
        }
        async fn delete_event(&self, _: Uuid) -> Result<bool, AppError> {
            Err(AppError::InternalServerError("unreachable".into()))
        }
        async fn find_event(&self, _: Uuid) -> Result<Option<Event>, AppError> {
            Err(AppError::InternalServerError("unreachable".into()))
        }
        async fn find_event_by_slug(&self, _: &str) -> Result<Option<Event>, AppError> {
            Err(AppError::InternalServerError("unreachable".into()))
        }
        async fn list_events(&self) -> Result<Vec<Event>, AppError> {
            Err(AppError::InternalServerError("unreachable".into()))
        }
        async fn insert_booking(&self, _: &Booking) -> Result<(), AppError> {
            Err(AppError::InternalServerError("unreachable".into()))
        }
        async fn find_booking(&self, _: Uuid, _: &str) -> Result<Option<Booking>, AppError> {
            Err(AppError::InternalServerError("unreachable".into()))
        }
        async fn list_bookings(&self, _: Uuid) -> Result<Vec<Booking>, AppError> {
            Err(AppError::InternalServerError("unreachable".into()))
        }
    }

    fn booking_for(email: &str) -> NewBooking {
        NewBooking {
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn test_second_event_with_same_slug_is_rejected() {
        let records = MemoryRecords::default();
        create_event(&records, sample_input("Rust Nation")).await.unwrap();

        let err = create_event(&records, sample_input("rust   nation!"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateKey(_)));
        assert_eq!(records.list_events().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_event_renames_slug_and_checks_collisions() {
        let records = MemoryRecords::default();
        let first = create_event(&records, sample_input("First Meetup")).await.unwrap();
        create_event(&records, sample_input("Second Meetup")).await.unwrap();

        let rename = EventChanges {
            title: Some("Second Meetup".into()),
            ..Default::default()
        };
        let err = update_event(&records, first.id, rename).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateKey(_)));

        let rename = EventChanges {
            title: Some("Opening Meetup".into()),
            ..Default::default()
        };
        let updated = update_event(&records, first.id, rename).await.unwrap();
        assert_eq!(updated.slug, "opening-meetup");
        assert!(records.find_event_by_slug("first-meetup").await.unwrap().is_none());
        assert_eq!(
            records.find_event_by_slug("opening-meetup").await.unwrap(),
            Some(updated)
        );
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_event() {
        let records = MemoryRecords::default();
        let id = Uuid::new_v4();

        let err = update_event(&records, id, EventChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = delete_event(&records, id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_booking_requires_existing_event() {
        let records = MemoryRecords::default();
        let err = create_booking(&records, Uuid::new_v4(), booking_for("a@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ReferenceNotFound));
    }

    #[tokio::test]
    async fn test_booking_lookup_failure_is_distinct_from_not_found() {
        let err = create_booking(
            &UnreachableRecords,
            Uuid::new_v4(),
            booking_for("a@example.com"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::ReferenceLookupFailed));
    }

    #[tokio::test]
    async fn test_invalid_email_is_rejected_before_lookup() {
        let err = create_booking(&UnreachableRecords, Uuid::new_v4(), booking_for("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidFormat { field: "email", .. }));
    }

    #[tokio::test]
    async fn test_one_booking_per_email_per_event() {
        let records = MemoryRecords::default();
        let event = create_event(&records, sample_input("Rust Nation")).await.unwrap();
        let other = create_event(&records, sample_input("Rust Fest")).await.unwrap();

        create_booking(&records, event.id, booking_for("ada@example.com"))
            .await
            .unwrap();
        let err = create_booking(&records, event.id, booking_for("  ADA@Example.com "))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateKey(_)));

        // Same email for a different event is fine.
        create_booking(&records, other.id, booking_for("ada@example.com"))
            .await
            .unwrap();

        let found = records
            .find_booking(event.id, "ada@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.email, "ada@example.com");
        assert_eq!(records.list_bookings(event.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_slugs_admit_exactly_one() {
        let records = std::sync::Arc::new(MemoryRecords::default());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let records = records.clone();
            handles.push(tokio::spawn(async move {
                create_event(records.as_ref(), sample_input("Launch Party")).await
            }));
        }

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(err) => assert!(matches!(err, AppError::DuplicateKey(_))),
            }
        }
        assert_eq!(created, 1);
    }
}
