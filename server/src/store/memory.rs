use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{event_not_found, Records, DUPLICATE_BOOKING, DUPLICATE_SLUG};
use crate::models::{Booking, Event};
use crate::utils::error::AppError;

/// In-process store with the same uniqueness rules as the Postgres schema.
///
/// Each write holds the table lock for its whole check-then-insert, so of two
/// racing duplicates exactly one is admitted.
#[derive(Default)]
pub struct MemoryRecords {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    events: HashMap<Uuid, Event>,
    bookings: Vec<Booking>,
}

impl Tables {
    fn slug_taken(&self, slug: &str, except: Uuid) -> bool {
        self.events
            .values()
            .any(|event| event.slug == slug && event.id != except)
    }
}

#[async_trait]
impl Records for MemoryRecords {
    async fn insert_event(&self, event: &Event) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        if tables.slug_taken(&event.slug, event.id) {
            return Err(AppError::DuplicateKey(DUPLICATE_SLUG.to_string()));
        }
        tables.events.insert(event.id, event.clone());
        Ok(())
    }

    async fn update_event(&self, event: &Event) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        if !tables.events.contains_key(&event.id) {
            return Err(event_not_found(event.id));
        }
        if tables.slug_taken(&event.slug, event.id) {
            return Err(AppError::DuplicateKey(DUPLICATE_SLUG.to_string()));
        }
        tables.events.insert(event.id, event.clone());
        Ok(())
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.tables.write().await.events.remove(&id).is_some())
    }

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, AppError> {
        Ok(self.tables.read().await.events.get(&id).cloned())
    }

    async fn find_event_by_slug(&self, slug: &str) -> Result<Option<Event>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.events.values().find(|e| e.slug == slug).cloned())
    }

    async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        let mut events: Vec<Event> = self.tables.read().await.events.values().cloned().collect();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(events)
    }

    async fn insert_booking(&self, booking: &Booking) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        let duplicate = tables
            .bookings
            .iter()
            .any(|b| b.event_id == booking.event_id && b.email == booking.email);
        if duplicate {
            return Err(AppError::DuplicateKey(DUPLICATE_BOOKING.to_string()));
        }
        tables.bookings.push(booking.clone());
        Ok(())
    }

    async fn find_booking(&self, event_id: Uuid, email: &str) -> Result<Option<Booking>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .bookings
            .iter()
            .find(|b| b.event_id == event_id && b.email == email)
            .cloned())
    }

    async fn list_bookings(&self, event_id: Uuid) -> Result<Vec<Booking>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .bookings
            .iter()
            .filter(|b| b.event_id == event_id)
            .cloned()
            .collect())
    }
}
