use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::error::AppError;
use crate::utils::extract::null_as_default;
use crate::utils::normalize::{normalize_date, normalize_time, slugify};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub mode: String,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Event details as submitted by an organizer. Missing or null fields
/// deserialize empty and are rejected by validation with a field-specific
/// error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewEvent {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(deserialize_with = "null_as_default")]
    pub venue: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub time: String,
    #[serde(deserialize_with = "null_as_default")]
    pub mode: String,
    #[serde(deserialize_with = "null_as_default")]
    pub audience: String,
    #[serde(deserialize_with = "null_as_default")]
    pub agenda: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub organizer: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

/// Partial update; only the fields present are changed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub image: Option<String>,
    pub venue: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub mode: Option<String>,
    pub audience: Option<String>,
    pub agenda: Option<Vec<String>>,
    pub organizer: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Source fields whose derived or canonical form must be recomputed.
#[derive(Debug, Clone, Copy, Default)]
struct Modified {
    title: bool,
    date: bool,
    time: bool,
}

impl Modified {
    fn all() -> Self {
        Self {
            title: true,
            date: true,
            time: true,
        }
    }
}

impl Event {
    /// Builds a validated, normalized record ready to be inserted.
    pub fn from_new(input: NewEvent, now: DateTime<Utc>) -> Result<Self, AppError> {
        let mut event = Self {
            id: Uuid::new_v4(),
            title: input.title.trim().to_string(),
            slug: String::new(),
            description: input.description.trim().to_string(),
            overview: input.overview.trim().to_string(),
            image: input.image.trim().to_string(),
            venue: input.venue.trim().to_string(),
            location: input.location.trim().to_string(),
            date: input.date.trim().to_string(),
            time: input.time.trim().to_string(),
            mode: input.mode.trim().to_string(),
            audience: input.audience.trim().to_string(),
            agenda: clean_items(input.agenda),
            organizer: input.organizer.trim().to_string(),
            tags: clean_items(input.tags),
            created_at: now,
            updated_at: now,
        };
        event.prepare_for_save(Modified::all())?;
        Ok(event)
    }

    /// Returns the record with `changes` merged in, revalidated.
    ///
    /// The slug, date and time are recomputed only when their source field
    /// actually changed.
    pub fn apply(&self, changes: EventChanges, now: DateTime<Utc>) -> Result<Self, AppError> {
        let mut next = self.clone();
        let modified = Modified {
            title: assign(&mut next.title, changes.title),
            date: assign(&mut next.date, changes.date),
            time: assign(&mut next.time, changes.time),
        };
        assign(&mut next.description, changes.description);
        assign(&mut next.overview, changes.overview);
        assign(&mut next.image, changes.image);
        assign(&mut next.venue, changes.venue);
        assign(&mut next.location, changes.location);
        assign(&mut next.mode, changes.mode);
        assign(&mut next.audience, changes.audience);
        assign(&mut next.organizer, changes.organizer);
        if let Some(agenda) = changes.agenda {
            next.agenda = clean_items(agenda);
        }
        if let Some(tags) = changes.tags {
            next.tags = clean_items(tags);
        }
        next.updated_at = now;

        next.prepare_for_save(modified)?;
        Ok(next)
    }

    fn prepare_for_save(&mut self, modified: Modified) -> Result<(), AppError> {
        self.check_required()?;

        if modified.title {
            let slug = slugify(&self.title);
            if slug.is_empty() {
                return Err(AppError::invalid_format(
                    "title",
                    "Title must contain at least one letter or number",
                ));
            }
            self.slug = slug;
        }
        if modified.date {
            self.date = normalize_date(&self.date)?;
        }
        if modified.time {
            self.time = normalize_time(&self.time)?;
        }
        Ok(())
    }

    fn check_required(&self) -> Result<(), AppError> {
        let required = [
            ("title", &self.title),
            ("description", &self.description),
            ("overview", &self.overview),
            ("image", &self.image),
            ("venue", &self.venue),
            ("location", &self.location),
            ("date", &self.date),
            ("time", &self.time),
            ("mode", &self.mode),
            ("audience", &self.audience),
            ("organizer", &self.organizer),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
            return Err(AppError::MissingRequiredField(*field));
        }

        if self.agenda.is_empty() {
            return Err(AppError::EmptyCollection("agenda"));
        }
        if self.tags.is_empty() {
            return Err(AppError::EmptyCollection("tags"));
        }
        Ok(())
    }
}

/// Stores the trimmed value when one is given and reports whether it differs.
fn assign(target: &mut String, value: Option<String>) -> bool {
    match value.map(|v| v.trim().to_string()) {
        Some(value) if value != *target => {
            *target = value;
            true
        }
        _ => false,
    }
}

fn clean_items(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_input(title: &str) -> NewEvent {
        NewEvent {
            title: title.to_string(),
            description: "A day of talks about systems programming.".into(),
            overview: "Talks, workshops and a hallway track.".into(),
            image: "/images/event1.png".into(),
            venue: "Moscone Center".into(),
            location: "San Francisco, CA".into(),
            date: "2025-11-07".into(),
            time: "9:30".into(),
            mode: "hybrid".into(),
            audience: "Developers".into(),
            agenda: vec!["Keynote".into(), "Workshops".into()],
            organizer: "Rust Bay Area".into(),
            tags: vec!["rust".into(), "systems".into()],
        }
    }

    #[test]
    fn test_from_new_derives_and_normalizes() {
        let mut input = sample_input("  My  Cool, Event!!  ");
        input.date = "November 7, 2025".into();
        let event = Event::from_new(input, Utc::now()).unwrap();

        assert_eq!(event.title, "My  Cool, Event!!");
        assert_eq!(event.slug, "my-cool-event");
        assert_eq!(event.date, "2025-11-07");
        assert_eq!(event.time, "09:30");
        assert_eq!(event.created_at, event.updated_at);
    }

    #[test]
    fn test_from_new_reports_first_missing_field() {
        let mut input = sample_input("RustConf");
        input.venue = "   ".into();
        let err = Event::from_new(input, Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::MissingRequiredField("venue")));
    }

    #[test]
    fn test_from_new_rejects_empty_collections() {
        let mut input = sample_input("RustConf");
        input.agenda = vec![];
        let err = Event::from_new(input, Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::EmptyCollection("agenda")));

        let mut input = sample_input("RustConf");
        input.tags = vec!["  ".into()];
        let err = Event::from_new(input, Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::EmptyCollection("tags")));
    }

    #[test]
    fn test_from_new_rejects_bad_date_and_time() {
        let mut input = sample_input("RustConf");
        input.date = "not-a-date".into();
        let err = Event::from_new(input, Utc::now()).unwrap_err();
        assert_eq!(err.field(), Some("date"));

        let mut input = sample_input("RustConf");
        input.time = "25:00".into();
        let err = Event::from_new(input, Utc::now()).unwrap_err();
        assert_eq!(err.field(), Some("time"));
    }

    #[test]
    fn test_from_new_rejects_title_without_slug() {
        let err = Event::from_new(sample_input("!!!"), Utc::now()).unwrap_err();
        assert_eq!(err.field(), Some("title"));
    }

    #[test]
    fn test_apply_recomputes_slug_only_on_title_change() {
        let event = Event::from_new(sample_input("RustConf 2025"), Utc::now()).unwrap();

        let same_title = EventChanges {
            title: Some(" RustConf 2025 ".into()),
            venue: Some("Pier 27".into()),
            ..Default::default()
        };
        let updated = event.apply(same_title, Utc::now()).unwrap();
        assert_eq!(updated.slug, "rustconf-2025");
        assert_eq!(updated.venue, "Pier 27");

        let renamed = EventChanges {
            title: Some("RustConf Europe".into()),
            ..Default::default()
        };
        let updated = event.apply(renamed, Utc::now()).unwrap();
        assert_eq!(updated.slug, "rustconf-europe");
        assert_eq!(updated.id, event.id);
        assert_eq!(updated.created_at, event.created_at);
    }

    #[test]
    fn test_apply_normalizes_changed_date_and_time() {
        let event = Event::from_new(sample_input("RustConf"), Utc::now()).unwrap();
        let changes = EventChanges {
            date: Some("12/01/2025".into()),
            time: Some("7:05".into()),
            ..Default::default()
        };
        let updated = event.apply(changes, Utc::now()).unwrap();
        assert_eq!(updated.date, "2025-12-01");
        assert_eq!(updated.time, "07:05");
    }

    #[test]
    fn test_apply_rejects_clearing_required_fields() {
        let event = Event::from_new(sample_input("RustConf"), Utc::now()).unwrap();
        let changes = EventChanges {
            organizer: Some("".into()),
            ..Default::default()
        };
        let err = event.apply(changes, Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::MissingRequiredField("organizer")));
    }
}
